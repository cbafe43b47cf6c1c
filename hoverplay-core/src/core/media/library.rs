use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{debug, trace};

use crate::core::media::{self, MediaError, MediaStorage};

/// The default media extensions which are picked up by the [DirectoryLibrary].
pub const DEFAULT_MEDIA_EXTENSIONS: [&str; 4] = ["mp3", "mp4", "ogg", "webm"];

/// A source of media identifiers.
pub trait MediaLibrary: Debug + Send + Sync {
    /// Retrieve the identifiers of the available media items.
    fn media_ids(&self) -> media::Result<Vec<String>>;
}

/// A media library which exposes the media files within a single directory.
///
/// Media identifiers are the filenames of the media, sorted by name.
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    directory: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryLibrary {
    /// Create a new library for the given directory, using the [DEFAULT_MEDIA_EXTENSIONS].
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self::with_extensions(directory, DEFAULT_MEDIA_EXTENSIONS.iter().map(|e| e.to_string()))
    }

    /// Create a new library for the given directory which accepts the given media extensions.
    pub fn with_extensions<P, I>(directory: P, extensions: I) -> Self
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = String>,
    {
        Self {
            directory: directory.as_ref().to_path_buf(),
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
        }
    }

    pub fn directory(&self) -> &Path {
        self.directory.as_path()
    }

    fn is_media_file(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| self.extensions.iter().any(|extension| extension == e))
                .unwrap_or(false)
    }
}

impl MediaLibrary for DirectoryLibrary {
    fn media_ids(&self) -> media::Result<Vec<String>> {
        let location = self.directory.display().to_string();
        if !self.directory.exists() {
            return Err(MediaError::NotFound(location));
        }
        if !self.directory.is_dir() {
            return Err(MediaError::InvalidDirectory(location));
        }

        trace!("Scanning media directory {:?}", self.directory);
        let entries =
            fs::read_dir(&self.directory).map_err(|e| MediaError::IO(location, e.to_string()))?;
        let media_ids: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|path| self.is_media_file(path))
            .filter_map(|path| {
                path.file_name()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_string())
            })
            .sorted()
            .collect();

        debug!(
            "Found {} media files within {:?}",
            media_ids.len(),
            self.directory
        );
        Ok(media_ids)
    }
}

impl MediaStorage for DirectoryLibrary {
    fn exists(&self, path: &str) -> bool {
        self.directory.join(path).is_file()
    }

    fn read(&self, path: &str) -> media::Result<String> {
        let path = self.directory.join(path);
        fs::read_to_string(&path).map_err(|e| MediaError::IO(path.display().to_string(), e.to_string()))
    }

    fn location(&self, media_id: &str) -> String {
        self.directory.join(media_id).display().to_string()
    }
}
