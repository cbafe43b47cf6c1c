use std::path::Path;

use log::{debug, info, trace, warn};

use crate::core::media::{self, FnStorage, MediaEntry, MediaStorage};
use crate::core::subtitles::parsers::{Parser, SrtParser};
use crate::core::subtitles::CueSequence;

/// The default language tag of the secondary subtitle files.
pub const DEFAULT_SECONDARY_LANGUAGE: &str = "en";

const SUBTITLE_EXTENSION: &str = "srt";

/// Pairs media identifiers with the subtitle files next to them.
///
/// For a media identifier `movie.mp4`, the primary subtitle is `movie.srt` and the secondary
/// subtitle `movie.<language>.srt`.
/// Media without a primary subtitle file are omitted from the result.
#[derive(Debug)]
pub struct MediaPairer {
    parser: Box<dyn Parser>,
    secondary_language: String,
}

impl MediaPairer {
    /// Create a new pairer using the given secondary language tag.
    pub fn new<S: Into<String>>(secondary_language: S) -> Self {
        Self {
            parser: Box::new(SrtParser::new()),
            secondary_language: secondary_language.into(),
        }
    }

    /// The language tag of the secondary subtitle files.
    pub fn secondary_language(&self) -> &str {
        self.secondary_language.as_str()
    }

    /// Pair each of the given media identifiers with their subtitle files.
    ///
    /// The returned entries preserve the order of the given identifiers.
    pub fn pair(&self, media_ids: &[String], storage: &dyn MediaStorage) -> Vec<MediaEntry> {
        let entries: Vec<MediaEntry> = media_ids
            .iter()
            .filter_map(|media_id| self.pair_media(media_id, storage))
            .collect();

        info!(
            "Paired {} out of {} media items with subtitles",
            entries.len(),
            media_ids.len()
        );
        entries
    }

    fn pair_media(&self, media_id: &str, storage: &dyn MediaStorage) -> Option<MediaEntry> {
        let primary_path = Self::subtitle_path(media_id, SUBTITLE_EXTENSION);
        if !storage.exists(primary_path.as_str()) {
            debug!(
                "Media {} has no subtitle file {}, media will be ignored",
                media_id, primary_path
            );
            return None;
        }

        let primary = match self.read_cues(primary_path.as_str(), storage) {
            Ok(cues) => cues,
            Err(e) => {
                warn!("Failed to read subtitle of media {}, {}", media_id, e);
                return None;
            }
        };

        let secondary_path = Self::subtitle_path(
            media_id,
            format!("{}.{}", self.secondary_language, SUBTITLE_EXTENSION).as_str(),
        );
        let secondary = if storage.exists(secondary_path.as_str()) {
            self.read_cues(secondary_path.as_str(), storage)
                .map_err(|e| {
                    warn!(
                        "Failed to read secondary subtitle of media {}, {}",
                        media_id, e
                    )
                })
                .ok()
        } else {
            trace!("Media {} has no secondary subtitle {}", media_id, secondary_path);
            None
        };

        Some(MediaEntry::new(
            media_id.to_string(),
            storage.location(media_id),
            primary,
            secondary,
        ))
    }

    fn read_cues(&self, path: &str, storage: &dyn MediaStorage) -> media::Result<CueSequence> {
        let contents = storage.read(path)?;
        let cues = self.parser.parse_string(contents.as_str());
        trace!("Read {} cues from {}", cues.len(), path);
        Ok(cues)
    }

    /// Replace the extension of the media identifier with the given subtitle extension.
    fn subtitle_path(media_id: &str, extension: &str) -> String {
        Path::new(media_id)
            .with_extension(extension)
            .to_string_lossy()
            .to_string()
    }
}

impl Default for MediaPairer {
    fn default() -> Self {
        Self::new(DEFAULT_SECONDARY_LANGUAGE)
    }
}

/// Pair the given media identifiers with their subtitle files, using the default secondary language.
///
/// * `exists_fn` - Verifies if the given path exists.
/// * `read_fn`   - Reads the contents of the given path.
pub fn pair<E, R>(media_ids: &[String], exists_fn: E, read_fn: R) -> Vec<MediaEntry>
where
    E: Fn(&str) -> bool + Send + Sync,
    R: Fn(&str) -> media::Result<String> + Send + Sync,
{
    MediaPairer::default().pair(media_ids, &FnStorage::new(exists_fn, read_fn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::media::{MediaError, MockMediaStorage};
    use crate::core::subtitles::Timecode;
    use crate::init_logger;

    const PRIMARY: &str = "1\n00:00:01,500 --> 00:00:03,000\nHallo wereld\n\n2\n00:00:04,000 --> 00:00:05,000\nTot ziens\n";
    const SECONDARY: &str = "1\n00:00:01,500 --> 00:00:03,000\nHello world\n";

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_pair_excludes_media_without_subtitle() {
        init_logger!();

        let result = pair(
            &ids(&["a.mp4", "b.mp4"]),
            |path| path == "a.srt",
            |_| Ok(PRIMARY.to_string()),
        );

        assert_eq!(1, result.len());
        assert_eq!("a.mp4", result[0].id());
        assert_eq!(2, result[0].primary().len());
        assert_eq!(None, result[0].secondary());
    }

    #[test]
    fn test_pair_secondary() {
        init_logger!();

        let result = pair(
            &ids(&["a.mp4"]),
            |path| path == "a.srt" || path == "a.en.srt",
            |path| match path {
                "a.srt" => Ok(PRIMARY.to_string()),
                _ => Ok(SECONDARY.to_string()),
            },
        );

        let entry = &result[0];
        assert_eq!(Some("Hello world"), entry.secondary_text(0));
        assert_eq!(None, entry.secondary_text(1));
        assert_eq!(Timecode::from_millis(1500), *entry.primary()[0].start());
    }

    #[test]
    fn test_pair_preserves_order() {
        let result = pair(
            &ids(&["c.webm", "a.mp3", "b.ogg"]),
            |_| true,
            |_| Ok(PRIMARY.to_string()),
        );

        let result: Vec<&str> = result.iter().map(|e| e.id()).collect();
        assert_eq!(vec!["c.webm", "a.mp3", "b.ogg"], result);
    }

    #[test]
    fn test_pair_secondary_language() {
        let mut storage = MockMediaStorage::new();
        storage
            .expect_exists()
            .returning(|path| path == "movie.srt" || path == "movie.nl.srt");
        storage
            .expect_read()
            .returning(|_| Ok(PRIMARY.to_string()));
        storage
            .expect_location()
            .returning(|id| format!("/media/{}", id));
        let pairer = MediaPairer::new("nl");

        let result = pairer.pair(&ids(&["movie.mp4"]), &storage);

        assert_eq!(1, result.len());
        assert_eq!("/media/movie.mp4", result[0].media_path());
        assert_eq!(Some("Hallo wereld"), result[0].secondary_text(0));
    }

    #[test]
    fn test_pair_unreadable_primary() {
        init_logger!();

        let result = pair(
            &ids(&["a.mp4"]),
            |_| true,
            |path| Err(MediaError::IO(path.to_string(), "permission denied".to_string())),
        );

        assert_eq!(Vec::<MediaEntry>::new(), result);
    }

    #[test]
    fn test_pair_unreadable_secondary() {
        init_logger!();

        let result = pair(
            &ids(&["a.mp4"]),
            |_| true,
            |path| match path {
                "a.srt" => Ok(PRIMARY.to_string()),
                _ => Err(MediaError::IO(path.to_string(), "permission denied".to_string())),
            },
        );

        assert_eq!(1, result.len());
        assert_eq!(None, result[0].secondary());
    }

    #[test]
    fn test_subtitle_path() {
        assert_eq!("dir/a.srt", MediaPairer::subtitle_path("dir/a.mp4", "srt"));
        assert_eq!("a.b.en.srt", MediaPairer::subtitle_path("a.b.mp4", "en.srt"));
        assert_eq!("a.srt", MediaPairer::subtitle_path("a", "srt"));
    }
}
