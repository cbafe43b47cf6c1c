use std::fmt::{Debug, Formatter};

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::core::media;

/// The file oracle used while pairing media with their subtitle files.
///
/// Paths are always relative to the media library, e.g. `movie.srt`.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait MediaStorage: Debug + Send + Sync {
    /// Verify if the given path exists within the storage.
    fn exists(&self, path: &str) -> bool;

    /// Read the contents of the given path as text.
    fn read(&self, path: &str) -> media::Result<String>;

    /// Resolve the location of the given media identifier as it should be handed to a media sink.
    fn location(&self, media_id: &str) -> String {
        media_id.to_string()
    }
}

/// A [MediaStorage] backed by an existence and read function.
pub struct FnStorage<E, R>
where
    E: Fn(&str) -> bool + Send + Sync,
    R: Fn(&str) -> media::Result<String> + Send + Sync,
{
    exists_fn: E,
    read_fn: R,
}

impl<E, R> FnStorage<E, R>
where
    E: Fn(&str) -> bool + Send + Sync,
    R: Fn(&str) -> media::Result<String> + Send + Sync,
{
    pub fn new(exists_fn: E, read_fn: R) -> Self {
        Self { exists_fn, read_fn }
    }
}

impl<E, R> Debug for FnStorage<E, R>
where
    E: Fn(&str) -> bool + Send + Sync,
    R: Fn(&str) -> media::Result<String> + Send + Sync,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStorage").finish()
    }
}

impl<E, R> MediaStorage for FnStorage<E, R>
where
    E: Fn(&str) -> bool + Send + Sync,
    R: Fn(&str) -> media::Result<String> + Send + Sync,
{
    fn exists(&self, path: &str) -> bool {
        (self.exists_fn)(path)
    }

    fn read(&self, path: &str) -> media::Result<String> {
        (self.read_fn)(path)
    }
}
