use thiserror::Error;

/// The playback specific result type.
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// The errors of the playback synchronization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// No media entry has been registered for the given id.
    #[error("media entry {0} is unknown")]
    UnknownEntry(String),
    /// The playback event loop is no longer running.
    #[error("playback event loop has been stopped")]
    Stopped,
}
