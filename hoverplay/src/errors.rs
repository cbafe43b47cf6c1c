use std::io;

use hoverplay_core::core::config::ConfigError;
use hoverplay_core::core::media::MediaError;
use hoverplay_core::core::playback::PlaybackError;
use thiserror::Error;

/// The result type of the application.
pub type Result<T> = std::result::Result<T, AppError>;

/// The errors which end the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] hoverplay_logging::Error),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error("invalid log level {0}")]
    InvalidLogLevel(String),
    #[error("failed to serialize the library, {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to write the output, {0}")]
    Output(#[from] io::Error),
}
