use thiserror::Error;

/// The media specific result type.
pub type Result<T> = std::result::Result<T, MediaError>;

/// The errors which can occur while reading the media library.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MediaError {
    /// The given media location doesn't exist.
    #[error("media location {0} not found")]
    NotFound(String),
    /// The media location is not a directory.
    #[error("media location {0} is not a directory")]
    InvalidDirectory(String),
    /// An IO error occurred while reading the media location.
    #[error("failed to read {0}, {1}")]
    IO(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            "media location /lorem not found",
            MediaError::NotFound("/lorem".to_string()).to_string()
        );
        assert_eq!(
            "failed to read a.srt, permission denied",
            MediaError::IO("a.srt".to_string(), "permission denied".to_string()).to_string()
        );
    }
}
