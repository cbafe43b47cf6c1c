use thiserror::Error;

/// The specialized subtitle result.
pub type Result<T> = std::result::Result<T, SubtitleError>;

/// Represents errors specific to subtitles.
#[derive(PartialEq, Debug, Clone, Error)]
pub enum SubtitleError {
    /// IO error occurred while reading the subtitle file.
    #[error("Failed to read subtitle file {0}: {1}")]
    IO(String, String),
}

/// Represents errors of the subtitle parsers.
#[derive(PartialEq, Debug, Clone, Error)]
pub enum SubtitleParseError {
    #[error("Parsing failed with {0}")]
    Failed(String),
    #[error("File contains invalid time, {0}")]
    InvalidTime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_parse_error_display() {
        assert_eq!(
            "Parsing failed with lorem".to_string(),
            SubtitleParseError::Failed("lorem".to_string()).to_string()
        );
        assert_eq!(
            "File contains invalid time, 13".to_string(),
            SubtitleParseError::InvalidTime("13".to_string()).to_string()
        );
    }

    #[test]
    fn test_subtitle_error_display() {
        let result = SubtitleError::IO("foo.srt".to_string(), "not found".to_string());

        assert_eq!(
            "Failed to read subtitle file foo.srt: not found",
            result.to_string()
        );
    }
}
