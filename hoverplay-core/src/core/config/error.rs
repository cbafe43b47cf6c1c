use thiserror::Error;

/// The configuration specific result type.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The errors which can occur while loading the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The configuration file doesn't exist.
    #[error("config file {0} not found")]
    NotFound(String),
    /// The configuration file couldn't be read.
    #[error("failed to read config file {0}, {1}")]
    IO(String, String),
    /// The configuration data is invalid.
    #[error("config is invalid, {0}")]
    InvalidConfig(String),
}
