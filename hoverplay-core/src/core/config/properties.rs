use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{env, fs};

use derive_more::Display;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::core::config::{ConfigError, Result};
use crate::core::media::{DEFAULT_MEDIA_EXTENSIONS, DEFAULT_SECONDARY_LANGUAGE};

/// The default text shown for cues without a secondary (translated) text.
pub const DEFAULT_FALLBACK_TEXT: &str = "No translation available";

const DEFAULT_SECONDARY: fn() -> String = || DEFAULT_SECONDARY_LANGUAGE.to_string();
const DEFAULT_FALLBACK: fn() -> String = || DEFAULT_FALLBACK_TEXT.to_string();
const DEFAULT_EXTENSIONS: fn() -> Vec<String> =
    || DEFAULT_MEDIA_EXTENSIONS.iter().map(|e| e.to_string()).collect();

const DEFAULT_CONFIG_FILENAME: &str = "application";
const CONFIG_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// In-between wrapper for serde which maps the `hoverplay` root key.
#[derive(Debug, Clone, Default, Deserialize)]
struct PropertiesWrapper {
    #[serde(default)]
    hoverplay: HoverplayProperties,
}

/// The static properties of the application.
#[derive(Debug, Display, Clone, Default, Serialize, Deserialize, PartialEq)]
#[display("subtitle: {}, media: {}", subtitle, media)]
pub struct HoverplayProperties {
    /// The log levels of individual loggers, e.g. `hoverplay_core: debug`.
    #[serde(default)]
    pub loggers: HashMap<String, String>,
    #[serde(default)]
    pub subtitle: SubtitleProperties,
    #[serde(default)]
    pub media: MediaProperties,
}

impl HoverplayProperties {
    /// Load the properties from the [DEFAULT_CONFIG_FILENAME] config file within the working directory.
    /// The defaults are used when no config file could be found.
    pub fn new_auto() -> Self {
        Self::from_filename(DEFAULT_CONFIG_FILENAME)
    }

    /// Load the properties from the config file with the given name (without extension)
    /// within the working directory.
    /// The defaults are used when no config file could be found or read.
    pub fn from_filename(filename: &str) -> Self {
        debug!("Searching for config file with name \"{}\"", filename);
        match Self::find_existing_file(filename) {
            Some(path) => Self::from_path(&path).unwrap_or_else(|e| {
                warn!("Failed to load config {:?}, {}, using defaults instead", path, e);
                Self::default()
            }),
            None => {
                debug!("No config file found for \"{}\", using defaults", filename);
                Self::default()
            }
        }
    }

    /// Load the properties from the given config file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let location = path.display().to_string();
        if !path.exists() {
            return Err(ConfigError::NotFound(location));
        }

        let data = fs::read_to_string(path).map_err(|e| ConfigError::IO(location, e.to_string()))?;
        Self::parse(data.as_str())
    }

    /// Parse the given config data, falling back to the defaults when the data is invalid.
    pub fn from_yaml(data: &str) -> Self {
        Self::parse(data).unwrap_or_else(|e| {
            warn!("Failed to parse config, {}, using defaults instead", e);
            Self::default()
        })
    }

    fn parse(data: &str) -> Result<Self> {
        trace!("Parsing config data {}", data);
        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        let wrapper: PropertiesWrapper =
            serde_yaml::from_str(data).map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        debug!("Parsed config data {:?}", wrapper);
        Ok(wrapper.hoverplay)
    }

    fn find_existing_file(filename: &str) -> Option<PathBuf> {
        let directory = env::current_dir().ok()?;

        CONFIG_EXTENSIONS
            .iter()
            .map(|extension| directory.join(format!("{}.{}", filename, extension)))
            .find(|path| path.is_file())
    }
}

/// The subtitle properties of the application.
#[derive(Debug, Display, Clone, Serialize, Deserialize, PartialEq)]
#[display("secondary_language: {}, fallback_text: {}", secondary_language, fallback_text)]
pub struct SubtitleProperties {
    /// The language tag of the secondary subtitle files, `<media>.<tag>.srt`.
    #[serde(default = "DEFAULT_SECONDARY")]
    pub secondary_language: String,
    /// The text shown for cues without a secondary text.
    #[serde(default = "DEFAULT_FALLBACK")]
    pub fallback_text: String,
}

impl Default for SubtitleProperties {
    fn default() -> Self {
        Self {
            secondary_language: DEFAULT_SECONDARY(),
            fallback_text: DEFAULT_FALLBACK(),
        }
    }
}

/// The media library properties of the application.
#[derive(Debug, Display, Clone, Serialize, Deserialize, PartialEq)]
#[display("extensions: {:?}", extensions)]
pub struct MediaProperties {
    /// The file extensions which are considered to be media.
    #[serde(default = "DEFAULT_EXTENSIONS")]
    pub extensions: Vec<String>,
}

impl Default for MediaProperties {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_logger;
    use crate::testing::write_tmp_dir_file;

    use tempfile::tempdir;

    #[test]
    fn test_from_yaml_defaults() {
        init_logger!();

        let result = HoverplayProperties::from_yaml("");

        assert_eq!("en", result.subtitle.secondary_language);
        assert_eq!(DEFAULT_FALLBACK_TEXT, result.subtitle.fallback_text);
        assert_eq!(vec!["mp3", "mp4", "ogg", "webm"], result.media.extensions);
    }

    #[test]
    fn test_from_yaml() {
        init_logger!();
        let data = r#"
hoverplay:
  loggers:
    hoverplay_core: debug
  subtitle:
    secondary_language: nl
  media:
    extensions:
      - mkv
"#;

        let result = HoverplayProperties::from_yaml(data);

        assert_eq!("nl", result.subtitle.secondary_language);
        assert_eq!(DEFAULT_FALLBACK_TEXT, result.subtitle.fallback_text);
        assert_eq!(vec!["mkv".to_string()], result.media.extensions);
        assert_eq!(Some(&"debug".to_string()), result.loggers.get("hoverplay_core"));
    }

    #[test]
    fn test_from_yaml_invalid() {
        init_logger!();

        let result = HoverplayProperties::from_yaml("hoverplay: [lorem");

        assert_eq!(HoverplayProperties::default(), result);
    }

    #[test]
    fn test_from_path() {
        init_logger!();
        let temp_dir = tempdir().unwrap();
        write_tmp_dir_file(
            &temp_dir,
            "application.yml",
            "hoverplay:\n  subtitle:\n    fallback_text: Geen vertaling\n",
        );

        let result = HoverplayProperties::from_path(temp_dir.path().join("application.yml")).unwrap();

        assert_eq!("Geen vertaling", result.subtitle.fallback_text);
    }

    #[test]
    fn test_from_path_not_found() {
        let result = HoverplayProperties::from_path("/lorem/application.yml");

        assert_eq!(
            Err(ConfigError::NotFound("/lorem/application.yml".to_string())),
            result
        );
    }
}
