use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Logger as LoggerConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::{Config, Handle};

use crate::{Error, Result};

const LOG_FORMAT_CONSOLE: &str = "\x1B[37m{d(%Y-%m-%d %H:%M:%S%.3f)}\x1B[0m {h({l:>5.5})} \x1B[37m---\x1B[0m \x1B[37m[{T:>15.15}]\x1B[0m \x1B[36m{t:<40.40}\x1B[0m \x1B[37m:\x1B[0m {m}{n}";
const LOG_FORMAT_FILE: &str =
    "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:>5.5} --- [{T:>15.15}] {t:<40.40} : {m}{n}";
const CONSOLE_APPENDER: &str = "console";
const FILE_APPENDER: &str = "file";
const LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;
const LOG_FILE_WINDOW: u32 = 3;
const DEFAULT_LOG_STEM: &str = "hoverplay";

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// The process wide logger of hoverplay.
/// Only one instance can be created per process.
#[derive(Debug)]
pub struct Logger {
    handle: Handle,
    log_path: Option<PathBuf>,
}

impl Logger {
    /// Returns a builder instance for the logger.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Returns the maximum log level which is written by the logger.
    pub fn max_log_level(&self) -> LevelFilter {
        self.handle.max_log_level()
    }

    /// Returns the log file of the logger, if any.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    fn init(
        root_level: LevelFilter,
        log_path: Option<PathBuf>,
        loggers: HashMap<String, LevelFilter>,
    ) -> Result<Self> {
        if INITIALIZED.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyInitialized);
        }

        let config = Self::create_config(root_level, log_path.as_deref(), loggers)?;
        let handle = log4rs::init_config(config).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        info!("Logger has been initialized at level {}", root_level);
        if let Some(path) = log_path.as_ref() {
            debug!("Writing log file to {:?}", path);
        }

        Ok(Self { handle, log_path })
    }

    fn create_config(
        root_level: LevelFilter,
        log_path: Option<&Path>,
        loggers: HashMap<String, LevelFilter>,
    ) -> Result<Config> {
        let console = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_FORMAT_CONSOLE)))
            .build();
        let mut root = Root::builder().appender(CONSOLE_APPENDER);
        let mut builder =
            Config::builder().appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));

        if let Some(path) = log_path {
            builder = builder.appender(Self::create_file_appender(path)?);
            root = root.appender(FILE_APPENDER);
        }

        builder = builder.loggers(
            loggers
                .into_iter()
                .map(|(name, level)| LoggerConfig::builder().build(name, level)),
        );

        builder
            .build(root.build(root_level))
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    fn create_file_appender(path: &Path) -> Result<Appender> {
        if let Some(parent) = path.parent().filter(|e| !e.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // rolled files are kept next to the active log file as `<stem>.<n>.log`
        let stem = path
            .file_stem()
            .and_then(|e| e.to_str())
            .unwrap_or(DEFAULT_LOG_STEM);
        let pattern = path.with_file_name(format!("{}.{{}}.log", stem));
        let roller = FixedWindowRoller::builder()
            .base(1)
            .build(pattern.to_string_lossy().as_ref(), LOG_FILE_WINDOW)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        let policy = CompoundPolicy::new(
            Box::new(SizeTrigger::new(LOG_FILE_SIZE)),
            Box::new(roller),
        );

        let appender = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_FORMAT_FILE)))
            .append(false)
            .build(path, Box::new(policy))
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        Ok(Appender::builder().build(FILE_APPENDER, Box::new(appender)))
    }
}

/// Builder for the [Logger].
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    root_level: Option<LevelFilter>,
    log_path: Option<PathBuf>,
    loggers: HashMap<String, LevelFilter>,
}

impl LoggerBuilder {
    /// Set the root level of the logger, defaults to [LevelFilter::Info].
    pub fn root_level(&mut self, level: LevelFilter) -> &mut Self {
        self.root_level = Some(level);
        self
    }

    /// Also write the log to the given file, rolling it when it grows too large.
    pub fn log_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.log_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the level of an individual logger, e.g. `hoverplay_core::core::playback`.
    pub fn logger<S: AsRef<str>>(&mut self, name: S, level: LevelFilter) -> &mut Self {
        self.loggers.insert(name.as_ref().to_string(), level);
        self
    }

    /// Initialize the process wide logger.
    ///
    /// It returns [Error::AlreadyInitialized] when a logger has been initialized before.
    pub fn build(&mut self) -> Result<Logger> {
        Logger::init(
            self.root_level.take().unwrap_or(LevelFilter::Info),
            self.log_path.take(),
            self.loggers.drain().collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_config() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("logs").join("hoverplay.log");
        let mut loggers = HashMap::new();
        loggers.insert("hoverplay_core".to_string(), LevelFilter::Trace);

        let config = Logger::create_config(LevelFilter::Warn, Some(log_path.as_path()), loggers)
            .expect("expected a valid config");

        assert_eq!(2, config.appenders().len());
        assert_eq!(1, config.loggers().len());
        assert_eq!(LevelFilter::Warn, config.root().level());
        assert!(
            temp_dir.path().join("logs").is_dir(),
            "expected the log directory to have been created"
        );
    }

    #[test]
    fn test_build() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("hoverplay.log");
        let logger = Logger::builder()
            .root_level(LevelFilter::Trace)
            .log_path(&log_path)
            .logger("hoverplay_core::core::playback", LevelFilter::Debug)
            .build()
            .expect("expected a logger");

        assert_eq!(LevelFilter::Trace, logger.max_log_level());
        assert_eq!(Some(log_path.as_path()), logger.log_path());

        let result = Logger::builder()
            .build()
            .err()
            .expect("expected an error to have been returned");
        assert_eq!(Error::AlreadyInitialized, result);
    }
}
