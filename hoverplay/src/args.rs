use std::path::PathBuf;

use clap::Parser;
use derive_more::Display;

const DEFAULT_LOG_LEVEL: fn() -> String = || "info".to_string();

/// The command line arguments of hoverplay.
#[derive(Debug, Clone, Display, Parser)]
#[command(name = "hoverplay", version, about)]
#[display("directory: {:?}", directory)]
pub struct HoverplayArgs {
    /// The directory containing the media and subtitle files.
    pub directory: PathBuf,
    /// The `application.yml` config file to use.
    /// The working directory is searched for one when not given.
    #[arg(long, short)]
    pub config: Option<PathBuf>,
    /// Also write the log to the given file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// The root log level, e.g. `warn`, `info` or `debug`.
    #[arg(long, default_value_t = DEFAULT_LOG_LEVEL())]
    pub log_level: String,
    /// Print the paired library as JSON instead of text.
    #[arg(long, default_value_t = false)]
    pub json: bool,
    /// Hover the first cue of every entry and wait for its auto-stop.
    #[arg(long, default_value_t = false)]
    pub preview: bool,
}
