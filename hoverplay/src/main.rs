use std::io;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use clap::Parser;
use hoverplay_core::core::config::HoverplayProperties;
use hoverplay_core::core::media::{DirectoryLibrary, MediaEntry, MediaLibrary, MediaPairer};
use hoverplay_logging::Logger;
use log::{error, info, warn, LevelFilter};

use crate::args::HoverplayArgs;
use crate::errors::{AppError, Result};

mod args;
mod errors;
mod listing;
mod preview;

#[tokio::main]
async fn main() -> ExitCode {
    let args = HoverplayArgs::parse();

    match run(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Hoverplay failed, {}", e);
            eprintln!("hoverplay: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: HoverplayArgs) -> Result<()> {
    let properties = load_properties(&args)?;
    init_logger(&args, &properties)?;
    info!("Starting hoverplay {} for {}", hoverplay_core::VERSION, args);

    let start = Instant::now();
    let entries = load_entries(&args, &properties)?;
    let time_taken = start.elapsed();
    info!(
        "Paired {} media entries in {}.{:03} seconds",
        entries.len(),
        time_taken.as_secs(),
        time_taken.subsec_millis()
    );

    let mut stdout = io::stdout().lock();
    let fallback_text = properties.subtitle.fallback_text.as_str();
    if args.json {
        listing::write_json(&mut stdout, &entries, fallback_text)?;
    } else {
        listing::write_text(&mut stdout, &entries, fallback_text)?;
    }

    if args.preview {
        preview::run_preview(&mut stdout, &entries).await?;
    }

    Ok(())
}

fn load_properties(args: &HoverplayArgs) -> Result<HoverplayProperties> {
    match args.config.as_ref() {
        Some(path) => Ok(HoverplayProperties::from_path(path)?),
        None => Ok(HoverplayProperties::new_auto()),
    }
}

fn init_logger(args: &HoverplayArgs, properties: &HoverplayProperties) -> Result<Logger> {
    let root_level = LevelFilter::from_str(args.log_level.as_str())
        .map_err(|_| AppError::InvalidLogLevel(args.log_level.clone()))?;
    let mut builder = Logger::builder();
    builder.root_level(root_level);

    if let Some(path) = args.log_file.as_ref() {
        builder.log_path(path);
    }

    let mut invalid_loggers = Vec::new();
    for (name, level) in properties.loggers.iter() {
        match LevelFilter::from_str(level) {
            Ok(level) => {
                builder.logger(name, level);
            }
            Err(_) => invalid_loggers.push((name, level)),
        }
    }

    let logger = builder.build()?;
    for (name, level) in invalid_loggers {
        warn!("Ignoring invalid log level {} of logger {}", level, name);
    }

    Ok(logger)
}

fn load_entries(args: &HoverplayArgs, properties: &HoverplayProperties) -> Result<Vec<MediaEntry>> {
    let library =
        DirectoryLibrary::with_extensions(&args.directory, properties.media.extensions.clone());
    let pairer = MediaPairer::new(properties.subtitle.secondary_language.as_str());
    let media_ids = library.media_ids()?;

    Ok(pairer.pair(&media_ids, &library))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoverplay_core::init_logger;
    use hoverplay_core::testing::{copy_test_file, write_tmp_dir_file};
    use tempfile::tempdir;

    fn args(directory: &str) -> HoverplayArgs {
        HoverplayArgs::try_parse_from(["hoverplay", directory]).unwrap()
    }

    #[test]
    fn test_load_entries() {
        init_logger!();
        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path().to_str().unwrap();
        write_tmp_dir_file(&temp_dir, "pirates.ogg", "");
        write_tmp_dir_file(&temp_dir, "pirates.srt", "1\n00:00:01,000 --> 00:00:02,000\nYo ho\n");
        write_tmp_dir_file(&temp_dir, "lonely.mp3", "");
        let properties = HoverplayProperties::default();

        let result = load_entries(&args(temp_path), &properties).unwrap();

        assert_eq!(1, result.len());
        assert_eq!("pirates.ogg", result[0].id());
        assert_eq!(None, result[0].secondary());
    }

    #[test]
    fn test_load_entries_secondary_language() {
        init_logger!();
        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path().to_str().unwrap();
        write_tmp_dir_file(&temp_dir, "pirates.mkv", "");
        write_tmp_dir_file(&temp_dir, "pirates.srt", "1\n00:00:01,000 --> 00:00:02,000\nYo ho\n");
        write_tmp_dir_file(&temp_dir, "pirates.nl.srt", "1\n00:00:01,000 --> 00:00:02,000\nJo ho\n");
        let properties = HoverplayProperties::from_yaml(
            "hoverplay:\n  subtitle:\n    secondary_language: nl\n  media:\n    extensions: [mkv]\n",
        );

        let result = load_entries(&args(temp_path), &properties).unwrap();

        assert_eq!(1, result.len());
        assert_eq!(Some("Jo ho"), result[0].secondary_text(0));
    }

    #[test]
    fn test_load_entries_missing_directory() {
        let result = load_entries(&args("/lorem/ipsum"), &HoverplayProperties::default());

        assert!(
            matches!(result, Err(AppError::Media(_))),
            "expected a media error, got {:?}",
            result
        );
    }

    #[test]
    fn test_load_properties() {
        let temp_dir = tempdir().unwrap();
        let temp_path = temp_dir.path().to_str().unwrap();
        let config = copy_test_file(temp_path, "application.yml", None);
        let args = HoverplayArgs::try_parse_from(["hoverplay", temp_path, "--config", config.as_str()])
            .unwrap();

        let result = load_properties(&args).unwrap();

        assert_eq!("nl", result.subtitle.secondary_language);
        assert_eq!(vec!["mp4".to_string(), "mkv".to_string()], result.media.extensions);
    }

    #[test]
    fn test_load_properties_missing_config() {
        let args =
            HoverplayArgs::try_parse_from(["hoverplay", "media", "--config", "/lorem/application.yml"])
                .unwrap();

        let result = load_properties(&args);

        assert!(
            matches!(result, Err(AppError::Config(_))),
            "expected a config error, got {:?}",
            result
        );
    }
}
