use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;

pub use crate::core::subtitles::parsers::srt::SrtParser;
use crate::core::subtitles::{CueSequence, Result, SubtitleCue, SubtitleParseError};

mod srt;

const NEWLINE: &str = "\n";

/// A subtitle parser which is able to convert subtitle data into cues or visa-versa.
#[async_trait]
pub trait Parser: Debug + Send + Sync {
    /// Read and parse the given subtitle file into cues.
    ///
    /// It returns an error when the file couldn't be read,
    /// malformed contents within the file never result in an error.
    async fn parse_file(&self, path: &Path) -> Result<CueSequence>;

    /// Parse the given subtitle data into cues.
    /// Invalid lines within the data will be ignored by the parser and logged as a warning.
    fn parse_string(&self, value: &str) -> CueSequence;

    /// Convert the given cues to the raw format of the parser.
    ///
    /// * `cues` - The cues to convert, consisting of at least one cue to prevent corruption of the output.
    ///
    /// It returns the plain text value on successful conversion, else the [SubtitleParseError].
    fn convert(&self, cues: &[SubtitleCue]) -> std::result::Result<String, SubtitleParseError>;
}
