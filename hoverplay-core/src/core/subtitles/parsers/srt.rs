use std::path::Path;

use async_trait::async_trait;
use derive_more::Display;
use log::{debug, trace, warn};

use crate::core::subtitles::parsers::{Parser, NEWLINE};
use crate::core::subtitles::{
    CueSequence, Result, SubtitleCue, SubtitleCueBuilder, SubtitleError, SubtitleParseError,
    Timecode,
};

const TIME_SEPARATOR: &str = "-->";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parser of the SubRip (`.srt`) format.
///
/// Each cue is a block of a numeric identifier line, a `<start> --> <end>` line and one or more
/// text lines, terminated by a blank line or the end of the data.
#[derive(Debug, Default, Clone)]
pub struct SrtParser;

impl SrtParser {
    /// Create a new srt parser instance.
    pub fn new() -> Self {
        Self
    }

    fn parse(&self, value: &str) -> CueSequence {
        let value = value.strip_prefix(BYTE_ORDER_MARK).unwrap_or(value);
        let mut stage = ParserStage::Identifier;
        let mut cue_builder = SubtitleCueBuilder::default();
        let mut cues = CueSequence::new();

        for (line_index, line) in value.lines().enumerate() {
            let is_blank = line.trim().is_empty();

            match stage {
                ParserStage::Identifier => {
                    if Self::is_identifier(line) {
                        trace!("Reading cue {} at line {}", line.trim(), line_index);
                        cue_builder = SubtitleCueBuilder::default();
                        stage = ParserStage::Time;
                    } else if !is_blank {
                        trace!("Ignoring line {} outside of a cue, {}", line_index, line);
                    }
                }
                ParserStage::Time => {
                    if self.read_time(&mut cue_builder, line, line_index) {
                        stage = ParserStage::Text;
                    } else if is_blank {
                        warn!(
                            "Cue at line {} is missing its time range, skipping cue",
                            line_index
                        );
                        stage = ParserStage::Identifier;
                    } else {
                        warn!(
                            "Expected a time range at line {} but got \"{}\", skipping cue",
                            line_index, line
                        );
                        stage = ParserStage::Skip;
                    }
                }
                ParserStage::Text => {
                    if is_blank {
                        cues.push(cue_builder.build());
                        stage = ParserStage::Identifier;
                    } else {
                        cue_builder.add_line(line);
                    }
                }
                ParserStage::Skip => {
                    if is_blank {
                        stage = ParserStage::Identifier;
                    }
                }
            }
        }

        match stage {
            ParserStage::Text => cues.push(cue_builder.build()),
            ParserStage::Time => warn!("Last cue is missing its time range, cue has been dropped"),
            _ => {}
        }

        debug!("Parsed a total of {} srt cues", cues.len());
        cues
    }

    fn is_identifier(line: &str) -> bool {
        let line = line.trim();
        !line.is_empty() && line.chars().all(|e| e.is_ascii_digit())
    }

    /// Read the time range of the cue.
    /// It returns `false` when the line is not a time range line.
    fn read_time(&self, builder: &mut SubtitleCueBuilder, line: &str, line_index: usize) -> bool {
        match line.split_once(TIME_SEPARATOR) {
            Some((start, end)) => {
                let start_time = Timecode::parse_lossy(start);
                let end_time = Timecode::parse_lossy(end);

                if start_time.malformed || end_time.malformed {
                    warn!("Time range at line {} is malformed, {}", line_index, line);
                }

                builder.start(start_time.value).end(end_time.value);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl Parser for SrtParser {
    async fn parse_file(&self, path: &Path) -> Result<CueSequence> {
        trace!("Reading srt file {:?}", path);
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SubtitleError::IO(path.display().to_string(), e.to_string()))?;

        Ok(self.parse(contents.as_str()))
    }

    fn parse_string(&self, value: &str) -> CueSequence {
        self.parse(value)
    }

    fn convert(&self, cues: &[SubtitleCue]) -> std::result::Result<String, SubtitleParseError> {
        if cues.is_empty() {
            return Err(SubtitleParseError::Failed(
                "at least one cue is required".to_string(),
            ));
        }

        let mut output = String::new();
        for (index, cue) in cues.iter().enumerate() {
            output.push_str((index + 1).to_string().as_str());
            output.push_str(NEWLINE);
            output.push_str(
                format!("{} {} {}", cue.start(), TIME_SEPARATOR, cue.end()).as_str(),
            );
            output.push_str(NEWLINE);
            output.push_str(cue.text());
            output.push_str(NEWLINE);
            output.push_str(NEWLINE);
        }

        Ok(output)
    }
}

#[derive(Debug, Display, Copy, Clone, PartialEq)]
enum ParserStage {
    /// Searching for the numeric identifier of the next cue.
    Identifier,
    /// Expecting the time range of the current cue.
    Time,
    /// Collecting the text lines of the current cue.
    Text,
    /// Skipping the remainder of a malformed cue.
    Skip,
}
