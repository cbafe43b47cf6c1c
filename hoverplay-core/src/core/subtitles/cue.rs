use derive_more::Display;
use serde::Serialize;

use crate::core::subtitles::Timecode;

/// The ordered cues of a single subtitle file, in file order.
pub type CueSequence = Vec<SubtitleCue>;

/// A parsed subtitle cue from a subtitle file.
///
/// The cue identity is its position within the [CueSequence], the numeric
/// label of the file is not retained.
#[derive(Debug, Display, Clone, PartialEq, Eq, Serialize)]
#[display("start: {}, end: {}, text: {}", start, end, text)]
pub struct SubtitleCue {
    start: Timecode,
    end: Timecode,
    text: String,
}

impl SubtitleCue {
    pub fn new<S: Into<String>>(start: Timecode, end: Timecode, text: S) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn builder() -> SubtitleCueBuilder {
        SubtitleCueBuilder::default()
    }

    pub fn start(&self) -> &Timecode {
        &self.start
    }

    pub fn end(&self) -> &Timecode {
        &self.end
    }

    /// The text of the cue, all lines joined by a single space.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}

/// Builds a [SubtitleCue] line by line while it's being read.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SubtitleCueBuilder {
    start: Timecode,
    end: Timecode,
    lines: Vec<String>,
}

impl SubtitleCueBuilder {
    pub fn start(&mut self, start: Timecode) -> &mut Self {
        self.start = start;
        self
    }

    pub fn end(&mut self, end: Timecode) -> &mut Self {
        self.end = end;
        self
    }

    /// Add a text line to the cue, the line is trimmed before it's stored.
    pub fn add_line(&mut self, line: &str) -> &mut Self {
        let line = line.trim();
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
        self
    }

    pub fn build(&self) -> SubtitleCue {
        SubtitleCue {
            start: self.start,
            end: self.end,
            text: self.lines.join(" ").trim_end().to_string(),
        }
    }
}
