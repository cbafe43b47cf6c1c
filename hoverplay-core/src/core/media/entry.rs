use std::path::Path;

use derive_more::Display;
use serde::Serialize;

use crate::core::subtitles::{CueSequence, SubtitleCue, Timecode};

/// A media item paired with its primary and optional secondary subtitle cues.
///
/// The secondary cues are aligned with the primary cues by their index,
/// not by overlapping time ranges.
#[derive(Debug, Display, Clone, PartialEq, Serialize)]
#[display("{} ({} cues)", id, primary.len())]
pub struct MediaEntry {
    id: String,
    media_path: String,
    primary: CueSequence,
    secondary: Option<CueSequence>,
}

impl MediaEntry {
    pub fn new<I: Into<String>, P: Into<String>>(
        id: I,
        media_path: P,
        primary: CueSequence,
        secondary: Option<CueSequence>,
    ) -> Self {
        Self {
            id: id.into(),
            media_path: media_path.into(),
            primary,
            secondary,
        }
    }

    /// The unique identifier of the media entry, this is the media filename.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// The location of the media which should be loaded by the media sink.
    pub fn media_path(&self) -> &str {
        self.media_path.as_str()
    }

    /// The display title of the media, which is the filename without its extension.
    pub fn title(&self) -> &str {
        Path::new(self.id.as_str())
            .file_stem()
            .and_then(|e| e.to_str())
            .unwrap_or(self.id.as_str())
    }

    pub fn primary(&self) -> &[SubtitleCue] {
        self.primary.as_slice()
    }

    pub fn secondary(&self) -> Option<&[SubtitleCue]> {
        self.secondary.as_deref()
    }

    /// Retrieve the secondary (translated) text of the cue at the given index.
    /// It returns [None] when no secondary track is present, or it's shorter than the index.
    pub fn secondary_text(&self, index: usize) -> Option<&str> {
        self.secondary
            .as_ref()
            .and_then(|e| e.get(index))
            .map(|e| e.text())
    }

    /// Retrieve the rows which should be rendered for this entry.
    ///
    /// * `fallback_text` - The text used for cues without a secondary text.
    pub fn rows<'a>(&'a self, fallback_text: &'a str) -> Vec<CueRow<'a>> {
        self.primary
            .iter()
            .enumerate()
            .map(|(index, cue)| CueRow {
                index,
                start: *cue.start(),
                end: *cue.end(),
                text: cue.text(),
                translation: self.secondary_text(index).unwrap_or(fallback_text),
            })
            .collect()
    }
}

/// A single renderable subtitle row of a [MediaEntry].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CueRow<'a> {
    /// The position of the cue within the primary cues.
    pub index: usize,
    pub start: Timecode,
    pub end: Timecode,
    pub text: &'a str,
    /// The secondary text of the cue, or the fallback text when not available.
    pub translation: &'a str,
}
