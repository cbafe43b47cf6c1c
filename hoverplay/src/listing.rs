use std::io::Write;

use hoverplay_core::core::media::{CueRow, MediaEntry};
use serde::Serialize;

use crate::errors::Result;

/// The serializable view of a paired media entry, as shown to the user.
#[derive(Debug, Serialize)]
struct ListingItem<'a> {
    id: &'a str,
    title: &'a str,
    media_path: &'a str,
    rows: Vec<CueRow<'a>>,
}

impl<'a> ListingItem<'a> {
    fn new(entry: &'a MediaEntry, fallback_text: &'a str) -> Self {
        Self {
            id: entry.id(),
            title: entry.title(),
            media_path: entry.media_path(),
            rows: entry.rows(fallback_text),
        }
    }
}

/// Write the entries as a pretty printed JSON array.
pub fn write_json<W: Write>(writer: &mut W, entries: &[MediaEntry], fallback_text: &str) -> Result<()> {
    let items: Vec<ListingItem> = entries
        .iter()
        .map(|e| ListingItem::new(e, fallback_text))
        .collect();

    serde_json::to_writer_pretty(&mut *writer, &items)?;
    writeln!(writer)?;
    Ok(())
}

/// Write the entries as a human readable listing, one row per cue.
pub fn write_text<W: Write>(writer: &mut W, entries: &[MediaEntry], fallback_text: &str) -> Result<()> {
    if entries.is_empty() {
        writeln!(writer, "No media with subtitles found")?;
        return Ok(());
    }

    for entry in entries {
        writeln!(writer, "{} [{}]", entry.title(), entry.media_path())?;
        for row in entry.rows(fallback_text) {
            writeln!(
                writer,
                "  {:>3}  {} --> {}  {}",
                row.index + 1,
                row.start,
                row.end,
                row.text
            )?;
            writeln!(writer, "       {}", row.translation)?;
        }
    }

    Ok(())
}
