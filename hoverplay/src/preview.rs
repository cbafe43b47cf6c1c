use std::io::Write;
use std::time::Duration;

use fx_callback::Callback;
use hoverplay_core::core::media::MediaEntry;
use hoverplay_core::core::playback::{MediaSink, PlaybackSync, PlaybackSyncEvent};
use hoverplay_core::core::subtitles::Timecode;
use log::{debug, info, warn};
use tokio::time;

use crate::errors::Result;

/// The extra time granted to a cue window to report its auto-stop.
const STOP_GRACE: Duration = Duration::from_secs(1);

/// A media sink which only reports the requested operations.
#[derive(Debug)]
struct LoggingSink {
    entry_id: String,
}

impl MediaSink for LoggingSink {
    fn seek(&self, time: Timecode) {
        info!("Seeking {} to {}", self.entry_id, time);
    }

    fn play(&self) {
        info!("Playing {}", self.entry_id);
    }

    fn pause(&self) {
        info!("Pausing {}", self.entry_id);
    }
}

/// Hover the first cue of every entry and write the playback state changes until it auto-stops.
pub async fn run_preview<W: Write>(writer: &mut W, entries: &[MediaEntry]) -> Result<()> {
    let sync = PlaybackSync::new();
    let mut subscription = sync.subscribe();

    for entry in entries {
        let Some(cue) = entry.primary().first() else {
            debug!("Skipping preview of {}, entry has no cues", entry);
            continue;
        };
        let timeout = cue.start().duration_until(cue.end()) + STOP_GRACE;

        sync.register(entry.id(), Box::new(LoggingSink { entry_id: entry.id().to_string() }))?;
        sync.hover_enter(entry.id(), *cue.start(), *cue.end())?;

        let stopped = time::timeout(timeout, async {
            while let Ok(event) = subscription.recv().await {
                writeln!(writer, "{}", event)?;
                if matches!(&*event, PlaybackSyncEvent::Idle { entry_id } if entry_id == entry.id()) {
                    return Ok::<bool, std::io::Error>(true);
                }
            }
            Ok(false)
        })
        .await;

        match stopped {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => warn!("Playback events ended before {} stopped", entry.id()),
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => warn!("Preview of {} didn't stop within {:?}", entry.id(), timeout),
        }

        sync.unregister(entry.id())?;
    }

    sync.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoverplay_core::core::subtitles::SubtitleCue;
    use hoverplay_core::init_logger;

    #[tokio::test]
    async fn test_run_preview() {
        init_logger!();
        let entries = vec![
            MediaEntry::new(
                "a.mp4",
                "/media/a.mp4",
                vec![SubtitleCue::new(
                    Timecode::from_millis(1000),
                    Timecode::from_millis(1100),
                    "lorem",
                )],
                None,
            ),
            MediaEntry::new("b.mp4", "/media/b.mp4", vec![], None),
        ];
        let mut output = Vec::new();

        run_preview(&mut output, &entries).await.unwrap();

        let result = String::from_utf8(output).unwrap();
        assert_eq!(
            "a.mp4 is playing from 00:00:01,000 until 00:00:01,100\na.mp4 is idle\n",
            result
        );
    }
}
