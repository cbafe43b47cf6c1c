use derive_more::Display;

use crate::core::playback::TimerHandle;
use crate::core::subtitles::Timecode;

/// The events which drive the playback synchronization of media entries.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// The user started hovering a cue of the media entry.
    #[display("hover enter of {} ({} - {})", entry_id, start, end)]
    HoverEnter {
        entry_id: String,
        start: Timecode,
        end: Timecode,
    },
    /// The user stopped hovering the cue of the media entry.
    #[display("hover leave of {}", entry_id)]
    HoverLeave { entry_id: String },
    /// The auto-stop timer of the media entry has elapsed.
    #[display("timer {} fired for {}", handle, entry_id)]
    TimerFired {
        entry_id: String,
        handle: TimerHandle,
    },
}

impl PlaybackEvent {
    /// The media entry targeted by this event.
    pub fn entry_id(&self) -> &str {
        match self {
            PlaybackEvent::HoverEnter { entry_id, .. } => entry_id,
            PlaybackEvent::HoverLeave { entry_id } => entry_id,
            PlaybackEvent::TimerFired { entry_id, .. } => entry_id,
        }
    }
}

/// The state changes published by the playback synchronization.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum PlaybackSyncEvent {
    /// The media entry started playing the given cue window.
    #[display("{} is playing from {} until {}", entry_id, start, end)]
    Playing {
        entry_id: String,
        start: Timecode,
        end: Timecode,
    },
    /// The media entry has been paused and is idle.
    #[display("{} is idle", entry_id)]
    Idle { entry_id: String },
}
