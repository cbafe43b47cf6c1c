use derive_more::Display;

use crate::core::playback::TimerHandle;
use crate::core::subtitles::Timecode;

/// The state of a single media entry within the playback synchronization.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum EntryState {
    /// No cue is being played.
    Idle,
    /// A cue is being played until its auto-stop timer fires.
    Playing,
}

/// The playback state of a single media entry.
///
/// There is at most one pending auto-stop timer per entry.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlaybackState {
    /// The end of the cue which is currently being played.
    pub active_cue_end: Option<Timecode>,
    /// The auto-stop timer of the active cue.
    pub pending_timer: Option<TimerHandle>,
}

impl PlaybackState {
    pub fn state(&self) -> EntryState {
        if self.active_cue_end.is_some() {
            EntryState::Playing
        } else {
            EntryState::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state() {
        let mut state = PlaybackState::default();
        assert_eq!(EntryState::Idle, state.state());

        state.active_cue_end = Some(Timecode::from_millis(3000));
        assert_eq!(EntryState::Playing, state.state());
    }
}
