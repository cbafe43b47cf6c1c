use std::collections::HashMap;

use log::{debug, trace};

use crate::core::playback::{
    EntryState, MediaSink, PlaybackError, PlaybackEvent, PlaybackState, PlaybackSyncEvent, Result,
    TimerHandle, TimerScheduler,
};
use crate::core::subtitles::Timecode;

/// Translates hover events into seek, play and pause operations on the media sink of each entry.
///
/// Each media entry has at most one active play window and one pending auto-stop timer.
/// A new hover on an entry always cancels the pending timer of that entry before a new one
/// is scheduled, which guarantees that a superseded cue never pauses the media.
/// Entries are fully independent of each other.
#[derive(Debug)]
pub struct PlaybackSyncController {
    entries: HashMap<String, EntryPlayback>,
    scheduler: Box<dyn TimerScheduler>,
}

impl PlaybackSyncController {
    /// Create a new controller which schedules its auto-stop timers through the given scheduler.
    pub fn new(scheduler: Box<dyn TimerScheduler>) -> Self {
        Self {
            entries: HashMap::new(),
            scheduler,
        }
    }

    /// Register the media sink of the given entry.
    /// An existing registration of the entry is torn down first.
    pub fn register<S: Into<String>>(&mut self, entry_id: S, sink: Box<dyn MediaSink>) {
        let entry_id = entry_id.into();
        self.unregister(entry_id.as_str());

        debug!("Registering media entry {}", entry_id);
        self.entries.insert(
            entry_id,
            EntryPlayback {
                sink,
                state: PlaybackState::default(),
            },
        );
    }

    /// Tear down the given entry, cancelling its pending timer.
    /// It returns `true` when the entry was registered.
    pub fn unregister(&mut self, entry_id: &str) -> bool {
        match self.entries.remove(entry_id) {
            Some(mut entry) => {
                if let Some(handle) = entry.state.pending_timer.take() {
                    self.scheduler.cancel(&handle);
                }
                debug!("Media entry {} has been unregistered", entry_id);
                true
            }
            None => false,
        }
    }

    /// Retrieve the playback state of the given entry.
    pub fn state(&self, entry_id: &str) -> Option<&PlaybackState> {
        self.entries.get(entry_id).map(|e| &e.state)
    }

    /// The total number of pending auto-stop timers over all entries.
    pub fn pending_timers(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.state.pending_timer.is_some())
            .count()
    }

    /// Process the given event.
    ///
    /// It returns the state change of the entry, or [None] when the event had no effect.
    pub fn dispatch(&mut self, event: PlaybackEvent) -> Result<Option<PlaybackSyncEvent>> {
        trace!("Dispatching playback event {}", event);
        match event {
            PlaybackEvent::HoverEnter {
                entry_id,
                start,
                end,
            } => self.hover_enter(entry_id.as_str(), start, end).map(Some),
            PlaybackEvent::HoverLeave { entry_id } => self.hover_leave(entry_id.as_str()),
            PlaybackEvent::TimerFired { entry_id, handle } => {
                self.timer_fired(entry_id.as_str(), &handle)
            }
        }
    }

    /// Start playing the cue window `start..end` of the given entry.
    ///
    /// The pending timer of the entry is cancelled unconditionally, after which the media is
    /// moved to `start`, played and a new auto-stop timer for `end - start` is scheduled.
    /// A window with an end before its start results in an immediate auto-stop.
    pub fn hover_enter(
        &mut self,
        entry_id: &str,
        start: Timecode,
        end: Timecode,
    ) -> Result<PlaybackSyncEvent> {
        let entry = self
            .entries
            .get_mut(entry_id)
            .ok_or_else(|| PlaybackError::UnknownEntry(entry_id.to_string()))?;

        if let Some(handle) = entry.state.pending_timer.take() {
            trace!("Cancelling {} of {}", handle, entry_id);
            self.scheduler.cancel(&handle);
        }

        entry.sink.seek(start);
        entry.sink.play();

        let handle = self
            .scheduler
            .schedule(entry_id, start.duration_until(&end));
        entry.state.active_cue_end = Some(end);
        entry.state.pending_timer = Some(handle);

        debug!("Playing {} from {} until {}", entry_id, start, end);
        Ok(PlaybackSyncEvent::Playing {
            entry_id: entry_id.to_string(),
            start,
            end,
        })
    }

    /// Stop playing the active cue window of the given entry.
    /// Leaving an idle entry has no effect.
    pub fn hover_leave(&mut self, entry_id: &str) -> Result<Option<PlaybackSyncEvent>> {
        let entry = self
            .entries
            .get_mut(entry_id)
            .ok_or_else(|| PlaybackError::UnknownEntry(entry_id.to_string()))?;

        if entry.state.state() == EntryState::Idle {
            trace!("Media entry {} is already idle", entry_id);
            return Ok(None);
        }

        if let Some(handle) = entry.state.pending_timer.take() {
            self.scheduler.cancel(&handle);
        }
        entry.state.active_cue_end = None;
        entry.sink.pause();

        debug!("Paused {} on hover leave", entry_id);
        Ok(Some(PlaybackSyncEvent::Idle {
            entry_id: entry_id.to_string(),
        }))
    }

    /// Handle the elapsed auto-stop timer of the given entry.
    /// Timers which are no longer pending for the entry are ignored.
    pub fn timer_fired(
        &mut self,
        entry_id: &str,
        handle: &TimerHandle,
    ) -> Result<Option<PlaybackSyncEvent>> {
        let entry = match self.entries.get_mut(entry_id) {
            Some(entry) => entry,
            None => {
                trace!("Ignoring {} of unregistered entry {}", handle, entry_id);
                return Ok(None);
            }
        };

        if entry.state.pending_timer.as_ref() != Some(handle) {
            trace!("Ignoring superseded {} of {}", handle, entry_id);
            return Ok(None);
        }

        entry.state.pending_timer = None;
        entry.state.active_cue_end = None;
        self.scheduler.cancel(handle);
        entry.sink.pause();

        debug!("Cue window of {} has elapsed", entry_id);
        Ok(Some(PlaybackSyncEvent::Idle {
            entry_id: entry_id.to_string(),
        }))
    }
}

#[derive(Debug)]
struct EntryPlayback {
    sink: Box<dyn MediaSink>,
    state: PlaybackState,
}
