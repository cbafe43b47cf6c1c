use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use derive_more::Display;
use log::trace;
use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::core::playback::PlaybackEvent;

static NEXT_TIMER_HANDLE: AtomicU64 = AtomicU64::new(1);

/// A unique handle of a scheduled auto-stop timer.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
#[display("timer {}", handle)]
pub struct TimerHandle {
    handle: u64,
}

impl TimerHandle {
    /// Create a new unique timer handle.
    pub fn new() -> Self {
        Self {
            handle: NEXT_TIMER_HANDLE.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn value(&self) -> u64 {
        self.handle
    }
}

impl Default for TimerHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Schedules the auto-stop timers of the playback synchronization.
///
/// An elapsed timer is reported back as a [PlaybackEvent::TimerFired] event.
/// Once cancelled, a timer never reports back.
pub trait TimerScheduler: Debug + Send {
    /// Schedule a new timer for the given entry which elapses after the given delay.
    fn schedule(&mut self, entry_id: &str, delay: Duration) -> TimerHandle;

    /// Cancel the given timer, cancelling an unknown or elapsed timer has no effect.
    fn cancel(&mut self, handle: &TimerHandle);
}

/// The callback which receives the elapsed timers of the [TokioScheduler].
pub type TimerCallback = Arc<dyn Fn(PlaybackEvent) + Send + Sync>;

/// A [TimerScheduler] which runs each timer as a task on the current tokio runtime.
pub struct TokioScheduler {
    callback: TimerCallback,
    timers: HashMap<TimerHandle, CancellationToken>,
}

impl TokioScheduler {
    /// Create a new scheduler which invokes the given callback when a timer elapses.
    pub fn new(callback: TimerCallback) -> Self {
        Self {
            callback,
            timers: HashMap::new(),
        }
    }
}

impl Debug for TokioScheduler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("timers", &self.timers)
            .finish()
    }
}

impl TimerScheduler for TokioScheduler {
    fn schedule(&mut self, entry_id: &str, delay: Duration) -> TimerHandle {
        let handle = TimerHandle::new();
        let cancellation_token = CancellationToken::new();
        let task_token = cancellation_token.clone();
        let callback = self.callback.clone();
        let entry_id = entry_id.to_string();

        trace!("Scheduling {} for {} in {:?}", handle, entry_id, delay);
        tokio::spawn(async move {
            select! {
                _ = task_token.cancelled() => trace!("{} has been cancelled", handle),
                _ = tokio::time::sleep(delay) => callback(PlaybackEvent::TimerFired { entry_id, handle }),
            }
        });

        self.timers.insert(handle, cancellation_token);
        handle
    }

    fn cancel(&mut self, handle: &TimerHandle) {
        if let Some(cancellation_token) = self.timers.remove(handle) {
            cancellation_token.cancel();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, cancellation_token) in self.timers.drain() {
            cancellation_token.cancel();
        }
    }
}

/// A [TimerScheduler] driven by a virtual clock which only moves when advanced.
///
/// Clones share the same clock, which allows one instance to be handed to the controller
/// while another instance advances the time.
#[derive(Debug, Clone, Default)]
pub struct VirtualScheduler {
    clock: Arc<Mutex<VirtualClock>>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The elapsed time of the virtual clock.
    pub fn now(&self) -> Duration {
        self.clock().now
    }

    /// The total number of pending timers.
    pub fn pending(&self) -> usize {
        self.clock().timers.len()
    }

    /// The number of pending timers of the given entry.
    pub fn pending_for(&self, entry_id: &str) -> usize {
        self.clock()
            .timers
            .iter()
            .filter(|e| e.entry_id == entry_id)
            .count()
    }

    /// The moment at which the given timer elapses, if it's still pending.
    pub fn deadline(&self, handle: &TimerHandle) -> Option<Duration> {
        self.clock()
            .timers
            .iter()
            .find(|e| &e.handle == handle)
            .map(|e| e.deadline)
    }

    /// Move the virtual clock forward by the given duration.
    ///
    /// It returns the events of the timers which elapsed, ordered by their deadline.
    pub fn advance(&self, duration: Duration) -> Vec<PlaybackEvent> {
        let mut clock = self.clock();
        clock.now += duration;
        let now = clock.now;

        let (mut elapsed, pending): (Vec<VirtualTimer>, Vec<VirtualTimer>) =
            clock.timers.drain(..).partition(|e| e.deadline <= now);
        clock.timers = pending;
        elapsed.sort_by_key(|e| e.deadline);

        elapsed
            .into_iter()
            .map(|e| PlaybackEvent::TimerFired {
                entry_id: e.entry_id,
                handle: e.handle,
            })
            .collect()
    }

    fn clock(&self) -> MutexGuard<'_, VirtualClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TimerScheduler for VirtualScheduler {
    fn schedule(&mut self, entry_id: &str, delay: Duration) -> TimerHandle {
        let handle = TimerHandle::new();
        let mut clock = self.clock();
        let deadline = clock.now + delay;

        clock.timers.push(VirtualTimer {
            handle,
            entry_id: entry_id.to_string(),
            deadline,
        });
        handle
    }

    fn cancel(&mut self, handle: &TimerHandle) {
        self.clock().timers.retain(|e| &e.handle != handle);
    }
}

#[derive(Debug, Default)]
struct VirtualClock {
    now: Duration,
    timers: Vec<VirtualTimer>,
}

#[derive(Debug)]
struct VirtualTimer {
    handle: TimerHandle,
    entry_id: String,
    deadline: Duration,
}
