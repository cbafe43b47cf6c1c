use std::sync::Arc;

use fx_callback::{Callback, MultiThreadedCallback, Subscription};
use log::{debug, trace, warn};
use tokio::select;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::core::playback::{
    MediaSink, PlaybackError, PlaybackEvent, PlaybackSyncController, PlaybackSyncEvent, Result,
    TimerScheduler, TokioScheduler,
};
use crate::core::subtitles::Timecode;

/// The commands processed by the playback event loop.
#[derive(Debug)]
enum PlaybackCommand {
    Register(String, Box<dyn MediaSink>),
    Unregister(String),
    Dispatch(PlaybackEvent),
}

/// Runs a [PlaybackSyncController] on a single tokio task.
///
/// Hover events and elapsed timers are queued on one channel and processed one at a time
/// in the order in which they've been delivered.
/// State changes of the entries are published to the subscribers of this instance.
#[derive(Debug, Clone)]
pub struct PlaybackSync {
    inner: Arc<InnerPlaybackSync>,
}

impl PlaybackSync {
    /// Start a new playback event loop on the current tokio runtime,
    /// using a [TokioScheduler] for the auto-stop timers.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded_channel();
        let timer_sender = sender.clone();
        let scheduler = TokioScheduler::new(Arc::new(move |event| {
            if timer_sender.send(PlaybackCommand::Dispatch(event)).is_err() {
                trace!("Playback event loop has stopped, dropping elapsed timer");
            }
        }));

        Self::start(sender, receiver, Box::new(scheduler))
    }

    /// Start a new playback event loop on the current tokio runtime with the given scheduler.
    ///
    /// The elapsed timers of the scheduler should be fed back through [PlaybackSync::dispatch].
    pub fn with_scheduler(scheduler: Box<dyn TimerScheduler>) -> Self {
        let (sender, receiver) = unbounded_channel();
        Self::start(sender, receiver, scheduler)
    }

    fn start(
        sender: UnboundedSender<PlaybackCommand>,
        receiver: UnboundedReceiver<PlaybackCommand>,
        scheduler: Box<dyn TimerScheduler>,
    ) -> Self {
        let instance = Self {
            inner: Arc::new(InnerPlaybackSync {
                sender,
                callbacks: MultiThreadedCallback::new(),
                cancellation_token: Default::default(),
            }),
        };

        // the loop never holds the inner instance, dropping the last handle ends the loop
        let event_loop = PlaybackLoop {
            callbacks: instance.inner.callbacks.clone(),
            cancellation_token: instance.inner.cancellation_token.clone(),
        };
        let controller = PlaybackSyncController::new(scheduler);
        tokio::spawn(async move {
            event_loop.run(receiver, controller).await;
        });

        instance
    }

    /// Register the media sink of the given entry.
    pub fn register<S: Into<String>>(&self, entry_id: S, sink: Box<dyn MediaSink>) -> Result<()> {
        self.inner
            .send(PlaybackCommand::Register(entry_id.into(), sink))
    }

    /// Tear down the given entry, its pending timer is cancelled.
    pub fn unregister<S: Into<String>>(&self, entry_id: S) -> Result<()> {
        self.inner.send(PlaybackCommand::Unregister(entry_id.into()))
    }

    /// Start playing the cue window `start..end` of the given entry.
    pub fn hover_enter<S: Into<String>>(&self, entry_id: S, start: Timecode, end: Timecode) -> Result<()> {
        self.dispatch(PlaybackEvent::HoverEnter {
            entry_id: entry_id.into(),
            start,
            end,
        })
    }

    /// Stop playing the active cue window of the given entry.
    pub fn hover_leave<S: Into<String>>(&self, entry_id: S) -> Result<()> {
        self.dispatch(PlaybackEvent::HoverLeave {
            entry_id: entry_id.into(),
        })
    }

    /// Queue the given event for processing by the event loop.
    pub fn dispatch(&self, event: PlaybackEvent) -> Result<()> {
        self.inner.send(PlaybackCommand::Dispatch(event))
    }

    /// Stop the event loop, all entries and their pending timers are dropped.
    pub fn stop(&self) {
        self.inner.cancellation_token.cancel();
    }

    /// Verify if the event loop has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.inner.cancellation_token.is_cancelled()
    }
}

impl Callback<PlaybackSyncEvent> for PlaybackSync {
    fn subscribe(&self) -> Subscription<PlaybackSyncEvent> {
        self.inner.callbacks.subscribe()
    }
}

#[derive(Debug)]
struct InnerPlaybackSync {
    sender: UnboundedSender<PlaybackCommand>,
    callbacks: MultiThreadedCallback<PlaybackSyncEvent>,
    cancellation_token: CancellationToken,
}

impl InnerPlaybackSync {
    fn send(&self, command: PlaybackCommand) -> Result<()> {
        if self.cancellation_token.is_cancelled() {
            return Err(PlaybackError::Stopped);
        }

        self.sender.send(command).map_err(|_| PlaybackError::Stopped)
    }
}

impl Drop for InnerPlaybackSync {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

/// The state owned by the spawned playback loop.
#[derive(Debug)]
struct PlaybackLoop {
    callbacks: MultiThreadedCallback<PlaybackSyncEvent>,
    cancellation_token: CancellationToken,
}

impl PlaybackLoop {
    async fn run(
        &self,
        mut receiver: UnboundedReceiver<PlaybackCommand>,
        mut controller: PlaybackSyncController,
    ) {
        loop {
            select! {
                _ = self.cancellation_token.cancelled() => break,
                command = receiver.recv() => match command {
                    Some(command) => self.handle_command(&mut controller, command),
                    None => break,
                },
            }
        }

        self.cancellation_token.cancel();
        debug!("Playback event loop ended");
    }

    fn handle_command(&self, controller: &mut PlaybackSyncController, command: PlaybackCommand) {
        match command {
            PlaybackCommand::Register(entry_id, sink) => controller.register(entry_id, sink),
            PlaybackCommand::Unregister(entry_id) => {
                controller.unregister(entry_id.as_str());
            }
            PlaybackCommand::Dispatch(event) => match controller.dispatch(event) {
                Ok(Some(event)) => self.callbacks.invoke(event),
                Ok(None) => {}
                Err(e) => warn!("Failed to process playback event, {}", e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::playback::{MockMediaSink, VirtualScheduler};
    use crate::init_logger;
    use crate::recv_timeout;

    use std::time::Duration;

    async fn recv_event(
        subscription: &mut Subscription<PlaybackSyncEvent>,
    ) -> Arc<PlaybackSyncEvent> {
        tokio::time::timeout(Duration::from_millis(500), subscription.recv())
            .await
            .expect("expected to receive a playback sync event in time")
            .expect("expected the subscription to be open")
    }

    #[tokio::test]
    async fn test_hover_enter_elapses() {
        init_logger!();
        let (tx, mut rx) = unbounded_channel();
        let mut sink = MockMediaSink::new();
        sink.expect_seek().times(1).return_const(());
        sink.expect_play().times(1).return_const(());
        sink.expect_pause().times(1).returning(move || {
            tx.send(()).unwrap();
        });
        let sync = PlaybackSync::new();
        let mut subscription = sync.subscribe();

        sync.register("a.mp4", Box::new(sink)).unwrap();
        sync.hover_enter("a.mp4", Timecode::from_millis(1000), Timecode::from_millis(1050))
            .unwrap();

        let event = recv_event(&mut subscription).await;
        assert_eq!(
            PlaybackSyncEvent::Playing {
                entry_id: "a.mp4".to_string(),
                start: Timecode::from_millis(1000),
                end: Timecode::from_millis(1050),
            },
            *event
        );
        recv_timeout!(&mut rx, Duration::from_millis(500), "expected the media to be paused");
        let event = recv_event(&mut subscription).await;
        assert_eq!(
            PlaybackSyncEvent::Idle {
                entry_id: "a.mp4".to_string()
            },
            *event
        );
    }

    #[tokio::test]
    async fn test_reentrant_hover_pauses_once() {
        init_logger!();
        let (tx, mut rx) = unbounded_channel();
        let mut sink = MockMediaSink::new();
        sink.expect_seek().times(2).return_const(());
        sink.expect_play().times(2).return_const(());
        sink.expect_pause().times(1).returning(move || {
            tx.send(()).unwrap();
        });
        let sync = PlaybackSync::new();

        sync.register("a.mp4", Box::new(sink)).unwrap();
        sync.hover_enter("a.mp4", Timecode::from_millis(0), Timecode::from_millis(50))
            .unwrap();
        sync.hover_enter("a.mp4", Timecode::from_millis(100), Timecode::from_millis(250))
            .unwrap();

        recv_timeout!(&mut rx, Duration::from_millis(1000), "expected the media to be paused");
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err(), "expected only one pause");
    }

    #[tokio::test]
    async fn test_dispatch_with_virtual_scheduler() {
        init_logger!();
        let (tx, mut rx) = unbounded_channel();
        let mut sink = MockMediaSink::new();
        sink.expect_seek().return_const(());
        sink.expect_play().return_const(());
        sink.expect_pause().times(1).returning(move || {
            tx.send(()).unwrap();
        });
        let scheduler = VirtualScheduler::new();
        let sync = PlaybackSync::with_scheduler(Box::new(scheduler.clone()));
        let mut subscription = sync.subscribe();

        sync.register("a.mp4", Box::new(sink)).unwrap();
        sync.hover_enter("a.mp4", Timecode::from_millis(1000), Timecode::from_millis(3000))
            .unwrap();
        let _ = recv_event(&mut subscription).await;

        for event in scheduler.advance(Duration::from_secs(2)) {
            sync.dispatch(event).unwrap();
        }

        recv_timeout!(&mut rx, Duration::from_millis(500), "expected the media to be paused");
    }

    #[tokio::test]
    async fn test_hover_leave() {
        init_logger!();
        let (tx, mut rx) = unbounded_channel();
        let mut sink = MockMediaSink::new();
        sink.expect_seek().return_const(());
        sink.expect_play().return_const(());
        sink.expect_pause().times(1).returning(move || {
            tx.send(()).unwrap();
        });
        let sync = PlaybackSync::new();

        sync.register("a.mp4", Box::new(sink)).unwrap();
        sync.hover_enter("a.mp4", Timecode::from_millis(0), Timecode::from_millis(60_000))
            .unwrap();
        sync.hover_leave("a.mp4").unwrap();

        recv_timeout!(&mut rx, Duration::from_millis(500), "expected the media to be paused");
    }

    #[derive(Debug)]
    struct DropNotifySink {
        sender: UnboundedSender<()>,
    }

    impl MediaSink for DropNotifySink {
        fn seek(&self, _: Timecode) {}

        fn play(&self) {}

        fn pause(&self) {}
    }

    impl Drop for DropNotifySink {
        fn drop(&mut self) {
            let _ = self.sender.send(());
        }
    }

    #[tokio::test]
    async fn test_drop_releases_entries() {
        init_logger!();
        let (tx, mut rx) = unbounded_channel();
        let sync = PlaybackSync::new();
        let sync_clone = sync.clone();

        sync.register("a.mp4", Box::new(DropNotifySink { sender: tx }))
            .unwrap();
        sync.hover_enter("a.mp4", Timecode::from_millis(0), Timecode::from_millis(60_000))
            .unwrap();
        drop(sync);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(
            rx.try_recv().is_err(),
            "expected the sink to be kept while a handle is alive"
        );

        drop(sync_clone);

        recv_timeout!(&mut rx, Duration::from_millis(500), "expected the sink to have been dropped");
    }

    #[tokio::test]
    async fn test_stop() {
        init_logger!();
        let sync = PlaybackSync::new();

        sync.stop();

        assert_eq!(true, sync.is_stopped());
        assert_eq!(Err(PlaybackError::Stopped), sync.hover_leave("a.mp4"));
    }
}
