use std::fmt::Debug;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::core::subtitles::Timecode;

/// The media element of a single media entry which is driven by the playback synchronization.
///
/// All operations are fire-and-forget, the caller never waits for the media to respond.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait MediaSink: Debug + Send + Sync {
    /// Move the playback position of the media to the given time.
    fn seek(&self, time: Timecode);

    /// Start or resume the playback of the media.
    fn play(&self);

    /// Pause the playback of the media.
    fn pause(&self);
}
