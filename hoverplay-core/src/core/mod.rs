pub mod config;
pub mod media;
pub mod playback;
pub mod subtitles;
