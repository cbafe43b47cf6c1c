pub use cue::*;
pub use error::*;
pub use timecode::*;

pub mod parsers;

mod cue;
mod error;
mod timecode;
