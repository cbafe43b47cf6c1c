pub use entry::*;
pub use error::*;
pub use library::*;
pub use pairer::*;
pub use storage::*;

mod entry;
mod error;
mod library;
mod pairer;
mod storage;
