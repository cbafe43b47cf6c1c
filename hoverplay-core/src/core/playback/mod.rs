pub use controller::*;
pub use error::*;
pub use event_loop::*;
pub use events::*;
pub use scheduler::*;
pub use sink::*;
pub use state::*;

mod controller;
mod error;
mod event_loop;
mod events;
mod scheduler;
mod sink;
mod state;
