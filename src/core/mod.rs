//! Save model, progression, timing, and the session that ties them together.

pub mod balance;
pub mod config;
pub mod constants;
pub mod progression;
pub mod regen;
pub mod save;
pub mod scheduler;
pub mod session;

pub use config::*;
pub use save::*;
pub use scheduler::*;
pub use session::*;
