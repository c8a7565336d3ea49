//! The Whispering Crypt: entry, waves, and the boss.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
