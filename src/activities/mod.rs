//! Repeating skill activities and the loop that drives them.

pub mod activity_loop;
pub mod crafting;
pub mod data;
pub mod gathering;
pub mod types;

pub use activity_loop::*;
pub use crafting::{Cooking, Forging};
pub use gathering::{Fishing, Hunting, Mining};
pub use types::*;
