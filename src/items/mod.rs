//! Item system: types, stacking, equipment, upgrades, and trading.

pub mod catalog;
pub mod equipment;
pub mod inventory;
pub mod market;
pub mod types;
pub mod upgrade;

pub use equipment::*;
pub use types::*;
pub use upgrade::*;
