//! Encounter resolution, zone data, and the zone auto-fight activity.

pub mod logic;
pub mod rewards;
pub mod types;
pub mod zone_fight;
pub mod zones;

pub use logic::*;
pub use types::*;
pub use zone_fight::ZoneFight;
