//! Plain data types shared by the terrarium simulation crates.
//!
//! Everything here is serde-serializable and free of simulation logic; the
//! behavior lives in `terrarium_core`.

pub mod data;

pub use data::creature::{
    CreatureHistoryEntry, CreatureId, CreatureSnapshot, CreatureState, Vitals, MAX_VITAL,
};
pub use data::environment::{
    EnvironmentModifiers, Position, ResourceInstance, ResourceType, TimeOfDay, WeatherSettings,
    WeatherState, WeatherType,
};
pub use data::genome::{AggressionLevel, Color, Genome, MovementType, TraitBounds};
pub use data::population::{PopulationStats, SimEvent};
