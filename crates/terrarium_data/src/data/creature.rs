use super::environment::Position;
use super::genome::Genome;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CreatureId = Uuid;

/// Upper bound shared by energy, hunger and health.
pub const MAX_VITAL: f32 = 100.0;

/// Behavioral state of a creature. `Dying` is terminal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CreatureState {
    #[default]
    Idle,
    Wandering,
    Seeking,
    Feeding,
    Fleeing,
    Fighting,
    Mating,
    Dying,
}

/// Continuous physiological state of a creature.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    /// Energy reserve in `[0, 100]`.
    pub energy: f32,
    /// Hunger in `[0, 100]`, rising over time.
    pub hunger: f32,
    /// Health in `[0, 100]`; zero is death.
    pub health: f32,
    /// Age in the same units as `Genome::lifespan`.
    pub age: f32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            energy: MAX_VITAL,
            hunger: 0.0,
            health: MAX_VITAL,
            age: 0.0,
        }
    }
}

/// Archived record of a creature that died.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreatureHistoryEntry {
    pub genome: Genome,
    pub fitness: f32,
    pub lifetime: f32,
    pub generation: u32,
    pub offspring_count: u32,
}

/// Read-only view of a live creature handed to decision logic.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CreatureSnapshot {
    pub id: CreatureId,
    pub position: Position,
    pub state: CreatureState,
    pub energy: f32,
    pub hunger: f32,
    pub health: f32,
    pub age: f32,
    pub can_reproduce: bool,
}
