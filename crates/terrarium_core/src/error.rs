//! Error types for the simulation core.

use terrarium_data::CreatureId;
use thiserror::Error;

/// Failures surfaced by the simulation components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("No creature factory configured")]
    MissingCreatureFactory,

    #[error("No resource categories configured")]
    MissingResourceConfig,

    #[error("Creature not found: {0}")]
    CreatureNotFound(CreatureId),

    #[error("Creature {0} cannot interact with itself")]
    SelfInteraction(CreatureId),
}

pub type Result<T> = std::result::Result<T, SimError>;
