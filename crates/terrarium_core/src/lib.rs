//! # Terrarium Core
//!
//! The simulation engine behind Terrarium, an evolutionary creature ecosystem.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Genome operators (random generation, mutation, crossover, fitness)
//! - Creature metabolism, combat, mating and death
//! - Weather and day-cycle modulation of the environment
//! - Depletable, regrowing resource fields
//! - Population bookkeeping and generational selection
//!
//! ## Architecture
//!
//! Each component owns its state exclusively and queues [`SimEvent`]s instead
//! of calling back into its owner. The caller drains them after every step.
//! All randomness flows from seeded [`rand_chacha::ChaCha8Rng`] streams, one per
//! component, so a seeded run is reproducible.
//!
//! ## Example
//!
//! ```
//! use terrarium_core::genetics::GenomeLogic;
//! use terrarium_data::Genome;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let a = Genome::new_random_with_rng(&mut rng);
//! let b = Genome::new_random_with_rng(&mut rng);
//!
//! let child = a.offspring_with_rng(&b, 0.1, 0.2, &mut rng);
//! assert!(child.is_within_bounds());
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Error types shared by every component
pub mod error;
/// Genetic operators and fitness scoring
pub mod genetics;
/// JSONL event log
pub mod history;
/// Per-creature state machine (metabolism, combat, mating, death)
pub mod lifecycle;
/// Performance metrics collection and logging
pub mod metrics;
/// Population manager and generational replacement
pub mod population;
/// Resource field placement, depletion and regrowth
pub mod resources;
/// Spatial hashing for proximity queries
pub mod spatial_hash;
/// Population-wide passes (selection, statistics)
pub mod systems;
/// Weather and time-of-day modulation
pub mod weather;

pub use config::AppConfig;
pub use error::SimError;
pub use genetics::GenomeLogic;
pub use history::{HistoryLogger, LoggedEvent};
pub use lifecycle::{Creature, CreatureEvent, EncounterOutcome, MovementProfile};
pub use metrics::{init_logging, Metrics};
pub use population::{AdvanceReason, CreatureFactory, DefaultCreatureFactory, PopulationManager};
pub use resources::ResourceField;
pub use terrarium_data::SimEvent;
pub use weather::WeatherModulator;
