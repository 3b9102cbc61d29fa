use super::creature::CreatureId;
use super::environment::{Position, ResourceType, TimeOfDay, WeatherType};
use super::genome::{AggressionLevel, Genome, MovementType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate statistics over the live population, recomputed wholesale.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PopulationStats {
    pub total_population: usize,
    pub generation: u32,
    pub average_fitness: f32,
    pub max_fitness: f32,
    /// Genome of the fittest live creature.
    pub dominant_genome: Option<Genome>,
    pub movement_distribution: BTreeMap<MovementType, usize>,
    pub aggression_distribution: BTreeMap<AggressionLevel, usize>,
}

/// Outward notification emitted by the simulation components.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum SimEvent {
    Death {
        creature_id: CreatureId,
        fitness: f32,
    },
    Reproduction {
        parent_a: CreatureId,
        parent_b: CreatureId,
        offspring: Box<Genome>,
    },
    GenerationComplete {
        generation: u32,
    },
    PopulationStatsUpdated {
        stats: Box<PopulationStats>,
        delta_time: f64,
    },
    WeatherChanged {
        new: WeatherType,
        previous: WeatherType,
    },
    TimeOfDayChanged {
        band: TimeOfDay,
        hour: f32,
    },
    EnvironmentDestruction {
        position: Position,
        resource_type: ResourceType,
        nutrient_value: f64,
    },
}

impl SimEvent {
    /// Short machine-friendly name of the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Death { .. } => "death",
            Self::Reproduction { .. } => "reproduction",
            Self::GenerationComplete { .. } => "generation_complete",
            Self::PopulationStatsUpdated { .. } => "population_stats_updated",
            Self::WeatherChanged { .. } => "weather_changed",
            Self::TimeOfDayChanged { .. } => "time_of_day_changed",
            Self::EnvironmentDestruction { .. } => "environment_destruction",
        }
    }

    /// One-line human readable description.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Death {
                creature_id,
                fitness,
            } => format!(
                "#{} died (fitness {:.1})",
                &creature_id.to_string()[..8],
                fitness
            ),
            Self::Reproduction {
                parent_a, parent_b, ..
            } => format!(
                "#{} and #{} produced offspring",
                &parent_a.to_string()[..8],
                &parent_b.to_string()[..8]
            ),
            Self::GenerationComplete { generation } => {
                format!("Generation {} begins", generation)
            }
            Self::PopulationStatsUpdated { stats, .. } => format!(
                "Population {} | avg fitness {:.1} | max {:.1}",
                stats.total_population, stats.average_fitness, stats.max_fitness
            ),
            Self::WeatherChanged { new, previous } => {
                format!("Weather {:?} -> {:?}", previous, new)
            }
            Self::TimeOfDayChanged { band, hour } => format!("{:?} ({:.1}h)", band, hour),
            Self::EnvironmentDestruction {
                resource_type,
                position,
                ..
            } => format!(
                "{:?} destroyed at ({:.0}, {:.0})",
                resource_type, position.x, position.y
            ),
        }
    }
}
