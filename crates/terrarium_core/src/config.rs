//! Configuration management for simulation parameters.
//!
//! Strongly-typed structures that map onto `config.toml`. Every section is
//! `#[serde(default)]`, so a file only needs to mention the values it changes.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! seed = 42
//!
//! [population]
//! initial_population = 50
//! generation_time_limit = 300.0
//!
//! [evolution]
//! mutation_rate = 0.1
//!
//! [[resources.categories]]
//! resource_type = "Tree"
//! instance_count = 40
//! nutrient_value = 50.0
//! ```

use crate::weather::WeatherTransitionTable;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use terrarium_data::{ResourceType, WeatherType};

/// Largest accepted spawn radius for creatures and resource categories.
pub const MAX_SPAWN_RADIUS: f64 = 1_000_000.0;

/// World-level parameters shared by every component.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    /// Seeds every component RNG when set; entropy is used otherwise.
    pub seed: Option<u64>,
    pub origin_x: f64,
    pub origin_y: f64,
    /// Multiplier applied to every tick's delta time.
    pub time_scale: f64,
}

impl WorldConfig {
    /// Independent RNG stream for one component.
    ///
    /// With a seed, every stream is reproducible; without one, entropy is used.
    #[must_use]
    pub fn rng_for(&self, stream: u64) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(stream);
                rng
            }
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            origin_x: 0.0,
            origin_y: 0.0,
            time_scale: 1.0,
        }
    }
}

/// Population bounds and generation pacing.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PopulationConfig {
    pub initial_population: usize,
    pub min_population: usize,
    pub max_population: usize,
    pub spawn_radius: f64,
    pub generation_time_limit: f64,
    pub auto_generation_advance: bool,
    pub stats_update_interval: f64,
    /// Half-width of the square around the parents' midpoint where offspring land.
    pub offspring_jitter: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_population: 50,
            min_population: 10,
            max_population: 200,
            spawn_radius: 5000.0,
            generation_time_limit: 300.0,
            auto_generation_advance: true,
            stats_update_interval: 1.0,
            offspring_jitter: 200.0,
        }
    }
}

/// Operators used when breeding a new generation.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EvolutionConfig {
    pub mutation_rate: f32,
    pub mutation_strength: f32,
    /// Fraction of the parent pool copied unchanged into the next generation.
    pub elite_percentage: f32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.1,
            mutation_strength: 0.2,
            elite_percentage: 0.2,
        }
    }
}

/// Placement and yield of one resource category.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ResourceCategoryConfig {
    pub resource_type: ResourceType,
    pub instance_count: usize,
    pub spawn_radius: f64,
    pub scale_min: f32,
    pub scale_max: f32,
    pub nutrient_value: f64,
    pub regrowth_time: f64,
}

impl ResourceCategoryConfig {
    /// Category defaults; trees take twice as long to regrow.
    #[must_use]
    pub fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            regrowth_time: match resource_type {
                ResourceType::Tree => 120.0,
                _ => 60.0,
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_count(mut self, instance_count: usize) -> Self {
        self.instance_count = instance_count;
        self
    }

    #[must_use]
    pub fn with_nutrient_value(mut self, nutrient_value: f64) -> Self {
        self.nutrient_value = nutrient_value;
        self
    }
}

impl Default for ResourceCategoryConfig {
    fn default() -> Self {
        Self {
            resource_type: ResourceType::Bush,
            instance_count: 100,
            spawn_radius: 2000.0,
            scale_min: 0.8,
            scale_max: 1.2,
            nutrient_value: 25.0,
            regrowth_time: 60.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ResourceConfig {
    pub categories: Vec<ResourceCategoryConfig>,
    pub enable_regrowth: bool,
    pub regrowth_rate: f64,
    pub regrowth_check_interval: f64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                ResourceCategoryConfig::new(ResourceType::Tree)
                    .with_count(40)
                    .with_nutrient_value(50.0),
                ResourceCategoryConfig::new(ResourceType::Bush).with_count(80),
                ResourceCategoryConfig::new(ResourceType::Grass)
                    .with_count(150)
                    .with_nutrient_value(10.0),
                ResourceCategoryConfig::new(ResourceType::Rock)
                    .with_count(20)
                    .with_nutrient_value(5.0),
                ResourceCategoryConfig::new(ResourceType::Flower)
                    .with_count(60)
                    .with_nutrient_value(15.0),
            ],
            enable_regrowth: true,
            regrowth_rate: 1.0,
            regrowth_check_interval: 5.0,
        }
    }
}

/// Weather state machine and day cycle.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WeatherConfig {
    pub dynamic_weather: bool,
    pub dynamic_time_of_day: bool,
    /// Seconds between random weather rolls.
    pub change_interval: f64,
    /// Seconds for a full 24-hour cycle.
    pub day_duration: f64,
    /// Transition length used by random weather changes.
    pub random_transition_time: f64,
    pub initial_weather: WeatherType,
    pub initial_hour: f32,
    pub transitions: WeatherTransitionTable,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            dynamic_weather: true,
            dynamic_time_of_day: true,
            change_interval: 120.0,
            day_duration: 600.0,
            random_transition_time: 10.0,
            initial_weather: WeatherType::Clear,
            initial_hour: 12.0,
            transitions: WeatherTransitionTable::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub evolution: EvolutionConfig,
    pub resources: ResourceConfig,
    pub weather: WeatherConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Err` describing the first violated rule.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.world.time_scale > 0.0,
            "Time scale must be positive"
        );

        let pop = &self.population;
        anyhow::ensure!(
            pop.initial_population <= 10000,
            "Initial population too large (max 10000)"
        );
        anyhow::ensure!(
            pop.min_population <= pop.max_population,
            "Min population must not exceed max population"
        );
        anyhow::ensure!(
            pop.initial_population <= pop.max_population,
            "Initial population must not exceed max population"
        );
        anyhow::ensure!(
            (100.0..=MAX_SPAWN_RADIUS).contains(&pop.spawn_radius),
            "Spawn radius must be in [100, {}]",
            MAX_SPAWN_RADIUS
        );
        anyhow::ensure!(
            !pop.auto_generation_advance || pop.initial_population > pop.min_population,
            "Initial population must exceed min population when generations advance automatically"
        );
        anyhow::ensure!(
            pop.generation_time_limit > 0.0,
            "Generation time limit must be positive"
        );
        anyhow::ensure!(
            pop.stats_update_interval > 0.0,
            "Stats update interval must be positive"
        );
        anyhow::ensure!(
            pop.offspring_jitter >= 0.0,
            "Offspring jitter must be non-negative"
        );

        let evo = &self.evolution;
        anyhow::ensure!(
            (0.0..=1.0).contains(&evo.mutation_rate),
            "Mutation rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            evo.mutation_strength >= 0.0,
            "Mutation strength must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&evo.elite_percentage),
            "Elite percentage must be in [0.0, 1.0]"
        );

        let res = &self.resources;
        anyhow::ensure!(
            res.regrowth_rate >= 0.0,
            "Regrowth rate must be non-negative"
        );
        anyhow::ensure!(
            res.regrowth_check_interval > 0.0,
            "Regrowth check interval must be positive"
        );
        for category in &res.categories {
            anyhow::ensure!(
                (100.0..=MAX_SPAWN_RADIUS).contains(&category.spawn_radius),
                "{:?} spawn radius must be in [100, {}]",
                category.resource_type,
                MAX_SPAWN_RADIUS
            );
            anyhow::ensure!(
                category.scale_min > 0.0 && category.scale_min <= category.scale_max,
                "{:?} scale range is invalid",
                category.resource_type
            );
            anyhow::ensure!(
                category.nutrient_value >= 0.0,
                "{:?} nutrient value must be non-negative",
                category.resource_type
            );
            anyhow::ensure!(
                category.regrowth_time >= 0.0,
                "{:?} regrowth time must be non-negative",
                category.resource_type
            );
        }

        let weather = &self.weather;
        anyhow::ensure!(
            weather.change_interval > 0.0,
            "Weather change interval must be positive"
        );
        anyhow::ensure!(
            weather.day_duration > 0.0,
            "Day duration must be positive"
        );
        anyhow::ensure!(
            (0.0..24.0).contains(&weather.initial_hour),
            "Initial hour must be in [0, 24)"
        );
        weather.transitions.validate()?;

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        if !std::path::Path::new(path).exists() {
            tracing::info!(path, "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Hash of every parameter that affects simulation outcomes.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.population).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hasher.update(format!("{:?}", self.resources).as_bytes());
        hasher.update(format!("{:?}", self.weather).as_bytes());
        hex::encode(hasher.finalize())
    }
}
