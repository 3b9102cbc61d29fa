use crate::model::config::AppConfig;
use crate::model::history::HistoryLogger;
use crate::model::metrics::Metrics;
use crate::model::population::{CreatureFactory, DefaultCreatureFactory, PopulationManager};
use crate::model::resources::ResourceField;
use crate::model::weather::WeatherModulator;
use crate::model::world::World;

impl World {
    /// Validated, populated world with no event log.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        Self::with_factory(config, DefaultCreatureFactory)
    }

    /// Like [`new`](Self::new), appending every event to `<log_dir>/live.jsonl`.
    pub fn new_at(config: AppConfig, log_dir: &str) -> anyhow::Result<Self> {
        let mut world = Self::new(config)?;
        world.logger = HistoryLogger::new_at(log_dir)?;
        Ok(world)
    }

    pub fn with_factory<F: CreatureFactory + 'static>(
        config: AppConfig,
        factory: F,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        tracing::info!(
            seed = ?config.world.seed,
            fingerprint = %config.fingerprint(),
            "Creating world"
        );

        let weather = WeatherModulator::new(&config);
        let mut resources = ResourceField::new(&config);
        resources.spawn_configured()?;
        let mut population = PopulationManager::new(&config).with_factory(factory);
        population.initialize()?;

        Ok(Self {
            tick: 0,
            elapsed: 0.0,
            config,
            weather,
            resources,
            population,
            metrics: Metrics::new(),
            logger: HistoryLogger::new_dummy(),
            running: true,
            subscribers: Vec::new(),
        })
    }

    /// Restores every component to its configured initial state.
    ///
    /// Subscribers and the event log stay attached; queued events are discarded.
    pub fn reset(&mut self) -> anyhow::Result<()> {
        self.weather.reset();
        self.resources.reset()?;
        self.population.reset()?;
        self.weather.drain_events();
        self.resources.drain_events();
        self.population.drain_events();
        self.tick = 0;
        self.elapsed = 0.0;
        tracing::info!("World reset");
        Ok(())
    }
}
