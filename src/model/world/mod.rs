use crate::model::config::AppConfig;
use crate::model::history::HistoryLogger;
use crate::model::lifecycle::MovementProfile;
use crate::model::metrics::Metrics;
use crate::model::population::PopulationManager;
use crate::model::resources::ResourceField;
use crate::model::weather::WeatherModulator;
use terrarium_data::{
    CreatureHistoryEntry, CreatureId, CreatureSnapshot, EnvironmentModifiers, PopulationStats,
    Position, SimEvent, TimeOfDay, WeatherType,
};

pub mod init;
pub mod update;

/// Callback invoked for every event the world emits, in emission order.
pub type Subscriber = Box<dyn FnMut(&SimEvent) + Send>;

/// Owns one of each simulation component and steps them in a fixed order.
pub struct World {
    pub tick: u64,
    /// Simulated seconds since the last reset, after time scaling.
    pub elapsed: f64,
    pub config: AppConfig,
    pub weather: WeatherModulator,
    pub resources: ResourceField,
    pub population: PopulationManager,
    pub metrics: Metrics,
    pub logger: HistoryLogger,
    running: bool,
    subscribers: Vec<Subscriber>,
}

impl World {
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&SimEvent) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Pauses the world; [`update`](Self::update) becomes a no-op until restarted.
    pub fn stop(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn modifiers(&self) -> EnvironmentModifiers {
        self.weather.modifiers()
    }

    #[must_use]
    pub fn current_weather(&self) -> WeatherType {
        self.weather.current_weather()
    }

    #[must_use]
    pub fn hour(&self) -> f32 {
        self.weather.hour()
    }

    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        self.weather.time_of_day()
    }

    #[must_use]
    pub fn stats(&self) -> &PopulationStats {
        self.population.stats()
    }

    #[must_use]
    pub fn history(&self) -> &[CreatureHistoryEntry] {
        self.population.history()
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.population.generation()
    }

    pub fn snapshot(&self, id: CreatureId) -> Option<CreatureSnapshot> {
        self.population.snapshot(id).ok()
    }

    /// Locomotion parameters for `id` under the current weather.
    pub fn movement_profile(&self, id: CreatureId) -> Option<MovementProfile> {
        let env = self.weather.modifiers();
        self.population
            .creature(id)
            .map(|c| c.movement_profile(&env))
    }

    #[must_use]
    pub fn nearest_resource(&self, location: Position, radius: f64) -> Option<Position> {
        self.resources.nearest(location, radius)
    }

    #[must_use]
    pub fn nearby_resources(&self, location: Position, radius: f64) -> Vec<Position> {
        self.resources.query_nearby(location, radius)
    }

    /// Feeds `id` from every active resource within `radius`.
    pub fn forage(&mut self, id: CreatureId, radius: f64) -> anyhow::Result<f64> {
        Ok(self.population.forage(id, &mut self.resources, radius)?)
    }
}
