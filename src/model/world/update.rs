use crate::model::world::World;
use std::time::Instant;
use terrarium_data::SimEvent;

impl World {
    /// Advances the simulation by `dt` seconds of wall time, scaled by the
    /// configured time scale.
    ///
    /// Tick order: weather, resource regrowth, then the population under the
    /// freshly published modifiers. Returns every event emitted this tick in
    /// that order.
    pub fn update(&mut self, dt: f64) -> anyhow::Result<Vec<SimEvent>> {
        if !self.running {
            return Ok(Vec::new());
        }
        let started = Instant::now();
        let dt = dt * self.config.world.time_scale;
        self.tick += 1;
        self.elapsed += dt;

        self.weather.update(dt);
        self.resources.update(dt);
        let env = self.weather.modifiers();
        self.population.update(dt, &env);

        let mut events = self.weather.drain_events();
        events.extend(self.resources.drain_events());
        events.extend(self.population.drain_events());
        self.dispatch(&events)?;

        self.metrics.record_tick(
            started.elapsed(),
            self.population.population(),
            self.resources.active_count(),
        );
        Ok(events)
    }

    fn dispatch(&mut self, events: &[SimEvent]) -> anyhow::Result<()> {
        for event in events {
            self.metrics.increment_counter(event.kind());
            if matches!(event, SimEvent::GenerationComplete { .. }) {
                self.population.log_generation_summary();
            }
            for subscriber in &mut self.subscribers {
                subscriber(event);
            }
            self.logger.log_event(self.tick, event)?;
        }
        Ok(())
    }
}
