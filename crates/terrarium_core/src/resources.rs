//! Depletable, regrowing nutrient sources.
//!
//! Instances are placed once and never move; destroyed ones stay in the
//! field and count down until they regrow at their original transform.

use crate::config::{AppConfig, ResourceCategoryConfig, ResourceConfig};
use crate::error::{Result, SimError};
use crate::spatial_hash::{random_ring_point, SpatialHash};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use terrarium_data::{Position, ResourceInstance, SimEvent};

/// RNG stream reserved for resource placement.
pub const RESOURCE_RNG_STREAM: u64 = 2;

pub const RESOURCE_MAX_HEALTH: f32 = 100.0;
/// Nothing spawns closer than this to the field origin.
pub const MIN_SPAWN_DISTANCE: f64 = 100.0;
const GRID_CELL_SIZE: f64 = 250.0;

pub struct ResourceField {
    config: ResourceConfig,
    origin: Position,
    instances: Vec<ResourceInstance>,
    index: SpatialHash,
    regrowth_timer: f64,
    rng: ChaCha8Rng,
    events: Vec<SimEvent>,
    candidates: Vec<usize>,
}

impl ResourceField {
    /// Empty field; call [`spawn_configured`](Self::spawn_configured) to populate it.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_rng(
            config.resources.clone(),
            Position::new(config.world.origin_x, config.world.origin_y),
            config.world.rng_for(RESOURCE_RNG_STREAM),
        )
    }

    #[must_use]
    pub fn with_rng(config: ResourceConfig, origin: Position, rng: ChaCha8Rng) -> Self {
        Self {
            config,
            origin,
            instances: Vec::new(),
            index: SpatialHash::new(GRID_CELL_SIZE),
            regrowth_timer: 0.0,
            rng,
            events: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Replaces every instance with a fresh placement of `categories`.
    ///
    /// Fails without touching the field when `categories` is empty.
    pub fn spawn(&mut self, categories: &[ResourceCategoryConfig]) -> Result<usize> {
        if categories.is_empty() {
            tracing::error!("Resource spawn aborted: no resource categories configured");
            return Err(SimError::MissingResourceConfig);
        }

        let total: usize = categories.iter().map(|c| c.instance_count).sum();
        let mut instances = Vec::with_capacity(total);
        for category in categories {
            let outer = category.spawn_radius.max(MIN_SPAWN_DISTANCE);
            for _ in 0..category.instance_count {
                let position =
                    random_ring_point(&mut self.rng, self.origin, MIN_SPAWN_DISTANCE, outer);
                let scale = if category.scale_max > category.scale_min {
                    self.rng.gen_range(category.scale_min..=category.scale_max)
                } else {
                    category.scale_min
                };
                instances.push(ResourceInstance {
                    position,
                    resource_type: category.resource_type,
                    rotation: self.rng.gen_range(0.0..360.0),
                    scale,
                    health: RESOURCE_MAX_HEALTH,
                    nutrient_value: category.nutrient_value,
                    destroyed: false,
                    regrowth_time: category.regrowth_time,
                    regrowth_remaining: 0.0,
                });
            }
        }

        let positions: Vec<Position> = instances.iter().map(|r| r.position).collect();
        self.index.build(&positions);
        self.instances = instances;
        self.config.categories = categories.to_vec();
        self.regrowth_timer = 0.0;

        tracing::info!(
            instances = self.instances.len(),
            categories = categories.len(),
            "Resource field spawned"
        );
        Ok(self.instances.len())
    }

    /// Spawns the categories from the stored configuration.
    pub fn spawn_configured(&mut self) -> Result<usize> {
        let categories = self.config.categories.clone();
        self.spawn(&categories)
    }

    /// Regenerates every instance from the stored configuration.
    pub fn reset(&mut self) -> Result<usize> {
        self.events.clear();
        self.spawn_configured()
    }

    /// Indices of active instances within `radius` of `location`.
    fn active_within(&mut self, location: Position, radius: f64) -> Vec<usize> {
        let radius_sq = radius * radius;
        let instances = &self.instances;
        self.index.query_into(location, radius, &mut self.candidates);
        let mut hits: Vec<usize> = self
            .candidates
            .iter()
            .copied()
            .filter(|&i| {
                let r = &instances[i];
                r.is_active() && r.position.distance_sq(&location) <= radius_sq
            })
            .collect();
        hits.sort_unstable();
        hits
    }

    fn for_each_active_within<F>(&self, location: Position, radius: f64, mut f: F)
    where
        F: FnMut(usize, f64),
    {
        let radius_sq = radius * radius;
        self.index.query_callback(location, radius, |i| {
            let r = &self.instances[i];
            if r.is_active() {
                let d_sq = r.position.distance_sq(&location);
                if d_sq <= radius_sq {
                    f(i, d_sq.sqrt());
                }
            }
        });
    }

    /// Positions of active instances within `radius` of `location`.
    #[must_use]
    pub fn query_nearby(&self, location: Position, radius: f64) -> Vec<Position> {
        let mut found = Vec::new();
        self.for_each_active_within(location, radius, |i, _| {
            found.push(self.instances[i].position);
        });
        found
    }

    /// Closest active instance within `radius`.
    #[must_use]
    pub fn nearest(&self, location: Position, radius: f64) -> Option<Position> {
        let mut best: Option<(f64, usize)> = None;
        self.for_each_active_within(location, radius, |i, d| {
            if best.map_or(true, |(bd, bi)| d < bd || (d == bd && i < bi)) {
                best = Some((d, i));
            }
        });
        best.map(|(_, i)| self.instances[i].position)
    }

    /// Applies `amount` with linear falloff to every active instance in range.
    ///
    /// Returns whether any instance took damage. Instances reaching zero health
    /// are destroyed and announced once.
    pub fn damage(&mut self, location: Position, radius: f64, amount: f32) -> bool {
        if radius <= 0.0 || amount <= 0.0 {
            return false;
        }

        let mut damaged = false;
        for i in self.active_within(location, radius) {
            let distance = self.instances[i].position.distance_to(&location);
            let falloff = (1.0 - distance / radius) as f32;
            let dealt = amount * falloff;
            if dealt <= 0.0 {
                continue;
            }
            damaged = true;

            let instance = &mut self.instances[i];
            instance.health = (instance.health - dealt).max(0.0);
            if instance.health <= 0.0 {
                instance.destroyed = true;
                instance.regrowth_remaining = instance.regrowth_time;
                self.events.push(SimEvent::EnvironmentDestruction {
                    position: instance.position,
                    resource_type: instance.resource_type,
                    nutrient_value: instance.nutrient_value,
                });
            }
        }
        damaged
    }

    /// Destroys every active instance in range and returns their summed nutrient value.
    pub fn consume(&mut self, location: Position, radius: f64) -> f64 {
        let mut total = 0.0;
        for i in self.active_within(location, radius) {
            let instance = &mut self.instances[i];
            total += instance.nutrient_value;
            instance.destroyed = true;
            instance.health = 0.0;
            instance.regrowth_remaining = instance.regrowth_time;
        }
        total
    }

    /// Counts down destroyed instances by `interval * rate`; returns how many regrew.
    pub fn regrow_tick(&mut self, interval: f64, rate: f64) -> usize {
        let step = interval * rate;
        let mut regrown = 0;
        for instance in self.instances.iter_mut().filter(|r| r.destroyed) {
            instance.regrowth_remaining -= step;
            if instance.regrowth_remaining <= 0.0 {
                instance.regrowth_remaining = 0.0;
                instance.destroyed = false;
                instance.health = RESOURCE_MAX_HEALTH;
                regrown += 1;
            }
        }
        if regrown > 0 {
            tracing::debug!(regrown, "Resources regrew");
        }
        regrown
    }

    /// Runs a regrowth tick every configured check interval.
    pub fn update(&mut self, dt: f64) {
        if !self.config.enable_regrowth {
            return;
        }
        self.regrowth_timer += dt;
        let interval = self.config.regrowth_check_interval;
        while self.regrowth_timer >= interval {
            self.regrowth_timer -= interval;
            self.regrow_tick(interval, self.config.regrowth_rate);
        }
    }

    #[must_use]
    pub fn instances(&self) -> &[ResourceInstance] {
        &self.instances
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.instances.iter().filter(|r| r.is_active()).count()
    }

    #[must_use]
    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
