//! Live population, fitness ledger and generational replacement.
//!
//! [`PopulationManager`] is the sole owner of every live creature. Creatures
//! report deaths and births through their event queues; the manager drains
//! them synchronously after each tick or id-addressed action, so a caller
//! never observes a dead creature in the live set once a call returns.

use crate::config::{AppConfig, EvolutionConfig, PopulationConfig};
use crate::error::{Result, SimError};
use crate::genetics::GenomeLogic;
use crate::lifecycle::{Creature, CreatureEvent, EncounterOutcome};
use crate::resources::{ResourceField, MIN_SPAWN_DISTANCE};
use crate::spatial_hash::random_ring_point;
use crate::systems::selection::{breed_generation, select_parents};
use crate::systems::stats::update_population_stats;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use terrarium_data::{
    CreatureHistoryEntry, CreatureId, CreatureSnapshot, CreatureState, EnvironmentModifiers,
    Genome, PopulationStats, Position, SimEvent,
};
use uuid::Uuid;

/// RNG stream reserved for spawning and breeding.
pub const POPULATION_RNG_STREAM: u64 = 3;

/// Builds the concrete creature for a spawn request.
///
/// Hosts use this to attach their own defaults; any
/// `FnMut(CreatureId, Genome, Position) -> Creature` closure qualifies.
pub trait CreatureFactory: Send {
    fn create(&mut self, id: CreatureId, genome: Genome, position: Position) -> Creature;
}

impl<F> CreatureFactory for F
where
    F: FnMut(CreatureId, Genome, Position) -> Creature + Send,
{
    fn create(&mut self, id: CreatureId, genome: Genome, position: Position) -> Creature {
        self(id, genome, position)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCreatureFactory;

impl CreatureFactory for DefaultCreatureFactory {
    fn create(&mut self, id: CreatureId, genome: Genome, position: Position) -> Creature {
        Creature::new(id, genome, position)
    }
}

/// Why a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceReason {
    TimeLimit,
    PopulationFloor,
    PopulationCeiling,
}

/// Two distinct live creatures borrowed mutably at once.
fn pair_mut(
    creatures: &mut [Creature],
    a: CreatureId,
    b: CreatureId,
) -> Result<(&mut Creature, &mut Creature)> {
    if a == b {
        return Err(SimError::SelfInteraction(a));
    }
    let ia = position_of(creatures, a)?;
    let ib = position_of(creatures, b)?;
    if ia < ib {
        let (left, right) = creatures.split_at_mut(ib);
        Ok((&mut left[ia], &mut right[0]))
    } else {
        let (left, right) = creatures.split_at_mut(ia);
        Ok((&mut right[0], &mut left[ib]))
    }
}

fn position_of(creatures: &[Creature], id: CreatureId) -> Result<usize> {
    creatures
        .iter()
        .position(|c| c.id == id)
        .ok_or(SimError::CreatureNotFound(id))
}

pub struct PopulationManager {
    population: PopulationConfig,
    evolution: EvolutionConfig,
    origin: Position,
    factory: Option<Box<dyn CreatureFactory>>,
    creatures: Vec<Creature>,
    corpses: Vec<Creature>,
    history: Vec<CreatureHistoryEntry>,
    stats: PopulationStats,
    generation: u32,
    generation_time: f64,
    stats_timer: f64,
    clock: f64,
    initialized: bool,
    advancing: bool,
    rng: ChaCha8Rng,
    events: Vec<SimEvent>,
}

impl PopulationManager {
    /// Manager with the [`DefaultCreatureFactory`]. Call [`initialize`](Self::initialize) to populate.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_rng(
            config.population.clone(),
            config.evolution.clone(),
            Position::new(config.world.origin_x, config.world.origin_y),
            config.world.rng_for(POPULATION_RNG_STREAM),
        )
    }

    #[must_use]
    pub fn with_rng(
        population: PopulationConfig,
        evolution: EvolutionConfig,
        origin: Position,
        rng: ChaCha8Rng,
    ) -> Self {
        Self {
            population,
            evolution,
            origin,
            factory: Some(Box::new(DefaultCreatureFactory)),
            creatures: Vec::new(),
            corpses: Vec::new(),
            history: Vec::new(),
            stats: PopulationStats::default(),
            generation: 0,
            generation_time: 0.0,
            stats_timer: 0.0,
            clock: 0.0,
            initialized: false,
            advancing: false,
            rng,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_factory<F: CreatureFactory + 'static>(mut self, factory: F) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn set_factory(&mut self, factory: Option<Box<dyn CreatureFactory>>) {
        self.factory = factory;
    }

    /// Discards all state and spawns the initial cohort from random genomes.
    ///
    /// Fails without touching anything when no factory is configured.
    pub fn initialize(&mut self) -> Result<()> {
        if self.factory.is_none() {
            tracing::error!("Population initialization aborted: no creature factory configured");
            return Err(SimError::MissingCreatureFactory);
        }

        self.creatures.clear();
        self.corpses.clear();
        self.history.clear();
        self.events.clear();
        self.stats = PopulationStats::default();
        self.generation = 0;
        self.generation_time = 0.0;
        self.stats_timer = 0.0;
        self.advancing = false;

        for _ in 0..self.population.initial_population {
            let genome = Genome::new_random_with_rng(&mut self.rng);
            self.spawn_creature(genome, None)?;
        }
        self.initialized = true;

        tracing::info!(
            population = self.creatures.len(),
            "Ecosystem initialized"
        );
        Ok(())
    }

    /// Drops every creature and the ledger, then re-runs [`initialize`](Self::initialize).
    pub fn reset(&mut self) -> Result<()> {
        self.initialize()
    }

    fn build_creature(&mut self, genome: Genome, location: Option<Position>) -> Result<Creature> {
        if self.factory.is_none() {
            tracing::error!("Spawn aborted: no creature factory configured");
            return Err(SimError::MissingCreatureFactory);
        }
        let position = match location {
            Some(p) => p,
            None => random_ring_point(
                &mut self.rng,
                self.origin,
                MIN_SPAWN_DISTANCE,
                self.population.spawn_radius,
            ),
        };
        let id = Uuid::from_u128(self.rng.gen::<u128>());
        let factory = self
            .factory
            .as_mut()
            .ok_or(SimError::MissingCreatureFactory)?;
        Ok(factory.create(id, genome, position))
    }

    /// Registers a new live creature. `location` defaults to a random spawn point.
    pub fn spawn_creature(&mut self, genome: Genome, location: Option<Position>) -> Result<CreatureId> {
        let creature = self.build_creature(genome, location)?;
        let id = creature.id;
        self.creatures.push(creature);
        Ok(id)
    }

    /// Runs one population tick under the published environment.
    pub fn update(&mut self, dt: f64, env: &EnvironmentModifiers) {
        self.clock += dt;
        self.generation_time += dt;

        for corpse in &mut self.corpses {
            corpse.update(dt, env);
        }
        self.corpses.retain(|c| !c.is_expired());

        for creature in &mut self.creatures {
            creature.update(dt, env);
        }
        self.dispatch_creature_events();

        self.stats_timer += dt;
        if self.stats_timer >= self.population.stats_update_interval {
            let delta_time = self.stats_timer;
            self.stats_timer = 0.0;
            self.update_stats();
            self.events.push(SimEvent::PopulationStatsUpdated {
                stats: Box::new(self.stats.clone()),
                delta_time,
            });
        }

        if self.initialized && self.population.auto_generation_advance {
            if let Some(reason) = self.should_advance() {
                tracing::warn!(
                    ?reason,
                    population = self.creatures.len(),
                    generation_time = self.generation_time,
                    "Generation advance triggered"
                );
                self.advance_generation();
            }
        }
    }

    fn dispatch_creature_events(&mut self) {
        let pending: Vec<CreatureEvent> = self
            .creatures
            .iter_mut()
            .filter(|c| c.has_events())
            .flat_map(Creature::drain_events)
            .collect();

        for event in pending {
            match event {
                CreatureEvent::Died { id, fitness } => self.handle_death(id, fitness),
                CreatureEvent::Reproduced {
                    parent_a,
                    parent_b,
                    position_a,
                    position_b,
                    offspring,
                } => self.handle_reproduction(parent_a, parent_b, position_a, position_b, *offspring),
            }
        }
    }

    fn handle_death(&mut self, id: CreatureId, fitness: f32) {
        let Ok(index) = position_of(&self.creatures, id) else {
            return;
        };
        let creature = self.creatures.remove(index);
        self.history.push(CreatureHistoryEntry {
            genome: creature.genome.clone(),
            fitness,
            lifetime: creature.vitals.age,
            generation: self.generation,
            offspring_count: creature.offspring_count,
        });
        self.corpses.push(creature);
        self.events.push(SimEvent::Death {
            creature_id: id,
            fitness,
        });
    }

    fn handle_reproduction(
        &mut self,
        parent_a: CreatureId,
        parent_b: CreatureId,
        position_a: Position,
        position_b: Position,
        offspring: Genome,
    ) {
        self.events.push(SimEvent::Reproduction {
            parent_a,
            parent_b,
            offspring: Box::new(offspring.clone()),
        });

        if self.creatures.len() >= self.population.max_population {
            tracing::debug!("Offspring dropped: population at maximum");
            return;
        }

        let jitter = self.population.offspring_jitter;
        let (dx, dy) = if jitter > 0.0 {
            (
                self.rng.gen_range(-jitter..=jitter),
                self.rng.gen_range(-jitter..=jitter),
            )
        } else {
            (0.0, 0.0)
        };
        let location = position_a.midpoint(&position_b).offset(dx, dy);
        if let Err(err) = self.spawn_creature(offspring, Some(location)) {
            tracing::warn!(%err, "Offspring spawn failed");
        }
    }

    /// Recomputes the aggregate statistics over the live set.
    pub fn update_stats(&mut self) {
        update_population_stats(&mut self.stats, &self.creatures, self.generation);
    }

    /// First advance trigger that currently holds, if any.
    #[must_use]
    pub fn should_advance(&self) -> Option<AdvanceReason> {
        let live = self.creatures.len();
        if self.generation_time >= self.population.generation_time_limit {
            Some(AdvanceReason::TimeLimit)
        } else if live <= self.population.min_population {
            Some(AdvanceReason::PopulationFloor)
        } else if live >= self.population.max_population {
            Some(AdvanceReason::PopulationCeiling)
        } else {
            None
        }
    }

    /// Genomes of the fittest half of the live population, best first.
    #[must_use]
    pub fn select_parents(&self) -> Vec<Genome> {
        select_parents(&self.creatures)
    }

    /// Replaces the whole live population with a bred cohort.
    ///
    /// The next cohort is assembled in a separate container and swapped in at
    /// once; the outgoing creatures are dropped without death events. Returns
    /// `false` when an advance is already running or no factory is configured.
    pub fn advance_generation(&mut self) -> bool {
        if self.advancing {
            return false;
        }
        if self.factory.is_none() {
            tracing::error!("Generation advance aborted: no creature factory configured");
            return false;
        }
        self.advancing = true;

        let parents = self.select_parents();
        let target = self.population.initial_population;
        let genomes = if parents.is_empty() {
            tracing::warn!("No survivors to breed from, reseeding with random genomes");
            (0..target)
                .map(|_| Genome::new_random_with_rng(&mut self.rng))
                .collect()
        } else {
            breed_generation(&parents, target, &self.evolution, &mut self.rng)
        };

        let mut next = Vec::with_capacity(target);
        for genome in genomes {
            match self.build_creature(genome, None) {
                Ok(creature) => next.push(creature),
                Err(err) => tracing::error!(%err, "Failed to build next generation creature"),
            }
        }
        let previous = std::mem::replace(&mut self.creatures, next);
        drop(previous);

        self.generation += 1;
        self.generation_time = 0.0;
        self.update_stats();
        self.advancing = false;

        tracing::info!(
            generation = self.generation,
            parents = parents.len(),
            population = self.creatures.len(),
            "Advanced to next generation"
        );
        self.events.push(SimEvent::GenerationComplete {
            generation: self.generation,
        });
        true
    }

    /// The `n` highest-fitness genomes from the ledger, best first.
    #[must_use]
    pub fn top_performers(&self, n: usize) -> Vec<Genome> {
        let mut ranked: Vec<&CreatureHistoryEntry> = self.history.iter().collect();
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        ranked.into_iter().take(n).map(|e| e.genome.clone()).collect()
    }

    /// Logs the current generation summary.
    pub fn log_generation_summary(&self) {
        tracing::info!(
            generation = self.generation,
            population = self.stats.total_population,
            avg_fitness = format!("{:.2}", self.stats.average_fitness),
            max_fitness = format!("{:.2}", self.stats.max_fitness),
            archived = self.history.len(),
            "Generation summary"
        );
    }

    pub fn attack(&mut self, attacker: CreatureId, target: CreatureId) -> Result<bool> {
        let now = self.clock;
        let (a, t) = pair_mut(&mut self.creatures, attacker, target)?;
        let hit = a.attack(t, now);
        self.dispatch_creature_events();
        Ok(hit)
    }

    pub fn attempt_reproduction(&mut self, a: CreatureId, b: CreatureId) -> Result<bool> {
        let (first, second) = pair_mut(&mut self.creatures, a, b)?;
        let bred = first.attempt_reproduction(second, &mut self.rng);
        self.dispatch_creature_events();
        Ok(bred)
    }

    pub fn resolve_encounter(
        &mut self,
        initiator: CreatureId,
        other: CreatureId,
    ) -> Result<EncounterOutcome> {
        let now = self.clock;
        let (first, second) = pair_mut(&mut self.creatures, initiator, other)?;
        let outcome = first.resolve_encounter(second, now, &mut self.rng);
        self.dispatch_creature_events();
        Ok(outcome)
    }

    pub fn take_damage(
        &mut self,
        id: CreatureId,
        amount: f32,
        attacker: Option<CreatureId>,
    ) -> Result<bool> {
        let fatal = match attacker {
            Some(attacker) => {
                let (victim, attacker) = pair_mut(&mut self.creatures, id, attacker)?;
                victim.take_damage(amount, Some(attacker))
            }
            None => self.creature_mut(id)?.take_damage(amount, None),
        };
        self.dispatch_creature_events();
        Ok(fatal)
    }

    pub fn consume_food(&mut self, id: CreatureId, value: f32) -> Result<bool> {
        Ok(self.creature_mut(id)?.consume_food(value))
    }

    pub fn forage(&mut self, id: CreatureId, field: &mut ResourceField, radius: f64) -> Result<f64> {
        Ok(self.creature_mut(id)?.forage(field, radius))
    }

    pub fn set_position(&mut self, id: CreatureId, position: Position) -> Result<()> {
        self.creature_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_state(&mut self, id: CreatureId, state: CreatureState) -> Result<bool> {
        Ok(self.creature_mut(id)?.set_state(state))
    }

    pub fn snapshot(&self, id: CreatureId) -> Result<CreatureSnapshot> {
        self.creature(id)
            .map(Creature::snapshot)
            .ok_or(SimError::CreatureNotFound(id))
    }

    fn creature_mut(&mut self, id: CreatureId) -> Result<&mut Creature> {
        self.creatures
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(SimError::CreatureNotFound(id))
    }

    #[must_use]
    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    /// Direct access for hosts that drive movement or tests that stage scenarios.
    pub fn creatures_mut(&mut self) -> &mut [Creature] {
        &mut self.creatures
    }

    #[must_use]
    pub fn corpses(&self) -> &[Creature] {
        &self.corpses
    }

    #[must_use]
    pub fn history(&self) -> &[CreatureHistoryEntry] {
        &self.history
    }

    #[must_use]
    pub fn stats(&self) -> &PopulationStats {
        &self.stats
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.creatures.len()
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn generation_time(&self) -> f64 {
        self.generation_time
    }

    #[must_use]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub fn is_advancing(&self) -> bool {
        self.advancing
    }

    #[must_use]
    pub fn config(&self) -> &PopulationConfig {
        &self.population
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.population.auto_generation_advance = enabled;
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
