//! Per-creature continuous simulation: metabolism, combat, mating and death.
//!
//! A creature never calls back into its owner. Deaths and births are queued as
//! [`CreatureEvent`]s and drained by the population manager after each call.

use crate::genetics::{GenomeLogic, LifeRecord};
use crate::resources::ResourceField;
use rand::Rng;
use terrarium_data::{
    AggressionLevel, CreatureId, CreatureSnapshot, CreatureState, EnvironmentModifiers, Genome,
    MovementType, Position, Vitals, MAX_VITAL,
};
use uuid::Uuid;

/// Fraction of lifespan after which a creature may breed.
pub const MATURITY_FRACTION: f32 = 0.2;
pub const REPRODUCTION_MIN_ENERGY: f32 = 50.0;
pub const REPRODUCTION_MAX_HUNGER: f32 = 70.0;
pub const REPRODUCTION_MIN_HEALTH: f32 = 30.0;
pub const REPRODUCTION_ENERGY_COST: f32 = 30.0;
/// Cooldown after breeding is this value divided by the reproduction rate.
pub const REPRODUCTION_COOLDOWN_BASE: f32 = 20.0;
pub const OFFSPRING_MUTATION_RATE: f32 = 0.1;
pub const OFFSPRING_MUTATION_STRENGTH: f32 = 0.2;

pub const ENGAGEMENT_RANGE: f64 = 200.0;
pub const ATTACK_COOLDOWN: f64 = 1.0;
pub const ATTACK_DAMAGE_PER_STRENGTH: f32 = 10.0;
pub const ATTACK_ENERGY_COST: f32 = 5.0;
/// Minimum energy for a hostile creature to start a fight.
pub const FIGHT_MIN_ENERGY: f32 = 30.0;
/// Non-peaceful temperaments above this social tendency still seek mates.
pub const SOCIAL_MATING_THRESHOLD: f32 = 1.5;

/// Seconds a dead creature lingers before removal.
pub const DEATH_GRACE_PERIOD: f32 = 2.0;

const STARVATION_HUNGER: f32 = 90.0;
const STARVATION_DAMAGE: f32 = 10.0;
const HEALING_MIN_ENERGY: f32 = 70.0;
const HEALING_MAX_HUNGER: f32 = 30.0;
const HEALING_RATE: f32 = 5.0;
const COMFORTABLE_HEALING_RATE: f32 = 6.0;
const COMFORT_BAND: (f32, f32) = (0.3, 0.8);
const LOW_VISIBILITY: f32 = 0.5;
const LOW_VISIBILITY_DRAIN: f32 = 0.2;

/// Notification queued by a creature for its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum CreatureEvent {
    Died {
        id: CreatureId,
        fitness: f32,
    },
    Reproduced {
        parent_a: CreatureId,
        parent_b: CreatureId,
        position_a: Position,
        position_b: Position,
        offspring: Box<Genome>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterOutcome {
    Attacked,
    Mated,
    Ignored,
}

/// Genome-derived locomotion parameters for the movement layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementProfile {
    pub walk_speed: f32,
    pub fly_speed: Option<f32>,
    pub swim_speed: Option<f32>,
    pub jump_velocity: f32,
    pub mass: f32,
    pub interaction_radius: f32,
}

#[derive(Debug, Clone)]
pub struct Creature {
    pub id: CreatureId,
    pub genome: Genome,
    pub position: Position,
    pub vitals: Vitals,
    pub state: CreatureState,
    pub reproduction_cooldown: f32,
    pub offspring_count: u32,
    pub combat_wins: u32,
    pub resources_gathered: f32,
    pub last_attack_time: Option<f64>,
    /// Remaining grace period once dying.
    pub death_timer: f32,
    events: Vec<CreatureEvent>,
}

pub fn create_creature_with_rng<R: Rng>(genome: Genome, position: Position, rng: &mut R) -> Creature {
    let id = Uuid::from_u128(rng.gen::<u128>());
    Creature::new(id, genome, position)
}

impl Creature {
    #[must_use]
    pub fn new(id: CreatureId, genome: Genome, position: Position) -> Self {
        Self {
            id,
            genome,
            position,
            vitals: Vitals::default(),
            state: CreatureState::Idle,
            reproduction_cooldown: 0.0,
            offspring_count: 0,
            combat_wins: 0,
            resources_gathered: 0.0,
            last_attack_time: None,
            death_timer: 0.0,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state != CreatureState::Dying
    }

    /// Advances metabolism by `dt` under the given environment.
    ///
    /// A dying creature only counts down its removal grace period.
    pub fn update(&mut self, dt: f64, env: &EnvironmentModifiers) {
        let dt = dt as f32;
        if !self.is_alive() {
            self.death_timer = (self.death_timer - dt).max(0.0);
            return;
        }

        let genome = &self.genome;
        let vitals = &mut self.vitals;

        vitals.age += dt * 100.0 / genome.lifespan;

        vitals.energy -= dt * 2.0 / genome.endurance;
        vitals.energy -= (env.temperature - 0.5).abs() * 2.0 * 0.5 * dt;
        if env.visibility < LOW_VISIBILITY {
            vitals.energy -= LOW_VISIBILITY_DRAIN * dt;
        }
        vitals.energy = vitals.energy.max(0.0);

        vitals.hunger = (vitals.hunger + dt * 2.0 / genome.hunger_resistance).min(MAX_VITAL);

        self.reproduction_cooldown = (self.reproduction_cooldown - dt).max(0.0);

        if vitals.energy <= 0.0 || vitals.hunger >= STARVATION_HUNGER {
            vitals.health -= STARVATION_DAMAGE * dt;
        } else if vitals.energy > HEALING_MIN_ENERGY && vitals.hunger < HEALING_MAX_HUNGER {
            let comfortable =
                env.temperature > COMFORT_BAND.0 && env.temperature < COMFORT_BAND.1;
            let rate = if comfortable {
                COMFORTABLE_HEALING_RATE
            } else {
                HEALING_RATE
            };
            vitals.health += rate * dt;
        }
        vitals.health = vitals.health.clamp(0.0, MAX_VITAL);

        if vitals.health <= 0.0 || vitals.age >= genome.lifespan {
            self.die();
        }
    }

    fn die(&mut self) {
        if !self.is_alive() {
            return;
        }
        let fitness = self.fitness();
        self.state = CreatureState::Dying;
        self.death_timer = DEATH_GRACE_PERIOD;
        tracing::debug!(id = %self.id, fitness, age = self.vitals.age, "Creature died");
        self.events.push(CreatureEvent::Died {
            id: self.id,
            fitness,
        });
    }

    #[must_use]
    pub fn life_record(&self) -> LifeRecord {
        LifeRecord {
            age: self.vitals.age,
            offspring: self.offspring_count,
            resources_gathered: self.resources_gathered,
            combat_wins: self.combat_wins,
        }
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.genome.fitness(&self.life_record())
    }

    #[must_use]
    pub fn can_reproduce(&self) -> bool {
        self.is_alive()
            && self.vitals.age >= self.genome.lifespan * MATURITY_FRACTION
            && self.vitals.energy > REPRODUCTION_MIN_ENERGY
            && self.vitals.hunger < REPRODUCTION_MAX_HUNGER
            && self.reproduction_cooldown <= 0.0
            && self.vitals.health > REPRODUCTION_MIN_HEALTH
    }

    /// Breeds with `mate` if both are eligible, queuing one reproduction event.
    pub fn attempt_reproduction<R: Rng>(&mut self, mate: &mut Creature, rng: &mut R) -> bool {
        if !self.can_reproduce() || !mate.can_reproduce() {
            return false;
        }

        let offspring = self.genome.offspring_with_rng(
            &mate.genome,
            OFFSPRING_MUTATION_RATE,
            OFFSPRING_MUTATION_STRENGTH,
            rng,
        );

        self.events.push(CreatureEvent::Reproduced {
            parent_a: self.id,
            parent_b: mate.id,
            position_a: self.position,
            position_b: mate.position,
            offspring: Box::new(offspring),
        });

        for parent in [&mut *self, mate] {
            parent.vitals.energy = (parent.vitals.energy - REPRODUCTION_ENERGY_COST).max(0.0);
            parent.reproduction_cooldown =
                REPRODUCTION_COOLDOWN_BASE / parent.genome.reproduction_rate;
            parent.offspring_count += 1;
        }
        true
    }

    /// Applies `amount` scaled by damage resistance. Returns `true` if the hit was fatal.
    pub fn take_damage(&mut self, amount: f32, attacker: Option<&mut Creature>) -> bool {
        if !self.is_alive() {
            return false;
        }
        let actual = amount.max(0.0) / self.genome.damage_resistance;
        self.vitals.health = (self.vitals.health - actual).max(0.0);
        if self.vitals.health > 0.0 {
            return false;
        }
        if let Some(attacker) = attacker {
            attacker.combat_wins += 1;
        }
        self.die();
        true
    }

    pub fn consume_food(&mut self, value: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        let value = value.max(0.0);
        self.vitals.energy = (self.vitals.energy + value).min(MAX_VITAL);
        self.vitals.hunger = (self.vitals.hunger - value * 0.5).max(0.0);
        self.resources_gathered += value;
        true
    }

    /// Strikes `target` if it is alive, in range and the cooldown has elapsed.
    pub fn attack(&mut self, target: &mut Creature, now: f64) -> bool {
        if !self.is_alive() || !target.is_alive() {
            return false;
        }
        if self.position.distance_to(&target.position) > ENGAGEMENT_RANGE {
            return false;
        }
        if self
            .last_attack_time
            .is_some_and(|last| now - last < ATTACK_COOLDOWN)
        {
            return false;
        }

        let damage = self.genome.strength * ATTACK_DAMAGE_PER_STRENGTH;
        target.take_damage(damage, Some(&mut *self));
        self.vitals.energy = (self.vitals.energy - ATTACK_ENERGY_COST).max(0.0);
        self.last_attack_time = Some(now);
        true
    }

    /// Reacts to meeting `other` according to this creature's temperament.
    pub fn resolve_encounter<R: Rng>(
        &mut self,
        other: &mut Creature,
        now: f64,
        rng: &mut R,
    ) -> EncounterOutcome {
        if !self.is_alive() || !other.is_alive() {
            return EncounterOutcome::Ignored;
        }

        if self.genome.aggression_level.is_hostile() {
            if self.state != CreatureState::Mating && self.vitals.energy > FIGHT_MIN_ENERGY {
                self.state = CreatureState::Fighting;
                if self.attack(other, now) {
                    return EncounterOutcome::Attacked;
                }
            }
            return EncounterOutcome::Ignored;
        }

        let willing = self.genome.aggression_level == AggressionLevel::Peaceful
            || self.genome.social_tendency > SOCIAL_MATING_THRESHOLD;
        if willing && self.can_reproduce() && other.can_reproduce() {
            self.state = CreatureState::Mating;
            if self.attempt_reproduction(other, rng) {
                return EncounterOutcome::Mated;
            }
        }
        EncounterOutcome::Ignored
    }

    /// Eats every active resource within `radius`. Returns the nutrient value gained.
    pub fn forage(&mut self, field: &mut ResourceField, radius: f64) -> f64 {
        if !self.is_alive() {
            return 0.0;
        }
        let gained = field.consume(self.position, radius);
        if gained > 0.0 {
            self.consume_food(gained as f32);
            self.state = CreatureState::Feeding;
        }
        gained
    }

    /// Sets the behavioral state; refused once dying.
    pub fn set_state(&mut self, state: CreatureState) -> bool {
        if !self.is_alive() || state == CreatureState::Dying {
            return false;
        }
        self.state = state;
        true
    }

    #[must_use]
    pub fn movement_profile(&self, env: &EnvironmentModifiers) -> MovementProfile {
        let g = &self.genome;
        let m = env.movement;
        MovementProfile {
            walk_speed: g.speed * 200.0 * m,
            fly_speed: (g.movement_type == MovementType::Flyer).then(|| g.speed * 300.0 * m),
            swim_speed: (g.movement_type == MovementType::Swimmer).then(|| g.speed * 250.0 * m),
            jump_velocity: if g.movement_type == MovementType::Jumper {
                g.strength * 600.0
            } else {
                g.strength * 400.0
            },
            mass: g.size * 100.0,
            interaction_radius: g.size * 100.0,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            id: self.id,
            position: self.position,
            state: self.state,
            energy: self.vitals.energy,
            hunger: self.vitals.hunger,
            health: self.vitals.health,
            age: self.vitals.age,
            can_reproduce: self.can_reproduce(),
        }
    }

    /// Dying creature whose grace period has elapsed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        !self.is_alive() && self.death_timer <= 0.0
    }

    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn drain_events(&mut self) -> Vec<CreatureEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn env() -> EnvironmentModifiers {
        EnvironmentModifiers::default()
    }

    fn creature(genome: Genome) -> Creature {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        create_creature_with_rng(genome, Position::ORIGIN, &mut rng)
    }

    /// Adult, fed and rested: eligible to breed with the default genome.
    fn breeder(seed: u64) -> Creature {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut c = create_creature_with_rng(Genome::default(), Position::ORIGIN, &mut rng);
        c.vitals.age = 10.0;
        c
    }

    #[test]
    fn test_newborn_defaults() {
        let c = creature(Genome::default());
        assert_eq!(c.vitals.energy, 100.0);
        assert_eq!(c.vitals.hunger, 0.0);
        assert_eq!(c.vitals.health, 100.0);
        assert_eq!(c.state, CreatureState::Idle);
        assert!(c.last_attack_time.is_none());
    }

    #[test]
    fn test_metabolism_in_neutral_environment() {
        let mut c = creature(Genome {
            endurance: 2.0,
            hunger_resistance: 0.5,
            ..Genome::default()
        });
        c.update(1.0, &env());
        // 100 / 30 age, 2 / 2 energy, 2 / 0.5 hunger
        assert!((c.vitals.age - 100.0 / 30.0).abs() < 1e-4);
        assert!((c.vitals.energy - 99.0).abs() < 1e-4);
        assert!((c.vitals.hunger - 4.0).abs() < 1e-4);
        // Healthy and comfortable but already at full health.
        assert_eq!(c.vitals.health, 100.0);
    }

    #[test]
    fn test_temperature_and_visibility_drain() {
        let mut c = creature(Genome::default());
        let harsh = EnvironmentModifiers {
            temperature: 0.1,
            visibility: 0.3,
            movement: 1.0,
        };
        c.update(1.0, &harsh);
        // 2 base + 0.4 cold + 0.2 darkness
        assert!((c.vitals.energy - 97.4).abs() < 1e-4);
    }

    #[test]
    fn test_healing_is_faster_when_comfortable() {
        let mut comfy = creature(Genome::default());
        comfy.vitals.health = 50.0;
        comfy.update(1.0, &env());
        assert!((comfy.vitals.health - 56.0).abs() < 1e-4);

        let mut cold = creature(Genome::default());
        cold.vitals.health = 50.0;
        cold.update(
            1.0,
            &EnvironmentModifiers {
                temperature: 0.2,
                ..env()
            },
        );
        assert!((cold.vitals.health - 55.0).abs() < 1e-4);
    }

    #[test]
    fn test_starvation_damages_health() {
        let mut c = creature(Genome::default());
        c.vitals.hunger = 95.0;
        c.update(1.0, &env());
        assert!((c.vitals.health - 90.0).abs() < 1e-4);
        assert!((c.vitals.hunger - 97.0).abs() < 1e-4);
        c.update(5.0, &env());
        assert_eq!(c.vitals.hunger, 100.0);

        let mut exhausted = creature(Genome::default());
        exhausted.vitals.energy = 0.5;
        exhausted.update(1.0, &env());
        assert_eq!(exhausted.vitals.energy, 0.0);
        assert!((exhausted.vitals.health - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_old_age_death_queues_one_event() {
        let mut c = creature(Genome {
            lifespan: 10.0,
            ..Genome::default()
        });
        c.vitals.age = 9.9;
        c.update(0.1, &env());
        assert_eq!(c.state, CreatureState::Dying);
        assert_eq!(c.death_timer, DEATH_GRACE_PERIOD);
        c.update(0.1, &env());
        let events = c.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CreatureEvent::Died { id, fitness } if id == c.id && fitness >= 0.0));
    }

    #[test]
    fn test_dying_creature_only_counts_down() {
        let mut c = creature(Genome::default());
        c.take_damage(1000.0, None);
        let vitals = c.vitals;
        c.update(1.5, &env());
        assert_eq!(c.vitals, vitals);
        assert!(!c.is_expired());
        c.update(0.5, &env());
        assert!(c.is_expired());
    }

    #[test]
    fn test_can_reproduce_guards() {
        let base = breeder(1);
        assert!(base.can_reproduce());

        let mut young = base.clone();
        young.vitals.age = 5.9;
        assert!(!young.can_reproduce());

        let mut tired = base.clone();
        tired.vitals.energy = 50.0;
        assert!(!tired.can_reproduce());

        let mut hungry = base.clone();
        hungry.vitals.hunger = 70.0;
        assert!(!hungry.can_reproduce());

        let mut cooling = base.clone();
        cooling.reproduction_cooldown = 0.1;
        assert!(!cooling.can_reproduce());

        let mut hurt = base.clone();
        hurt.vitals.health = 30.0;
        assert!(!hurt.can_reproduce());
    }

    #[test]
    fn test_can_reproduce_boundaries() {
        let base = breeder(1);

        let mut mature = base.clone();
        mature.vitals.age = mature.genome.lifespan * MATURITY_FRACTION;
        assert!(mature.can_reproduce());

        let mut rested = base.clone();
        rested.reproduction_cooldown = 0.0;
        assert!(rested.can_reproduce());

        let mut energy = base.clone();
        energy.vitals.energy = REPRODUCTION_MIN_ENERGY + 0.0001;
        assert!(energy.can_reproduce());
        energy.vitals.energy = REPRODUCTION_MIN_ENERGY;
        assert!(!energy.can_reproduce());

        let mut hunger = base.clone();
        hunger.vitals.hunger = REPRODUCTION_MAX_HUNGER - 0.001;
        assert!(hunger.can_reproduce());
        hunger.vitals.hunger = REPRODUCTION_MAX_HUNGER;
        assert!(!hunger.can_reproduce());

        let mut health = base.clone();
        health.vitals.health = REPRODUCTION_MIN_HEALTH + 0.0001;
        assert!(health.can_reproduce());
        health.vitals.health = REPRODUCTION_MIN_HEALTH;
        assert!(!health.can_reproduce());
    }

    #[test]
    fn test_successful_reproduction() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut a = breeder(3);
        let mut b = breeder(4);
        b.genome.reproduction_rate = 0.5;

        assert!(a.attempt_reproduction(&mut b, &mut rng));
        assert_eq!(a.vitals.energy, 70.0);
        assert_eq!(b.vitals.energy, 70.0);
        assert!((a.reproduction_cooldown - 200.0).abs() < 1e-3);
        assert!((b.reproduction_cooldown - 40.0).abs() < 1e-3);
        assert_eq!(a.offspring_count, 1);
        assert_eq!(b.offspring_count, 1);

        let events = a.drain_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            CreatureEvent::Reproduced {
                parent_a,
                parent_b,
                offspring,
                ..
            } => {
                assert_eq!(*parent_a, a.id);
                assert_eq!(*parent_b, b.id);
                assert!(offspring.is_within_bounds());
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(!b.has_events());

        // Cooldown now blocks a second attempt.
        assert!(!a.attempt_reproduction(&mut b, &mut rng));
    }

    #[test]
    fn test_ineligible_mate_changes_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut a = breeder(5);
        let mut b = breeder(6);
        b.vitals.hunger = 80.0;
        assert!(!a.attempt_reproduction(&mut b, &mut rng));
        assert_eq!(a.vitals.energy, 100.0);
        assert_eq!(a.offspring_count, 0);
        assert!(!a.has_events());
    }

    #[test]
    fn test_fatal_damage_credits_attacker() {
        let mut victim = creature(Genome::default());
        let mut attacker = breeder(7);
        victim.vitals.health = 5.0;
        assert!(victim.take_damage(10.0, Some(&mut attacker)));
        assert_eq!(victim.vitals.health, 0.0);
        assert_eq!(attacker.combat_wins, 1);
        assert_eq!(victim.drain_events().len(), 1);

        // Further hits on a corpse do nothing.
        assert!(!victim.take_damage(10.0, Some(&mut attacker)));
        assert_eq!(attacker.combat_wins, 1);
        assert!(!victim.has_events());
    }

    #[test]
    fn test_damage_resistance_scales_damage() {
        let mut c = creature(Genome {
            damage_resistance: 2.0,
            ..Genome::default()
        });
        c.take_damage(30.0, None);
        assert!((c.vitals.health - 85.0).abs() < 1e-4);
    }

    #[test]
    fn test_attack_range_and_cooldown() {
        let mut attacker = creature(Genome {
            strength: 2.0,
            ..Genome::default()
        });
        let mut target = breeder(9);
        target.position = Position::new(150.0, 0.0);

        assert!(attacker.attack(&mut target, 10.0));
        assert_eq!(target.vitals.health, 80.0);
        assert_eq!(attacker.vitals.energy, 95.0);

        assert!(!attacker.attack(&mut target, 10.5));
        assert!(attacker.attack(&mut target, 11.0));
        assert_eq!(target.vitals.health, 60.0);

        target.position = Position::new(201.0, 0.0);
        assert!(!attacker.attack(&mut target, 20.0));
        assert_eq!(target.vitals.health, 60.0);
    }

    #[test]
    fn test_consume_food_caps() {
        let mut c = creature(Genome::default());
        c.vitals.energy = 90.0;
        c.vitals.hunger = 10.0;
        assert!(c.consume_food(40.0));
        assert_eq!(c.vitals.energy, 100.0);
        assert_eq!(c.vitals.hunger, 0.0);
        assert_eq!(c.resources_gathered, 40.0);

        c.take_damage(1000.0, None);
        assert!(!c.consume_food(10.0));
        assert_eq!(c.resources_gathered, 40.0);
    }

    #[test]
    fn test_hostile_encounter_attacks() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut hunter = creature(Genome {
            aggression_level: AggressionLevel::Predatory,
            ..Genome::default()
        });
        let mut prey = breeder(11);
        assert_eq!(
            hunter.resolve_encounter(&mut prey, 0.0, &mut rng),
            EncounterOutcome::Attacked
        );
        assert_eq!(hunter.state, CreatureState::Fighting);
        assert_eq!(prey.vitals.health, 90.0);

        hunter.vitals.energy = 20.0;
        assert_eq!(
            hunter.resolve_encounter(&mut prey, 5.0, &mut rng),
            EncounterOutcome::Ignored
        );
    }

    #[test]
    fn test_peaceful_encounter_mates() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut a = breeder(12);
        let mut b = breeder(13);
        assert_eq!(
            a.resolve_encounter(&mut b, 0.0, &mut rng),
            EncounterOutcome::Mated
        );
        assert_eq!(a.state, CreatureState::Mating);
    }

    #[test]
    fn test_defensive_needs_social_tendency() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut a = breeder(14);
        a.genome.aggression_level = AggressionLevel::Defensive;
        let mut b = breeder(15);
        assert_eq!(
            a.resolve_encounter(&mut b, 0.0, &mut rng),
            EncounterOutcome::Ignored
        );
        a.genome.social_tendency = 1.8;
        assert_eq!(
            a.resolve_encounter(&mut b, 0.0, &mut rng),
            EncounterOutcome::Mated
        );
    }

    #[test]
    fn test_set_state_refused_when_dying() {
        let mut c = creature(Genome::default());
        assert!(c.set_state(CreatureState::Wandering));
        assert!(!c.set_state(CreatureState::Dying));
        c.take_damage(1000.0, None);
        assert!(!c.set_state(CreatureState::Idle));
        assert_eq!(c.state, CreatureState::Dying);
    }

    #[test]
    fn test_movement_profile() {
        let c = creature(Genome {
            speed: 2.0,
            movement_type: MovementType::Flyer,
            ..Genome::default()
        });
        let profile = c.movement_profile(&EnvironmentModifiers {
            movement: 0.5,
            ..env()
        });
        assert_eq!(profile.walk_speed, 200.0);
        assert_eq!(profile.fly_speed, Some(300.0));
        assert_eq!(profile.swim_speed, None);
        assert_eq!(profile.interaction_radius, 100.0);
    }
}
