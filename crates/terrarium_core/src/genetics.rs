//! Genetic operators over [`Genome`].
//!
//! All operators are pure apart from the RNG they are handed, and every one of
//! them leaves numeric traits inside their [`TraitBounds`](terrarium_data::TraitBounds).

pub use terrarium_data::{AggressionLevel, Color, Genome, MovementType};
use rand::seq::SliceRandom;
use rand::Rng;

const FITNESS_AGE_WEIGHT: f32 = 100.0;
const FITNESS_OFFSPRING_WEIGHT: f32 = 50.0;
const FITNESS_RESOURCE_WEIGHT: f32 = 0.1;
const FITNESS_COMBAT_WEIGHT: f32 = 25.0;
const FITNESS_SIZE_WEIGHT: f32 = 20.0;
const FITNESS_INTELLIGENCE_WEIGHT: f32 = 15.0;
const FITNESS_ENDURANCE_WEIGHT: f32 = 10.0;

/// Lifetime achievements scored by [`GenomeLogic::fitness`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LifeRecord {
    pub age: f32,
    pub offspring: u32,
    pub resources_gathered: f32,
    pub combat_wins: u32,
}

pub trait GenomeLogic {
    fn new_random_with_rng<R: Rng>(rng: &mut R) -> Self;
    fn mutate_with_rng<R: Rng>(&mut self, rate: f32, strength: f32, rng: &mut R);
    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Self;
    /// Crossover followed by mutation; the single breeding step.
    fn offspring_with_rng<R: Rng>(&self, other: &Self, rate: f32, strength: f32, rng: &mut R) -> Self
    where
        Self: Sized,
    {
        let mut child = self.crossover_with_rng(other, rng);
        child.mutate_with_rng(rate, strength, rng);
        child
    }
    fn fitness(&self, record: &LifeRecord) -> f32;
    fn to_hex(&self) -> String;
    fn from_hex(hex_str: &str) -> anyhow::Result<Self>
    where
        Self: Sized;
}

fn random_color<R: Rng>(rng: &mut R) -> Color {
    Color::rgb(rng.gen(), rng.gen(), rng.gen())
}

fn random_movement<R: Rng>(rng: &mut R) -> MovementType {
    MovementType::ALL
        .choose(rng)
        .copied()
        .unwrap_or_default()
}

fn random_aggression<R: Rng>(rng: &mut R) -> AggressionLevel {
    AggressionLevel::ALL
        .choose(rng)
        .copied()
        .unwrap_or_default()
}

#[inline]
fn pick<T, R: Rng>(rng: &mut R, a: T, b: T) -> T {
    if rng.gen_bool(0.5) {
        a
    } else {
        b
    }
}

impl GenomeLogic for Genome {
    fn new_random_with_rng<R: Rng>(rng: &mut R) -> Self {
        let mut genome = Genome {
            movement_type: random_movement(rng),
            aggression_level: random_aggression(rng),
            primary_color: random_color(rng),
            secondary_color: random_color(rng),
            ..Genome::default()
        };
        for (value, bounds) in genome.numeric_traits_mut() {
            *value = rng.gen_range(bounds.min..=bounds.max);
        }
        genome
    }

    fn mutate_with_rng<R: Rng>(&mut self, rate: f32, strength: f32, rng: &mut R) {
        let rate = f64::from(rate.clamp(0.0, 1.0));
        let strength = strength.abs();

        for (value, bounds) in self.numeric_traits_mut() {
            if rng.gen_bool(rate) {
                let delta = if strength > 0.0 {
                    rng.gen_range(-strength..=strength)
                } else {
                    0.0
                };
                *value = bounds.clamp(*value + delta);
            }
        }

        if rng.gen_bool(rate) {
            self.movement_type = random_movement(rng);
        }
        if rng.gen_bool(rate) {
            self.aggression_level = random_aggression(rng);
        }
        if rng.gen_bool(rate) {
            self.primary_color = random_color(rng);
        }
        if rng.gen_bool(rate) {
            self.secondary_color = random_color(rng);
        }
    }

    fn crossover_with_rng<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        Genome {
            size: pick(rng, self.size, other.size),
            speed: pick(rng, self.speed, other.speed),
            strength: pick(rng, self.strength, other.strength),
            endurance: pick(rng, self.endurance, other.endurance),
            movement_type: pick(rng, self.movement_type, other.movement_type),
            aggression_level: pick(rng, self.aggression_level, other.aggression_level),
            reproduction_rate: pick(rng, self.reproduction_rate, other.reproduction_rate),
            lifespan: pick(rng, self.lifespan, other.lifespan),
            intelligence: pick(rng, self.intelligence, other.intelligence),
            vision_range: pick(rng, self.vision_range, other.vision_range),
            social_tendency: pick(rng, self.social_tendency, other.social_tendency),
            hunger_resistance: pick(rng, self.hunger_resistance, other.hunger_resistance),
            damage_resistance: pick(rng, self.damage_resistance, other.damage_resistance),
            primary_color: pick(rng, self.primary_color, other.primary_color),
            secondary_color: pick(rng, self.secondary_color, other.secondary_color),
        }
    }

    fn fitness(&self, record: &LifeRecord) -> f32 {
        let survival = FITNESS_AGE_WEIGHT * (record.age / self.lifespan);
        let reproduction = FITNESS_OFFSPRING_WEIGHT * record.offspring as f32;
        let gathering = FITNESS_RESOURCE_WEIGHT * record.resources_gathered;
        let combat = FITNESS_COMBAT_WEIGHT * record.combat_wins as f32;
        let body = FITNESS_SIZE_WEIGHT * (1.0 - (self.size - 1.0).abs())
            + FITNESS_INTELLIGENCE_WEIGHT * self.intelligence
            + FITNESS_ENDURANCE_WEIGHT * self.endurance;

        (survival + reproduction + gathering + combat + body).max(0.0)
    }

    fn to_hex(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(bytes)
    }

    fn from_hex(hex_str: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(hex_str)?;
        let genome: Genome = serde_json::from_slice(&bytes)?;
        anyhow::ensure!(genome.is_within_bounds(), "Genome traits out of bounds");
        Ok(genome)
    }
}
