use crate::config::EvolutionConfig;
use crate::genetics::GenomeLogic;
use crate::lifecycle::Creature;
use rand::Rng;
use terrarium_data::Genome;

/// Share of the ranked population that becomes the parent pool.
pub const PARENT_FRACTION: f32 = 0.5;

/// Parent pool size for a population of `population`: half, at least two, at most everyone.
#[must_use]
pub fn parent_count(population: usize) -> usize {
    let half = (population as f32 * PARENT_FRACTION).round() as usize;
    half.max(2).min(population)
}

#[must_use]
pub fn elite_count(parents: usize, elite_percentage: f32) -> usize {
    (parents as f32 * elite_percentage).round() as usize
}

/// Genomes of the fittest live creatures, best first.
///
/// Ties keep the live-set order.
#[must_use]
pub fn select_parents(creatures: &[Creature]) -> Vec<Genome> {
    let mut ranked: Vec<(f32, &Creature)> = creatures
        .iter()
        .filter(|c| c.is_alive())
        .map(|c| (c.fitness(), c))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    let count = parent_count(ranked.len());
    ranked
        .into_iter()
        .take(count)
        .map(|(_, c)| c.genome.clone())
        .collect()
}

/// Builds `target` genomes from `parents` (ranked best first).
///
/// The first `elite_count` genomes are the top parents copied unchanged; the
/// rest are crossover children of two distinct random parents, mutated with
/// the configured rate and strength. A single parent breeds with itself.
pub fn breed_generation<R: Rng>(
    parents: &[Genome],
    target: usize,
    evolution: &EvolutionConfig,
    rng: &mut R,
) -> Vec<Genome> {
    let mut next = Vec::with_capacity(target);
    if parents.is_empty() {
        return next;
    }

    let elites = elite_count(parents.len(), evolution.elite_percentage).min(target);
    next.extend(parents.iter().take(elites).cloned());

    while next.len() < target {
        let first = rng.gen_range(0..parents.len());
        let mut second = rng.gen_range(0..parents.len());
        while parents.len() > 1 && second == first {
            second = rng.gen_range(0..parents.len());
        }
        next.push(parents[first].offspring_with_rng(
            &parents[second],
            evolution.mutation_rate,
            evolution.mutation_strength,
            rng,
        ));
    }
    next
}
