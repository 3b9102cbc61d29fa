use crate::lifecycle::Creature;
use rayon::prelude::*;
use terrarium_data::PopulationStats;

/// Recomputes `stats` over the live creatures.
///
/// Leaves `stats` untouched when there is nobody to measure.
pub fn update_population_stats(stats: &mut PopulationStats, creatures: &[Creature], generation: u32) {
    if creatures.is_empty() {
        return;
    }

    let fitness: Vec<f32> = creatures.par_iter().map(Creature::fitness).collect();

    stats.total_population = creatures.len();
    stats.generation = generation;
    stats.average_fitness = fitness.iter().sum::<f32>() / fitness.len() as f32;

    let best = fitness
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &f)| match best {
            Some((_, bf)) if bf >= f => best,
            _ => Some((i, f)),
        });
    stats.max_fitness = best.map_or(0.0, |(_, f)| f);
    stats.dominant_genome = best.map(|(i, _)| creatures[i].genome.clone());

    stats.movement_distribution.clear();
    stats.aggression_distribution.clear();
    for c in creatures {
        *stats
            .movement_distribution
            .entry(c.genome.movement_type)
            .or_insert(0) += 1;
        *stats
            .aggression_distribution
            .entry(c.genome.aggression_level)
            .or_insert(0) += 1;
    }
}
