use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use terrarium_data::Genome;
use terrarium_lib::model::genetics::{GenomeLogic, LifeRecord};

prop_compose! {
    fn arb_genome()(seed in any::<u64>()) -> Genome {
        Genome::new_random_with_rng(&mut ChaCha8Rng::seed_from_u64(seed))
    }
}

prop_compose! {
    fn arb_record()(
        age in 0.0f32..100.0,
        offspring in 0u32..50,
        resources_gathered in 0.0f32..5000.0,
        combat_wins in 0u32..50
    ) -> LifeRecord {
        LifeRecord { age, offspring, resources_gathered, combat_wins }
    }
}

proptest! {
    #[test]
    fn mutation_keeps_traits_in_bounds(
        mut genome in arb_genome(),
        rate in 0.0f32..=1.0,
        strength in 0.0f32..2000.0,
        seed in any::<u64>()
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..5 {
            genome.mutate_with_rng(rate, strength, &mut rng);
        }
        prop_assert!(genome.is_within_bounds());
    }

    #[test]
    fn crossover_copies_each_trait_from_a_parent(
        a in arb_genome(),
        b in arb_genome(),
        seed in any::<u64>()
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let child = a.crossover_with_rng(&b, &mut rng);

        let traits = child.numeric_traits();
        let from_a = a.numeric_traits();
        let from_b = b.numeric_traits();
        for i in 0..traits.len() {
            prop_assert!(traits[i].1 == from_a[i].1 || traits[i].1 == from_b[i].1, "{}", traits[i].0);
        }
        prop_assert!(child.movement_type == a.movement_type || child.movement_type == b.movement_type);
        prop_assert!(child.aggression_level == a.aggression_level || child.aggression_level == b.aggression_level);
        prop_assert!(child.primary_color == a.primary_color || child.primary_color == b.primary_color);
    }

    #[test]
    fn fitness_is_non_negative_and_monotone(genome in arb_genome(), record in arb_record()) {
        let base = genome.fitness(&record);
        prop_assert!(base >= 0.0);

        let more_offspring = LifeRecord { offspring: record.offspring + 1, ..record };
        let more_food = LifeRecord { resources_gathered: record.resources_gathered + 100.0, ..record };
        let more_wins = LifeRecord { combat_wins: record.combat_wins + 1, ..record };
        let older = LifeRecord { age: (record.age + 1.0).min(genome.lifespan), ..record };

        prop_assert!(genome.fitness(&more_offspring) >= base);
        prop_assert!(genome.fitness(&more_food) >= base);
        prop_assert!(genome.fitness(&more_wins) >= base);
        prop_assert!(genome.fitness(&older) >= base || record.age > genome.lifespan);
    }

    #[test]
    fn hex_encoding_restores_genome(genome in arb_genome()) {
        let restored = Genome::from_hex(&genome.to_hex()).unwrap();
        prop_assert_eq!(restored, genome);
    }
}

#[test]
fn crossover_is_roughly_fair() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let a = Genome {
        speed: 1.0,
        ..Genome::default()
    };
    let b = Genome {
        speed: 9.0,
        ..Genome::default()
    };
    let trials = 4000;
    let from_a = (0..trials)
        .filter(|_| a.crossover_with_rng(&b, &mut rng).speed == 1.0)
        .count();
    let share = from_a as f64 / trials as f64;
    assert!((0.45..=0.55).contains(&share), "share from first parent: {share}");
}
