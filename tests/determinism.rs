mod common;

use common::WorldBuilder;
use terrarium_lib::model::config::AppConfig;
use terrarium_lib::model::world::World;

fn seeded_world(seed: u64) -> World {
    let mut config = AppConfig::default();
    config.world.seed = Some(seed);
    config.population.initial_population = 30;
    config.population.generation_time_limit = 5.0;
    config.weather.change_interval = 2.0;
    World::new(config).unwrap()
}

fn run(world: &mut World, ticks: usize) -> usize {
    (0..ticks).map(|_| world.update(0.1).unwrap().len()).sum()
}

#[test]
fn test_same_seed_same_world() {
    let mut world1 = seeded_world(12345);
    let mut world2 = seeded_world(12345);

    let events1 = run(&mut world1, 120);
    let events2 = run(&mut world2, 120);
    assert_eq!(events1, events2);

    assert_eq!(world1.generation(), world2.generation());
    assert!(world1.generation() >= 1);
    assert_eq!(world1.current_weather(), world2.current_weather());
    assert_eq!(world1.stats(), world2.stats());
    assert_eq!(
        world1.population.population(),
        world2.population.population(),
        "Population counts should match"
    );

    for (i, (c1, c2)) in world1
        .population
        .creatures()
        .iter()
        .zip(world2.population.creatures())
        .enumerate()
    {
        assert_eq!(c1.id, c2.id, "Creature IDs should match at index {}", i);
        assert_eq!(c1.genome, c2.genome, "Genomes should match at index {}", i);
        assert_eq!(c1.position, c2.position, "Positions should match at index {}", i);
        assert_eq!(c1.vitals, c2.vitals, "Vitals should match at index {}", i);
    }

    let r1: Vec<_> = world1.resources.instances().iter().map(|r| r.position).collect();
    let r2: Vec<_> = world2.resources.instances().iter().map(|r| r.position).collect();
    assert_eq!(r1, r2);
}

#[test]
fn test_different_seeds_diverge() {
    let world1 = seeded_world(1);
    let world2 = seeded_world(2);
    let g1: Vec<_> = world1.population.creatures().iter().map(|c| &c.genome).collect();
    let g2: Vec<_> = world2.population.creatures().iter().map(|c| &c.genome).collect();
    assert_ne!(g1, g2);
}

#[test]
fn test_reset_replays_seeded_start() {
    let mut world = WorldBuilder::new().with_seed(99).with_population(10).build();
    let before: Vec<_> = world
        .resources
        .instances()
        .iter()
        .map(|r| r.position)
        .collect();
    world.update(0.1).unwrap();
    world.reset().unwrap();
    assert_eq!(world.population.population(), 10);
    assert_eq!(world.resources.len(), before.len());
    assert_eq!(world.tick, 0);
}
