use terrarium_data::{CreatureId, Genome, Position};
use terrarium_lib::model::config::AppConfig;
use terrarium_lib::model::lifecycle::Creature;
use terrarium_lib::model::world::World;

/// Factory that pins every lifespan to 100 so creatures outlive short tests.
#[allow(dead_code)]
pub fn long_lived(id: CreatureId, genome: Genome, position: Position) -> Creature {
    let mut creature = Creature::new(id, genome, position);
    creature.genome.lifespan = 100.0;
    creature
}

#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    long_lived: bool,
    creatures: Vec<(Genome, Position)>,
}

#[allow(dead_code)]
impl WorldBuilder {
    /// Empty, static world: no initial creatures, no automatic generation
    /// advance, no random weather and a frozen clock.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.population.initial_population = 0;
        config.population.min_population = 0;
        config.population.auto_generation_advance = false;
        config.weather.dynamic_weather = false;
        config.weather.dynamic_time_of_day = false;
        Self {
            config,
            long_lived: false,
            creatures: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_population(mut self, initial: usize) -> Self {
        self.config.population.initial_population = initial;
        self
    }

    pub fn long_lived(mut self) -> Self {
        self.long_lived = true;
        self
    }

    pub fn with_creature(mut self, genome: Genome, position: Position) -> Self {
        self.creatures.push((genome, position));
        self
    }

    pub fn build(self) -> World {
        let mut world = if self.long_lived {
            World::with_factory(self.config, long_lived)
        } else {
            World::new(self.config)
        }
        .expect("Failed to create world in test builder");

        for (genome, position) in self.creatures {
            world
                .population
                .spawn_creature(genome, Some(position))
                .expect("Failed to spawn creature in test builder");
        }
        world
    }
}

/// Id of the `index`-th live creature.
#[allow(dead_code)]
pub fn creature_id(world: &World, index: usize) -> CreatureId {
    world.population.creatures()[index].id
}
