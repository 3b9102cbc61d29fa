use anyhow::Result;
use clap::Parser;
use terrarium_lib::model::config::AppConfig;
use terrarium_lib::model::metrics::init_logging;
use terrarium_lib::model::world::World;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 36_000)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f64,

    /// Seed overriding the configured one
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory receiving the JSONL event log
    #[arg(short, long)]
    events: Option<String>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    anyhow::ensure!(args.dt > 0.0, "--dt must be positive");

    let mut config = AppConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }

    let mut world = match args.events.as_deref() {
        Some(dir) => World::new_at(config, dir)?,
        None => World::new(config)?,
    };

    for _ in 0..args.ticks {
        world.update(args.dt)?;
    }

    world.population.log_generation_summary();
    tracing::info!(
        ticks = world.tick,
        simulated_seconds = format!("{:.1}", world.elapsed),
        generation = world.generation(),
        population = world.population.population(),
        deaths = world.metrics.counter("death"),
        births = world.metrics.counter("reproduction"),
        wall_ms = world.metrics.elapsed().as_millis() as u64,
        "Simulation finished"
    );
    Ok(())
}
