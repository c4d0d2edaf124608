//! Headless flock runner: no window, no pacing, just ticks and log lines.
//!
//! Usage: `headless [config.yaml] [ticks] [log_every]`

use boid_tree::{SimConfig, Simulation};
use std::env;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    let config_path = args.get(1).map(String::as_str).unwrap_or("flock.yaml");

    let ticks: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1_000);

    let log_every: u64 = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(100);

    let config = if Path::new(config_path).exists() {
        match SimConfig::from_file(config_path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}: {}", config_path, e);
                std::process::exit(1);
            }
        }
    } else {
        log::info!("{} not found, using defaults", config_path);
        SimConfig::default()
    };

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Simulation setup failed: {}", e);
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    for _ in 0..ticks {
        if let Err(e) = sim.tick() {
            log::error!("Halting at tick {}: {}", sim.ticks(), e);
            std::process::exit(1);
        }

        if sim.ticks() % log_every == 0 {
            let tree = sim.tree();
            log::info!(
                "tick {:>6} | boids {:>5} | nodes {:>5} | depth {:>2} | polarization {:.3}",
                sim.ticks(),
                sim.population(),
                tree.node_count(),
                tree.depth(),
                sim.polarization()
            );
        }
    }

    let elapsed = start.elapsed();
    log::info!(
        "{} ticks in {:.2?} ({:.1} ticks/s)",
        sim.ticks(),
        elapsed,
        sim.ticks() as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );

    match serde_yaml::to_string(sim.weights()) {
        Ok(weights) => log::info!("Final weights:\n{}", weights),
        Err(e) => log::error!("Failed to serialize weights: {}", e),
    }
}
