//! Demo driver: simulates transcripts and reports how often they verify.
//!
//! Settings come from the environment: `GHZ_COLORS`, `GHZ_TRIALS`, `GHZ_SEED`.
//! Logging is controlled by `RUST_LOG`.

use std::error::Error;

use ghz_coloring::prelude::*;

fn env_override<T: std::str::FromStr>(name: &str, default: T) -> Result<T, SimulationError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SimulationError::InvalidConfig(format!("{}={:?} is not a valid value", name, raw))),
        Err(_) => Ok(default),
    }
}

fn load_config() -> Result<SimulationConfig, SimulationError> {
    let defaults = SimulationConfig::default();
    let config = SimulationConfig {
        number_of_colors: env_override("GHZ_COLORS", defaults.number_of_colors)?,
        trials: env_override("GHZ_TRIALS", defaults.trials)?,
        seed: env_override("GHZ_SEED", defaults.seed)?,
        ..defaults
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let config = load_config()?;

    println!("━━━ GHZ coloring protocol ━━━");
    println!();
    println!("  Colors / rounds:  {}", config.number_of_colors);
    println!("  Trials:           {}", config.trials);
    println!("  Base seed:        {}", config.seed);
    println!();

    // One sample transcript, shown in full
    let transcript = simulate_transcript(&config, config.seed)?;
    println!("  Sample transcript (seed {}):", config.seed);
    for (r, round) in transcript.rounds().iter().enumerate() {
        println!("    round {}: s={:?} t={:?} u={:?}", r, round.s, round.t, round.u);
    }
    match transcript.first_violation() {
        None => println!("    -> valid"),
        Some(v) => println!(
            "    -> invalid at round {} color {} (sum {}, previous {:?})",
            v.round, v.color, v.sum_now, v.prev_sum
        ),
    }
    println!();

    println!("  {:>10}  {:>8}  {:>8}  {:>10}", "strategy", "trials", "passed", "rate");
    println!("  {:─>10}  {:─>8}  {:─>8}  {:─>10}", "", "", "", "");
    for (label, strategy) in [
        ("random", BasisStrategy::Random),
        ("XXX", BasisStrategy::AllX),
        ("XYY", BasisStrategy::Fixed([Basis::X, Basis::Y, Basis::Y])),
    ] {
        let run = SimulationConfig {
            basis_strategy: strategy,
            ..config.clone()
        };
        let result = estimate_pass_rate(&run)?;
        println!(
            "  {:>10}  {:>8}  {:>8}  {:>10.4}",
            label, result.trials, result.passes, result.pass_rate
        );
    }

    Ok(())
}
