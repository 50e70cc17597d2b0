//! Protocol driver: measurement trajectories, transcript simulation and
//! Monte Carlo estimation of the verification pass rate.
//!
//! Each round, for each color, a fresh 3-qubit GHZ state is shared by the
//! parties s, t, u. The parties measure their qubits in order (s holds the
//! leading qubit) and the three outcome bits become `s[c]`, `t[c]`, `u[c]`.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::basis::Basis;
use crate::density::DensityMatrix;
use crate::error::{MeasurementError, SimulationError};
use crate::measurement::{self, MeasurementOutcome};
use crate::state;
use crate::transcript::{Round, Transcript, PARTIES};

/// Seed stride between consecutive trials.
const SEED_STRIDE: u64 = 7919;

/// Per-trajectory context owning its random source.
///
/// Successive measurements thread the reduced state from one call into the
/// next, so a trajectory is inherently sequential; independent trajectories
/// share nothing.
#[derive(Debug, Clone)]
pub struct Trajectory {
    rng: StdRng,
}

impl Trajectory {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Measure the leading qubit of `rho`.
    pub fn measure(&mut self, rho: &DensityMatrix, basis: Basis) -> Result<MeasurementOutcome, MeasurementError> {
        measurement::measure(rho, basis, &mut self.rng)
    }

    /// Measure leading qubits one after another, one basis per qubit,
    /// returning the outcome bits in order.
    pub fn measure_all(&mut self, rho: &DensityMatrix, bases: &[Basis]) -> Result<Vec<u8>, MeasurementError> {
        let mut current = rho.clone();
        let mut bits = Vec::with_capacity(bases.len());
        for &basis in bases {
            let outcome = self.measure(&current, basis)?;
            bits.push(outcome.bit);
            current = outcome.state;
        }
        Ok(bits)
    }

    fn pick_bases(&mut self, strategy: &BasisStrategy) -> [Basis; PARTIES] {
        match *strategy {
            BasisStrategy::AllX => [Basis::X; PARTIES],
            BasisStrategy::Fixed(bases) => bases,
            BasisStrategy::Random => [
                Basis::random(&mut self.rng),
                Basis::random(&mut self.rng),
                Basis::random(&mut self.rng),
            ],
        }
    }
}

/// How the parties choose their measurement bases for each color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisStrategy {
    /// Every party measures X.
    AllX,
    /// Each party picks X or Y uniformly at random, independently per color.
    Random,
    /// The same (s, t, u) bases for every color.
    Fixed([Basis; PARTIES]),
}

/// Configuration for transcript simulation and pass-rate estimation.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Colors per bit string; also the number of rounds.
    pub number_of_colors: usize,
    /// Independent trajectories to run in [`estimate_pass_rate`].
    pub trials: usize,
    /// Base seed; trial k uses `seed + k * 7919`.
    pub seed: u64,
    pub basis_strategy: BasisStrategy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            number_of_colors: 3,
            trials: 100,
            seed: 42,
            basis_strategy: BasisStrategy::Random,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.number_of_colors == 0 {
            return Err(SimulationError::InvalidConfig("number_of_colors must be at least 1".into()));
        }
        if self.trials == 0 {
            return Err(SimulationError::InvalidConfig("trials must be at least 1".into()));
        }
        Ok(())
    }

    /// Seed of trial `trial`.
    pub fn trial_seed(&self, trial: usize) -> u64 {
        self.seed.wrapping_add((trial as u64).wrapping_mul(SEED_STRIDE))
    }
}

/// Simulate one round: one GHZ measurement per color.
pub fn simulate_round(trajectory: &mut Trajectory, config: &SimulationConfig) -> Result<Round, SimulationError> {
    let ghz = state::ghz(PARTIES)?;
    let mut round = Round::default();
    for _ in 0..config.number_of_colors {
        let bases = trajectory.pick_bases(&config.basis_strategy);
        let bits = trajectory.measure_all(&ghz, &bases)?;
        round.s.push(bits[0]);
        round.t.push(bits[1]);
        round.u.push(bits[2]);
    }
    Ok(round)
}

/// Simulate a full transcript of `number_of_colors` rounds from one seed.
pub fn simulate_transcript(config: &SimulationConfig, seed: u64) -> Result<Transcript, SimulationError> {
    config.validate()?;
    let mut trajectory = Trajectory::from_seed(seed);
    let rounds = (0..config.number_of_colors)
        .map(|_| simulate_round(&mut trajectory, config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Transcript::new(rounds, config.number_of_colors)?)
}

/// Result of a Monte Carlo pass-rate experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct PassRateResult {
    pub trials: usize,
    pub passes: usize,
    /// passes / trials
    pub pass_rate: f64,
}

fn run_trial(config: &SimulationConfig, trial: usize) -> Result<bool, SimulationError> {
    let seed = config.trial_seed(trial);
    let transcript = simulate_transcript(config, seed)?;
    let passed = transcript.verify();
    if !passed {
        debug!("trial {} (seed {}) failed at {:?}", trial, seed, transcript.first_violation());
    }
    Ok(passed)
}

/// Run `config.trials` independent transcripts and count how many verify.
pub fn estimate_pass_rate(config: &SimulationConfig) -> Result<PassRateResult, SimulationError> {
    config.validate()?;

    #[cfg(feature = "parallel")]
    let outcomes: Vec<bool> = (0..config.trials)
        .into_par_iter()
        .map(|trial| run_trial(config, trial))
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<bool> = (0..config.trials)
        .map(|trial| run_trial(config, trial))
        .collect::<Result<_, _>>()?;

    let passes = outcomes.iter().filter(|&&p| p).count();
    let result = PassRateResult {
        trials: config.trials,
        passes,
        pass_rate: passes as f64 / config.trials as f64,
    };
    info!(
        "{} colors, {} trials: {} passed ({:.3})",
        config.number_of_colors, result.trials, result.passes, result.pass_rate
    );
    Ok(result)
}
