//! # ghz_coloring
//!
//! Simulation and verification of a three-party GHZ measurement protocol used
//! for distributed coloring.
//!
//! Two pieces do the work:
//!
//! - a density-matrix measurement engine that projects a mixed state onto the
//!   eigenbasis of a single-qubit X or Y observable, samples an outcome,
//!   collapses the state and traces the measured qubit out;
//! - a transcript verifier that checks the per-round, per-color parity rules
//!   over the parties' outcome bit strings.
//!
//! ## Usage
//!
//! ```no_run
//! use ghz_coloring::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let rho = ghz(3).unwrap();
//! let first = measure(&rho, Basis::X, &mut rng).unwrap();
//! println!("bit {} with p = {}", first.bit, first.probability);
//!
//! let result = estimate_pass_rate(&SimulationConfig::default()).unwrap();
//! println!("pass rate: {}", result.pass_rate);
//! ```

pub mod basis;
pub mod density;
pub mod error;
pub mod measurement;
pub mod protocol;
pub mod state;
pub mod transcript;

pub mod prelude {
    pub use crate::basis::*;
    pub use crate::density::*;
    pub use crate::error::*;
    pub use crate::measurement::*;
    pub use crate::protocol::*;
    pub use crate::state::*;
    pub use crate::transcript::*;
}
