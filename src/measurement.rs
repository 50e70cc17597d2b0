//! Projective single-qubit measurement on a density matrix.
//!
//! One call projects onto the ± eigenspaces of the chosen basis, samples an
//! outcome by the Born rule, renormalizes the collapsed state and traces the
//! measured qubit out:
//!
//! ```text
//! p±   = Re Tr(M± ρ M±†)
//! ρ'   = M± ρ M±† / p±          (zero matrix when p± = 0)
//! ρout = Tr_q(ρ')               (dimension halves)
//! ```
//!
//! Randomness is always supplied by the caller, so independent trajectories
//! can be seeded and run in parallel.

use log::{debug, warn};
use rand::Rng;

use crate::basis::Basis;
use crate::density::DensityMatrix;
use crate::error::MeasurementError;

/// Result of one measurement call.
#[derive(Debug, Clone)]
pub struct MeasurementOutcome {
    /// 0 for the +1 eigenvalue, 1 for −1.
    pub bit: u8,
    /// Born probability of the sampled outcome.
    pub probability: f64,
    /// Post-measurement state with the measured qubit removed.
    pub state: DensityMatrix,
}

impl MeasurementOutcome {
    /// True when the sampled branch had zero probability and `state` is the
    /// all-zero placeholder rather than a physical state.
    pub fn is_degenerate(&self) -> bool {
        self.probability <= 0.0
    }
}

fn check_dimension(rho: &DensityMatrix) -> Result<usize, MeasurementError> {
    let dim = rho.dim();
    if dim < 2 || !dim.is_power_of_two() {
        return Err(MeasurementError::DimensionError(dim));
    }
    Ok(rho.num_qubits())
}

/// Full-space measurement operators (M₊, M₋) for `qubit`.
fn measurement_operators(
    qubit: usize,
    num_qubits: usize,
    basis: Basis,
) -> Result<(DensityMatrix, DensityMatrix), MeasurementError> {
    let (plus, minus) = basis.projectors();
    Ok((plus.embed(qubit, num_qubits)?, minus.embed(qubit, num_qubits)?))
}

/// Born probabilities (p₊, p₋) of measuring `qubit` in `basis`, without sampling.
pub fn outcome_probabilities(
    rho: &DensityMatrix,
    qubit: usize,
    basis: Basis,
) -> Result<(f64, f64), MeasurementError> {
    let n = check_dimension(rho)?;
    let (m_plus, m_minus) = measurement_operators(qubit, n, basis)?;
    Ok((
        rho.sandwich(&m_plus).trace().re,
        rho.sandwich(&m_minus).trace().re,
    ))
}

/// Measure the leading qubit of `rho` in `basis`.
pub fn measure<R: Rng>(
    rho: &DensityMatrix,
    basis: Basis,
    rng: &mut R,
) -> Result<MeasurementOutcome, MeasurementError> {
    measure_qubit(rho, 0, basis, rng)
}

/// Measure qubit `qubit` of `rho` in `basis` and trace it out.
///
/// Consumes exactly one `f64` draw from `rng`.
pub fn measure_qubit<R: Rng>(
    rho: &DensityMatrix,
    qubit: usize,
    basis: Basis,
    rng: &mut R,
) -> Result<MeasurementOutcome, MeasurementError> {
    let n = check_dimension(rho)?;
    let (m_plus, m_minus) = measurement_operators(qubit, n, basis)?;

    let projected_plus = rho.sandwich(&m_plus);
    let projected_minus = rho.sandwich(&m_minus);
    let p_plus = projected_plus.trace().re;
    let p_minus = projected_minus.trace().re;

    // Rounding can push a probability slightly negative; it gets no weight.
    let w_plus = p_plus.max(0.0);
    let w_minus = p_minus.max(0.0);
    let r: f64 = rng.gen();
    let sampled_plus = r * (w_plus + w_minus) < w_plus;

    let (projected, probability, bit) = if sampled_plus {
        (projected_plus, p_plus, 0u8)
    } else {
        (projected_minus, p_minus, 1u8)
    };

    let collapsed = if probability > 0.0 {
        projected.scale(1.0 / probability)
    } else {
        warn!(
            "sampled zero-probability outcome {} (p+={:.3e}, p-={:.3e}); returning zero state",
            bit, p_plus, p_minus
        );
        DensityMatrix::zeros(rho.dim())
    };

    debug!(
        "measured qubit {} of {} in {:?}: p+={:.6} p-={:.6} -> {}",
        qubit, n, basis, p_plus, p_minus, bit
    );

    Ok(MeasurementOutcome {
        bit,
        probability,
        state: collapsed.partial_trace(qubit)?,
    })
}
