//! Initial states fed to the measurement engine.
//!
//! The GHZ preparation follows the circuit used by the protocol: H on qubit 0,
//! then a CNOT chain 0→1→…→n−1, applied to the amplitude vector of |0…0⟩
//! before taking the outer product.

use num_complex::Complex;
use num_traits::Zero;
use std::f64::consts::FRAC_1_SQRT_2;

use crate::basis::Basis;
use crate::density::DensityMatrix;
use crate::error::MeasurementError;

fn bit_of(index: usize, qubit: usize, num_qubits: usize) -> usize {
    (index >> (num_qubits - 1 - qubit)) & 1
}

fn hadamard(amps: &mut [Complex<f64>], qubit: usize, num_qubits: usize) {
    let mask = 1 << (num_qubits - 1 - qubit);
    for i in 0..amps.len() {
        if i & mask == 0 {
            let (a, b) = (amps[i], amps[i | mask]);
            amps[i] = (a + b) * FRAC_1_SQRT_2;
            amps[i | mask] = (a - b) * FRAC_1_SQRT_2;
        }
    }
}

fn cnot(amps: &mut [Complex<f64>], control: usize, target: usize, num_qubits: usize) {
    let mask = 1 << (num_qubits - 1 - target);
    for i in 0..amps.len() {
        if bit_of(i, control, num_qubits) == 1 && i & mask == 0 {
            amps.swap(i, i | mask);
        }
    }
}

/// n-qubit GHZ state (|0…0⟩ + |1…1⟩)/√2 as a density matrix.
pub fn ghz(num_qubits: usize) -> Result<DensityMatrix, MeasurementError> {
    if num_qubits == 0 {
        return Err(MeasurementError::DimensionError(1));
    }
    let dim = 1usize << num_qubits;
    let mut amps = vec![Complex::zero(); dim];
    amps[0] = Complex::new(1.0, 0.0);

    hadamard(&mut amps, 0, num_qubits);
    for q in 0..num_qubits - 1 {
        cnot(&mut amps, q, q + 1, num_qubits);
    }
    DensityMatrix::from_pure_state(&amps)
}

/// +1 eigenstate of `basis` on one qubit.
pub fn plus_state(basis: Basis) -> DensityMatrix {
    basis.projectors().0.matrix()
}

/// −1 eigenstate of `basis` on one qubit.
pub fn minus_state(basis: Basis) -> DensityMatrix {
    basis.projectors().1.matrix()
}

/// I / 2^n.
pub fn maximally_mixed(num_qubits: usize) -> DensityMatrix {
    let dim = 1usize << num_qubits;
    DensityMatrix::identity(dim).scale(1.0 / dim as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::TOLERANCE;

    #[test]
    fn ghz_has_only_corner_entries() {
        let rho = ghz(3).unwrap();
        assert_eq!(rho.dim(), 8);
        for (i, j) in [(0, 0), (0, 7), (7, 0), (7, 7)] {
            assert!((rho.get(i, j).re - 0.5).abs() < TOLERANCE, "ρ[{}][{}] = {:?}", i, j, rho.get(i, j));
        }
        let off: f64 = (1..7).map(|k| rho.get(k, k).norm()).sum();
        assert!(off < TOLERANCE);
        assert!((rho.purity() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn ghz_reduced_pair_is_classically_correlated() {
        let pair = ghz(3).unwrap().partial_trace(0).unwrap();
        // ½(|00⟩⟨00| + |11⟩⟨11|)
        assert!((pair.get(0, 0).re - 0.5).abs() < TOLERANCE);
        assert!((pair.get(3, 3).re - 0.5).abs() < TOLERANCE);
        assert!(pair.get(0, 3).norm() < TOLERANCE);
    }

    #[test]
    fn ghz_of_zero_qubits_is_rejected() {
        assert!(ghz(0).is_err());
    }

    #[test]
    fn mixed_state_has_minimal_purity() {
        let rho = maximally_mixed(2);
        assert!((rho.trace().re - 1.0).abs() < TOLERANCE);
        assert!((rho.purity() - 0.25).abs() < TOLERANCE);
    }
}
