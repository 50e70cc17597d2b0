//! Single-qubit measurement bases and their eigenprojectors.

use num_complex::Complex;
use rand::Rng;

use crate::density::DensityMatrix;
use crate::error::MeasurementError;

/// Observable a party measures its qubit in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Basis {
    /// Pauli X, eigenvectors (1, ±1)/√2
    X,
    /// Pauli Y, eigenvectors (1, ±i)/√2
    Y,
}

impl Basis {
    /// Map a raw protocol input (0 = X, 1 = Y) to a basis.
    pub fn from_selector(selector: u8) -> Result<Self, MeasurementError> {
        match selector {
            0 => Ok(Basis::X),
            1 => Ok(Basis::Y),
            other => Err(MeasurementError::InvalidBasis(other)),
        }
    }

    pub fn selector(self) -> u8 {
        match self {
            Basis::X => 0,
            Basis::Y => 1,
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            Basis::Y
        } else {
            Basis::X
        }
    }

    /// (+1 eigenvector, −1 eigenvector), both normalized.
    pub fn eigenvectors(self) -> ([Complex<f64>; 2], [Complex<f64>; 2]) {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let one = Complex::new(s, 0.0);
        match self {
            Basis::X => ([one, Complex::new(s, 0.0)], [one, Complex::new(-s, 0.0)]),
            Basis::Y => ([one, Complex::new(0.0, s)], [one, Complex::new(0.0, -s)]),
        }
    }

    /// Eigenprojectors (P₊, P₋) for this observable.
    pub fn projectors(self) -> (Projector, Projector) {
        let (plus, minus) = self.eigenvectors();
        (Projector::outer(plus), Projector::outer(minus))
    }
}

/// Eigenprojectors (P₊, P₋) for a raw basis selector.
pub fn projectors(selector: u8) -> Result<(Projector, Projector), MeasurementError> {
    Basis::from_selector(selector).map(Basis::projectors)
}

/// Rank-1 single-qubit projector stored as [row0col0, row0col1, row1col0, row1col1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector(pub [Complex<f64>; 4]);

impl Projector {
    /// |v⟩⟨v| for a normalized vector v.
    pub fn outer(v: [Complex<f64>; 2]) -> Self {
        Projector([
            v[0] * v[0].conj(),
            v[0] * v[1].conj(),
            v[1] * v[0].conj(),
            v[1] * v[1].conj(),
        ])
    }

    pub fn matrix(&self) -> DensityMatrix {
        DensityMatrix::from_raw(2, self.0.to_vec())
    }

    /// P² = P within `tol`.
    pub fn is_idempotent(&self, tol: f64) -> bool {
        let p = self.matrix();
        p.matmul(&p).approx_eq(&p, tol)
    }

    /// Embed as I_{2^q} ⊗ P ⊗ I_{2^(n-q-1)} acting on qubit `qubit` of `num_qubits`.
    pub fn embed(&self, qubit: usize, num_qubits: usize) -> Result<DensityMatrix, MeasurementError> {
        if qubit >= num_qubits {
            return Err(MeasurementError::QubitOutOfRange { qubit, num_qubits });
        }
        let before = DensityMatrix::identity(1 << qubit);
        let after = DensityMatrix::identity(1 << (num_qubits - qubit - 1));
        Ok(before.kron(&self.matrix()).kron(&after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::TOLERANCE;

    #[test]
    fn selector_round_trips_and_rejects_unknown() {
        assert_eq!(Basis::from_selector(0), Ok(Basis::X));
        assert_eq!(Basis::from_selector(1), Ok(Basis::Y));
        assert_eq!(Basis::from_selector(2), Err(MeasurementError::InvalidBasis(2)));
        assert_eq!(Basis::Y.selector(), 1);
        assert!(projectors(7).is_err());
    }

    #[test]
    fn projector_pairs_are_complementary() {
        for basis in [Basis::X, Basis::Y] {
            let (p, m) = basis.projectors();
            assert!(p.is_idempotent(TOLERANCE), "{:?} P+ not idempotent", basis);
            assert!(m.is_idempotent(TOLERANCE), "{:?} P- not idempotent", basis);

            let sum: Vec<Complex<f64>> = p.0.iter().zip(m.0.iter()).map(|(a, b)| a + b).collect();
            assert!((sum[0] - 1.0).norm() < TOLERANCE);
            assert!(sum[1].norm() < TOLERANCE);
            assert!(sum[2].norm() < TOLERANCE);
            assert!((sum[3] - 1.0).norm() < TOLERANCE);

            // orthogonal: P+ P- = 0
            assert!(p
                .matrix()
                .matmul(&m.matrix())
                .approx_eq(&DensityMatrix::zeros(2), TOLERANCE));
        }
    }

    #[test]
    fn y_projector_has_imaginary_coherence() {
        let (p, _) = Basis::Y.projectors();
        // |+i⟩⟨+i| = ½ [[1, -i], [i, 1]]
        assert!((p.0[1] - Complex::new(0.0, -0.5)).norm() < TOLERANCE);
        assert!((p.0[2] - Complex::new(0.0, 0.5)).norm() < TOLERANCE);
    }

    #[test]
    fn embedding_on_middle_qubit() {
        let (p, _) = Basis::X.projectors();
        let full = p.embed(1, 3).unwrap();
        assert_eq!(full.dim(), 8);
        assert!((full.trace().re - 4.0).abs() < TOLERANCE);
        assert!(full.matmul(&full).approx_eq(&full, TOLERANCE));
        assert!(p.embed(3, 3).is_err());
    }
}
