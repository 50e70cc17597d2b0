//! Dense density matrices for small multi-qubit systems.
//!
//! A state of n qubits is a 2^n × 2^n complex matrix stored row-major in a
//! flat buffer. Qubit 0 is the leading (most significant) tensor factor, so
//! basis index `i` has qubit `q` in bit `n - 1 - q`.
//!
//! Every transformation returns a new matrix; nothing here mutates a state
//! that a caller might still hold.

use num_complex::Complex;
use num_traits::{One, Zero};

use crate::error::MeasurementError;

/// Tolerance used by the approximate comparisons in this crate.
pub const TOLERANCE: f64 = 1e-9;

/// Square complex matrix representing the (possibly mixed) state of n qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    dim: usize,
    data: Vec<Complex<f64>>,
}

impl DensityMatrix {
    /// Build from row-major entries. `dim` must be a power of two (2^0 allowed)
    /// and `data.len()` must equal `dim * dim`.
    pub fn new(dim: usize, data: Vec<Complex<f64>>) -> Result<Self, MeasurementError> {
        if !dim.is_power_of_two() || data.len() != dim * dim {
            return Err(MeasurementError::DimensionError(dim));
        }
        Ok(Self { dim, data })
    }

    /// Caller guarantees `data.len() == dim * dim`.
    pub(crate) fn from_raw(dim: usize, data: Vec<Complex<f64>>) -> Self {
        debug_assert_eq!(data.len(), dim * dim);
        Self { dim, data }
    }

    /// Build from nested rows, e.g. `vec![vec![a, b], vec![c, d]]`.
    pub fn from_rows(rows: Vec<Vec<Complex<f64>>>) -> Result<Self, MeasurementError> {
        let dim = rows.len();
        if rows.iter().any(|r| r.len() != dim) {
            return Err(MeasurementError::DimensionError(dim));
        }
        Self::new(dim, rows.into_iter().flatten().collect())
    }

    /// All-zero matrix. Not a physical state.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![Complex::zero(); dim * dim],
        }
    }

    pub fn identity(dim: usize) -> Self {
        let mut m = Self::zeros(dim);
        for k in 0..dim {
            m.data[k * dim + k] = Complex::one();
        }
        m
    }

    /// Pure state |ψ⟩⟨ψ| from an amplitude vector (not renormalized).
    pub fn from_pure_state(amplitudes: &[Complex<f64>]) -> Result<Self, MeasurementError> {
        let dim = amplitudes.len();
        if !dim.is_power_of_two() {
            return Err(MeasurementError::DimensionError(dim));
        }
        let mut data = Vec::with_capacity(dim * dim);
        for a in amplitudes {
            for b in amplitudes {
                data.push(*a * b.conj());
            }
        }
        Ok(Self { dim, data })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of qubits n, where dim = 2^n.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.dim.trailing_zeros() as usize
    }

    /// Get ρ[i][j].
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Complex<f64> {
        self.data[i * self.dim + j]
    }

    /// Set ρ[i][j].
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: Complex<f64>) {
        self.data[i * self.dim + j] = value;
    }

    pub fn as_slice(&self) -> &[Complex<f64>] {
        &self.data
    }

    /// Complex trace Tr(ρ).
    pub fn trace(&self) -> Complex<f64> {
        (0..self.dim).map(|k| self.get(k, k)).sum()
    }

    /// Purity Tr(ρ²) = Σ |ρ_ij|² for Hermitian ρ.
    pub fn purity(&self) -> f64 {
        self.data.iter().map(|z| z.norm_sqr()).sum()
    }

    pub fn is_hermitian(&self, tol: f64) -> bool {
        (0..self.dim).all(|i| {
            (i..self.dim).all(|j| (self.get(i, j) - self.get(j, i).conj()).norm() <= tol)
        })
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|z| z.is_zero())
    }

    /// Entry-wise comparison within `tol`. Matrices of different size are never equal.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.dim == other.dim
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).norm() <= tol)
    }

    /// Conjugate transpose ρ†.
    pub fn adjoint(&self) -> Self {
        let d = self.dim;
        let mut out = Self::zeros(d);
        for i in 0..d {
            for j in 0..d {
                out.data[j * d + i] = self.data[i * d + j].conj();
            }
        }
        out
    }

    /// Matrix product self · rhs. Panics if the dimensions differ.
    pub fn matmul(&self, rhs: &Self) -> Self {
        assert_eq!(self.dim, rhs.dim, "matmul dimension mismatch");
        let d = self.dim;
        let mut out = Self::zeros(d);
        for i in 0..d {
            for k in 0..d {
                let a = self.data[i * d + k];
                if a.is_zero() {
                    continue;
                }
                for j in 0..d {
                    out.data[i * d + j] += a * rhs.data[k * d + j];
                }
            }
        }
        out
    }

    /// Tensor product self ⊗ rhs; `self` becomes the leading factor.
    pub fn kron(&self, rhs: &Self) -> Self {
        let (a, b) = (self.dim, rhs.dim);
        let d = a * b;
        let mut out = Self::zeros(d);
        for i1 in 0..a {
            for j1 in 0..a {
                let x = self.data[i1 * a + j1];
                if x.is_zero() {
                    continue;
                }
                for i2 in 0..b {
                    for j2 in 0..b {
                        out.data[(i1 * b + i2) * d + (j1 * b + j2)] = x * rhs.data[i2 * b + j2];
                    }
                }
            }
        }
        out
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            dim: self.dim,
            data: self.data.iter().map(|z| *z * factor).collect(),
        }
    }

    /// M · ρ · M†, the unnormalized post-measurement state for operator M.
    pub fn sandwich(&self, operator: &Self) -> Self {
        operator.matmul(self).matmul(&operator.adjoint())
    }

    /// Trace out one qubit, returning a matrix of half the dimension.
    ///
    /// Qubit 0 is the leading factor: for ρ on C² ⊗ C^(d/2) this sums the
    /// two diagonal d/2 × d/2 blocks.
    pub fn partial_trace(&self, qubit: usize) -> Result<Self, MeasurementError> {
        let n = self.num_qubits();
        if qubit >= n {
            return Err(MeasurementError::QubitOutOfRange { qubit, num_qubits: n });
        }
        let half = self.dim / 2;
        let bit = n - 1 - qubit;
        let low_mask = (1usize << bit) - 1;
        let expand = |reduced: usize, k: usize| {
            ((reduced & !low_mask) << 1) | (k << bit) | (reduced & low_mask)
        };

        let mut out = Self::zeros(half);
        for a in 0..half {
            for b in 0..half {
                let mut acc = Complex::zero();
                for k in 0..2 {
                    acc += self.get(expand(a, k), expand(b, k));
                }
                out.data[a * half + b] = acc;
            }
        }
        Ok(out)
    }
}
