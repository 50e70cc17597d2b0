//! Error types for the measurement engine and the transcript verifier.

use thiserror::Error;

/// Errors raised by basis selection and density-matrix measurement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasurementError {
    /// Basis selector outside {0 = X, 1 = Y}
    #[error("invalid basis selector: {0}")]
    InvalidBasis(u8),

    /// Matrix dimension is not a positive power of two
    #[error("dimension {0} is not a positive power of two")]
    DimensionError(usize),

    /// Requested qubit does not exist in the state
    #[error("qubit {qubit} out of range for a {num_qubits}-qubit state")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },
}

/// Shape errors found while building a validated [`crate::transcript::Transcript`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("number_of_colors must be at least 1")]
    NoColors,

    #[error("transcript has {found} rounds, expected at least {expected}")]
    TooFewRounds { expected: usize, found: usize },

    #[error("round {round} party {party}: bit string has {found} entries, expected at least {expected}")]
    BitStringTooShort {
        round: usize,
        party: usize,
        expected: usize,
        found: usize,
    },

    #[error("round {round} party {party} color {color}: {value} is not a bit")]
    InvalidBit {
        round: usize,
        party: usize,
        color: usize,
        value: u8,
    },
}

/// Errors from the simulation driver.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("measurement failed: {0}")]
    Measurement(#[from] MeasurementError),

    #[error("malformed transcript: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
