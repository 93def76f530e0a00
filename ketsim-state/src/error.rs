//! Error types for state operations

use thiserror::Error;

/// Errors that can occur during state vector operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Qubit index outside the register
    #[error("qubit index {index} out of bounds for a {num_qubits}-qubit register")]
    QubitOutOfBounds { index: usize, num_qubits: usize },

    /// Register width outside the supported range
    #[error("{requested} qubits requested, supported range is 1..={max}")]
    CapacityExceeded { requested: usize, max: usize },

    /// Classical basis value outside the state dimension
    #[error("basis value {value} out of range for state dimension {dimension}")]
    InvalidBasisState { value: usize, dimension: usize },

    /// Measurement register set is empty
    #[error("register set must not be empty")]
    EmptyRegister,

    /// A register set lists the same qubit twice
    #[error("qubit {index} listed twice in register set")]
    DuplicateQubit { index: usize },

    /// Amplitude count does not match the register width
    #[error("expected {expected} amplitudes, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Aligned buffer allocation failed
    #[error("failed to allocate {size} bytes for the amplitude buffer")]
    AllocationError { size: usize },
}

/// Result type for state operations
pub type Result<T> = std::result::Result<T, StateError>;
