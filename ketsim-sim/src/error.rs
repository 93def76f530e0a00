//! Error types for circuit operations

use ketsim_core::GateError;
use ketsim_state::StateError;
use thiserror::Error;

/// Result type for circuit operations
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised by the circuit facade
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Gate arity does not match the number of targets
    #[error("gate acts on {arity} qubits but {targets} targets were given")]
    ArityMismatch { arity: usize, targets: usize },

    /// A qubit appears twice across the target and control lists
    #[error("qubit {index} appears more than once in the target/control lists")]
    DuplicateQubit { index: usize },

    /// Register range is empty or exceeds the circuit
    #[error("invalid register range [{start}, {end})")]
    InvalidRegisterRange { start: usize, end: usize },

    /// Oracle input and output registers share a qubit
    #[error("oracle input and output registers both contain qubit {index}")]
    OverlappingRegisters { index: usize },

    /// The oracle outcome violates the constant-or-balanced promise
    #[error("oracle is neither constant nor balanced, measured {outcome}")]
    IndeterminateOracle { outcome: usize },

    /// Factorization gave up after the attempt cap
    #[error("failed to factor {n} after {attempts} attempts")]
    FactorizationFailed { n: u64, attempts: usize },

    /// Configuration rejected by validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Worker pool construction failed
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    /// Gate value error
    #[error(transparent)]
    Gate(#[from] GateError),

    /// State error
    #[error(transparent)]
    State(#[from] StateError),
}
