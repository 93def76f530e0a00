//! Quantum register state for the ketsim simulator
//!
//! This crate owns the dense amplitude representation of an n-qubit
//! register: a contiguous, SIMD-aligned vector of 2ⁿ complex doubles
//! ([`StateVector`]), the bit-interleaving index calculus the gate kernels
//! iterate with ([`index`]), and the Born-rule projective measurement with
//! state collapse ([`measurement`]).
//!
//! Basis convention: bit j of a basis index is the classical value of
//! qubit j, qubit 0 being the least significant bit.

pub mod error;
pub mod index;
pub mod measurement;
pub mod state_vector;

pub use error::{Result, StateError};
pub use state_vector::{StateVector, MAX_QUBITS};
