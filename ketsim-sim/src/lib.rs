//! State-vector quantum circuit simulation
//!
//! This crate drives the ketsim engine: a [`Circuit`] owns a dense
//! 2ⁿ-amplitude register and applies gates to it in place, dispatching
//! each operation to specialized one- and two-qubit kernels (serial or
//! rayon-parallel, depending on register width), a scratch-buffer kernel
//! for higher arities, controlled variants, and a classical-oracle
//! embedder. Measurement follows the Born rule and collapses the state.
//!
//! The [`algorithms`] module layers the classic drivers (Deutsch–Jozsa,
//! Grover, Shor) on top of the public surface.
//!
//! # Example
//!
//! ```
//! use ketsim_sim::{Circuit, SimConfig};
//!
//! let mut circuit = Circuit::with_config(2, SimConfig::new().with_seed(1)).unwrap();
//! circuit.h(0).unwrap();
//! circuit.h(1).unwrap();
//!
//! // Uniform superposition over four basis states.
//! for amp in circuit.state() {
//!     assert!((amp.re - 0.5).abs() < 1e-9);
//! }
//! ```

pub mod algorithms;
pub mod circuit;
pub mod config;
pub mod error;
pub mod kernels;

pub use circuit::Circuit;
pub use config::SimConfig;
pub use error::{Result, SimError};
