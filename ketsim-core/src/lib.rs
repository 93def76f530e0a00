//! Gate values for the ketsim state-vector simulator
//!
//! This crate provides the dense unitary matrix type ([`Gate`]) applied by
//! the simulation kernels, together with constructors for the standard named
//! gates. Gates are immutable values: they are validated once at
//! construction and never store the expanded 2ⁿ×2ⁿ form.
//!
//! # Example
//!
//! ```
//! use ketsim_core::standard;
//!
//! let h = standard::h();
//! assert_eq!(h.arity(), 1);
//!
//! // Two-qubit gate by tensor product.
//! let hh = h.tensor(&standard::h());
//! assert_eq!(hh.dim(), 4);
//! ```

pub mod error;
pub mod gate;
pub mod standard;

pub use error::{GateError, Result};
pub use gate::{Gate, UNITARY_TOLERANCE};
