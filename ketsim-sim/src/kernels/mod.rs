//! Gate application kernels
//!
//! Every kernel mutates the amplitude buffer in place over disjoint
//! group-index sets; callers have already validated targets and controls.
//! Specialized one- and two-qubit kernels come in serial and parallel
//! variants; arities of three and up go through the scratch-buffer
//! [`general`] path.

pub mod controlled;
pub mod general;
pub mod oracle;
pub mod single_qubit;
pub mod two_qubit;

use ketsim_core::Gate;
use num_complex::Complex64;

/// Single-qubit gate matrix
pub type Matrix2x2 = [[Complex64; 2]; 2];

/// Two-qubit gate matrix
pub type Matrix4x4 = [[Complex64; 4]; 4];

/// Copy a one-qubit gate into the fixed-size kernel form.
pub fn as_2x2(gate: &Gate) -> Matrix2x2 {
    debug_assert_eq!(gate.dim(), 2);
    let mut m = [[Complex64::new(0.0, 0.0); 2]; 2];
    for (r, row) in m.iter_mut().enumerate() {
        row.copy_from_slice(gate.row(r));
    }
    m
}

/// Copy a two-qubit gate into the fixed-size kernel form.
pub fn as_4x4(gate: &Gate) -> Matrix4x4 {
    debug_assert_eq!(gate.dim(), 4);
    let mut m = [[Complex64::new(0.0, 0.0); 4]; 4];
    for (r, row) in m.iter_mut().enumerate() {
        row.copy_from_slice(gate.row(r));
    }
    m
}
