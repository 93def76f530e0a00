//! Standard named gates
//!
//! Constructors for the common single-qubit gates. Each call builds a fresh
//! [`Gate`] value; the matrices are unitary by construction and skip the
//! runtime check.

use crate::gate::Gate;
use num_complex::Complex64;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

#[inline]
fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Identity gate.
pub fn i() -> Gate {
    Gate::from_parts(2, vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)])
}

/// Pauli-X (NOT) gate.
pub fn x() -> Gate {
    Gate::from_parts(2, vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)])
}

/// Pauli-Y gate.
pub fn y() -> Gate {
    Gate::from_parts(2, vec![c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)])
}

/// Pauli-Z gate.
pub fn z() -> Gate {
    Gate::from_parts(2, vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(-1.0, 0.0)])
}

/// Hadamard gate.
pub fn h() -> Gate {
    let v = std::f64::consts::FRAC_1_SQRT_2;
    Gate::from_parts(2, vec![c(v, 0.0), c(v, 0.0), c(v, 0.0), c(-v, 0.0)])
}

/// Phase gate P(φ) = diag(1, e^{iφ}).
pub fn p(phi: f64) -> Gate {
    Gate::from_parts(
        2,
        vec![
            c(1.0, 0.0),
            c(0.0, 0.0),
            c(0.0, 0.0),
            Complex64::from_polar(1.0, phi),
        ],
    )
}

/// S gate, P(π/2).
pub fn s() -> Gate {
    p(FRAC_PI_2)
}

/// T gate, P(π/4).
pub fn t() -> Gate {
    p(FRAC_PI_4)
}
