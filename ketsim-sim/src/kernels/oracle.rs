//! Classical oracle embedding
//!
//! Lifts a classical function f into the reversible map
//! |x⟩|y⟩ → |x⟩|y ⊕ f(x)⟩ over an input and an output register, leaving
//! every other qubit untouched. XOR into the output register makes the map
//! an involution for any f, so no unitarity check is needed (or possible:
//! f is opaque).

use ketsim_state::{index, StateVector};
use num_complex::Complex64;

/// Rewrite the state through `f`: every basis amplitude moves to the basis
/// label whose output bits are XORed with `f(x)`, where x is read from
/// `in_regs` (element 0 = least significant bit).
///
/// Bits of `f(x)` beyond `out_regs.len()` are ignored. The rewrite is a
/// permutation of basis labels, so each scratch slot is written exactly
/// once.
pub fn apply<F>(
    f: F,
    in_regs: &[usize],
    out_regs: &[usize],
    state: &mut StateVector,
    scratch: &mut StateVector,
) where
    F: Fn(usize) -> usize,
{
    scratch.clear();

    let zero = Complex64::new(0.0, 0.0);
    let out = scratch.amplitudes_mut();

    for (basis, &amp) in state.amplitudes().iter().enumerate() {
        if amp == zero {
            continue;
        }

        let value = f(index::extract(basis, in_regs));

        let mut target = basis;
        for (j, &q) in out_regs.iter().enumerate() {
            if (value >> j) & 1 == 1 {
                target ^= 1 << q;
            }
        }

        out[target] = amp;
    }

    std::mem::swap(state, scratch);
}
