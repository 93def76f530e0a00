//! General k-qubit gate application through the scratch buffer
//!
//! For arities the specialized kernels do not cover, amplitudes are
//! accumulated into a second buffer and the buffers are swapped at the
//! end. Iteration runs over source basis states, i.e. over gate *columns*:
//! a column is visited once per nonzero source amplitude and only its
//! nonzero entries contribute, so permutation-like gates (the common case)
//! cost O(nonzeros) instead of O(4ᵏ).

use ketsim_core::Gate;
use ketsim_state::{index, StateVector};
use num_complex::Complex64;

/// Apply `gate` to `targets`, gated on the control bits in `mask`
/// (`mask == 0` means unconditional).
///
/// `targets` keeps the caller's order: bit j of a local basis index is the
/// value of `targets[j]`. Basis states failing the control predicate pass
/// through unchanged. The scratch buffer is cleared on entry and holds the
/// pre-call amplitudes after the swap; it is cleared again by the next
/// user.
pub fn apply(
    gate: &Gate,
    targets: &[usize],
    mask: usize,
    state: &mut StateVector,
    scratch: &mut StateVector,
) {
    scratch.clear();

    let zero = Complex64::new(0.0, 0.0);
    let dim = gate.dim();
    let out = scratch.amplitudes_mut();

    for (basis, &amp) in state.amplitudes().iter().enumerate() {
        if amp == zero {
            continue;
        }

        if basis & mask != mask {
            out[basis] = amp;
            continue;
        }

        let col = index::extract(basis, targets);
        for row in 0..dim {
            let elem = gate.at(row, col);
            if elem == zero {
                continue;
            }
            out[index::deposit(basis, row, targets)] += amp * elem;
        }
    }

    std::mem::swap(state, scratch);
}
