//! One-qubit gate application kernels

use super::Matrix2x2;
use num_complex::Complex64;
use rayon::prelude::*;

/// Apply a 2×2 gate to `target`, walking the 2ⁿ⁻¹ amplitude pairs that
/// differ only in bit `target`. Both amplitudes of a pair are read before
/// either is written; no scratch is needed.
pub fn apply_serial(gate: &Matrix2x2, target: usize, state: &mut [Complex64]) {
    let stride = 1 << target;
    let mut base = 0;

    while base < state.len() {
        for offset in 0..stride {
            let idx0 = base + offset;
            let idx1 = idx0 + stride;

            let a = state[idx0];
            let b = state[idx1];

            state[idx0] = gate[0][0] * a + gate[0][1] * b;
            state[idx1] = gate[1][0] * a + gate[1][1] * b;
        }
        base += stride * 2;
    }
}

/// Parallel variant of [`apply_serial`].
///
/// The state splits into blocks of 2^(target+1) amplitudes; every pair
/// lives inside exactly one block, so blocks are independent work units.
pub fn apply_parallel(gate: &Matrix2x2, target: usize, state: &mut [Complex64]) {
    let stride = 1 << target;

    state.par_chunks_mut(stride * 2).for_each(|chunk| {
        for offset in 0..stride {
            let a = chunk[offset];
            let b = chunk[offset + stride];

            chunk[offset] = gate[0][0] * a + gate[0][1] * b;
            chunk[offset + stride] = gate[1][0] * a + gate[1][1] * b;
        }
    });
}
