//! Two-qubit gate application kernels

use super::Matrix4x4;
use ketsim_state::index;
use num_complex::Complex64;
use rayon::prelude::*;

/// Sort a target pair ascending, permuting the gate to match.
///
/// Local basis bit 0 belongs to the first listed target. Swapping the
/// targets relabels local states 01 and 10, so the gate's middle rows and
/// middle columns swap with them; the caller-observed semantics are
/// unchanged.
pub fn canonicalize(gate: Matrix4x4, t0: usize, t1: usize) -> (Matrix4x4, usize, usize) {
    if t0 < t1 {
        return (gate, t0, t1);
    }

    let mut m = gate;
    m.swap(1, 2);
    for row in &mut m {
        row.swap(1, 2);
    }

    (m, t1, t0)
}

/// Apply a 4×4 gate to the (ascending) target pair `(low, high)`,
/// mixing the four amplitudes of each group in place.
///
/// With n = 2 there is a single group and this degenerates to the full
/// matrix-vector product on the whole state.
pub fn apply_serial(gate: &Matrix4x4, low: usize, high: usize, state: &mut [Complex64]) {
    let targets = [low, high];
    let groups = state.len() >> 2;

    for group in 0..groups {
        let base = index::spread(group, &targets);
        mix_group(gate, base, 1 << low, 1 << high, state);
    }
}

/// Parallel variant of [`apply_serial`]: blocks of 2^(high+1) amplitudes
/// contain whole groups, so they are independent work units.
pub fn apply_parallel(gate: &Matrix4x4, low: usize, high: usize, state: &mut [Complex64]) {
    let targets = [low, high];
    let block = 1 << (high + 1);

    state.par_chunks_mut(block).for_each(|chunk| {
        for group in 0..(block >> 2) {
            let base = index::spread(group, &targets);
            mix_group(gate, base, 1 << low, 1 << high, chunk);
        }
    });
}

/// Gather the four group members, multiply by the gate, scatter back.
#[inline]
pub(super) fn mix_group(
    gate: &Matrix4x4,
    base: usize,
    mask_low: usize,
    mask_high: usize,
    state: &mut [Complex64],
) {
    let idx = [
        base,
        base | mask_low,
        base | mask_high,
        base | mask_low | mask_high,
    ];

    let a = [state[idx[0]], state[idx[1]], state[idx[2]], state[idx[3]]];

    for (row, &out) in idx.iter().enumerate() {
        let mut sum = Complex64::new(0.0, 0.0);
        for (col, &amp) in a.iter().enumerate() {
            sum += gate[row][col] * amp;
        }
        state[out] = sum;
    }
}

/// Exchange the amplitudes of every basis pair that differs exactly in
/// bits `low` and `high` (the 01/10 pairs); 00 and 11 are fixed points.
pub fn swap_serial(low: usize, high: usize, state: &mut [Complex64]) {
    let targets = [low, high];
    let groups = state.len() >> 2;

    for group in 0..groups {
        let base = index::spread(group, &targets);
        state.swap(base | (1 << low), base | (1 << high));
    }
}

/// Parallel variant of [`swap_serial`].
pub fn swap_parallel(low: usize, high: usize, state: &mut [Complex64]) {
    let targets = [low, high];
    let block = 1 << (high + 1);

    state.par_chunks_mut(block).for_each(|chunk| {
        for group in 0..(block >> 2) {
            let base = index::spread(group, &targets);
            chunk.swap(base | (1 << low), base | (1 << high));
        }
    });
}
