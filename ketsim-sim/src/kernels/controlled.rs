//! Controlled gate application kernels
//!
//! A controlled operation mixes a group's amplitudes only when every
//! control bit of the group is 1. Controls are disjoint from targets, so
//! all members of a group share their control bits and the predicate is
//! tested once per group on its representative.

use super::{two_qubit, Matrix2x2, Matrix4x4};
use ketsim_state::index;
use num_complex::Complex64;
use rayon::prelude::*;

/// OR the control bit positions into a single mask.
#[inline]
pub fn control_mask(controls: &[usize]) -> usize {
    controls.iter().fold(0, |mask, &c| mask | (1 << c))
}

/// Controlled 2×2 gate on `target`: groups whose control bits are all set
/// mix as in the unconditional kernel, all others pass through untouched.
pub fn apply_single_serial(
    gate: &Matrix2x2,
    mask: usize,
    target: usize,
    state: &mut [Complex64],
) {
    let stride = 1 << target;
    let mut base = 0;

    while base < state.len() {
        for offset in 0..stride {
            let idx0 = base + offset;
            if idx0 & mask != mask {
                continue;
            }
            let idx1 = idx0 + stride;

            let a = state[idx0];
            let b = state[idx1];

            state[idx0] = gate[0][0] * a + gate[0][1] * b;
            state[idx1] = gate[1][0] * a + gate[1][1] * b;
        }
        base += stride * 2;
    }
}

/// Parallel variant of [`apply_single_serial`]. The chunk index recovers
/// the global basis label for the control test.
pub fn apply_single_parallel(
    gate: &Matrix2x2,
    mask: usize,
    target: usize,
    state: &mut [Complex64],
) {
    let stride = 1 << target;

    state
        .par_chunks_mut(stride * 2)
        .enumerate()
        .for_each(|(chunk_idx, chunk)| {
            let chunk_base = chunk_idx * stride * 2;
            for offset in 0..stride {
                if (chunk_base + offset) & mask != mask {
                    continue;
                }

                let a = chunk[offset];
                let b = chunk[offset + stride];

                chunk[offset] = gate[0][0] * a + gate[0][1] * b;
                chunk[offset + stride] = gate[1][0] * a + gate[1][1] * b;
            }
        });
}

/// Controlled 4×4 gate on the (ascending) target pair `(low, high)`.
pub fn apply_two_serial(
    gate: &Matrix4x4,
    mask: usize,
    low: usize,
    high: usize,
    state: &mut [Complex64],
) {
    let targets = [low, high];
    let groups = state.len() >> 2;

    for group in 0..groups {
        let base = index::spread(group, &targets);
        if base & mask != mask {
            continue;
        }
        two_qubit::mix_group(gate, base, 1 << low, 1 << high, state);
    }
}

/// Parallel variant of [`apply_two_serial`].
pub fn apply_two_parallel(
    gate: &Matrix4x4,
    mask: usize,
    low: usize,
    high: usize,
    state: &mut [Complex64],
) {
    let targets = [low, high];
    let block = 1 << (high + 1);

    state
        .par_chunks_mut(block)
        .enumerate()
        .for_each(|(chunk_idx, chunk)| {
            let chunk_base = chunk_idx * block;
            for group in 0..(block >> 2) {
                let base = index::spread(group, &targets);
                if (chunk_base + base) & mask != mask {
                    continue;
                }
                two_qubit::mix_group(gate, base, 1 << low, 1 << high, chunk);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::as_2x2;
    use approx::assert_abs_diff_eq;
    use ketsim_core::standard;

    fn basis_state(n: usize, value: usize) -> Vec<Complex64> {
        let mut state = vec![Complex64::new(0.0, 0.0); 1 << n];
        state[value] = Complex64::new(1.0, 0.0);
        state
    }

    #[test]
    fn test_cnot_behavior() {
        let x = as_2x2(&standard::x());
        let mask = control_mask(&[0]);

        // Control clear: target unchanged.
        let mut state = basis_state(2, 0b00);
        apply_single_serial(&x, mask, 1, &mut state);
        assert_abs_diff_eq!(state[0b00].re, 1.0, epsilon = 1e-12);

        // Control set: target flips.
        let mut state = basis_state(2, 0b01);
        apply_single_serial(&x, mask, 1, &mut state);
        assert_abs_diff_eq!(state[0b11].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_toffoli_requires_all_controls() {
        let x = as_2x2(&standard::x());
        let mask = control_mask(&[0, 1]);

        // One control set is not enough.
        let mut state = basis_state(3, 0b001);
        apply_single_serial(&x, mask, 2, &mut state);
        assert_abs_diff_eq!(state[0b001].re, 1.0, epsilon = 1e-12);

        // Both controls set flips the target.
        let mut state = basis_state(3, 0b011);
        apply_single_serial(&x, mask, 2, &mut state);
        assert_abs_diff_eq!(state[0b111].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_mask_is_unconditional() {
        let x = as_2x2(&standard::x());
        let mut state = basis_state(1, 0);
        apply_single_serial(&x, control_mask(&[]), 0, &mut state);
        assert_abs_diff_eq!(state[1].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let h = as_2x2(&standard::h());
        let n = 6;
        let mask = control_mask(&[1, 4]);

        let mut serial: Vec<Complex64> = (0..1 << n)
            .map(|b| Complex64::new(1.0 / (1.0 + b as f64), 0.25))
            .collect();
        let mut parallel = serial.clone();

        apply_single_serial(&h, mask, 3, &mut serial);
        apply_single_parallel(&h, mask, 3, &mut parallel);

        for (a, b) in serial.iter().zip(&parallel) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-9);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_two_target_parallel_matches_serial() {
        let gate = crate::kernels::as_4x4(&standard::x().tensor(&standard::h()));
        let n = 6;
        let mask = control_mask(&[0]);

        let mut serial: Vec<Complex64> = (0..1 << n)
            .map(|b| Complex64::new(b as f64 * 0.1, -(b as f64) * 0.05))
            .collect();
        let mut parallel = serial.clone();

        apply_two_serial(&gate, mask, 2, 5, &mut serial);
        apply_two_parallel(&gate, mask, 2, 5, &mut parallel);

        for (a, b) in serial.iter().zip(&parallel) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-9);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-9);
        }
    }
}
