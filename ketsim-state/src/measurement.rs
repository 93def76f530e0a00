//! Born-rule projective measurement with state collapse
//!
//! Measurement is the one non-unitary operation: it samples an outcome for
//! a set of qubits from the squared-amplitude distribution, zeroes every
//! basis state inconsistent with that outcome, and renormalizes the
//! survivors.

use crate::error::{Result, StateError};
use crate::index;
use crate::state_vector::StateVector;
use smallvec::SmallVec;

/// Outcome probabilities for measuring `registers` in the computational
/// basis, indexed by the sub-integer read out of the (ascending-sorted)
/// register set.
///
/// Leaves the state untouched.
///
/// # Errors
///
/// Rejects empty, out-of-bounds or duplicated register sets.
pub fn probabilities(state: &StateVector, registers: &[usize]) -> Result<Vec<f64>> {
    let sorted = sorted_registers(state, registers)?;

    let mut dist = vec![0.0; 1 << sorted.len()];
    for (basis, amp) in state.amplitudes().iter().enumerate() {
        let sqr = amp.norm_sqr();
        if sqr == 0.0 {
            continue;
        }
        dist[index::extract(basis, &sorted)] += sqr;
    }

    Ok(dist)
}

/// Measure `registers` in the computational basis and collapse the state.
///
/// The register set is canonicalized to ascending qubit order on a copy,
/// so bit i of the returned outcome is the value of the i-th smallest
/// measured qubit. `sample` must return uniform values in `[0, 1)`; the
/// caller owns the generator, which keeps this routine deterministic
/// under test.
///
/// After the call the surviving amplitudes are renormalized and every
/// nonzero basis state agrees with the returned outcome on the measured
/// bits.
///
/// # Errors
///
/// Rejects empty, out-of-bounds or duplicated register sets before any
/// state mutation.
pub fn measure(
    state: &mut StateVector,
    registers: &[usize],
    sample: &mut dyn FnMut() -> f64,
) -> Result<usize> {
    let sorted = sorted_registers(state, registers)?;

    let mut dist = vec![0.0; 1 << sorted.len()];
    for (basis, amp) in state.amplitudes().iter().enumerate() {
        let sqr = amp.norm_sqr();
        if sqr == 0.0 {
            continue;
        }
        dist[index::extract(basis, &sorted)] += sqr;
    }

    // Inverse-CDF sampling: least outcome whose cumulative sum reaches u.
    // Rounding can leave the total marginally below u; fall back to the
    // last outcome with any weight.
    let u = sample();
    let mut chosen = 0;
    let mut found = false;
    let mut cumulative = 0.0;

    for (outcome, &p) in dist.iter().enumerate() {
        cumulative += p;
        // p > 0 keeps a zero-mass outcome from being picked at u = 0.
        if p > 0.0 && cumulative >= u {
            chosen = outcome;
            found = true;
            break;
        }
    }

    if !found {
        for (outcome, &p) in dist.iter().enumerate().rev() {
            if p > 0.0 {
                chosen = outcome;
                break;
            }
        }
    }

    // Collapse and renormalize the survivors.
    for (basis, amp) in state.amplitudes_mut().iter_mut().enumerate() {
        if index::extract(basis, &sorted) != chosen {
            *amp = num_complex::Complex64::new(0.0, 0.0);
        }
    }
    state.scale(1.0 / dist[chosen].sqrt());

    Ok(chosen)
}

/// Validate a register set and return an ascending-sorted copy.
fn sorted_registers(state: &StateVector, registers: &[usize]) -> Result<SmallVec<[usize; 8]>> {
    if registers.is_empty() {
        return Err(StateError::EmptyRegister);
    }

    for &q in registers {
        if q >= state.num_qubits() {
            return Err(StateError::QubitOutOfBounds {
                index: q,
                num_qubits: state.num_qubits(),
            });
        }
    }

    let mut sorted: SmallVec<[usize; 8]> = SmallVec::from_slice(registers);
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            return Err(StateError::DuplicateQubit { index: pair[0] });
        }
    }

    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex64;

    fn uniform_state(num_qubits: usize) -> StateVector {
        let dim = 1 << num_qubits;
        let amp = Complex64::new(1.0 / (dim as f64).sqrt(), 0.0);
        StateVector::from_amplitudes(num_qubits, &vec![amp; dim]).unwrap()
    }

    #[test]
    fn test_probabilities_uniform() {
        let state = uniform_state(3);
        let dist = probabilities(&state, &[0, 1, 2]).unwrap();

        assert_eq!(dist.len(), 8);
        for p in dist {
            assert_abs_diff_eq!(p, 0.125, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_probabilities_partial_register() {
        // |ψ⟩ = (|00⟩ + |11⟩)/√2: each single qubit is uniform.
        let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let state = StateVector::from_amplitudes(2, &[h, zero, zero, h]).unwrap();

        let dist = probabilities(&state, &[1]).unwrap();
        assert_abs_diff_eq!(dist[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(dist[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_measure_classical_state_is_deterministic() {
        let mut state = StateVector::new(3).unwrap();
        state.set_basis(5).unwrap();

        let outcome = measure(&mut state, &[0, 1, 2], &mut || 0.77).unwrap();
        assert_eq!(outcome, 5);
        assert!(state.is_normalized(1e-9));
    }

    #[test]
    fn test_measure_subregister_bit_order() {
        // |101⟩ measured on qubits {0, 2} reads out 0b11.
        let mut state = StateVector::new(3).unwrap();
        state.set_basis(0b101).unwrap();

        let outcome = measure(&mut state, &[0, 2], &mut || 0.5).unwrap();
        assert_eq!(outcome, 0b11);
    }

    #[test]
    fn test_measure_collapses_and_renormalizes() {
        let mut state = uniform_state(2);

        // Measuring qubit 0 gives p = [0.5, 0.5]; u = 0.6 lands on 1.
        let outcome = measure(&mut state, &[0], &mut || 0.6).unwrap();
        assert_eq!(outcome, 1);
        assert!(state.is_normalized(1e-9));

        for (basis, amp) in state.amplitudes().iter().enumerate() {
            if basis & 1 == outcome {
                assert_abs_diff_eq!(amp.norm_sqr(), 0.5, epsilon = 1e-9);
            } else {
                assert_abs_diff_eq!(amp.norm_sqr(), 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_measure_validates_registers() {
        let mut state = StateVector::new(2).unwrap();

        assert!(matches!(
            measure(&mut state, &[], &mut || 0.0),
            Err(StateError::EmptyRegister)
        ));
        assert!(matches!(
            measure(&mut state, &[2], &mut || 0.0),
            Err(StateError::QubitOutOfBounds { index: 2, .. })
        ));
        assert!(matches!(
            measure(&mut state, &[0, 0], &mut || 0.0),
            Err(StateError::DuplicateQubit { index: 0 })
        ));

        // No partial work: the state is untouched after a rejected call.
        assert_eq!(state.amplitudes()[0], Complex64::new(1.0, 0.0));
    }
}
