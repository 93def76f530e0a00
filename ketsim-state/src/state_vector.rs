//! Dense amplitude buffer with aligned memory

use crate::error::{Result, StateError};
use num_complex::Complex64;
use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

/// Largest supported register width. Two amplitude buffers at this width
/// already occupy 32 GiB; wider registers are rejected at construction.
pub const MAX_QUBITS: usize = 30;

/// Buffer alignment in bytes, wide enough for AVX-512 loads.
const BUFFER_ALIGNMENT: usize = 64;

/// Dense state of an n-qubit register: 2ⁿ complex amplitudes indexed by
/// basis label, with qubit 0 as the least significant bit.
///
/// The buffer is allocated once with 64-byte alignment and reused for the
/// lifetime of the value. The norm invariant Σ|a_b|² = 1 is maintained by
/// the unitary kernels and restored by measurement collapse; it is not
/// enforced here.
///
/// # Example
///
/// ```
/// use ketsim_state::StateVector;
///
/// let state = StateVector::new(2).unwrap();
/// assert_eq!(state.num_qubits(), 2);
/// assert_eq!(state.dimension(), 4);
/// assert_eq!(state.amplitudes()[0].re, 1.0);
/// ```
pub struct StateVector {
    /// Number of qubits
    num_qubits: usize,

    /// State dimension, `1 << num_qubits`
    dimension: usize,

    /// Pointer to the aligned amplitude data
    data: NonNull<Complex64>,

    /// Memory layout for deallocation
    layout: Layout,
}

impl StateVector {
    /// Create a state vector initialized to |0...0⟩.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::CapacityExceeded`] when `num_qubits` is
    /// outside `1..=MAX_QUBITS`, or [`StateError::AllocationError`] if the
    /// aligned allocation fails.
    pub fn new(num_qubits: usize) -> Result<Self> {
        let state = Self::zeroed(num_qubits)?;
        unsafe {
            *state.data.as_ptr() = Complex64::new(1.0, 0.0);
        }
        Ok(state)
    }

    /// Create an all-zero buffer of the same shape, used as kernel scratch.
    ///
    /// The result is not a normalized state until written to.
    pub fn zeroed(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(StateError::CapacityExceeded {
                requested: num_qubits,
                max: MAX_QUBITS,
            });
        }

        let dimension = 1usize << num_qubits;
        let size = dimension * std::mem::size_of::<Complex64>();

        let layout = Layout::from_size_align(size, BUFFER_ALIGNMENT)
            .map_err(|_| StateError::AllocationError { size })?;

        let data = unsafe {
            let ptr = alloc(layout) as *mut Complex64;
            if ptr.is_null() {
                return Err(StateError::AllocationError { size });
            }

            std::ptr::write_bytes(ptr, 0, dimension);
            NonNull::new_unchecked(ptr)
        };

        Ok(Self {
            num_qubits,
            dimension,
            data,
            layout,
        })
    }

    /// Create a state vector from raw amplitudes.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::DimensionMismatch`] if `amplitudes.len()` is
    /// not `1 << num_qubits`.
    pub fn from_amplitudes(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        let state = Self::zeroed(num_qubits)?;

        if amplitudes.len() != state.dimension {
            return Err(StateError::DimensionMismatch {
                expected: state.dimension,
                actual: amplitudes.len(),
            });
        }

        unsafe {
            std::ptr::copy_nonoverlapping(amplitudes.as_ptr(), state.data.as_ptr(), state.dimension);
        }

        Ok(state)
    }

    /// Number of qubits in the register.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// State dimension, `1 << num_qubits`.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Read-only view of the amplitudes.
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.dimension) }
    }

    /// Mutable view of the amplitudes.
    #[inline]
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        unsafe { std::slice::from_raw_parts_mut(self.data.as_ptr(), self.dimension) }
    }

    /// Squared 2-norm Σ|a_b|².
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes().iter().map(|a| a.norm_sqr()).sum()
    }

    /// Multiply every amplitude by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for amp in self.amplitudes_mut() {
            *amp *= factor;
        }
    }

    /// True if |Σ|a_b|² − 1| < `epsilon`.
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.norm_sqr() - 1.0).abs() < epsilon
    }

    /// Overwrite every amplitude with zero.
    pub fn clear(&mut self) {
        unsafe {
            std::ptr::write_bytes(self.data.as_ptr(), 0, self.dimension);
        }
    }

    /// Reset to the classical basis state |value⟩.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::InvalidBasisState`] if `value` is not below
    /// the state dimension.
    pub fn set_basis(&mut self, value: usize) -> Result<()> {
        if value >= self.dimension {
            return Err(StateError::InvalidBasisState {
                value,
                dimension: self.dimension,
            });
        }

        self.clear();
        unsafe {
            *self.data.as_ptr().add(value) = Complex64::new(1.0, 0.0);
        }

        Ok(())
    }
}

impl Drop for StateVector {
    fn drop(&mut self) {
        unsafe {
            dealloc(self.data.as_ptr() as *mut u8, self.layout);
        }
    }
}

// Safety: the buffer is uniquely owned and only shared across worker
// threads as disjoint sub-slices.
unsafe impl Send for StateVector {}
unsafe impl Sync for StateVector {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_initial_state() {
        let state = StateVector::new(3).unwrap();
        let amps = state.amplitudes();

        assert_eq!(amps.len(), 8);
        assert_eq!(amps[0], Complex64::new(1.0, 0.0));
        for &amp in &amps[1..] {
            assert_eq!(amp, Complex64::new(0.0, 0.0));
        }
    }

    #[test]
    fn test_zeroed_is_all_zero() {
        let scratch = StateVector::zeroed(4).unwrap();
        assert_abs_diff_eq!(scratch.norm_sqr(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_capacity_bounds() {
        assert!(matches!(
            StateVector::new(0),
            Err(StateError::CapacityExceeded { requested: 0, .. })
        ));
        assert!(matches!(
            StateVector::new(MAX_QUBITS + 1),
            Err(StateError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_set_basis() {
        let mut state = StateVector::new(3).unwrap();
        state.set_basis(5).unwrap();

        assert_eq!(state.amplitudes()[5], Complex64::new(1.0, 0.0));
        assert_abs_diff_eq!(state.norm_sqr(), 1.0, epsilon = 1e-12);

        assert!(matches!(
            state.set_basis(8),
            Err(StateError::InvalidBasisState { value: 8, .. })
        ));
    }

    #[test]
    fn test_from_amplitudes() {
        let amps = vec![Complex64::new(0.5, 0.0); 4];
        let state = StateVector::from_amplitudes(2, &amps).unwrap();
        assert_eq!(state.amplitudes(), amps.as_slice());

        let short = vec![Complex64::new(1.0, 0.0)];
        assert!(matches!(
            StateVector::from_amplitudes(2, &short),
            Err(StateError::DimensionMismatch { expected: 4, actual: 1 })
        ));
    }

    #[test]
    fn test_scale_restores_norm() {
        let amps = vec![Complex64::new(1.0, 0.0); 4];
        let mut state = StateVector::from_amplitudes(2, &amps).unwrap();

        let norm = state.norm_sqr().sqrt();
        state.scale(1.0 / norm);
        assert!(state.is_normalized(1e-12));
    }

    #[test]
    fn test_alignment() {
        let state = StateVector::new(5).unwrap();
        assert_eq!(state.amplitudes().as_ptr() as usize % BUFFER_ALIGNMENT, 0);
    }
}
