//! Dense unitary gate values

use crate::error::{GateError, Result};
use num_complex::Complex64;

/// Absolute tolerance for the unitarity check at gate construction.
pub const UNITARY_TOLERANCE: f64 = 1e-6;

/// A k-qubit unitary stored as a dense 2ᵏ×2ᵏ row-major matrix.
///
/// Columns index input basis states of the targeted qubits, rows index
/// output basis states; bit j of a local basis index is the value of the
/// j-th targeted qubit. Gates are plain values: cloning is a deep copy and
/// there is no interior mutability.
///
/// # Example
///
/// ```
/// use ketsim_core::Gate;
/// use num_complex::Complex64;
///
/// let h = std::f64::consts::FRAC_1_SQRT_2;
/// let gate = Gate::new(vec![
///     vec![Complex64::new(h, 0.0), Complex64::new(h, 0.0)],
///     vec![Complex64::new(h, 0.0), Complex64::new(-h, 0.0)],
/// ])
/// .unwrap();
/// assert_eq!(gate.arity(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    /// Row-major matrix elements, `dim * dim` of them
    elems: Vec<Complex64>,

    /// Matrix side, always `1 << arity`
    dim: usize,

    /// Number of qubits the gate acts on
    arity: usize,
}

impl Gate {
    /// Create a gate from matrix rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is not square, its side is not a
    /// power of two of at least 2, or it fails `M * M' = I` within
    /// [`UNITARY_TOLERANCE`].
    pub fn new(rows: Vec<Vec<Complex64>>) -> Result<Self> {
        let dim = rows.len();

        for row in &rows {
            if row.len() != dim {
                return Err(GateError::NotSquare {
                    rows: dim,
                    cols: row.len(),
                });
            }
        }

        if dim < 2 || !dim.is_power_of_two() {
            return Err(GateError::InvalidDimension { dim });
        }

        let mut elems = Vec::with_capacity(dim * dim);
        for row in rows {
            elems.extend(row);
        }

        let gate = Self::from_parts(dim, elems);
        gate.check_unitary()?;

        Ok(gate)
    }

    /// Build a gate from pre-validated parts. Callers guarantee that `dim`
    /// is a power of two >= 2, `elems.len() == dim * dim`, and the matrix
    /// is unitary.
    pub(crate) fn from_parts(dim: usize, elems: Vec<Complex64>) -> Self {
        debug_assert!(dim.is_power_of_two() && dim >= 2);
        debug_assert_eq!(elems.len(), dim * dim);

        Self {
            elems,
            dim,
            arity: dim.trailing_zeros() as usize,
        }
    }

    /// Number of qubits the gate acts on.
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Matrix side, `1 << arity()`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element at `(row, col)`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> Complex64 {
        self.elems[row * self.dim + col]
    }

    /// Row `row` as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[Complex64] {
        &self.elems[row * self.dim..(row + 1) * self.dim]
    }

    /// Tensor product `self ⊗ other`, a new gate acting on
    /// `self.arity() + other.arity()` qubits.
    ///
    /// In the product, `other` occupies the low local bits and `self` the
    /// high ones, matching the usual Kronecker convention.
    pub fn tensor(&self, other: &Gate) -> Gate {
        let dim = self.dim * other.dim;
        let mut elems = vec![Complex64::new(0.0, 0.0); dim * dim];

        for ra in 0..self.dim {
            for ca in 0..self.dim {
                let a = self.at(ra, ca);
                for rb in 0..other.dim {
                    for cb in 0..other.dim {
                        let row = ra * other.dim + rb;
                        let col = ca * other.dim + cb;
                        elems[row * dim + col] = a * other.at(rb, cb);
                    }
                }
            }
        }

        Gate::from_parts(dim, elems)
    }

    /// Verify `M * M' = I` within [`UNITARY_TOLERANCE`].
    fn check_unitary(&self) -> Result<()> {
        let mut deviation: f64 = 0.0;

        for i in 0..self.dim {
            let row_i = self.row(i);
            for j in i..self.dim {
                let row_j = self.row(j);
                let mut dot = Complex64::new(0.0, 0.0);
                for (a, b) in row_i.iter().zip(row_j) {
                    dot += *a * b.conj();
                }

                let expected = if i == j { 1.0 } else { 0.0 };
                deviation = deviation.max((dot - expected).norm());
            }
        }

        if deviation > UNITARY_TOLERANCE {
            return Err(GateError::NotUnitary { deviation });
        }

        Ok(())
    }
}
