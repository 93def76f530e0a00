//! Circuit facade and kernel dispatch

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::kernels::{self, controlled, general, oracle, single_qubit, two_qubit};
use ketsim_core::{standard, Gate};
use ketsim_state::{measurement, StateError, StateVector};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::ThreadPool;
use smallvec::SmallVec;
use std::f64::consts::PI;
use std::fmt::Write as _;

/// An n-qubit register under gate-by-gate simulation.
///
/// The circuit owns the amplitude buffer, a same-shaped scratch buffer for
/// the general kernels, the worker pool and the measurement RNG. All
/// operations run in place and sequentially; the circuit itself must not
/// be shared across threads (parallelism lives inside a single gate
/// application).
///
/// Every operation validates its qubit arguments up front and leaves the
/// state untouched when validation fails.
///
/// # Example
///
/// ```
/// use ketsim_sim::Circuit;
///
/// // Bell pair.
/// let mut circuit = Circuit::new(2).unwrap();
/// circuit.h(0).unwrap();
/// circuit.cx(0, 1).unwrap();
///
/// let outcome = circuit.measure(&[0, 1]).unwrap();
/// assert!(outcome == 0b00 || outcome == 0b11);
/// ```
pub struct Circuit {
    /// Register width n
    num_qubits: usize,

    /// Current amplitudes, length 2ⁿ
    state: StateVector,

    /// Scratch for the general kernels, all-zero between operations
    scratch: StateVector,

    /// Dispatch options, consulted on every call
    config: SimConfig,

    /// Worker pool for parallel kernels, built on first use
    pool: Option<ThreadPool>,

    /// Measurement sampler
    rng: StdRng,
}

impl Circuit {
    /// Create a circuit of `num_qubits` qubits in state |0...0⟩ with
    /// default options.
    ///
    /// # Errors
    ///
    /// Fails with a capacity error when `num_qubits` is outside
    /// `1..=`[`ketsim_state::MAX_QUBITS`].
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::with_config(num_qubits, SimConfig::default())
    }

    /// Create a circuit with explicit options.
    pub fn with_config(num_qubits: usize, config: SimConfig) -> Result<Self> {
        config.validate().map_err(SimError::InvalidConfig)?;

        let state = StateVector::new(num_qubits)?;
        let scratch = StateVector::zeroed(num_qubits)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            num_qubits,
            state,
            scratch,
            config,
            pool: None,
            rng,
        })
    }

    /// Register width n.
    #[inline]
    pub fn size(&self) -> usize {
        self.num_qubits
    }

    /// Read-only view of the 2ⁿ amplitudes.
    #[inline]
    pub fn state(&self) -> &[Complex64] {
        self.state.amplitudes()
    }

    /// Current options.
    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Mutable options handle; changes apply from the next operation.
    #[inline]
    pub fn config_mut(&mut self) -> &mut SimConfig {
        &mut self.config
    }

    /// Re-initialize to the classical basis state |value⟩.
    pub fn set_bit(&mut self, value: usize) -> Result<()> {
        self.state.set_basis(value)?;
        Ok(())
    }

    /// Apply a k-qubit gate to `targets` (element 0 = least significant
    /// local bit).
    ///
    /// One- and two-qubit gates run the in-place specialized kernels,
    /// parallel when the register is wider than the configured threshold;
    /// higher arities run the serial scratch kernel.
    pub fn apply(&mut self, gate: &Gate, targets: &[usize]) -> Result<()> {
        self.check_targets(gate, targets)?;
        self.dispatch(gate, targets, 0);
        Ok(())
    }

    /// Apply `gate` to `targets` conditioned on every qubit in `controls`
    /// being 1. An empty control set is an unconditional [`apply`].
    ///
    /// [`apply`]: Circuit::apply
    pub fn control(&mut self, gate: &Gate, controls: &[usize], targets: &[usize]) -> Result<()> {
        self.check_targets(gate, targets)?;
        self.check_controls(controls, targets)?;
        self.dispatch(gate, targets, controlled::control_mask(controls));
        Ok(())
    }

    /// Embed the classical function `f` as |x⟩|y⟩ → |x⟩|y ⊕ f(x)⟩ over the
    /// given input and output registers.
    ///
    /// The registers must be disjoint; under that precondition the embedded
    /// map is a basis permutation and hence unitary for *any* f. Unlike
    /// [`apply`](Circuit::apply), no unitarity check is performed on `f`;
    /// callers own the disjointness of any further registers they model
    /// inside `f`.
    pub fn apply_oracle<F>(&mut self, f: F, in_regs: &[usize], out_regs: &[usize]) -> Result<()>
    where
        F: Fn(usize) -> usize,
    {
        self.check_register_set(in_regs)?;
        self.check_register_set(out_regs)?;
        for &q in in_regs {
            if out_regs.contains(&q) {
                return Err(SimError::OverlappingRegisters { index: q });
            }
        }

        let Self { state, scratch, .. } = self;
        oracle::apply(f, in_regs, out_regs, state, scratch);
        Ok(())
    }

    /// Measure `registers` in the computational basis, collapse the state
    /// and return the outcome (bit i = value of the i-th smallest measured
    /// qubit).
    pub fn measure(&mut self, registers: &[usize]) -> Result<usize> {
        let Self { state, rng, .. } = self;
        Ok(measurement::measure(state, registers, &mut || {
            rng.gen::<f64>()
        })?)
    }

    /// Outcome distribution for measuring `registers`, without collapsing.
    pub fn probabilities(&self, registers: &[usize]) -> Result<Vec<f64>> {
        Ok(measurement::probabilities(&self.state, registers)?)
    }

    /// Exchange qubits `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_qubit(a)?;
        self.check_qubit(b)?;
        if a == b {
            return Err(SimError::DuplicateQubit { index: a });
        }

        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let parallel = self.parallel_enabled();
        if parallel {
            self.ensure_pool()?;
        }

        let Self { state, pool, .. } = self;
        let amps = state.amplitudes_mut();
        match pool {
            Some(p) if parallel => p.install(|| two_qubit::swap_parallel(low, high, amps)),
            _ => two_qubit::swap_serial(low, high, amps),
        }
        Ok(())
    }

    /// Quantum Fourier transform on the register `[start, end)`.
    ///
    /// Hadamard plus controlled phase ladder from the top qubit down,
    /// finished by reversing the register with pairwise swaps.
    pub fn qft(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end)?;

        let phis = phase_table(end - start);
        for i in (start..end).rev() {
            self.h(i)?;
            for j in start..i {
                self.control(&standard::p(phis[i - j]), &[j], &[i])?;
            }
        }

        self.reverse_register(start, end)
    }

    /// Inverse quantum Fourier transform on `[start, end)`.
    pub fn inv_qft(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end)?;

        self.reverse_register(start, end)?;

        let phis = phase_table(end - start);
        for i in start..end {
            for j in start..i {
                self.control(&standard::p(-phis[i - j]), &[j], &[i])?;
            }
            self.h(i)?;
        }
        Ok(())
    }

    /// Identity on `target`: checks the index, touches nothing.
    pub fn i(&mut self, target: usize) -> Result<()> {
        self.check_qubit(target)
    }

    /// Pauli-X on `target`.
    pub fn x(&mut self, target: usize) -> Result<()> {
        self.apply(&standard::x(), &[target])
    }

    /// Pauli-Y on `target`.
    pub fn y(&mut self, target: usize) -> Result<()> {
        self.apply(&standard::y(), &[target])
    }

    /// Pauli-Z on `target`.
    pub fn z(&mut self, target: usize) -> Result<()> {
        self.apply(&standard::z(), &[target])
    }

    /// Hadamard on `target`.
    pub fn h(&mut self, target: usize) -> Result<()> {
        self.apply(&standard::h(), &[target])
    }

    /// Phase gate P(φ) on `target`.
    pub fn p(&mut self, phi: f64, target: usize) -> Result<()> {
        self.apply(&standard::p(phi), &[target])
    }

    /// S gate on `target`.
    pub fn s(&mut self, target: usize) -> Result<()> {
        self.apply(&standard::s(), &[target])
    }

    /// T gate on `target`.
    pub fn t(&mut self, target: usize) -> Result<()> {
        self.apply(&standard::t(), &[target])
    }

    /// Controlled NOT.
    pub fn cx(&mut self, control: usize, target: usize) -> Result<()> {
        self.control(&standard::x(), &[control], &[target])
    }

    /// Toffoli: X on `target` controlled on both `c0` and `c1`.
    pub fn ccx(&mut self, c0: usize, c1: usize, target: usize) -> Result<()> {
        self.control(&standard::x(), &[c0, c1], &[target])
    }

    /// Render the nonzero amplitudes as a sum of ket terms.
    pub fn format_state(&self) -> String {
        let mut out = String::new();
        for (basis, amp) in self.state.amplitudes().iter().enumerate() {
            if amp.norm() < 1e-6 {
                continue;
            }
            if !out.is_empty() {
                out.push_str(" + ");
            }
            let _ = write!(
                out,
                "({:.4}{:+.4}i)|{:0width$b}>",
                amp.re,
                amp.im,
                basis,
                width = self.num_qubits
            );
        }
        out
    }

    /// Route a (possibly controlled) gate to the right kernel. Targets and
    /// controls have been validated; `mask == 0` means unconditional.
    fn dispatch(&mut self, gate: &Gate, targets: &[usize], mask: usize) {
        let parallel = self.parallel_enabled() && gate.arity() <= 2;
        if parallel && self.ensure_pool().is_err() {
            // Pool construction failed; the serial kernels are always
            // available and semantically identical.
            return self.dispatch_serial(gate, targets, mask);
        }

        match gate.arity() {
            1 => {
                let m = kernels::as_2x2(gate);
                let target = targets[0];

                let Self { state, pool, .. } = self;
                let amps = state.amplitudes_mut();
                match pool {
                    Some(p) if parallel => p.install(|| {
                        if mask == 0 {
                            single_qubit::apply_parallel(&m, target, amps);
                        } else {
                            controlled::apply_single_parallel(&m, mask, target, amps);
                        }
                    }),
                    _ => {
                        if mask == 0 {
                            single_qubit::apply_serial(&m, target, amps);
                        } else {
                            controlled::apply_single_serial(&m, mask, target, amps);
                        }
                    }
                }
            }
            2 => {
                let (m, low, high) =
                    two_qubit::canonicalize(kernels::as_4x4(gate), targets[0], targets[1]);

                let Self { state, pool, .. } = self;
                let amps = state.amplitudes_mut();
                match pool {
                    Some(p) if parallel => p.install(|| {
                        if mask == 0 {
                            two_qubit::apply_parallel(&m, low, high, amps);
                        } else {
                            controlled::apply_two_parallel(&m, mask, low, high, amps);
                        }
                    }),
                    _ => {
                        if mask == 0 {
                            two_qubit::apply_serial(&m, low, high, amps);
                        } else {
                            controlled::apply_two_serial(&m, mask, low, high, amps);
                        }
                    }
                }
            }
            _ => {
                let Self { state, scratch, .. } = self;
                general::apply(gate, targets, mask, state, scratch);
            }
        }
    }

    /// Serial-only dispatch, the fallback when no pool can be built.
    fn dispatch_serial(&mut self, gate: &Gate, targets: &[usize], mask: usize) {
        match gate.arity() {
            1 => {
                let m = kernels::as_2x2(gate);
                let amps = self.state.amplitudes_mut();
                if mask == 0 {
                    single_qubit::apply_serial(&m, targets[0], amps);
                } else {
                    controlled::apply_single_serial(&m, mask, targets[0], amps);
                }
            }
            2 => {
                let (m, low, high) =
                    two_qubit::canonicalize(kernels::as_4x4(gate), targets[0], targets[1]);
                let amps = self.state.amplitudes_mut();
                if mask == 0 {
                    two_qubit::apply_serial(&m, low, high, amps);
                } else {
                    controlled::apply_two_serial(&m, mask, low, high, amps);
                }
            }
            _ => {
                let Self { state, scratch, .. } = self;
                general::apply(gate, targets, mask, state, scratch);
            }
        }
    }

    #[inline]
    fn parallel_enabled(&self) -> bool {
        self.num_qubits > self.config.parallel_threshold
    }

    /// Build (or rebuild) the worker pool to the configured thread count.
    fn ensure_pool(&mut self) -> Result<()> {
        let workers = self.config.worker_count.max(1);
        let rebuild = match &self.pool {
            Some(pool) => pool.current_num_threads() != workers,
            None => true,
        };

        if rebuild {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| SimError::ThreadPool(e.to_string()))?;
            self.pool = Some(pool);
        }
        Ok(())
    }

    fn check_qubit(&self, index: usize) -> Result<()> {
        if index >= self.num_qubits {
            return Err(StateError::QubitOutOfBounds {
                index,
                num_qubits: self.num_qubits,
            }
            .into());
        }
        Ok(())
    }

    /// Non-empty, in-bounds, pairwise-distinct register list.
    fn check_register_set(&self, registers: &[usize]) -> Result<()> {
        if registers.is_empty() {
            return Err(StateError::EmptyRegister.into());
        }
        for (i, &q) in registers.iter().enumerate() {
            self.check_qubit(q)?;
            if registers[..i].contains(&q) {
                return Err(SimError::DuplicateQubit { index: q });
            }
        }
        Ok(())
    }

    fn check_targets(&self, gate: &Gate, targets: &[usize]) -> Result<()> {
        if gate.arity() != targets.len() {
            return Err(SimError::ArityMismatch {
                arity: gate.arity(),
                targets: targets.len(),
            });
        }
        self.check_register_set(targets)
    }

    /// Controls in bounds and disjoint from targets (and each other).
    fn check_controls(&self, controls: &[usize], targets: &[usize]) -> Result<()> {
        for &c in controls {
            self.check_qubit(c)?;
        }

        let mut all: SmallVec<[usize; 8]> = SmallVec::with_capacity(controls.len() + targets.len());
        all.extend_from_slice(controls);
        all.extend_from_slice(targets);
        all.sort_unstable();
        for pair in all.windows(2) {
            if pair[0] == pair[1] {
                return Err(SimError::DuplicateQubit { index: pair[0] });
            }
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start >= end || end > self.num_qubits {
            return Err(SimError::InvalidRegisterRange { start, end });
        }
        Ok(())
    }

    fn reverse_register(&mut self, start: usize, end: usize) -> Result<()> {
        let (mut a, mut b) = (start, end - 1);
        while a < b {
            self.swap(a, b)?;
            a += 1;
            b -= 1;
        }
        Ok(())
    }
}

/// Controlled-phase angles for a QFT ladder: `phis[k] = π / 2ᵏ`.
fn phase_table(width: usize) -> Vec<f64> {
    (0..width).map(|k| PI / (1usize << k) as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn seeded(n: usize) -> Circuit {
        Circuit::with_config(n, SimConfig::new().with_seed(7)).unwrap()
    }

    #[test]
    fn test_new_starts_in_zero_state() {
        let circuit = Circuit::new(3).unwrap();
        assert_eq!(circuit.size(), 3);
        assert_abs_diff_eq!(circuit.state()[0].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_invalid_width() {
        assert!(Circuit::new(0).is_err());
        assert!(Circuit::new(ketsim_state::MAX_QUBITS + 1).is_err());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimConfig::new().with_worker_count(0);
        assert!(matches!(
            Circuit::with_config(2, config),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_set_bit_then_measure_roundtrip() {
        let mut circuit = seeded(4);
        circuit.set_bit(0b1010).unwrap();

        let outcome = circuit.measure(&[0, 1, 2, 3]).unwrap();
        assert_eq!(outcome, 0b1010);
    }

    #[test]
    fn test_identity_is_noop_but_bounds_checked() {
        let mut circuit = seeded(2);
        circuit.h(0).unwrap();
        let before: Vec<Complex64> = circuit.state().to_vec();

        circuit.i(1).unwrap();
        assert_eq!(circuit.state(), before.as_slice());
        assert!(circuit.i(2).is_err());
    }

    #[test]
    fn test_validation_errors() {
        let mut circuit = seeded(2);
        let h = standard::h();

        assert!(matches!(
            circuit.apply(&h, &[0, 1]),
            Err(SimError::ArityMismatch { arity: 1, targets: 2 })
        ));
        assert!(matches!(
            circuit.apply(&h, &[5]),
            Err(SimError::State(StateError::QubitOutOfBounds { .. }))
        ));
        assert!(matches!(
            circuit.control(&h, &[0], &[0]),
            Err(SimError::DuplicateQubit { index: 0 })
        ));
        assert!(matches!(
            circuit.swap(1, 1),
            Err(SimError::DuplicateQubit { index: 1 })
        ));
        assert!(matches!(
            circuit.qft(1, 1),
            Err(SimError::InvalidRegisterRange { start: 1, end: 1 })
        ));

        // Failed validation leaves the state untouched.
        assert_abs_diff_eq!(circuit.state()[0].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_oracle_register_overlap_rejected() {
        let mut circuit = seeded(3);
        assert!(matches!(
            circuit.apply_oracle(|x| x, &[0, 1], &[1]),
            Err(SimError::OverlappingRegisters { index: 1 })
        ));
    }

    #[test]
    fn test_empty_control_set_is_unconditional() {
        let mut direct = seeded(2);
        direct.h(0).unwrap();

        let mut controlled = seeded(2);
        controlled.control(&standard::h(), &[], &[0]).unwrap();

        for (a, b) in direct.state().iter().zip(controlled.state()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-12);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ccx_is_toffoli() {
        let mut circuit = seeded(3);
        circuit.set_bit(0b011).unwrap();
        circuit.ccx(0, 1, 2).unwrap();
        assert_abs_diff_eq!(circuit.state()[0b111].re, 1.0, epsilon = 1e-12);

        circuit.set_bit(0b001).unwrap();
        circuit.ccx(0, 1, 2).unwrap();
        assert_abs_diff_eq!(circuit.state()[0b001].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unsorted_two_qubit_targets_match_caller_order() {
        // CX built as a two-qubit matrix with targets listed high-first
        // must agree with the facade's cx helper.
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        // Control = local bit 0, target = local bit 1.
        let cnot = Gate::new(vec![
            vec![one, zero, zero, zero],
            vec![zero, zero, zero, one],
            vec![zero, zero, one, zero],
            vec![zero, one, zero, zero],
        ])
        .unwrap();

        let mut via_matrix = seeded(2);
        via_matrix.set_bit(0b10).unwrap();
        // Caller order [1, 0]: local bit 0 is qubit 1.
        via_matrix.apply(&cnot, &[1, 0]).unwrap();

        let mut via_facade = seeded(2);
        via_facade.set_bit(0b10).unwrap();
        via_facade.cx(1, 0).unwrap();

        for (a, b) in via_matrix.state().iter().zip(via_facade.state()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-12);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_format_state_lists_nonzero_terms() {
        let mut circuit = seeded(2);
        circuit.h(0).unwrap();
        let rendered = circuit.format_state();

        assert!(rendered.contains("|00>"));
        assert!(rendered.contains("|01>"));
        assert!(!rendered.contains("|10>"));
    }
}
