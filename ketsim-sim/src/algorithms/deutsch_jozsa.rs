//! Deutsch–Jozsa: one oracle query decides constant vs. balanced

use crate::circuit::Circuit;
use crate::config::SimConfig;
use crate::error::{Result, SimError};

/// Verdict on the queried function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oracle {
    /// f is the same on every input
    Constant,
    /// f is 1 on exactly half of the inputs
    Balanced,
}

/// The all-zero function, a constant oracle.
pub fn constant(_x: usize) -> usize {
    0
}

/// Bit parity, a balanced oracle.
pub fn parity(x: usize) -> usize {
    (x.count_ones() & 1) as usize
}

/// Decide whether `f: {0,1}ⁿ → {0,1}` is constant or balanced with a
/// single oracle query on n input qubits plus one ancilla.
///
/// `f` must actually satisfy the promise; any other function makes the
/// final measurement land on neither all-zeros nor all-ones and the call
/// fails.
pub fn deutsch_jozsa<F>(n: usize, f: F) -> Result<Oracle>
where
    F: Fn(usize) -> usize,
{
    deutsch_jozsa_with_config(n, f, SimConfig::default())
}

/// [`deutsch_jozsa`] with explicit simulator options.
pub fn deutsch_jozsa_with_config<F>(n: usize, f: F, config: SimConfig) -> Result<Oracle>
where
    F: Fn(usize) -> usize,
{
    let inputs: Vec<usize> = (0..n).collect();

    // |0...0⟩|1⟩, then Hadamard everywhere.
    let mut circuit = Circuit::with_config(n + 1, config)?;
    circuit.x(n)?;
    for &q in &inputs {
        circuit.h(q)?;
    }
    circuit.h(n)?;

    circuit.apply_oracle(&f, &inputs, &[n])?;

    for &q in &inputs {
        circuit.h(q)?;
    }

    let outcome = circuit.measure(&inputs)?;
    log::debug!("deutsch-jozsa on {} inputs measured {}", n, outcome);

    if outcome == 0 {
        Ok(Oracle::Constant)
    } else if outcome == (1 << n) - 1 {
        Ok(Oracle::Balanced)
    } else {
        Err(SimError::IndeterminateOracle { outcome })
    }
}
