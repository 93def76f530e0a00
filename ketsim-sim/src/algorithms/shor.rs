//! Shor's factoring algorithm
//!
//! Quantum order finding on 3n qubits (n = bit length of the number),
//! followed by continued-fraction post-processing. Each attempt picks a
//! random base; the loop retries until a nontrivial factor appears or the
//! attempt cap is hit (prime input exhausts the cap).

use super::fraction::Fraction;
use super::number::{bit_len, gcd, pow_mod};
use crate::circuit::Circuit;
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Retry cap; each attempt succeeds with probability around one half.
const MAX_ATTEMPTS: usize = 64;

/// Find a nontrivial factor of `n`.
pub fn factor(n: u64) -> Result<u64> {
    factor_with_config(n, SimConfig::default())
}

/// [`factor`] with explicit simulator options. A configured seed makes the
/// base selection and every measurement deterministic.
pub fn factor_with_config(n: u64, config: SimConfig) -> Result<u64> {
    if n < 4 {
        return Err(SimError::FactorizationFailed { n, attempts: 0 });
    }
    if n % 2 == 0 {
        return Ok(2);
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for attempt in 0..MAX_ATTEMPTS {
        if let Some(found) = attempt_factor(n, &mut rng, &config)? {
            log::info!("factored {} = {} * {} after {} attempts", n, found, n / found, attempt + 1);
            return Ok(found);
        }
    }

    Err(SimError::FactorizationFailed {
        n,
        attempts: MAX_ATTEMPTS,
    })
}

/// One order-finding round. Returns a nontrivial factor if this round's
/// random base produced one.
fn attempt_factor(n: u64, rng: &mut StdRng, config: &SimConfig) -> Result<Option<u64>> {
    let a = rng.gen_range(2..n);

    // A base sharing a factor with n already answers the question.
    let g = gcd(a, n);
    if g != 1 {
        return Ok(Some(g));
    }

    let width = bit_len(n);
    let inputs: Vec<usize> = (width..3 * width).collect();
    let outputs: Vec<usize> = (0..width).collect();

    log::debug!("order finding with base {} on {} qubits", a, 3 * width);

    let mut circuit = Circuit::with_config(3 * width, config.clone())?;
    circuit.set_bit((1 << width) - 1)?;

    for &q in &inputs {
        circuit.h(q)?;
    }
    circuit.apply_oracle(
        |x| pow_mod(a, x as u64, n) as usize,
        &inputs,
        &outputs,
    )?;
    circuit.inv_qft(width, 3 * width)?;

    let y = circuit.measure(&inputs)? as u64;
    log::debug!("phase estimate {} / 2^{}", y, 2 * width);

    // The measured phase approximates s/r; recover r from the deepest
    // convergent whose denominator still fits below n.
    let mut order = 1;
    for conv in Fraction::new(y, 1 << (2 * width)).convergents().iter().rev() {
        order = conv.den;
        if order < n {
            break;
        }
    }

    let base = pow_mod(a, order / 2, n);
    for candidate in [base - 1, base + 1] {
        let f = gcd(candidate, n);
        if f != 1 && f != n && n % f == 0 {
            return Ok(Some(f));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_fifteen() {
        let config = SimConfig::new().with_seed(3);
        let f = factor_with_config(15, config).unwrap();
        assert!(f == 3 || f == 5);
    }

    #[test]
    fn test_even_shortcut() {
        assert_eq!(factor(14).unwrap(), 2);
    }

    #[test]
    fn test_prime_exhausts_attempts() {
        let config = SimConfig::new().with_seed(1);
        assert!(matches!(
            factor_with_config(7, config),
            Err(SimError::FactorizationFailed { n: 7, .. })
        ));
    }
}
