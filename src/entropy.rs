//! Entropy estimation and crack-time modelling.
//!
//! The pool models the attacker's search space: each character class
//! present in the password contributes its full class size, regardless of
//! how many distinct characters the password actually uses.

use crate::analysis::{AnalysisError, CrackTime};
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeSet;

const LOWERCASE_POOL: usize = 26;
const UPPERCASE_POOL: usize = 26;
const DIGIT_POOL: usize = 10;
/// ASCII printable punctuation.
const SYMBOL_POOL: usize = 32;

/// Throttled online attack rate, guesses per second.
const ONLINE_RATE: f64 = 100.0;
/// Offline GPU-cluster attack rate, guesses per second.
const OFFLINE_RATE: f64 = 10_000_000_000.0;

/// Above this, crack time is reported as effectively uncrackable rather
/// than computed (2^128 seconds is already astronomical).
const SATURATION_BITS: f64 = 128.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyEstimate {
    pub entropy_bits: f64,
    pub character_pool_size: usize,
    pub crack_time_online: CrackTime,
    pub crack_time_offline: CrackTime,
}

/// Estimates entropy as `log2(pool) * length`.
///
/// # Errors
/// Returns [`AnalysisError::EmptyPassword`] for empty input.
pub fn estimate_entropy(password: &SecretString) -> Result<EntropyEstimate, AnalysisError> {
    let pwd = password.expose_secret();
    if pwd.is_empty() {
        return Err(AnalysisError::EmptyPassword);
    }

    let pool = character_pool_size(pwd);
    let length = pwd.chars().count();
    let entropy_bits = (pool as f64).log2() * length as f64;

    Ok(EntropyEstimate {
        entropy_bits,
        character_pool_size: pool,
        crack_time_online: crack_time(entropy_bits, ONLINE_RATE),
        crack_time_offline: crack_time(entropy_bits, OFFLINE_RATE),
    })
}

/// Sum of the class sizes present in the password. Characters outside the
/// four ASCII classes widen the pool by their exact code-point count, so
/// Unicode input is never undercounted.
fn character_pool_size(pwd: &str) -> usize {
    let mut pool = 0;
    if pwd.chars().any(|c| c.is_ascii_lowercase()) {
        pool += LOWERCASE_POOL;
    }
    if pwd.chars().any(|c| c.is_ascii_uppercase()) {
        pool += UPPERCASE_POOL;
    }
    if pwd.chars().any(|c| c.is_ascii_digit()) {
        pool += DIGIT_POOL;
    }
    if pwd.chars().any(|c| c.is_ascii_punctuation()) {
        pool += SYMBOL_POOL;
    }

    let residual: BTreeSet<char> = pwd
        .chars()
        .filter(|c| {
            !c.is_ascii_lowercase()
                && !c.is_ascii_uppercase()
                && !c.is_ascii_digit()
                && !c.is_ascii_punctuation()
        })
        .collect();
    pool + residual.len()
}

fn crack_time(entropy_bits: f64, guesses_per_second: f64) -> CrackTime {
    if entropy_bits <= 0.0 {
        return CrackTime::Seconds(0.0);
    }
    if entropy_bits > SATURATION_BITS {
        return CrackTime::EffectivelyInfinite;
    }
    CrackTime::Seconds(entropy_bits.exp2() / guesses_per_second)
}
