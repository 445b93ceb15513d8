//! # Channel Counts
//!
//! The truncated tensor algebra over `c` channels up to depth `n` stores
//! its degree-`k` block in `c^k` scalars, so a signature has
//! `c + c^2 + ... + c^n` channels.
//!
//! The log-signature lives in the truncated free Lie algebra instead. Its
//! degree-`k` part has dimension given by Witt's formula
//!
//! ```text
//! w(c, k) = (1/k) Σ_{d | k} μ(d) c^(k/d)
//! ```
//!
//! where `μ` is the Möbius function. In `Expand` mode the log-signature is
//! reported in the full tensor algebra and has as many channels as the
//! signature.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SigError;

/// How a log-signature is represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSignatureMode {
    /// Every coefficient of the tensor algebra logarithm.
    Expand,
    /// Coefficients in the Lyndon bracket basis.
    Brackets,
    /// Coefficients of the Lyndon words.
    #[default]
    Words,
}

impl LogSignatureMode {
    pub const ALL: [LogSignatureMode; 3] = [Self::Expand, Self::Brackets, Self::Words];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expand => "expand",
            Self::Brackets => "brackets",
            Self::Words => "words",
        }
    }
}

impl fmt::Display for LogSignatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogSignatureMode {
    type Err = SigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expand" => Ok(Self::Expand),
            "brackets" => Ok(Self::Brackets),
            "words" => Ok(Self::Words),
            _ => Err(SigError::invalid_argument(
                "Argument 'mode' must be one of 'expand', 'brackets' or 'words'.",
            )),
        }
    }
}

/// Number of signature channels, or `None` if it overflows `usize`.
pub fn checked_signature_channels(channels: usize, depth: usize) -> Option<usize> {
    let mut total: usize = 0;
    let mut block: usize = 1;
    for _ in 0..depth {
        block = block.checked_mul(channels)?;
        total = total.checked_add(block)?;
    }
    Some(total)
}

/// Number of signature channels: `Σ_{i=1..depth} channels^i`.
///
/// # Panics
///
/// If the count does not fit in `usize`. No tensor of that size could be
/// allocated anyway.
pub fn signature_channels(channels: usize, depth: usize) -> usize {
    match checked_signature_channels(channels, depth) {
        Some(total) => total,
        None => panic!(
            "signature of {} channels at depth {} has more than usize::MAX channels",
            channels, depth
        ),
    }
}

/// Number of log-signature channels, or `None` if it overflows `usize`.
pub fn checked_logsignature_channels(
    channels: usize,
    depth: usize,
    mode: LogSignatureMode,
) -> Option<usize> {
    match mode {
        LogSignatureMode::Expand => checked_signature_channels(channels, depth),
        LogSignatureMode::Brackets | LogSignatureMode::Words => (1..=depth)
            .try_fold(0usize, |acc, k| acc.checked_add(lyndon_words_of_length(channels, k)?)),
    }
}

/// Number of log-signature channels for the given representation.
///
/// # Panics
///
/// On `usize` overflow, as for [`signature_channels`].
pub fn logsignature_channels(channels: usize, depth: usize, mode: LogSignatureMode) -> usize {
    match checked_logsignature_channels(channels, depth, mode) {
        Some(total) => total,
        None => panic!(
            "log-signature of {} channels at depth {} has more than usize::MAX channels",
            channels, depth
        ),
    }
}

/// Witt's formula: the number of Lyndon words of length `k` over an
/// alphabet of `channels` letters, or `None` if it does not fit in `usize`.
fn lyndon_words_of_length(channels: usize, k: usize) -> Option<usize> {
    let c = i128::try_from(channels).ok()?;
    let mut sum: i128 = 0;
    for d in divisors(k) {
        let mu = mobius(d);
        if mu == 0 {
            continue;
        }
        let term = checked_pow_i128(c, k / d)?.checked_mul(mu as i128)?;
        sum = sum.checked_add(term)?;
    }
    usize::try_from(sum / k as i128).ok()
}

fn checked_pow_i128(base: i128, exp: usize) -> Option<i128> {
    let mut acc: i128 = 1;
    for _ in 0..exp {
        acc = acc.checked_mul(base)?;
    }
    Some(acc)
}

fn divisors(n: usize) -> impl Iterator<Item = usize> {
    (1..=n).filter(move |d| n % d == 0)
}

/// Möbius function by trial division.
fn mobius(mut n: usize) -> i8 {
    let mut result = 1;
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            n /= p;
            if n % p == 0 {
                return 0;
            }
            result = -result;
        }
        p += 1;
    }
    if n > 1 {
        result = -result;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_channels_small() {
        assert_eq!(signature_channels(3, 1), 3);
        assert_eq!(signature_channels(3, 3), 39);
        assert_eq!(signature_channels(2, 4), 30);
        assert_eq!(signature_channels(1, 5), 5);
    }

    #[test]
    fn test_signature_channels_overflow() {
        assert_eq!(checked_signature_channels(usize::MAX, 2), None);
        assert_eq!(checked_signature_channels(2, 1), Some(2));
    }

    #[test]
    fn test_mobius() {
        let expected = [1, -1, -1, 0, -1, 1, -1, 0, 0, 1];
        for (n, mu) in (1..=10).zip(expected) {
            assert_eq!(mobius(n), mu, "mu({})", n);
        }
    }

    #[test]
    fn test_lyndon_counts() {
        // Binary Lyndon words: 2, 1, 2, 3, 6, 9
        let counts: Vec<Option<usize>> =
            (1..=6).map(|k| lyndon_words_of_length(2, k)).collect();
        assert_eq!(counts, [2, 1, 2, 3, 6, 9].map(Some));
    }

    #[test]
    fn test_logsignature_channels() {
        assert_eq!(logsignature_channels(2, 3, LogSignatureMode::Words), 5);
        assert_eq!(logsignature_channels(3, 3, LogSignatureMode::Brackets), 14);
        assert_eq!(logsignature_channels(3, 3, LogSignatureMode::Expand), 39);
        // A single channel only has the degree one word.
        assert_eq!(logsignature_channels(1, 6, LogSignatureMode::Words), 1);
    }

    #[test]
    fn test_logsignature_channels_overflow() {
        // (2^32)^3 / 3 Lyndon words of length three do not fit in 64 bits.
        let wide = 1usize << 32;
        for mode in LogSignatureMode::ALL {
            assert_eq!(checked_logsignature_channels(wide, 3, mode), None);
        }
        assert_eq!(
            checked_logsignature_channels(wide, 1, LogSignatureMode::Words),
            Some(wide)
        );
        assert_eq!(checked_logsignature_channels(usize::MAX, 3, LogSignatureMode::Words), None);
    }

    #[test]
    #[should_panic(expected = "has more than usize::MAX channels")]
    fn test_logsignature_channels_overflow_panics() {
        let _ = logsignature_channels(1 << 32, 3, LogSignatureMode::Words);
    }

    #[test]
    fn test_mode_parse_and_display() {
        for mode in LogSignatureMode::ALL {
            assert_eq!(mode.to_string().parse::<LogSignatureMode>().unwrap(), mode);
        }
        let err = "lyndon".parse::<LogSignatureMode>().unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_mode_default_is_words() {
        assert_eq!(LogSignatureMode::default(), LogSignatureMode::Words);
    }
}
