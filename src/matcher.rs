//! Exact and approximate match counting.
//!
//! Two passes over the positions, each position consumed at most once:
//!
//! 1. Equal digits at the same index are exact matches; both sides are consumed.
//! 2. Each unconsumed guess digit takes the first (lowest index) unconsumed
//!    secret position holding the same digit as an approximate match.
//!
//! The ascending scan decides which secret position a duplicate digit claims.
//!
//! # Example
//!
//! ```rust
//! use master_mind::matcher::{count_matches, MatchResult};
//!
//! let secret = [1, 1, 2];
//! let guess = [1, 2, 1];
//! assert_eq!(count_matches(&guess, &secret), MatchResult::new(1, 2));
//!
//! let result = count_matches(&[2, 2, 2], &[2, 3, 1]);
//! assert_eq!(result.encode(), 10);
//! ```

use core::fmt;

use crate::error::GameError;
use crate::sequence::Sequence;

/// Outcome of comparing a guess with the secret.
///
/// Invariant: `exact + approximate` never exceeds the sequence length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult {
    /// Right digit, right position.
    pub exact: u8,
    /// Right digit, wrong position.
    pub approximate: u8,
}

impl MatchResult {
    /// Creates a result.
    pub const fn new(exact: u8, approximate: u8) -> Self {
        Self { exact, approximate }
    }

    /// Encodes as `exact * 10 + approximate`.
    ///
    /// Reversible because both counts stay below 10 for sequences of at most
    /// nine digits.
    pub const fn encode(self) -> u8 {
        self.exact * 10 + self.approximate
    }

    /// Inverse of [`Self::encode`].
    pub const fn decode(code: u8) -> Self {
        Self {
            exact: code / 10,
            approximate: code % 10,
        }
    }

    /// Whether every one of `len` positions matched exactly.
    pub const fn is_solved(self, len: usize) -> bool {
        self.exact as usize == len
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} exact, {} approximate", self.exact, self.approximate)
    }
}

/// Longest sequence [`count_matches`] accepts, so that both counts fit one
/// decimal digit of [`MatchResult::encode`].
pub const MAX_MATCH_LEN: usize = 9;

/// Counts exact and approximate matches of `guess` against `secret`.
///
/// `O(N²)`, deterministic, no allocation. `N` is limited to
/// [`MAX_MATCH_LEN`]; longer arrays are rejected at compile time:
///
/// ```compile_fail
/// use master_mind::matcher::count_matches;
///
/// let _ = count_matches(&[1u8; 10], &[1u8; 10]);
/// ```
pub fn count_matches<const N: usize>(guess: &[u8; N], secret: &[u8; N]) -> MatchResult {
    const { assert!(N <= MAX_MATCH_LEN, "sequence too long to encode") };

    let mut guess_used = [false; N];
    let mut secret_used = [false; N];
    let mut result = MatchResult::default();

    for i in 0..N {
        if guess[i] == secret[i] {
            result.exact += 1;
            guess_used[i] = true;
            secret_used[i] = true;
        }
    }

    for i in 0..N {
        if guess_used[i] {
            continue;
        }
        let hit = (0..N).find(|&j| !secret_used[j] && guess[i] == secret[j]);
        if let Some(j) = hit {
            result.approximate += 1;
            guess_used[i] = true;
            secret_used[j] = true;
        }
    }

    result
}

/// Matches two sequence literals, e.g. `check_codes(123, 321)`.
///
/// Both literals are decoded and validated like a secret; an out-of-range
/// digit is an error.
pub fn check_codes(guess: u32, secret: u32) -> Result<MatchResult, GameError> {
    let guess = Sequence::from_code(guess)?;
    let secret = Sequence::from_code(secret)?;
    Ok(count_matches(guess.digits(), secret.digits()))
}
