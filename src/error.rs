//! Error type for sequence validation and the test-mode matcher path.
//!
//! The hardware layers are infallible (no status read-back), so the only
//! errors are invalid digits and invalid sequence literals.

use core::fmt;

/// Errors raised while building sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameError {
    /// A digit is outside `1..=COLS`.
    DigitOutOfRange {
        /// Zero-based position in the sequence.
        position: usize,
        /// The offending digit.
        digit: u8,
    },
    /// A numeric literal does not have exactly `SEQL` digits.
    InvalidCode(u32),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DigitOutOfRange { position, digit } => write!(
                f,
                "digit {} at position {} is out of range 1..={}",
                digit,
                position + 1,
                crate::sequence::COLS
            ),
            Self::InvalidCode(code) => write!(
                f,
                "{} is not a {}-digit sequence",
                code,
                crate::sequence::SEQL
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}
