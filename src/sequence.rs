//! Secret and guess sequences.
//!
//! A [`Sequence`] is `SEQL` digits, each in `1..=COLS`. The secret is a
//! validated `Sequence`; a round's guess is a raw [`Guess`] because a
//! capture window with no presses yields digit 0.

use core::fmt;

use rand::Rng;

use crate::error::GameError;

/// Length of a sequence.
pub const SEQL: usize = 3;

/// Number of colours, i.e. the largest digit.
pub const COLS: u8 = 3;

/// A guess as assembled from button captures (digits `0..=COLS`).
pub type Guess = [u8; SEQL];

/// A validated sequence of `SEQL` digits in `1..=COLS`.
///
/// # Example
///
/// ```rust
/// use master_mind::Sequence;
///
/// let secret = Sequence::from_code(231).unwrap();
/// assert_eq!(secret.digits(), &[2, 3, 1]);
/// assert_eq!(secret.code(), 231);
/// assert_eq!(secret.to_string(), "2 3 1");
///
/// assert!(Sequence::from_code(241).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    digits: [u8; SEQL],
}

impl Sequence {
    /// Validates `digits`.
    pub fn new(digits: [u8; SEQL]) -> Result<Self, GameError> {
        for (position, &digit) in digits.iter().enumerate() {
            if !(1..=COLS).contains(&digit) {
                return Err(GameError::DigitOutOfRange { position, digit });
            }
        }
        Ok(Self { digits })
    }

    /// Decodes a decimal literal digit by digit, most significant first.
    ///
    /// `231` becomes `[2, 3, 1]`. Literals with more than `SEQL` digits are
    /// rejected; fewer digits show up as leading zeros, which are out of range.
    pub fn from_code(code: u32) -> Result<Self, GameError> {
        let limit = 10u32.pow(SEQL as u32);
        if code >= limit {
            return Err(GameError::InvalidCode(code));
        }
        let mut digits = [0u8; SEQL];
        let mut rest = code;
        for slot in digits.iter_mut().rev() {
            *slot = (rest % 10) as u8;
            rest /= 10;
        }
        Self::new(digits)
    }

    /// Draws each digit uniformly from `1..=COLS`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut digits = [0u8; SEQL];
        for slot in digits.iter_mut() {
            *slot = rng.gen_range(1..=COLS);
        }
        Self { digits }
    }

    /// The digits.
    #[inline]
    pub fn digits(&self) -> &[u8; SEQL] {
        &self.digits
    }

    /// The digits as a decimal literal (inverse of [`Self::from_code`]).
    pub fn code(&self) -> u32 {
        self.digits
            .iter()
            .fold(0u32, |acc, d| acc * 10 + u32::from(*d))
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, digit) in self.digits.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn new_accepts_in_range() {
        let seq = Sequence::new([1, 2, 3]).unwrap();
        assert_eq!(seq.digits(), &[1, 2, 3]);
    }

    #[test]
    fn new_rejects_zero() {
        assert_eq!(
            Sequence::new([1, 0, 3]),
            Err(GameError::DigitOutOfRange {
                position: 1,
                digit: 0
            })
        );
    }

    #[test]
    fn new_rejects_above_cols() {
        assert_eq!(
            Sequence::new([4, 1, 1]),
            Err(GameError::DigitOutOfRange {
                position: 0,
                digit: 4
            })
        );
    }

    // =========================================================================
    // Code Decoding Tests
    // =========================================================================

    #[test]
    fn from_code_decodes_digits() {
        assert_eq!(Sequence::from_code(123).unwrap().digits(), &[1, 2, 3]);
        assert_eq!(Sequence::from_code(311).unwrap().digits(), &[3, 1, 1]);
    }

    #[test]
    fn from_code_short_literal_has_leading_zero() {
        assert_eq!(
            Sequence::from_code(12),
            Err(GameError::DigitOutOfRange {
                position: 0,
                digit: 0
            })
        );
    }

    #[test]
    fn from_code_too_long() {
        assert_eq!(Sequence::from_code(1231), Err(GameError::InvalidCode(1231)));
    }

    #[test]
    fn code_inverts_from_code() {
        for code in [111, 123, 213, 333] {
            assert_eq!(Sequence::from_code(code).unwrap().code(), code);
        }
    }

    // =========================================================================
    // Random Generation Tests
    // =========================================================================

    #[test]
    fn random_digits_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let seq = Sequence::random(&mut rng);
            assert!(seq.digits().iter().all(|d| (1..=COLS).contains(d)));
        }
    }

    #[test]
    fn random_is_seed_deterministic() {
        let a = Sequence::random(&mut SmallRng::seed_from_u64(42));
        let b = Sequence::random(&mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn display_space_separated() {
        let seq = Sequence::new([3, 1, 2]).unwrap();
        assert_eq!(seq.to_string(), "3 1 2");
    }
}
