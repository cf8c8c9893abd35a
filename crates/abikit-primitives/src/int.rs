//! Signed 256-bit integer in sign-magnitude form

use std::fmt;
use std::str::FromStr;
use primitive_types::U256;
use thiserror::Error;

/// Signed integer error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntError {
    /// Magnitude does not fit into 256-bit two's complement
    #[error("value out of range for int256")]
    Overflow,
    /// Invalid decimal string
    #[error("invalid decimal integer: {0}")]
    InvalidDecimal(String),
}

/// Signed 256-bit integer
///
/// Stored as magnitude plus sign. Negative zero is normalized to zero, so
/// derived equality matches numeric equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I256 {
    abs: U256,
    negative: bool,
}

impl I256 {
    /// Zero
    pub const ZERO: I256 = I256 { abs: U256::zero(), negative: false };

    /// Create a new I256
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Convert to i128 if the value fits
    pub fn to_i128(&self) -> Option<i128> {
        if self.abs > U256::from(u128::MAX) {
            return None;
        }
        let abs = self.abs.as_u128();
        if self.negative {
            if abs > i128::MIN.unsigned_abs() {
                None
            } else {
                Some(0i128.wrapping_sub_unsigned(abs))
            }
        } else {
            i128::try_from(abs).ok()
        }
    }

    /// Absolute value
    pub fn abs(&self) -> U256 {
        self.abs
    }

    /// Sign (true if negative)
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether the value lies in `[-2^(bits-1), 2^(bits-1))`
    pub fn fits_bits(&self, bits: usize) -> bool {
        if bits == 0 || bits > 256 {
            return false;
        }
        let half = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= half
        } else {
            self.abs < half
        }
    }

    /// Encode as a 256-bit two's complement word
    pub fn to_twos_complement(&self) -> Result<U256, IntError> {
        if !self.fits_bits(256) {
            return Err(IntError::Overflow);
        }
        if self.negative {
            Ok((!self.abs).overflowing_add(U256::one()).0)
        } else {
            Ok(self.abs)
        }
    }

    /// Decode a 256-bit two's complement word
    pub fn from_twos_complement(word: U256) -> Self {
        if word.bit(255) {
            Self::new((!word).overflowing_add(U256::one()).0, true)
        } else {
            Self::new(word, false)
        }
    }

    /// Parse a decimal string with optional leading `-`
    pub fn from_dec_str(s: &str) -> Result<Self, IntError> {
        let (digits, negative) = match s.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        let abs = U256::from_dec_str(digits)
            .map_err(|_| IntError::InvalidDecimal(s.to_string()))?;
        Ok(Self::new(abs, negative))
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

impl FromStr for I256 {
    type Err = IntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(s)
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from_i128(value as i128)
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i256_from_i128() {
        let positive = I256::from_i128(100);
        assert!(!positive.is_negative());
        assert_eq!(positive.abs(), U256::from(100));

        let negative = I256::from_i128(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs(), U256::from(100));

        assert!(I256::from_i128(0).is_zero());
    }

    #[test]
    fn test_negative_zero_normalized() {
        assert_eq!(I256::new(U256::zero(), true), I256::ZERO);
        assert!(!I256::new(U256::zero(), true).is_negative());
    }

    #[test]
    fn test_minus_one_is_all_ones() {
        let word = I256::from_i128(-1).to_twos_complement().unwrap();
        assert_eq!(word, U256::MAX);
        assert_eq!(I256::from_twos_complement(U256::MAX), I256::from_i128(-1));
    }

    #[test]
    fn test_int256_min() {
        let min = I256::new(U256::one() << 255, true);
        let word = min.to_twos_complement().unwrap();
        assert_eq!(word, U256::one() << 255);
        assert_eq!(I256::from_twos_complement(word), min);
    }

    #[test]
    fn test_int256_overflow() {
        let too_big = I256::new(U256::one() << 255, false);
        assert_eq!(too_big.to_twos_complement(), Err(IntError::Overflow));
    }

    #[test]
    fn test_fits_bits() {
        assert!(I256::from_i128(127).fits_bits(8));
        assert!(!I256::from_i128(128).fits_bits(8));
        assert!(I256::from_i128(-128).fits_bits(8));
        assert!(!I256::from_i128(-129).fits_bits(8));
    }

    #[test]
    fn test_i128_roundtrip() {
        for v in [0i128, 1, -1, i128::MAX, i128::MIN] {
            assert_eq!(I256::from_i128(v).to_i128(), Some(v));
        }
        assert_eq!(I256::new(U256::MAX, false).to_i128(), None);
    }

    #[test]
    fn test_decimal_parse_and_display() {
        let v: I256 = "-12345678901234567890123".parse().unwrap();
        assert!(v.is_negative());
        assert_eq!(v.to_string(), "-12345678901234567890123");
        assert!(I256::from_dec_str("12x").is_err());
    }
}
