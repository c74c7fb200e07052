//! Base-N Integer Conversion
//!
//! Converts signed integers to and from strings in an arbitrary digit
//! alphabet. Used for short, URL-friendly identifiers (comment ids).
//!
//! ```rust
//! use platform::baseconv::{BASE16, BASE62};
//!
//! assert_eq!(BASE16.from_int(255), "FF");
//! assert_eq!(BASE62.to_int("-1z").unwrap(), -(62 + 61));
//! ```

use thiserror::Error;

pub const BASE2: BaseConverter = BaseConverter::new("01");
pub const BASE16: BaseConverter = BaseConverter::new("0123456789ABCDEF");
pub const BASE36: BaseConverter = BaseConverter::new("0123456789abcdefghijklmnopqrstuvwxyz");
pub const BASE62: BaseConverter =
    BaseConverter::new("0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");
/// Contains `-`, so negatives use `$` as the sign
pub const BASE64: BaseConverter =
    BaseConverter::new("0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_");

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BaseConvError {
    #[error("Empty input")]
    Empty,

    #[error("Invalid digit {0:?}")]
    InvalidDigit(char),

    #[error("Value does not fit in i64")]
    Overflow,
}

/// Converter for one digit alphabet
///
/// The first digit stands for zero. The sign character is `-` unless the
/// alphabet itself contains `-`, in which case it is `$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseConverter {
    digits: &'static str,
    sign: char,
}

impl BaseConverter {
    /// Alphabet must hold at least two distinct characters.
    ///
    /// # Panics
    ///
    /// On fewer than two characters; for a `const` this fails the build.
    pub const fn new(digits: &'static str) -> Self {
        let bytes = digits.as_bytes();
        let mut sign = '-';
        let mut chars = 0;
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'-' {
                sign = '$';
            }
            // UTF-8 continuation bytes do not start a character
            if bytes[i] & 0xC0 != 0x80 {
                chars += 1;
            }
            i += 1;
        }
        assert!(chars >= 2, "alphabet needs at least two digits");
        Self { digits, sign }
    }

    pub fn digits(&self) -> &'static str {
        self.digits
    }

    pub fn base(&self) -> usize {
        self.digits.chars().count()
    }

    pub fn sign(&self) -> char {
        self.sign
    }

    /// Encode `value` in this alphabet
    pub fn from_int(&self, value: i64) -> String {
        let digits: Vec<char> = self.digits.chars().collect();
        let base = digits.len() as u64;

        let mut rest = value.unsigned_abs();
        let mut out = Vec::new();
        loop {
            out.push(digits[(rest % base) as usize]);
            rest /= base;
            if rest == 0 {
                break;
            }
        }
        if value < 0 {
            out.push(self.sign);
        }
        out.iter().rev().collect()
    }

    /// Decode a string produced by [`from_int`](Self::from_int)
    pub fn to_int(&self, encoded: &str) -> Result<i64, BaseConvError> {
        let (negative, body) = match encoded.strip_prefix(self.sign) {
            Some(rest) => (true, rest),
            None => (false, encoded),
        };
        if body.is_empty() {
            return Err(BaseConvError::Empty);
        }

        let base = self.base() as u64;
        let mut magnitude: u64 = 0;
        for c in body.chars() {
            let digit = self
                .digits
                .chars()
                .position(|d| d == c)
                .ok_or(BaseConvError::InvalidDigit(c))? as u64;
            magnitude = magnitude
                .checked_mul(base)
                .and_then(|m| m.checked_add(digit))
                .ok_or(BaseConvError::Overflow)?;
        }

        let signed = if negative {
            -(magnitude as i128)
        } else {
            magnitude as i128
        };
        i64::try_from(signed).map_err(|_| BaseConvError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BaseConverter; 5] = [BASE2, BASE16, BASE36, BASE62, BASE64];

    #[test]
    fn test_roundtrip_small_range() {
        for conv in ALL {
            for n in -100..=100 {
                assert_eq!(conv.to_int(&conv.from_int(n)).unwrap(), n);
            }
        }
    }

    #[test]
    fn test_roundtrip_large_and_extreme() {
        let values = [
            -10_000_000_000,
            10_000_000_000,
            1_234_567_890_123,
            i64::MAX,
            i64::MIN,
            i64::MIN + 1,
        ];
        for conv in ALL {
            for n in values {
                assert_eq!(conv.to_int(&conv.from_int(n)).unwrap(), n, "{:?}", conv);
            }
        }
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(BASE2.from_int(0), "0");
        assert_eq!(BASE2.from_int(5), "101");
        assert_eq!(BASE2.from_int(-5), "-101");
        assert_eq!(BASE16.from_int(255), "FF");
        assert_eq!(BASE36.from_int(35), "z");
        assert_eq!(BASE36.from_int(36), "10");
        assert_eq!(BASE62.from_int(61), "z");
        assert_eq!(BASE62.from_int(62), "10");
        assert_eq!(BASE62.from_int(1234), "Ju");
        assert_eq!(BASE64.from_int(-63), "$_");
    }

    #[test]
    fn test_zero_is_first_digit() {
        for conv in ALL {
            let zero = conv.from_int(0);
            assert_eq!(zero.chars().next(), conv.digits().chars().next());
            assert_eq!(zero.chars().count(), 1);
        }
    }

    #[test]
    fn test_sign_character() {
        assert_eq!(BASE62.sign(), '-');
        assert_eq!(BASE64.sign(), '$');
        assert_eq!(BASE64.to_int("-").unwrap(), 62);
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(BASE2.to_int("102"), Err(BaseConvError::InvalidDigit('2')));
        assert_eq!(BASE16.to_int("ff"), Err(BaseConvError::InvalidDigit('f')));
        assert_eq!(BASE62.to_int(""), Err(BaseConvError::Empty));
        assert_eq!(BASE62.to_int("-"), Err(BaseConvError::Empty));
        assert_eq!(
            BASE2.to_int(&"1".repeat(65)),
            Err(BaseConvError::Overflow)
        );
        // 2^63 only fits as a negative number
        let two_pow_63 = format!("1{}", "0".repeat(63));
        assert_eq!(BASE2.to_int(&two_pow_63), Err(BaseConvError::Overflow));
        assert_eq!(BASE2.to_int(&format!("-{two_pow_63}")).unwrap(), i64::MIN);
    }

    #[test]
    #[should_panic(expected = "at least two digits")]
    fn test_single_digit_alphabet_is_rejected() {
        let _ = BaseConverter::new("0");
    }

    #[test]
    #[should_panic(expected = "at least two digits")]
    fn test_single_multibyte_digit_is_rejected() {
        let _ = BaseConverter::new("é");
    }

    #[test]
    fn test_two_multibyte_digits_are_binary() {
        let conv = BaseConverter::new("éü");
        assert_eq!(conv.base(), 2);
        assert_eq!(conv.from_int(2), "üé");
    }
}
