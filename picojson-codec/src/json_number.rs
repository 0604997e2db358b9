// SPDX-License-Identifier: Apache-2.0

use core::ops::Deref;
use core::str::FromStr;

use num_bigint::BigInt;

use crate::parse_error::ParseErrorKind;
use crate::value::Value;

/// The parsed value of a JSON number lexeme.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberValue {
    /// A lexeme without fraction or exponent, at any magnitude
    Integer(BigInt),
    Float(f64),
}

/// A JSON number holding both its exact text and its parsed value.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonNumber<'a> {
    raw: &'a str,
    parsed: NumberValue,
}

impl<'a> JsonNumber<'a> {
    /// Parse a number lexeme already validated by the tokenizer.
    ///
    /// Integers never overflow. A float that does not fit a finite `f64`
    /// is rejected with [`ParseErrorKind::NumberOutOfRange`].
    pub fn from_lexeme(raw: &'a str) -> Result<Self, ParseErrorKind> {
        let parsed = if is_integer(raw.as_bytes()) {
            NumberValue::Integer(
                BigInt::from_str(raw).map_err(|_| ParseErrorKind::InvalidNumber)?,
            )
        } else {
            let value = f64::from_str(raw).map_err(|_| ParseErrorKind::InvalidNumber)?;
            if !value.is_finite() {
                return Err(ParseErrorKind::NumberOutOfRange);
            }
            NumberValue::Float(value)
        };
        Ok(Self { raw, parsed })
    }

    pub fn parsed(&self) -> &NumberValue {
        &self.parsed
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Parse the raw text into any `FromStr` type, e.g. `rust_decimal` or `u128`
    pub fn parse<T: FromStr>(&self) -> Result<T, T::Err> {
        T::from_str(self.raw)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.parsed, NumberValue::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        !self.is_integer()
    }

    pub fn into_value(self) -> Value {
        match self.parsed {
            NumberValue::Integer(i) => Value::Integer(i),
            NumberValue::Float(f) => Value::Float(f),
        }
    }
}

impl AsRef<str> for JsonNumber<'_> {
    fn as_ref(&self) -> &str {
        self.raw
    }
}

impl Deref for JsonNumber<'_> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.raw
    }
}

impl core::fmt::Display for JsonNumber<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.raw)
    }
}

/// A lexeme is integral when it has no fraction and no exponent
pub fn is_integer(bytes: &[u8]) -> bool {
    !bytes.iter().any(|b| matches!(b, b'.' | b'e' | b'E'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_integer() {
        let number = JsonNumber::from_lexeme("-42").unwrap();
        assert!(number.is_integer());
        assert_eq!(number.parsed(), &NumberValue::Integer(BigInt::from(-42)));
        assert_eq!(number.as_str(), "-42");
        assert_eq!(number.parse::<i32>(), Ok(-42));
    }

    #[test]
    fn test_integer_beyond_i64() {
        let raw = "123456789012345678901234567890";
        let number = JsonNumber::from_lexeme(raw).unwrap();
        assert!(number.is_integer());
        assert_eq!(
            number.into_value(),
            Value::Integer(BigInt::from_str(raw).unwrap())
        );
    }

    #[test]
    fn test_float_forms() {
        for (raw, expected) in [("3.25", 3.25), ("-0.5", -0.5), ("1e3", 1000.0), ("2E-2", 0.02)] {
            let number = JsonNumber::from_lexeme(raw).unwrap();
            assert!(number.is_float(), "{raw}");
            assert_eq!(number.parsed(), &NumberValue::Float(expected));
        }
    }

    #[test]
    fn test_exponent_makes_float() {
        // 1e2 is integral in value but written as a float
        let number = JsonNumber::from_lexeme("1e2").unwrap();
        assert_eq!(number.into_value(), Value::Float(100.0));
    }

    #[test]
    fn test_float_out_of_range() {
        assert_eq!(
            JsonNumber::from_lexeme("1e400"),
            Err(ParseErrorKind::NumberOutOfRange)
        );
        assert_eq!(
            JsonNumber::from_lexeme("-1e400"),
            Err(ParseErrorKind::NumberOutOfRange)
        );
    }

    #[test]
    fn test_display_and_deref() {
        let number = JsonNumber::from_lexeme("6.02e23").unwrap();
        assert_eq!(format!("{number}"), "6.02e23");
        assert_eq!(number.len(), 7);
        assert_eq!(number.as_ref(), "6.02e23");
    }

    #[test]
    fn test_is_integer_detection() {
        assert!(is_integer(b"0"));
        assert!(is_integer(b"-17"));
        assert!(!is_integer(b"1.0"));
        assert!(!is_integer(b"1e5"));
        assert!(!is_integer(b"1E5"));
    }
}
