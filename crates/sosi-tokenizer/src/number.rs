//! Numeric literals.
//!
//! SOSI numbers are written as `[+-]?digits?(.digits)?([eEdD][+-]?digits)?`.
//! Short integers take a fast path into `i64`; everything else is kept as an
//! exact decimal so that `1.50` keeps its scale.
//!
//! In a token stream an unsigned leading point (`.5`) is always a level
//! marker, so that form only reaches [`NumberForm::classify`] with a sign
//! (`-.5`) or through [`Number::parse`] directly.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};

/// The most digits an integer literal may have and still take the fast path.
const FAST_PATH_DIGITS: usize = 9;

/// How a numeric literal was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberForm {
    /// An integer short enough to parse without a decimal.
    FastInteger,
    /// An integer too long for the fast path.
    Integral,
    /// A literal with a fraction or an exponent.
    Fractional,
}

impl NumberForm {
    /// Classify `text`, returning `None` if it is not a number.
    pub fn classify(text: &str) -> Option<NumberForm> {
        let b = text.as_bytes();
        let mut i = 0;
        if matches!(b.first(), Some(b'+' | b'-')) {
            i += 1;
        }

        let int_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        let int_digits = i - int_start;

        let mut marker = false;
        let mut frac_digits = 0;
        if i < b.len() && b[i] == b'.' {
            i += 1;
            let frac_start = i;
            while i < b.len() && b[i].is_ascii_digit() {
                i += 1;
            }
            frac_digits = i - frac_start;
            if frac_digits == 0 {
                return None;
            }
            marker = true;
        }
        if int_digits + frac_digits == 0 {
            return None;
        }

        if i < b.len() && matches!(b[i], b'e' | b'E' | b'd' | b'D') {
            i += 1;
            if i < b.len() && matches!(b[i], b'+' | b'-') {
                i += 1;
            }
            let exp_start = i;
            while i < b.len() && b[i].is_ascii_digit() {
                i += 1;
            }
            if i == exp_start {
                return None;
            }
            marker = true;
        }

        if i != b.len() {
            return None;
        }
        Some(if marker {
            NumberForm::Fractional
        } else if int_digits <= FAST_PATH_DIGITS {
            NumberForm::FastInteger
        } else {
            NumberForm::Integral
        })
    }
}

/// A SOSI number.
///
/// Equality and hashing follow the numeric value: `1`, `1.0` and `1.00`
/// are equal.
#[derive(Debug, Clone)]
pub enum Number {
    /// A short integer read on the fast path.
    Integer(i64),
    /// An exact decimal.
    Decimal(BigDecimal),
}

impl Number {
    /// Parse a numeric literal.
    pub fn parse(text: &str) -> Option<Number> {
        let form = NumberForm::classify(text)?;
        Number::from_classified(text, form)
    }

    /// Parse a literal that has already been classified.
    pub fn from_classified(text: &str, form: NumberForm) -> Option<Number> {
        match form {
            NumberForm::FastInteger => Some(Number::Integer(parse_fast(text))),
            NumberForm::Integral | NumberForm::Fractional => {
                parse_decimal(text).map(Number::Decimal)
            }
        }
    }

    /// Whether this number was read without fraction or exponent, or has scale zero.
    pub fn is_integral(&self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Decimal(d) => d.as_bigint_and_exponent().1 == 0,
        }
    }

    /// The value as an `i64`, if it is integral and fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Decimal(d) if self.is_integral() => d.to_i64(),
            Number::Decimal(_) => None,
        }
    }

    /// The value as an `f64`, possibly losing precision.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// The value as an exact decimal.
    pub fn to_decimal(&self) -> BigDecimal {
        match self {
            Number::Integer(i) => BigDecimal::from(*i),
            Number::Decimal(d) => d.clone(),
        }
    }
}

fn parse_fast(text: &str) -> i64 {
    let bytes = text.as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    let value = digits
        .iter()
        .fold(0i64, |acc, d| acc * 10 + i64::from(d - b'0'));
    if negative { -value } else { value }
}

fn parse_decimal(text: &str) -> Option<BigDecimal> {
    let (sign, unsigned) = match text.as_bytes().first() {
        Some(b'-') => ("-", &text[1..]),
        Some(b'+') => ("", &text[1..]),
        _ => ("", text),
    };
    let zero = if unsigned.starts_with('.') { "0" } else { "" };
    let normalized = format!("{sign}{zero}{}", unsigned.replace(['d', 'D'], "e"));
    BigDecimal::from_str(&normalized).ok()
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            _ => self.to_decimal() == other.to_decimal(),
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Number::Integer(i) => i.hash(state),
            Number::Decimal(d) => {
                let normalized = d.normalized();
                match normalized.to_i64() {
                    Some(i) if normalized.is_integer() => i.hash(state),
                    _ => normalized.as_bigint_and_exponent().hash(state),
                }
            }
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<BigDecimal> for Number {
    fn from(value: BigDecimal) -> Self {
        Number::Decimal(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Decimal(d) => write!(f, "{d}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(n: &Number) -> u64 {
        let mut hasher = DefaultHasher::new();
        n.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_classify() {
        assert_eq!(NumberForm::classify("0"), Some(NumberForm::FastInteger));
        assert_eq!(
            NumberForm::classify("-123456789"),
            Some(NumberForm::FastInteger)
        );
        assert_eq!(
            NumberForm::classify("+123456789"),
            Some(NumberForm::FastInteger)
        );
        assert_eq!(
            NumberForm::classify("1234567890"),
            Some(NumberForm::Integral)
        );
        assert_eq!(NumberForm::classify("1.5"), Some(NumberForm::Fractional));
        assert_eq!(NumberForm::classify(".5"), Some(NumberForm::Fractional));
        assert_eq!(NumberForm::classify("1e5"), Some(NumberForm::Fractional));
        assert_eq!(NumberForm::classify("1.5D-3"), Some(NumberForm::Fractional));
        assert_eq!(NumberForm::classify("1."), None);
        assert_eq!(NumberForm::classify("."), None);
        assert_eq!(NumberForm::classify("-"), None);
        assert_eq!(NumberForm::classify("e5"), None);
        assert_eq!(NumberForm::classify("1e"), None);
        assert_eq!(NumberForm::classify("12a"), None);
        assert_eq!(NumberForm::classify(""), None);
    }

    #[test]
    fn test_fast_path_values() {
        assert_eq!(Number::parse("42"), Some(Number::Integer(42)));
        assert_eq!(Number::parse("-7"), Some(Number::Integer(-7)));
        assert!(matches!(Number::parse("+999999999"), Some(Number::Integer(999_999_999))));
    }

    #[test]
    fn test_decimal_path_keeps_scale() {
        let n = Number::parse("1.50").unwrap();
        assert!(!n.is_integral());
        assert_eq!(n, Number::parse("1.5").unwrap());
        assert_eq!(n.to_decimal().as_bigint_and_exponent().1, 2);
    }

    #[test]
    fn test_d_exponent_and_leading_point() {
        assert_eq!(Number::parse("1.5d2"), Number::parse("150"));
        assert_eq!(Number::parse("-.25"), Number::parse("-0.25"));
        assert_eq!(Number::parse("+.25E1").unwrap().as_f64(), 2.5);
    }

    #[test]
    fn test_integrality() {
        assert!(Number::parse("12345678901").unwrap().is_integral());
        assert_eq!(
            Number::parse("12345678901").unwrap().as_i64(),
            Some(12_345_678_901)
        );
        assert!(!Number::parse("1.0").unwrap().is_integral());
        assert!(!Number::parse("1e3").unwrap().is_integral());
        assert_eq!(Number::parse("1.0").unwrap().as_i64(), None);
    }

    #[test]
    fn test_equality_and_hash_follow_value() {
        let a = Number::Integer(100);
        let b = Number::parse("100.00").unwrap();
        let c = Number::parse("1e2").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(hash_of(&a), hash_of(&c));
        assert_ne!(a, Number::Integer(101));
    }
}
