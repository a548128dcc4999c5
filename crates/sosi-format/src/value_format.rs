//! Spelling of individual values.

use sosi_tree::{Number, ReferenceNumber, Value};

use crate::scalar::{can_be_bare, quote};

/// Decides how each value is written.
pub trait ValueFormatter {
    /// Append the SOSI spelling of `value` to `out`.
    fn format_value(&self, value: &Value, out: &mut String);
}

/// The standard spelling:
/// strings bare when they re-lex as strings and quoted otherwise, numbers
/// in plain decimal notation, `N:`, `:N`/`:-N`, `(:1 :2)`, `@` and `*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValueFormatter;

impl ValueFormatter for DefaultValueFormatter {
    fn format_value(&self, value: &Value, out: &mut String) {
        match value {
            Value::String(text) if can_be_bare(text) => out.push_str(text),
            Value::String(text) => out.push_str(&quote(text)),
            Value::Number(number) => out.push_str(&plain_decimal(number)),
            Value::SerialNumber(serial) => {
                out.push_str(&serial.to_string());
                out.push(':');
            }
            Value::Reference(reference) => push_reference(reference, out),
            Value::ReferenceIsland(members) => {
                out.push('(');
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    push_reference(member, out);
                }
                out.push(')');
            }
            Value::Default => out.push('@'),
            Value::Unspecified => out.push('*'),
        }
    }
}

fn push_reference(reference: &ReferenceNumber, out: &mut String) {
    out.push(':');
    if reference.reversed {
        out.push('-');
    }
    out.push_str(&reference.number.to_string());
}

/// Zeros a plain spelling may add beyond the digits before switching to
/// exponent notation.
const MAX_PADDING: u64 = 20;

/// A number without exponent, keeping its scale (`12.50` stays `12.50`).
///
/// Numbers that would need more than [`MAX_PADDING`] extra zeros are written
/// as `digitsEexp` instead, which reads back as the same value.
pub fn plain_decimal(number: &Number) -> String {
    let decimal = match number {
        Number::Integer(i) => return i.to_string(),
        Number::Decimal(decimal) => decimal,
    };
    let (unscaled, scale) = decimal.as_bigint_and_exponent();
    let text = unscaled.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", text.as_str()),
    };

    let padding = if scale <= 0 {
        scale.unsigned_abs()
    } else {
        scale.unsigned_abs().saturating_sub(digits.len() as u64)
    };
    if padding > MAX_PADDING {
        if digits == "0" {
            return "0".to_string();
        }
        return format!("{sign}{digits}E{}", -i128::from(scale));
    }

    if scale <= 0 {
        let zeros = if digits == "0" { 0 } else { scale.unsigned_abs() as usize };
        return format!("{sign}{digits}{}", "0".repeat(zeros));
    }

    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{digits}", "0".repeat(scale - digits.len() + 1))
    } else {
        digits.to_string()
    };
    let (whole, fraction) = padded.split_at(padded.len() - scale);
    format!("{sign}{whole}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn format(value: &Value) -> String {
        let mut out = String::new();
        DefaultValueFormatter.format_value(value, &mut out);
        out
    }

    fn number(text: &str) -> Value {
        Value::Number(Number::parse(text).unwrap())
    }

    #[test]
    fn test_strings() {
        assert_eq!(format(&Value::string("Kum")), "Kum");
        assert_eq!(format(&Value::string("Ola Nordmann")), "\"Ola Nordmann\"");
        assert_eq!(format(&Value::string("42")), "\"42\"");
    }

    #[test]
    fn test_numbers_are_plain() {
        assert_eq!(format(&number("6700000")), "6700000");
        assert_eq!(format(&number("12345678901")), "12345678901");
        assert_eq!(format(&number("12.50")), "12.50");
        assert_eq!(format(&number("-0.001")), "-0.001");
        assert_eq!(format(&number(".5")), "0.5");
        assert_eq!(format(&number("1.5E3")), "1500");
        assert_eq!(format(&number("25D-1")), "2.5");
        assert_eq!(format(&number("1e20")), "100000000000000000000");
        assert_eq!(format(&number("1e-20")), "0.00000000000000000001");
    }

    #[test]
    fn test_huge_exponents_stay_short() {
        for text in ["1e999999999999", "-7e999999999999", "1e-999999999999"] {
            let original = Number::parse(text).unwrap();
            let written = plain_decimal(&original);
            assert!(written.len() < 32, "{text} written as {written}");
            assert_eq!(
                Number::parse(&written),
                Some(original),
                "{text} -> {written}"
            );
        }
        assert_eq!(plain_decimal(&Number::parse("1e21").unwrap()), "1E21");
        assert_eq!(plain_decimal(&Number::parse("-12e-30").unwrap()), "-12E-30");
        assert_eq!(
            plain_decimal(&Number::parse("0e-999999999999").unwrap()),
            "0"
        );
        assert_eq!(plain_decimal(&Number::parse("0.000").unwrap()), "0.000");
    }

    #[test]
    fn test_markers_and_references() {
        assert_eq!(format(&Value::SerialNumber(7)), "7:");
        assert_eq!(
            format(&Value::Reference(ReferenceNumber::new(3).reversed())),
            ":-3"
        );
        assert_eq!(
            format(&Value::ReferenceIsland(vec![
                ReferenceNumber::new(1).in_island(),
                ReferenceNumber::new(2).reversed().in_island(),
            ])),
            "(:1 :-2)"
        );
        assert_eq!(format(&Value::Default), "@");
        assert_eq!(format(&Value::Unspecified), "*");
    }
}
