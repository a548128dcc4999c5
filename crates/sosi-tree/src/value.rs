//! Value types for SOSI elements.
//!
//! Every value an element carries is one of a closed set of kinds:
//! - `"Oslo"` or `Oslo` is [`Value::String`]
//! - `6700000` or `12.50` is [`Value::Number`]
//! - `12:` is [`Value::SerialNumber`]
//! - `:12` or `:-12` is [`Value::Reference`]
//! - `(:1 :-2)` is [`Value::ReferenceIsland`]
//! - `@` is [`Value::Default`], `*` is [`Value::Unspecified`]

use sosi_parse::{Number, ReferenceNumber};

/// A value carried by an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Text, with any `&` concatenations already joined.
    String(String),
    /// An exact decimal number.
    Number(Number),
    /// `N:`, the serial number of a feature.
    SerialNumber(u64),
    /// `:N`, a reference to another feature.
    Reference(ReferenceNumber),
    /// `( ... )`, a group of references forming an island.
    ReferenceIsland(Vec<ReferenceNumber>),
    /// `@`
    Default,
    /// `*`
    Unspecified,
}

impl Value {
    /// Create a string value.
    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    /// Create a number value.
    pub fn number(number: impl Into<Number>) -> Self {
        Value::Number(number.into())
    }

    /// The text, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// The number, if this is a number.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(number) => Some(number),
            _ => None,
        }
    }

    /// The serial number, if this is one.
    pub fn as_serial_number(&self) -> Option<u64> {
        match self {
            Value::SerialNumber(serial) => Some(*serial),
            _ => None,
        }
    }

    /// The reference, if this is a single reference.
    pub fn as_reference(&self) -> Option<ReferenceNumber> {
        match self {
            Value::Reference(reference) => Some(*reference),
            _ => None,
        }
    }

    /// The members, if this is a reference island.
    pub fn as_island(&self) -> Option<&[ReferenceNumber]> {
        match self {
            Value::ReferenceIsland(members) => Some(members),
            _ => None,
        }
    }

    /// Check if this is `@`.
    pub fn is_default(&self) -> bool {
        matches!(self, Value::Default)
    }

    /// Check if this is `*`.
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Value::Unspecified)
    }

    /// Short name of the value kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::SerialNumber(_) => "serial number",
            Value::Reference(_) => "reference",
            Value::ReferenceIsland(_) => "reference island",
            Value::Default => "default",
            Value::Unspecified => "unspecified",
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        Value::Number(number)
    }
}

impl From<ReferenceNumber> for Value {
    fn from(reference: ReferenceNumber) -> Self {
        Value::Reference(reference)
    }
}
