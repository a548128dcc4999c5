//! Document tree for SOSI files.
//!
//! This crate builds an immutable [`Document`] from the events of a
//! [`sosi_parse::Parser`], and renders parse failures with ariadne.

use std::io::Read;

mod builder;
mod diagnostic;
mod element;
mod error;
mod value;

pub use builder::DocumentBuilder;
pub use diagnostic::ParseDiagnostic;
pub use element::{Element, ElementBuilder};
pub use error::TreeError;
pub use sosi_parse::{
    Charset, END_NAME, HEAD_NAME, Location, Number, ParseError, Parser, ParserFeatures,
    ReferenceNumber,
};
pub use value::Value;

/// A parsed SOSI document.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    end: Location,
    charset: Charset,
}

impl Document {
    /// Assemble a document from top-level elements, the first being the head.
    pub fn new(elements: Vec<Element>, charset: Charset) -> Result<Self, TreeError> {
        Self::from_parts(elements, Location::UNKNOWN, charset)
    }

    pub(crate) fn from_parts(
        elements: Vec<Element>,
        end: Location,
        charset: Charset,
    ) -> Result<Self, TreeError> {
        match elements.first() {
            None => return Err(TreeError::Invalid("no elements".to_string())),
            Some(first) if !first.is_named(HEAD_NAME) => {
                return Err(TreeError::Invalid(format!(
                    "first element is {}, not {HEAD_NAME}",
                    first.name()
                )));
            }
            Some(_) => {}
        }
        if elements[1..].iter().any(|e| e.is_named(HEAD_NAME)) {
            return Err(TreeError::Invalid(format!("more than one {HEAD_NAME}")));
        }
        Ok(Self {
            elements,
            end,
            charset,
        })
    }

    /// Parse already-decoded text strictly.
    pub fn parse(source: &str) -> Result<Self, TreeError> {
        Self::parse_with(source, ParserFeatures::default())
    }

    /// Parse already-decoded text.
    pub fn parse_with(source: &str, features: ParserFeatures) -> Result<Self, TreeError> {
        let mut parser = Parser::with_features(source, features);
        DocumentBuilder::new(&mut parser).build()
    }

    /// Read raw bytes strictly, detecting the charset.
    pub fn read<R: Read>(reader: R) -> Result<Self, TreeError> {
        Self::read_with(reader, ParserFeatures::default())
    }

    /// Read raw bytes, detecting the charset.
    pub fn read_with<R: Read>(reader: R, features: ParserFeatures) -> Result<Self, TreeError> {
        let mut parser = Parser::from_reader(reader, features)?;
        DocumentBuilder::new(&mut parser).build()
    }

    /// The `HODE` element.
    pub fn head(&self) -> &Element {
        &self.elements[0]
    }

    /// All top-level elements, head included.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Top-level elements after the head.
    pub fn features(&self) -> &[Element] {
        &self.elements[1..]
    }

    /// Location of the closing `SLUTT`.
    pub fn end(&self) -> Location {
        self.end
    }

    /// The charset the source was decoded with.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Top-level elements with the given name.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements.iter().filter(move |e| e.is_named(name))
    }

    /// Get an element by a dot-separated path from the top level, e.g.
    /// `"HODE.TEGNSETT"`.
    pub fn get(&self, path: &str) -> Option<&Element> {
        let (first, rest) = match path.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (path, None),
        };
        let element = self.elements.iter().find(|e| e.is_named(first))?;
        match rest {
            Some(rest) => element.get(rest),
            None => Some(element),
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Eq for Document {}

#[cfg(test)]
mod tests;
