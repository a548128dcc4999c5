//! Elements and their builder.

use sosi_parse::Location;

use crate::Value;

/// A named element with its values and child elements.
///
/// Equality ignores locations and compares names case-insensitively.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    location: Location,
    values: Vec<Value>,
    children: Vec<Element>,
}

impl Element {
    /// The name as written, without the level marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check the name, ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Location of the name in the source, or [`Location::UNKNOWN`].
    pub fn location(&self) -> Location {
        self.location
    }

    /// Values in source order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The first value, if any.
    pub fn value(&self) -> Option<&Value> {
        self.values.first()
    }

    /// Child elements in source order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// The first child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.is_named(name))
    }

    /// All children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.is_named(name))
    }

    /// Get a descendant by a dot-separated path of names, e.g. `"KOORDSYS.ORIGO-NØ"`.
    pub fn get(&self, path: &str) -> Option<&Element> {
        path.split('.')
            .try_fold(self, |element, segment| element.child(segment))
    }

    /// Whether the element has neither values nor children.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.children.is_empty()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.values == other.values
            && self.children == other.children
    }
}

impl Eq for Element {}

/// Accumulates the values and children of one element.
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    name: String,
    location: Location,
    values: Vec<Value>,
    children: Vec<Element>,
}

impl ElementBuilder {
    /// Start an element read from the source at `location`.
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            values: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Start an element with no source location.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Location::UNKNOWN)
    }

    /// Add a value.
    pub fn push_value(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    /// Add a child element.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append `text` onto the last value, which must be a string.
    ///
    /// Returns `false`, leaving the builder unchanged, when it is not.
    pub fn concatenate(&mut self, text: &str) -> bool {
        match self.values.last_mut() {
            Some(Value::String(previous)) => {
                previous.push_str(text);
                true
            }
            _ => false,
        }
    }

    /// Add a value, builder style.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.push_value(value);
        self
    }

    /// Add a child element, builder style.
    pub fn child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    /// Freeze into an [`Element`].
    pub fn build(self) -> Element {
        Element {
            name: self.name,
            location: self.location,
            values: self.values,
            children: self.children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn point() -> Element {
        ElementBuilder::named("PUNKT")
            .value(Value::SerialNumber(1))
            .child(
                ElementBuilder::named("NØ")
                    .value(Value::number(6700000i64))
                    .value(Value::number(600000i64))
                    .build(),
            )
            .child(ElementBuilder::named("EGENSKAP").value("Kum").build())
            .build()
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let element = point();
        assert!(element.is_named("punkt"));
        assert!(element.child("nø").is_some());
        assert_eq!(
            element.get("EGENSKAP").and_then(|e| e.value()),
            Some(&Value::from("Kum"))
        );
    }

    #[test]
    fn test_equality_ignores_location() {
        let located = ElementBuilder::new("navn", Location::new(3, 2, 20))
            .value("Ola")
            .build();
        let unlocated = ElementBuilder::named("NAVN").value("Ola").build();
        assert_eq!(located, unlocated);
        assert_ne!(located, ElementBuilder::named("NAVN").value("Kari").build());
    }

    #[test]
    fn test_concatenate() {
        let mut builder = ElementBuilder::named("NAVN");
        assert!(!builder.concatenate("x"));
        builder.push_value("Ola");
        assert!(builder.concatenate("Nordmann"));
        assert_eq!(builder.build().values(), [Value::from("OlaNordmann")]);
    }

    #[test]
    fn test_path_lookup() {
        let head = ElementBuilder::named("HODE")
            .child(
                ElementBuilder::named("TRANSPAR")
                    .child(
                        ElementBuilder::named("KOORDSYS")
                            .value(Value::number(22i64))
                            .build(),
                    )
                    .build(),
            )
            .build();
        assert!(head.get("TRANSPAR.KOORDSYS").is_some());
        assert!(head.get("TRANSPAR.ENHET").is_none());
    }
}
