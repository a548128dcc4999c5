//! Document builder from parse events.

use sosi_parse::{Event, Location, Parser, ReferenceNumber};
use tracing::trace;

use crate::{Document, Element, ElementBuilder, TreeError, Value};

/// Builds a [`Document`] by pulling events from a [`Parser`], one element
/// at a time.
pub struct DocumentBuilder<'p, 'a> {
    parser: &'p mut Parser<'a>,
}

impl<'p, 'a> DocumentBuilder<'p, 'a> {
    /// Create a builder over a fresh parser.
    pub fn new(parser: &'p mut Parser<'a>) -> Self {
        Self { parser }
    }

    /// Consume the remaining events and build the document.
    pub fn build(mut self) -> Result<Document, TreeError> {
        let charset = self.parser.charset();
        let mut elements = Vec::new();
        loop {
            match self.next()? {
                Event::StartHead { name, location } | Event::StartElement { name, location } => {
                    elements.push(self.element(name, location)?);
                }
                Event::Comment { .. } => {}
                Event::End { location } => {
                    trace!("Built document with {} top-level elements", elements.len());
                    return Document::from_parts(elements, location, charset);
                }
                other => {
                    return Err(TreeError::internal(
                        format!("{} outside any element", other.kind_name()),
                        other.location(),
                    ));
                }
            }
        }
    }

    fn next(&mut self) -> Result<Event, TreeError> {
        if !self.parser.has_next() {
            return Err(TreeError::internal(
                "event stream ended without END",
                self.parser.location(),
            ));
        }
        Ok(self.parser.next_event()?)
    }

    /// Build one element; the start event has already been consumed.
    fn element(&mut self, name: String, location: Location) -> Result<Element, TreeError> {
        let mut builder = ElementBuilder::new(name, location);
        let mut concatenate = false;
        let mut island: Option<Vec<ReferenceNumber>> = None;

        loop {
            let event = self.next()?;
            if concatenate && !matches!(event, Event::String { .. } | Event::Comment { .. }) {
                return Err(TreeError::internal(
                    format!("{} after concatenation", event.kind_name()),
                    event.location(),
                ));
            }
            if island.is_some() && !matches!(event, Event::Reference { .. } | Event::Comment { .. })
            {
                return Err(TreeError::internal(
                    format!("{} inside a reference island", event.kind_name()),
                    event.location(),
                ));
            }

            match event {
                Event::StartElement { name, location } => {
                    let child = self.element(name, location)?;
                    builder.push_child(child);
                }
                Event::EndHead { .. } | Event::EndElement { .. } => return Ok(builder.build()),
                Event::String { value, location } => {
                    if concatenate {
                        if !builder.concatenate(&value) {
                            return Err(TreeError::internal(
                                "concatenation without a previous string",
                                location,
                            ));
                        }
                        concatenate = false;
                    } else {
                        builder.push_value(Value::String(value));
                    }
                }
                Event::Concatenation { .. } => concatenate = true,
                Event::Number { value, .. } => builder.push_value(Value::Number(value)),
                Event::SerialNumber { value, .. } => builder.push_value(Value::SerialNumber(value)),
                Event::Reference {
                    value,
                    opens_island,
                    closes_island,
                    ..
                } => {
                    if opens_island {
                        island = Some(Vec::new());
                    }
                    match island.as_mut() {
                        Some(members) => {
                            members.push(value);
                            if closes_island {
                                builder.push_value(Value::ReferenceIsland(
                                    island.take().unwrap_or_default(),
                                ));
                            }
                        }
                        None => builder.push_value(Value::Reference(value)),
                    }
                }
                Event::Unspecified { .. } => builder.push_value(Value::Unspecified),
                Event::Default { .. } => builder.push_value(Value::Default),
                Event::Comment { .. } => {}
                other @ (Event::StartHead { .. } | Event::End { .. }) => {
                    return Err(TreeError::internal(
                        format!("{} inside an element", other.kind_name()),
                        other.location(),
                    ));
                }
            }
        }
    }
}
