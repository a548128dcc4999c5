//! Event types for the SOSI event-based parser.

use sosi_tokenizer::{Location, Number, ReferenceNumber};

/// Events emitted by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Head
    /// Start of the `HODE` element.
    StartHead {
        /// The name as written.
        name: String,
        /// Location of the name.
        location: Location,
    },
    /// End of the `HODE` element.
    EndHead {
        /// Location of the level marker that closed the head.
        location: Location,
    },

    // Elements
    /// Start of an element.
    StartElement {
        /// The name as written.
        name: String,
        /// Location of the name.
        location: Location,
    },
    /// End of an element.
    EndElement {
        /// Location of the level marker that closed the element.
        location: Location,
    },

    // Values
    /// A string value, unescaped.
    String {
        /// The value.
        value: String,
        /// Location of the literal.
        location: Location,
    },
    /// A number value.
    Number {
        /// The value; short integers are [`Number::Integer`].
        value: Number,
        /// Location of the literal.
        location: Location,
    },
    /// `*`
    Unspecified {
        /// Location of the marker.
        location: Location,
    },
    /// `@`
    Default {
        /// Location of the marker.
        location: Location,
    },
    /// `N:`
    SerialNumber {
        /// The serial number.
        value: u64,
        /// Location of the literal.
        location: Location,
    },
    /// `:N`, possibly the first or last of a `( ... )` island.
    Reference {
        /// The reference; `inside_island` is set for members of an island.
        value: ReferenceNumber,
        /// This reference opens an island.
        opens_island: bool,
        /// This reference closes an island.
        closes_island: bool,
        /// Location of the literal.
        location: Location,
    },
    /// `&` between two string values.
    Concatenation {
        /// Location of the `&`.
        location: Location,
    },

    // Other
    /// `! ...`
    Comment {
        /// Text after the `!`.
        text: String,
        /// Location of the `!`.
        location: Location,
    },
    /// The closing `SLUTT`.
    End {
        /// Location of the `SLUTT` name.
        location: Location,
    },
}

impl Event {
    /// Where this event came from.
    pub fn location(&self) -> Location {
        match self {
            Event::StartHead { location, .. }
            | Event::EndHead { location }
            | Event::StartElement { location, .. }
            | Event::EndElement { location }
            | Event::String { location, .. }
            | Event::Number { location, .. }
            | Event::Unspecified { location }
            | Event::Default { location }
            | Event::SerialNumber { location, .. }
            | Event::Reference { location, .. }
            | Event::Concatenation { location }
            | Event::Comment { location, .. }
            | Event::End { location } => *location,
        }
    }

    /// Name of the event kind, used in state errors and dumps.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Event::StartHead { .. } => "START_HEAD",
            Event::EndHead { .. } => "END_HEAD",
            Event::StartElement { .. } => "START_ELEMENT",
            Event::EndElement { .. } => "END_ELEMENT",
            Event::String { .. } => "VALUE_STRING",
            Event::Number { .. } => "VALUE_NUMBER",
            Event::Unspecified { .. } => "VALUE_UNSPECIFIED",
            Event::Default { .. } => "VALUE_DEFAULT",
            Event::SerialNumber { .. } => "VALUE_SERIAL_NUMBER",
            Event::Reference { .. } => "VALUE_REFERENCE",
            Event::Concatenation { .. } => "CONCATENATION",
            Event::Comment { .. } => "COMMENT",
            Event::End { .. } => "END",
        }
    }

    /// Whether this event carries an element value.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            Event::String { .. }
                | Event::Number { .. }
                | Event::Unspecified { .. }
                | Event::Default { .. }
                | Event::SerialNumber { .. }
                | Event::Reference { .. }
        )
    }
}
