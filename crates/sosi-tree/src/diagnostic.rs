//! Diagnostic rendering for parse and build errors.

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use sosi_parse::{GrammarError, Location, ParseError, ParseErrorKind};

use crate::TreeError;

/// Get ariadne config, respecting NO_COLOR env var.
fn ariadne_config() -> Config {
    let config = Config::default().with_index_type(IndexType::Byte);
    if std::env::var("NO_COLOR").is_ok() {
        config.with_color(false)
    } else {
        config
    }
}

/// An error ready to be rendered against its source text.
#[derive(Debug, Clone)]
pub struct ParseDiagnostic {
    /// Headline.
    pub message: String,
    /// Text attached to the highlighted location.
    pub label: String,
    /// Optional hint on how to fix the input.
    pub help: Option<&'static str>,
    /// Where the error happened.
    pub location: Location,
}

impl ParseDiagnostic {
    /// Describe a parse error.
    pub fn from_parse_error(error: &ParseError) -> Self {
        let (label, help) = match &error.kind {
            ParseErrorKind::Lexical(_) => ("here", None),
            ParseErrorKind::Grammar(grammar) => grammar_label(grammar),
            ParseErrorKind::State(_) => ("parser used out of order", None),
            ParseErrorKind::Io(_) => ("reading stopped here", None),
        };
        Self {
            message: error.kind.to_string(),
            label: label.to_string(),
            help,
            location: error.location,
        }
    }

    /// Describe a build error.
    pub fn from_tree_error(error: &TreeError) -> Self {
        match error {
            TreeError::Parse(e) => Self::from_parse_error(e),
            TreeError::Internal { message, location } => Self {
                message: format!("internal error: {message}"),
                label: "while building this".to_string(),
                help: Some("this is a bug in the parser, please report it"),
                location: *location,
            },
            TreeError::Invalid(message) => Self {
                message: format!("invalid document: {message}"),
                label: String::new(),
                help: None,
                location: Location::UNKNOWN,
            },
        }
    }

    /// Render this diagnostic with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.message.clone())
    }

    /// Write the report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let range = self.location.range(source.len());
        let mut report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_config(ariadne_config())
            .with_message(&self.message);
        if !self.location.is_unknown() {
            report = report.with_label(
                Label::new((filename, range))
                    .with_message(&self.label)
                    .with_color(Color::Red),
            );
        }
        if let Some(help) = self.help {
            report = report.with_help(help);
        }
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }
}

impl From<&ParseError> for ParseDiagnostic {
    fn from(error: &ParseError) -> Self {
        Self::from_parse_error(error)
    }
}

impl From<&TreeError> for ParseDiagnostic {
    fn from(error: &TreeError) -> Self {
        Self::from_tree_error(error)
    }
}

fn grammar_label(error: &GrammarError) -> (&'static str, Option<&'static str>) {
    match error {
        GrammarError::ExpectedLevel { .. } => (
            "expected a level marker",
            Some("every element starts with one or more dots, e.g. `.HODE`"),
        ),
        GrammarError::HeadNotFirst { .. } => (
            "first element",
            Some("a SOSI file starts with `.HODE`"),
        ),
        GrammarError::DuplicateHead => ("second head", Some("a file has exactly one `.HODE`")),
        GrammarError::MissingCharset => (
            "head without charset",
            Some("add `..TEGNSETT` to the head, or parse permissively"),
        ),
        GrammarError::InvalidCharset { .. } => (
            "head with unknown charset",
            Some("known charsets are UTF-8, ISO8859-1, ISO8859-10, DOSN8, ND7 and DECN7"),
        ),
        GrammarError::LevelLeap { .. } => (
            "too deep",
            Some("a child is exactly one level below its parent"),
        ),
        GrammarError::EmptyElement { .. } => (
            "element has no values or children",
            Some("give the element a value, or parse permissively"),
        ),
        GrammarError::InvalidConcatenation => (
            "not between two strings",
            Some("`&` joins the string before it with the string after it"),
        ),
        GrammarError::UnexpectedToken { .. } => ("unexpected", None),
        GrammarError::UnexpectedEof => ("input ends here", Some("end the file with `.SLUTT`")),
        GrammarError::UnclosedIsland => (
            "island still open",
            Some("close the reference island with `)`"),
        ),
        GrammarError::MisplacedIslandMarker => ("misplaced parenthesis", None),
        GrammarError::NumberOutOfRange { .. } => ("does not fit in 64 bits", None),
    }
}
