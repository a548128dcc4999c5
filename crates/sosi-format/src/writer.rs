//! SOSI document writer.

use sosi_encoding::encode_str;
use sosi_tree::{Document, END_NAME, Element, Location};
use tracing::debug;

use crate::options::{FormatOptions, Layout};
use crate::value_format::{DefaultValueFormatter, ValueFormatter};

const CHARSET_NAME: &str = "TEGNSETT";

/// Writes a [`Document`] as SOSI text.
///
/// The head's `..TEGNSETT` always names [`FormatOptions::charset`], and is
/// added as the head's first child when the document has none.
pub struct SosiWriter<F = DefaultValueFormatter> {
    options: FormatOptions,
    formatter: F,
}

impl SosiWriter {
    /// Create a writer with the default value formatter.
    pub fn new(options: FormatOptions) -> Self {
        Self::with_formatter(options, DefaultValueFormatter)
    }
}

impl Default for SosiWriter {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

/// Output under construction.
struct Output {
    text: String,
    /// Source line of the last element written, for [`Layout::PreserveLines`].
    line: Option<u32>,
}

impl<F: ValueFormatter> SosiWriter<F> {
    /// Create a writer with a custom value formatter.
    pub fn with_formatter(options: FormatOptions, formatter: F) -> Self {
        Self { options, formatter }
    }

    /// The options in use.
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Write the document as text.
    pub fn write_document(&self, document: &Document) -> String {
        let mut out = Output {
            text: String::new(),
            line: None,
        };

        let head = document.head();
        self.begin_element(&mut out, 1, head.name(), head.location());
        self.write_values(&mut out, head);
        if head.child(CHARSET_NAME).is_none() {
            self.write_charset(&mut out, CHARSET_NAME, Location::UNKNOWN);
        }
        for child in head.children() {
            if child.is_named(CHARSET_NAME) {
                self.write_charset(&mut out, child.name(), child.location());
            } else {
                self.write_element(&mut out, child, 2);
            }
        }

        for element in document.features() {
            self.write_element(&mut out, element, 1);
        }

        self.begin_element(&mut out, 1, END_NAME, document.end());
        out.text.push_str(self.options.line_ending);
        out.text
    }

    /// Write the document and encode it with the configured charset.
    pub fn write_bytes(&self, document: &Document) -> Vec<u8> {
        let text = self.write_document(document);
        debug!(
            "encoding {} chars as {}",
            text.chars().count(),
            self.options.charset
        );
        encode_str(&text, self.options.charset, self.options.replacement)
    }

    fn write_element(&self, out: &mut Output, element: &Element, depth: usize) {
        self.begin_element(out, depth, element.name(), element.location());
        self.write_values(out, element);
        for child in element.children() {
            self.write_element(out, child, depth + 1);
        }
    }

    fn write_charset(&self, out: &mut Output, name: &str, location: Location) {
        self.begin_element(out, 2, name, location);
        out.text.push(' ');
        out.text.push_str(self.options.charset.declaration());
    }

    fn write_values(&self, out: &mut Output, element: &Element) {
        for value in element.values() {
            out.text.push(' ');
            self.formatter.format_value(value, &mut out.text);
        }
    }

    /// Separate from the previous element and write the level marker and name.
    fn begin_element(&self, out: &mut Output, depth: usize, name: &str, location: Location) {
        if !out.text.is_empty() {
            let same_line = self.options.layout == Layout::PreserveLines
                && !location.is_unknown()
                && out.line == Some(location.line);
            if same_line {
                out.text.push(' ');
            } else {
                out.text.push_str(self.options.line_ending);
                out.text.push_str(&self.options.indent.repeat(depth - 1));
            }
        }
        out.line = (!location.is_unknown()).then_some(location.line);
        out.text.push_str(&".".repeat(depth));
        out.text.push_str(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;
    use sosi_encoding::Charset;
    use sosi_tree::{ElementBuilder, Value};

    const SOURCE: &str = "\
.HODE ..TEGNSETT ISO8859-1
..TRANSPAR
...KOORDSYS 22 ...ENHET 0.01
.PUNKT 1: ..OBJTYPE Kum
..NØ
6700000 600000
.KURVE 2:
..NAVN 'Ola' & \"Nord\"\"mann\"
..REF :1 (:3 :-4)
.SLUTT
";

    fn parse(source: &str) -> Document {
        Document::parse(source).unwrap()
    }

    #[test]
    fn test_one_element_per_line() {
        let output = SosiWriter::default().write_document(&parse(SOURCE));
        insta::assert_snapshot!(output, @r#"
        .HODE
        ..TEGNSETT UTF-8
        ..TRANSPAR
        ...KOORDSYS 22
        ...ENHET 0.01
        .PUNKT 1:
        ..OBJTYPE Kum
        ..NØ 6700000 600000
        .KURVE 2:
        ..NAVN "OlaNord""mann"
        ..REF :1 (:3 :-4)
        .SLUTT
        "#);
    }

    #[test]
    fn test_preserve_lines() {
        let options = FormatOptions::new().preserve_lines();
        let output = SosiWriter::new(options).write_document(&parse(SOURCE));
        insta::assert_snapshot!(output, @r#"
        .HODE ..TEGNSETT UTF-8
        ..TRANSPAR
        ...KOORDSYS 22 ...ENHET 0.01
        .PUNKT 1: ..OBJTYPE Kum
        ..NØ 6700000 600000
        .KURVE 2:
        ..NAVN "OlaNord""mann"
        ..REF :1 (:3 :-4)
        .SLUTT
        "#);
    }

    #[test]
    fn test_indent_and_crlf() {
        let options = FormatOptions::new().indent("  ").crlf();
        let output = SosiWriter::new(options).write_document(&parse(".HODE ..A 1 ...B 2 .SLUTT"));
        assert_eq!(
            output,
            ".HODE\r\n  ..TEGNSETT UTF-8\r\n  ..A 1\r\n    ...B 2\r\n.SLUTT\r\n"
        );
    }

    #[test]
    fn test_charset_is_added_when_missing() {
        let head = ElementBuilder::named("HODE")
            .child(ElementBuilder::named("OMRÅDE").value("Oslo").build())
            .build();
        let document = Document::new(vec![head], Charset::Utf8).unwrap();
        let output = SosiWriter::default().write_document(&document);
        assert_eq!(output, ".HODE\n..TEGNSETT UTF-8\n..OMRÅDE Oslo\n.SLUTT\n");
    }

    #[test]
    fn test_write_bytes_reencodes() {
        let document = parse(".HODE ..TEGNSETT UTF-8 ..NAVN 'Sør' .SLUTT");
        let options = FormatOptions::new().charset(Charset::Latin1);
        let bytes = SosiWriter::new(options).write_bytes(&document);
        assert_eq!(
            bytes,
            b".HODE\n..TEGNSETT ISO8859-1\n..NAVN S\xF8r\n.SLUTT\n".to_vec()
        );

        let reread = Document::read(&bytes[..]).unwrap();
        assert_eq!(reread.charset(), Charset::Latin1);
        assert_eq!(reread.get("HODE.NAVN"), document.get("HODE.NAVN"));
    }

    #[test]
    fn test_unencodable_characters_are_replaced() {
        let document = parse(".HODE ..NAVN 'Σ' .SLUTT");
        let options = FormatOptions::new().charset(Charset::Nd7).replacement(b'#');
        let bytes = SosiWriter::new(options).write_bytes(&document);
        assert!(bytes.ends_with(b"..NAVN #\n.SLUTT\n"));
    }

    struct Shouting;

    impl ValueFormatter for Shouting {
        fn format_value(&self, value: &Value, out: &mut String) {
            match value {
                Value::String(text) => out.push_str(&crate::quote(&text.to_uppercase())),
                other => DefaultValueFormatter.format_value(other, out),
            }
        }
    }

    #[test]
    fn test_custom_value_formatter() {
        let writer = SosiWriter::with_formatter(FormatOptions::new(), Shouting);
        let output = writer.write_document(&parse(".HODE ..NAVN ola 1: .SLUTT"));
        assert_eq!(
            output,
            ".HODE\n..TEGNSETT UTF-8\n..NAVN \"OLA\" 1:\n.SLUTT\n"
        );
    }
}
