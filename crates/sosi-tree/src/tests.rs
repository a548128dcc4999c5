use super::*;
use facet_testhelpers::test;

fn dump_element(element: &Element, depth: usize, out: &mut String) {
    out.push_str(&".".repeat(depth));
    out.push_str(element.name());
    for value in element.values() {
        out.push(' ');
        match value {
            Value::String(text) => out.push_str(&format!("{text:?}")),
            Value::Number(number) => out.push_str(&number.to_string()),
            Value::SerialNumber(serial) => out.push_str(&format!("{serial}:")),
            Value::Reference(reference) => out.push_str(&reference.to_string()),
            Value::ReferenceIsland(members) => {
                let members: Vec<_> = members.iter().map(|m| m.to_string()).collect();
                out.push_str(&format!("({})", members.join(" ")));
            }
            Value::Default => out.push('@'),
            Value::Unspecified => out.push('*'),
        }
    }
    out.push('\n');
    for child in element.children() {
        dump_element(child, depth + 1, out);
    }
}

fn dump(document: &Document) -> String {
    let mut out = String::new();
    for element in document.elements() {
        dump_element(element, 1, &mut out);
    }
    out
}

#[test]
fn test_concatenated_name_and_serial_number() {
    let doc = Document::parse(".HODE ..NAVN 'Ola' & \"Nordmann\" ..GRUPPE 1: .SLUTT").unwrap();
    let head = doc.head();
    assert!(head.is_named("HODE"));

    let name = head.child("NAVN").unwrap();
    assert_eq!(name.values(), [Value::from("OlaNordmann")]);

    let group = head.child("GRUPPE").unwrap();
    assert_eq!(group.values(), [Value::SerialNumber(1)]);
}

#[test]
fn test_tree_shape() {
    let source = "\
.HODE
..TEGNSETT UTF-8
..TRANSPAR
...KOORDSYS 22
...ORIGO-NØ 0 0
...ENHET 0.01
.PUNKT 1:
..OBJTYPE Kum
..NØ
6700000 600000
.KURVE 2:
..REF :1 (:3 :-4) *
..KVALITET @
.SLUTT
";
    let doc = Document::parse(source).unwrap();
    insta::assert_snapshot!(dump(&doc), @r#"
    .HODE
    ..TEGNSETT "UTF-8"
    ..TRANSPAR
    ...KOORDSYS 22
    ...ORIGO-NØ 0 0
    ...ENHET 0.01
    .PUNKT 1:
    ..OBJTYPE "Kum"
    ..NØ 6700000 600000
    .KURVE 2:
    ..REF :1 (:3 :-4) *
    ..KVALITET @
    "#);
}

#[test]
fn test_short_integers_take_the_fast_path() {
    let doc = Document::parse(".HODE ..A 123456789 1234567890 1.5 .SLUTT").unwrap();
    let values = doc.head().child("A").unwrap().values();
    assert!(matches!(values[0], Value::Number(Number::Integer(123456789))));
    assert!(matches!(values[1], Value::Number(Number::Decimal(_))));
    assert_eq!(
        values[1].as_number().and_then(Number::as_i64),
        Some(1234567890)
    );
    assert!(!values[2].as_number().unwrap().is_integral());
}

#[test]
fn test_island_members_are_marked() {
    let doc = Document::parse(".HODE ..REF :1 (:2 :-3) .SLUTT").unwrap();
    let values = doc.get("HODE.REF").unwrap().values();
    assert_eq!(values[0], Value::Reference(ReferenceNumber::new(1)));
    assert_eq!(
        values[1],
        Value::ReferenceIsland(vec![
            ReferenceNumber::new(2).in_island(),
            ReferenceNumber::new(3).reversed().in_island(),
        ])
    );
}

#[test]
fn test_comments_do_not_change_the_tree() {
    let plain = Document::parse(".HODE ..A 1 .PUNKT 1: ..B 'x' .SLUTT").unwrap();
    let commented = Document::parse(
        "! file header\n.HODE ! head\n..A 1 ! one\n.PUNKT 1:\n! inside\n..B 'x'\n.SLUTT\n",
    )
    .unwrap();
    assert_eq!(plain, commented);
}

#[test]
fn test_document_accessors() {
    let doc = Document::parse(".HODE ..A 1\n.PUNKT 1: ..B 2\n.PUNKT 2: ..B 3\n.SLUTT").unwrap();
    assert_eq!(doc.elements().len(), 3);
    assert_eq!(doc.features().len(), 2);
    assert_eq!(doc.elements_named("punkt").count(), 2);
    assert_eq!(doc.end(), Location::new(4, 2, 45));
    assert_eq!(doc.charset(), Charset::Utf8);
    assert_eq!(
        doc.get("PUNKT.B").and_then(|b| b.value()),
        Some(&Value::number(2i64))
    );
}

#[test]
fn test_read_legacy_bytes() {
    let bytes = b".HODE\n..TEGNSETT ISO8859-1\n.PUNKT 1:\n..STED \"Tr\xF8ndelag\"\n.SLUTT\n";
    let doc = Document::read(&bytes[..]).unwrap();
    assert_eq!(doc.charset(), Charset::Latin1);
    let place = doc.get("PUNKT.STED").and_then(|e| e.value());
    assert_eq!(place.and_then(Value::as_str), Some("Trøndelag"));
}

#[test]
fn test_read_permissive_without_charset() {
    let bytes = b".HODE\n..A\n.SLUTT\n";
    assert!(Document::read(&bytes[..]).is_err());
    let doc = Document::read_with(&bytes[..], ParserFeatures::permissive()).unwrap();
    assert!(doc.head().child("A").unwrap().is_empty());
    assert_eq!(doc.charset(), Charset::Latin1);
}

#[test]
fn test_malformed_grammar_is_rejected_by_the_parser() {
    let malformed = [
        ".HODE ..VERDI .SLUTT",
        ".HODE .VERDI 123 .SLUTT",
        ".HODE ...VERDI 123 .SLUTT",
        ".HODE ..VERDI 123 & 456 .SLUTT",
        ".HODE ..VERDI '123' & .SLUTT",
        ".HODE ..REF (:1 .SLUTT",
        ".HODE ..A 1",
        ".PUNKT 1: .SLUTT",
        "",
    ];
    for source in malformed {
        match Document::parse(source) {
            Err(TreeError::Parse(e)) => assert!(e.is_data_error(), "{source:?}: {e}"),
            other => panic!("{source:?}: expected a parse error, got {other:?}"),
        }
    }
}

#[test]
fn test_builder_reports_truncated_event_stream() {
    let mut parser = Parser::new(".HODE ..A 1 .SLUTT");
    parser.next_event().unwrap();
    parser.close();
    let error = DocumentBuilder::new(&mut parser).build().unwrap_err();
    assert!(matches!(error, TreeError::Internal { .. }));
}

#[test]
fn test_programmatic_document() {
    let head = ElementBuilder::named("HODE")
        .child(ElementBuilder::named("TEGNSETT").value("UTF-8").build())
        .build();
    let point = ElementBuilder::named("PUNKT").value(Value::SerialNumber(1)).build();
    let doc = Document::new(vec![head, point], Charset::Utf8).unwrap();
    assert!(doc.end().is_unknown());
    assert_eq!(
        doc,
        Document::parse(".HODE ..TEGNSETT UTF-8 .PUNKT 1: .SLUTT").unwrap()
    );

    let headless = vec![ElementBuilder::named("PUNKT").value(Value::SerialNumber(1)).build()];
    assert!(matches!(
        Document::new(headless, Charset::Utf8),
        Err(TreeError::Invalid(_))
    ));
    assert!(Document::new(Vec::new(), Charset::Utf8).is_err());
}
