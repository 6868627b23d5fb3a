//! TriX serialization tests.

use oxtrix::dom::XmlDocument;
use oxtrix::{
    BlankNode, GraphName, Literal, NamedNode, Quad, TrixElement, TrixSerializeError,
    TrixSerializer, Triple,
};

fn ex(name: &str) -> NamedNode {
    NamedNode::new(format!("http://example.org/{name}")).unwrap()
}

fn graph_names(document: &XmlDocument) -> Vec<Option<String>> {
    document
        .root()
        .children()
        .map(|graph| {
            graph
                .children()
                .next()
                .filter(|first| first.tag_name() != "triple")
                .map(|name| name.text_content())
        })
        .collect()
}

#[test]
fn test_non_contiguous_graphs_are_not_merged() {
    let document = TrixSerializer::new()
        .serialize_document(&[
            Quad::new(ex("a"), ex("b"), ex("c"), ex("g1")),
            Quad::new(ex("d"), ex("e"), ex("f"), ex("g2")),
            Quad::new(ex("x"), ex("y"), ex("z"), ex("g1")),
        ])
        .unwrap();
    assert_eq!(
        graph_names(&document),
        [
            Some("http://example.org/g1".to_owned()),
            Some("http://example.org/g2".to_owned()),
            Some("http://example.org/g1".to_owned())
        ]
    );
}

#[test]
fn test_contiguous_graphs_are_grouped() {
    let b = BlankNode::default();
    let document = TrixSerializer::new()
        .serialize_document(&[
            Quad::new(ex("a"), ex("b"), ex("c"), GraphName::DefaultGraph),
            Quad::new(ex("d"), ex("e"), ex("f"), GraphName::DefaultGraph),
            Quad::new(ex("a"), ex("b"), ex("c"), b.clone()),
            Quad::new(ex("d"), ex("e"), ex("f"), b),
        ])
        .unwrap();
    assert_eq!(graph_names(&document), [None, Some("b0".to_owned())]);
}

#[test]
fn test_base_relativization() {
    let document = TrixSerializer::new()
        .with_base_iri("http://example.org/")
        .unwrap()
        .serialize_document(&[Quad::new(
            ex("a"),
            ex("b"),
            NamedNode::new("http://example.com/c").unwrap(),
            GraphName::DefaultGraph,
        )])
        .unwrap();
    assert_eq!(
        document.root().to_string(),
        "<TriX xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\" xml:base=\"http://example.org/\"><graph><triple><uri>a</uri><uri>b</uri><uri>http://example.com/c</uri></triple></graph></TriX>"
    );
}

#[test]
fn test_quoted_triples() {
    let b = BlankNode::default();
    let quoted = Triple::new(b.clone(), ex("p"), Literal::from("o"));
    let document = TrixSerializer::new()
        .serialize_document(&[Quad::new(
            quoted,
            ex("q"),
            b,
            GraphName::DefaultGraph,
        )])
        .unwrap();
    assert_eq!(
        document.root().to_string(),
        "<TriX xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\"><graph><triple><triple><id>b0</id><uri>http://example.org/p</uri><plainLiteral>o</plainLiteral></triple><uri>http://example.org/q</uri><id>b0</id></triple></graph></TriX>"
    );
}

#[test]
fn test_indentation_options() {
    let quad = Quad::new(
        ex("s"),
        ex("p"),
        Literal::new_language_tagged_literal(" a ", "en").unwrap(),
        GraphName::DefaultGraph,
    );
    let mut serializer = TrixSerializer::new()
        .with_indentation(' ', 2)
        .with_encoding("utf-8")
        .unwrap()
        .for_writer(Vec::new());
    serializer.write_quad(&quad).unwrap();
    assert_eq!(
        String::from_utf8(serializer.finish().unwrap()).unwrap(),
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>
<TriX xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\">
  <graph>
    <triple>
      <uri>http://example.org/s</uri>
      <uri>http://example.org/p</uri>
      <plainLiteral xml:lang=\"en\"> a </plainLiteral>
    </triple>
  </graph>
</TriX>"
    );
}

#[test]
fn test_xml_literal_is_written_as_markup() {
    let literal = Literal::new_typed_literal(
        "<p xmlns=\"http://www.w3.org/1999/xhtml\">a <b>b</b></p>",
        NamedNode::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral").unwrap(),
    );
    let mut serializer = TrixSerializer::new().for_writer(Vec::new());
    serializer
        .write_triple(&Triple::new(ex("s"), ex("p"), literal))
        .unwrap();
    let output = String::from_utf8(serializer.finish().unwrap()).unwrap();
    assert!(output.contains(
        "<typedLiteral datatype=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral\"><p xmlns=\"http://www.w3.org/1999/xhtml\">a <b>b</b></p></typedLiteral>"
    ));
}

#[test]
fn test_invalid_statements() {
    let mut serializer = TrixSerializer::new().for_writer(Vec::new());
    let error = serializer
        .write_triple(&Triple::new(ex("s"), ex("p"), Literal::from("\u{0}")))
        .unwrap_err();
    let TrixSerializeError::InvalidTerm {
        subject,
        predicate,
        object,
        ..
    } = error
    else {
        panic!("unexpected error {error}")
    };
    assert_eq!(subject, "<http://example.org/s>");
    assert_eq!(predicate, "<http://example.org/p>");
    assert_eq!(object, "\"\\u0000\"");
    serializer
        .write_graph(
            &ex("g").into(),
            &[
                Triple::new(ex("s"), ex("p"), NamedNode::new_unchecked("http://example.org/\u{1}")),
                Triple::new(ex("s"), ex("p"), ex("o")),
            ],
        )
        .unwrap_err();
    let output = String::from_utf8(serializer.finish().unwrap()).unwrap();
    assert!(output.contains("<uri>http://example.org/o</uri>"));
    assert!(!output.contains('\u{0}'));
}

#[test]
fn test_unsupported_encoding() {
    let error = TrixSerializer::new().with_encoding("ISO-8859-1").unwrap_err();
    assert!(matches!(error, TrixSerializeError::UnsupportedEncoding(e) if e == "ISO-8859-1"));
}
