use crate::blank_node::BlankNode;
use crate::c14n::{C14nCanonicalizer, XmlCanonicalizer};
use crate::datatypes::canonical_form;
use crate::dom::{XmlDocument, XmlElement};
use crate::element::TrixElement;
use crate::error::{TrixParseError, TrixSyntaxError};
use crate::literal::Literal;
use crate::named_node::NamedNode;
use crate::triple::{GraphName, Quad, Subject, Term, Triple};
use crate::vocab::rdf;
use oxilangtag::LanguageTag;
use oxiri::{Iri, IriParseError};
use std::collections::HashMap;
use std::io::Read;
use std::iter::Peekable;
use std::sync::Arc;
use tracing::{debug, warn};

/// A [TriX](https://www.hpl.hp.com/techreports/2004/HPL-2004-56.html) parser.
///
/// It walks an already materialized XML tree, exposed through the [`TrixElement`] trait,
/// and lazily yields its statements in document order.
///
/// By default an invalid `triple` element is reported as an `Err` item and skipped, the parser
/// then goes on with the next one. In [strict](TrixParser::strict) mode the first error ends the parsing.
///
/// Count the statements of a graph:
/// ```
/// use oxtrix::{GraphName, NamedNode, TrixParser};
///
/// let file = r#"<TriX xmlns="http://www.w3.org/2004/03/trix/trix-1/">
///   <graph>
///     <uri>http://example.org/graph1</uri>
///     <triple>
///       <uri>http://example.org/Bob</uri>
///       <uri>http://example.org/wife</uri>
///       <uri>http://example.org/Mary</uri>
///     </triple>
///   </graph>
/// </TriX>"#;
///
/// let graph = GraphName::from(NamedNode::new("http://example.org/graph1")?);
/// let quads = TrixParser::new().parse_slice(file.as_bytes())?;
/// assert_eq!(1, quads.iter().filter(|q| q.graph_name == graph).count());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone)]
#[must_use]
pub struct TrixParser {
    base: Option<Iri<String>>,
    validate: bool,
    canonicalize: bool,
    rdf_star: bool,
    strict: bool,
    canonicalizer: Arc<dyn XmlCanonicalizer>,
}

impl Default for TrixParser {
    #[inline]
    fn default() -> Self {
        Self {
            base: None,
            validate: false,
            canonicalize: false,
            rdf_star: false,
            strict: false,
            canonicalizer: Arc::new(C14nCanonicalizer),
        }
    }
}

impl TrixParser {
    /// Builds a new [`TrixParser`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the IRI relative `uri` elements are resolved against.
    ///
    /// An `xml:base` attribute on the root element is itself resolved against it.
    #[inline]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Result<Self, IriParseError> {
        self.base = Some(Iri::parse(base_iri.into())?);
        Ok(self)
    }

    /// Checks IRIs, language tags and the lexical forms of the known XSD datatypes.
    #[inline]
    pub fn validate(mut self) -> Self {
        self.validate = true;
        self
    }

    /// Rewrites the literals of the known XSD datatypes to their canonical lexical form.
    #[inline]
    pub fn canonicalize(mut self) -> Self {
        self.canonicalize = true;
        self
    }

    /// Allows [RDF-star](https://w3c.github.io/rdf-star/cg-spec/) quoted triples,
    /// written as nested `triple` elements.
    #[inline]
    pub fn rdf_star(mut self) -> Self {
        self.rdf_star = true;
        self
    }

    /// Stops the parsing on the first error.
    #[inline]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Sets the function used to compute the lexical form of `rdf:XMLLiteral` literals.
    ///
    /// [`C14nCanonicalizer`] is used by default.
    #[inline]
    pub fn with_xml_canonicalizer(
        mut self,
        canonicalizer: impl XmlCanonicalizer + 'static,
    ) -> Self {
        self.canonicalizer = Arc::new(canonicalizer);
        self
    }

    /// Parses the TriX document rooted at the given element.
    ///
    /// ```
    /// use oxtrix::dom::XmlDocument;
    /// use oxtrix::{Literal, TrixParser};
    ///
    /// let document = XmlDocument::parse_slice(
    ///     br#"<TriX xmlns="http://www.w3.org/2004/03/trix/trix-1/"><graph><triple>
    ///     <id>x</id>
    ///     <uri>http://example.org/p</uri>
    ///     <plainLiteral xml:lang="EN">a</plainLiteral>
    /// </triple></graph></TriX>"#,
    /// )?;
    /// for quad in TrixParser::new().for_element(document.root()) {
    ///     let quad = quad?;
    ///     assert_eq!(quad.object, Literal::new_language_tagged_literal("a", "en")?.into());
    ///     assert!(quad.graph_name.is_default_graph());
    /// }
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    #[expect(clippy::needless_pass_by_value)]
    pub fn for_element<E: TrixElement>(self, root: E) -> ElementTrixParser<E> {
        let mut pending_error = None;
        let mut base = self.base;
        let graphs = if root.tag_name() == "TriX" {
            if let Some(xml_base) = root.attribute("xml:base") {
                let xml_base = xml_base.trim();
                let resolved = if let Some(base) = &base {
                    base.resolve(xml_base)
                } else {
                    Iri::parse(xml_base.to_owned())
                };
                match resolved {
                    Ok(iri) => base = Some(iri),
                    Err(error) => {
                        pending_error = Some(TrixSyntaxError::invalid_iri(xml_base.into(), error));
                    }
                }
            }
            Some(root.children())
        } else {
            pending_error = Some(TrixSyntaxError::structural(format!(
                "the root element of a TriX document must be <TriX>, found <{}>",
                root.tag_name()
            )));
            None
        };
        ElementTrixParser {
            inner: InnerTrixParser {
                base,
                validate: self.validate,
                canonicalize: self.canonicalize,
                rdf_star: self.rdf_star,
                canonicalizer: self.canonicalizer,
                bnodes: HashMap::new(),
            },
            graphs,
            current: None,
            pending_error,
            strict: self.strict,
            is_ended: false,
        }
    }

    /// Parses the TriX document of an [`XmlDocument`].
    #[inline]
    pub fn for_document(self, document: &XmlDocument) -> ElementTrixParser<&XmlElement> {
        self.for_element(document.root())
    }

    /// Parses a TriX file from a byte slice and returns all its statements.
    ///
    /// Invalid statements are skipped, or make the whole parsing fail in [strict](TrixParser::strict) mode.
    pub fn parse_slice(self, slice: &[u8]) -> Result<Vec<Quad>, TrixParseError> {
        let document = XmlDocument::parse_slice(slice)?;
        Ok(self.collect_quads(&document)?)
    }

    /// Parses a TriX file from a [`Read`] implementation and returns all its statements.
    ///
    /// Invalid statements are skipped, or make the whole parsing fail in [strict](TrixParser::strict) mode.
    pub fn parse_read(self, read: impl Read) -> Result<Vec<Quad>, TrixParseError> {
        let document = XmlDocument::parse_read(read)?;
        Ok(self.collect_quads(&document)?)
    }

    fn collect_quads(self, document: &XmlDocument) -> Result<Vec<Quad>, TrixSyntaxError> {
        let strict = self.strict;
        let quads = self.for_document(document);
        if strict {
            quads.collect()
        } else {
            Ok(quads.filter_map(Result::ok).collect())
        }
    }
}

/// Parses a TriX document from a [`TrixElement`] tree. Can be built using [`TrixParser::for_element`].
///
/// The iterator is single pass: parsing again requires a new parser on the original tree.
/// Blank node identities are scoped to one parser, the same label read by two parsers gives two different blank nodes.
#[must_use]
pub struct ElementTrixParser<E: TrixElement> {
    inner: InnerTrixParser,
    graphs: Option<E::Children>,
    current: Option<(GraphName, Peekable<E::Children>)>,
    pending_error: Option<TrixSyntaxError>,
    strict: bool,
    is_ended: bool,
}

impl<E: TrixElement> Iterator for ElementTrixParser<E> {
    type Item = Result<Quad, TrixSyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.is_ended {
                return None;
            }
            if let Some(error) = self.pending_error.take() {
                return Some(Err(self.fail(error)));
            }
            if let Some((graph_name, children)) = &mut self.current {
                if let Some(child) = children.next() {
                    if child.tag_name() != "triple" {
                        debug!("Ignoring the <{}> element inside of a graph", child.tag_name());
                        continue;
                    }
                    let graph_name = graph_name.clone();
                    return Some(match self.inner.read_triple(&child) {
                        Ok(triple) => Ok(triple.in_graph(graph_name)),
                        Err(error) => Err(self.fail(error)),
                    });
                }
                self.current = None;
            }
            let Some(graph) = self.graphs.as_mut().and_then(Iterator::next) else {
                self.is_ended = true;
                return None;
            };
            if graph.tag_name() != "graph" {
                debug!("Ignoring the <{}> element inside of <TriX>", graph.tag_name());
                continue;
            }
            let mut children = graph.children().peekable();
            let graph_name = match children.next_if(|c| matches!(c.tag_name(), "uri" | "id")) {
                Some(name) => match self.inner.read_graph_name(&name) {
                    Ok(graph_name) => graph_name,
                    Err(error) => return Some(Err(self.fail(error))),
                },
                None => GraphName::DefaultGraph,
            };
            self.current = Some((graph_name, children));
        }
    }
}

impl<E: TrixElement> ElementTrixParser<E> {
    fn fail(&mut self, error: TrixSyntaxError) -> TrixSyntaxError {
        if self.strict {
            self.is_ended = true;
        } else {
            warn!("Skipping invalid TriX content: {error}");
        }
        error
    }
}

struct InnerTrixParser {
    base: Option<Iri<String>>,
    validate: bool,
    canonicalize: bool,
    rdf_star: bool,
    canonicalizer: Arc<dyn XmlCanonicalizer>,
    bnodes: HashMap<String, BlankNode>,
}

impl InnerTrixParser {
    fn read_graph_name<E: TrixElement>(
        &mut self,
        element: &E,
    ) -> Result<GraphName, TrixSyntaxError> {
        match self.read_term(element)? {
            Term::NamedNode(node) => Ok(node.into()),
            Term::BlankNode(node) => Ok(node.into()),
            Term::Literal(_) | Term::Triple(_) => Err(TrixSyntaxError::structural(
                "a graph name must be an IRI or a blank node",
            )),
        }
    }

    fn read_triple<E: TrixElement>(&mut self, element: &E) -> Result<Triple, TrixSyntaxError> {
        let mut children = element.children();
        let (Some(subject), Some(predicate), Some(object)) =
            (children.next(), children.next(), children.next())
        else {
            return Err(TrixSyntaxError::structural(
                "a <triple> element must contain a subject, a predicate and an object",
            ));
        };
        if children.next().is_some() {
            debug!("Ignoring the elements of a <triple> after its object");
        }
        let subject = Subject::try_from(self.read_term(&subject)?).map_err(|term| {
            TrixSyntaxError::structural(format!("the literal {term} can't be a subject"))
        })?;
        let predicate = match self.read_term(&predicate)? {
            Term::NamedNode(node) => node,
            term => {
                return Err(TrixSyntaxError::structural(format!(
                    "the predicate {term} is not an IRI"
                )));
            }
        };
        let object = self.read_term(&object)?;
        Ok(Triple {
            subject,
            predicate,
            object,
        })
    }

    fn read_term<E: TrixElement>(&mut self, element: &E) -> Result<Term, TrixSyntaxError> {
        match element.tag_name() {
            "id" => Ok(self.blank_node(element.text_content().trim()).into()),
            "uri" => Ok(self.named_node(element.text_content().trim())?.into()),
            "typedLiteral" => {
                let datatype = element.attribute("datatype").ok_or_else(|| {
                    TrixSyntaxError::structural("a <typedLiteral> must have a datatype attribute")
                })?;
                let datatype = self.named_node(datatype.trim())?;
                let value = if datatype == rdf::XML_LITERAL {
                    self.canonicalizer
                        .canonicalize(&element.inner_markup())
                        .map_err(TrixSyntaxError::invalid_xml_literal)?
                } else {
                    self.lexical_form(element.text_content(), &datatype)?
                };
                Ok(Literal::new_typed_literal(value, datatype).into())
            }
            "plainLiteral" => {
                let value = element.text_content();
                let language = element
                    .attribute("xml:lang")
                    .or_else(|| element.attribute("lang"))
                    .map(|l| l.trim().to_ascii_lowercase())
                    .filter(|l| !l.is_empty());
                Ok(if let Some(language) = language {
                    if self.validate {
                        if let Err(error) = LanguageTag::parse(language.as_str()) {
                            return Err(TrixSyntaxError::invalid_language_tag(language, error));
                        }
                    }
                    Literal::new_language_tagged_literal_unchecked(value, language)
                } else {
                    Literal::new_simple_literal(value)
                }
                .into())
            }
            "triple" => {
                if !self.rdf_star {
                    return Err(TrixSyntaxError::quoted_triple());
                }
                Ok(self.read_triple(element)?.into())
            }
            tag => Err(TrixSyntaxError::unrecognized_term(tag)),
        }
    }

    fn blank_node(&mut self, label: &str) -> BlankNode {
        self.bnodes
            .entry(label.to_owned())
            .or_insert_with(|| BlankNode::new(label))
            .clone()
    }

    fn named_node(&self, value: &str) -> Result<NamedNode, TrixSyntaxError> {
        if self.validate {
            if let Some(base) = &self.base {
                base.resolve(value)
            } else {
                Iri::parse(value.to_owned())
            }
            .map(NamedNode::new_from_iri)
            .map_err(|error| TrixSyntaxError::invalid_iri(value.into(), error))
        } else if let Some(base) = &self.base {
            Ok(NamedNode::new_from_iri(base.resolve_unchecked(value)))
        } else {
            Ok(NamedNode::new_unchecked(value))
        }
    }

    fn lexical_form(&self, value: String, datatype: &NamedNode) -> Result<String, TrixSyntaxError> {
        if !self.validate && !self.canonicalize {
            return Ok(value);
        }
        match canonical_form(&value, datatype.as_str()) {
            None => Ok(value),
            Some(Ok(canonical)) => Ok(if self.canonicalize { canonical } else { value }),
            Some(Err(msg)) => {
                if self.validate {
                    Err(TrixSyntaxError::invalid_literal(
                        value,
                        datatype.as_str().into(),
                        msg,
                    ))
                } else {
                    Ok(value)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrixErrorKind;
    use crate::vocab::xsd;

    const EX_TRIPLE: &str = "<uri>http://example.org/s</uri><uri>http://example.org/p</uri>";

    fn trix(graphs: &str) -> String {
        format!("<TriX xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\">{graphs}</TriX>")
    }

    fn parse_one(parser: TrixParser, object: &str) -> Result<Quad, TrixSyntaxError> {
        let document = XmlDocument::parse_slice(
            trix(&format!("<graph><triple>{EX_TRIPLE}{object}</triple></graph>")).as_bytes(),
        )?;
        parser
            .strict()
            .for_document(&document)
            .next()
            .ok_or_else(|| TrixSyntaxError::structural("no statement"))?
    }

    #[test]
    fn test_literal_dispatch() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(
            parse_one(TrixParser::new(), "<plainLiteral xml:lang=\"en\">a</plainLiteral>")?.object,
            Literal::new_language_tagged_literal_unchecked("a", "en").into()
        );
        assert_eq!(
            parse_one(TrixParser::new(), "<plainLiteral lang=\"FR\">a</plainLiteral>")?.object,
            Literal::new_language_tagged_literal_unchecked("a", "fr").into()
        );
        assert_eq!(
            parse_one(TrixParser::new(), "<plainLiteral> a </plainLiteral>")?.object,
            Literal::new_simple_literal(" a ").into()
        );
        assert_eq!(
            parse_one(
                TrixParser::new(),
                "<typedLiteral datatype=\"http://www.w3.org/2001/XMLSchema#integer\">32</typedLiteral>"
            )?
            .object,
            Literal::new_typed_literal("32", NamedNode::new_unchecked(xsd::INTEGER)).into()
        );
        Ok(())
    }

    #[test]
    fn test_xml_literal() -> Result<(), TrixSyntaxError> {
        let quad = parse_one(
            TrixParser::new(),
            "<typedLiteral datatype=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral\">some <b a=\"1\">bold</b><br/></typedLiteral>",
        )?;
        assert_eq!(
            quad.object,
            Literal::new_typed_literal(
                "some <b xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\" a=\"1\">bold</b><br xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\"></br>",
                NamedNode::new_unchecked(rdf::XML_LITERAL)
            )
            .into()
        );
        Ok(())
    }

    #[test]
    fn test_xml_literal_namespaces() -> Result<(), TrixSyntaxError> {
        let document = XmlDocument::parse_slice(
            br#"<TriX xmlns="http://www.w3.org/2004/03/trix/trix-1/" xmlns:ex="http://ex.org/"><graph><triple>
            <uri>http://example.org/s</uri>
            <uri>http://example.org/p</uri>
            <typedLiteral datatype="http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral"><ex:b>x</ex:b><c>y</c><d xmlns="">z</d></typedLiteral>
        </triple></graph></TriX>"#,
        )?;
        let quad = TrixParser::new()
            .strict()
            .for_document(&document)
            .next()
            .ok_or_else(|| TrixSyntaxError::structural("no statement"))??;
        assert_eq!(
            quad.object,
            Literal::new_typed_literal(
                "<ex:b xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\" xmlns:ex=\"http://ex.org/\">x</ex:b><c xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\" xmlns:ex=\"http://ex.org/\">y</c><d xmlns:ex=\"http://ex.org/\">z</d>",
                NamedNode::new_unchecked(rdf::XML_LITERAL)
            )
            .into()
        );
        Ok(())
    }

    #[test]
    fn test_custom_canonicalizer() -> Result<(), TrixSyntaxError> {
        struct Uppercase;

        impl XmlCanonicalizer for Uppercase {
            fn canonicalize(
                &self,
                fragment: &str,
            ) -> Result<String, crate::error::InvalidMarkupError> {
                Ok(fragment.to_uppercase())
            }
        }

        let quad = parse_one(
            TrixParser::new().with_xml_canonicalizer(Uppercase),
            "<typedLiteral datatype=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral\">a &lt; b</typedLiteral>",
        )?;
        assert_eq!(
            quad.object,
            Literal::new_typed_literal("A &LT; B", NamedNode::new_unchecked(rdf::XML_LITERAL))
                .into()
        );
        Ok(())
    }

    #[test]
    fn test_validation() {
        let integer = "<typedLiteral datatype=\"http://www.w3.org/2001/XMLSchema#integer\">foo</typedLiteral>";
        assert!(parse_one(TrixParser::new(), integer).is_ok());
        assert_eq!(
            parse_one(TrixParser::new().validate(), integer)
                .unwrap_err()
                .kind(),
            TrixErrorKind::Validation
        );
        assert_eq!(
            parse_one(TrixParser::new().validate(), "<uri>not an iri</uri>")
                .unwrap_err()
                .kind(),
            TrixErrorKind::Validation
        );
        assert_eq!(
            parse_one(
                TrixParser::new().validate(),
                "<plainLiteral xml:lang=\"a_b\">x</plainLiteral>"
            )
            .unwrap_err()
            .kind(),
            TrixErrorKind::Validation
        );
    }

    #[test]
    fn test_canonicalization() -> Result<(), TrixSyntaxError> {
        let integer = "<typedLiteral datatype=\"http://www.w3.org/2001/XMLSchema#integer\">+007</typedLiteral>";
        assert_eq!(
            parse_one(TrixParser::new().canonicalize(), integer)?.object,
            Literal::new_typed_literal("7", NamedNode::new_unchecked(xsd::INTEGER)).into()
        );
        assert_eq!(
            parse_one(TrixParser::new(), integer)?.object,
            Literal::new_typed_literal("+007", NamedNode::new_unchecked(xsd::INTEGER)).into()
        );
        let invalid = "<typedLiteral datatype=\"http://www.w3.org/2001/XMLSchema#boolean\">maybe</typedLiteral>";
        assert_eq!(
            parse_one(TrixParser::new().canonicalize(), invalid)?.object,
            Literal::new_typed_literal("maybe", NamedNode::new_unchecked(xsd::BOOLEAN)).into()
        );
        Ok(())
    }

    #[test]
    fn test_base_iri() -> Result<(), Box<dyn std::error::Error>> {
        let document = XmlDocument::parse_slice(
            b"<TriX xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\" xml:base=\"dir/\"><graph><triple><uri>a</uri><uri>http://example.com/p</uri><uri> #o </uri></triple></graph></TriX>",
        )?;
        let quads = TrixParser::new()
            .with_base_iri("http://example.com/")?
            .validate()
            .for_document(&document)
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(
            quads,
            [Quad::new(
                NamedNode::new("http://example.com/dir/a")?,
                NamedNode::new("http://example.com/p")?,
                NamedNode::new("http://example.com/dir/#o")?,
                GraphName::DefaultGraph
            )]
        );
        Ok(())
    }

    #[test]
    fn test_structural_errors() {
        for (object, kind) in [
            ("", TrixErrorKind::Structural),
            ("<literal>a</literal>", TrixErrorKind::UnrecognizedTerm),
            ("<typedLiteral>1</typedLiteral>", TrixErrorKind::Structural),
            (
                "<triple><uri>http://a</uri><uri>http://b</uri><uri>http://c</uri></triple>",
                TrixErrorKind::UnsupportedFeature,
            ),
        ] {
            assert_eq!(
                parse_one(TrixParser::new(), object).unwrap_err().kind(),
                kind,
                "{object}"
            );
        }
    }

    #[test]
    fn test_predicate_and_subject_kinds() -> Result<(), TrixSyntaxError> {
        let document = XmlDocument::parse_slice(
            trix(
                "<graph>\
                <triple><uri>http://a</uri><id>p</id><uri>http://c</uri></triple>\
                <triple><plainLiteral>s</plainLiteral><uri>http://b</uri><uri>http://c</uri></triple>\
                <triple><uri>http://a</uri><uri>http://b</uri><uri>http://c</uri><uri>http://d</uri></triple>\
                </graph>",
            )
            .as_bytes(),
        )?;
        let results = TrixParser::new().for_document(&document).collect::<Vec<_>>();
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().unwrap_err().kind(),
            TrixErrorKind::Structural
        );
        assert_eq!(
            results[1].as_ref().unwrap_err().kind(),
            TrixErrorKind::Structural
        );
        assert!(results[2].is_ok());
        Ok(())
    }

    #[test]
    fn test_strict_mode_stops() -> Result<(), TrixSyntaxError> {
        let document = XmlDocument::parse_slice(
            trix(
                "<graph>\
                <triple><uri>http://a</uri><foo/><uri>http://c</uri></triple>\
                <triple><uri>http://a</uri><uri>http://b</uri><uri>http://c</uri></triple>\
                </graph>",
            )
            .as_bytes(),
        )?;
        assert_eq!(TrixParser::new().for_document(&document).count(), 2);
        let mut strict = TrixParser::new().strict().for_document(&document);
        assert!(strict.next().is_some_and(|r| r.is_err()));
        assert!(strict.next().is_none());
        Ok(())
    }

    #[test]
    fn test_invalid_graph_name_skips_graph() -> Result<(), TrixSyntaxError> {
        let document = XmlDocument::parse_slice(
            trix(
                "<graph><uri>not valid</uri><triple><uri>http://a</uri><uri>http://b</uri><uri>http://c</uri></triple></graph>\
                <graph><triple><uri>http://a</uri><uri>http://b</uri><uri>http://c</uri></triple></graph>",
            )
            .as_bytes(),
        )?;
        let results = TrixParser::new()
            .validate()
            .for_document(&document)
            .collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert!(
            results[1]
                .as_ref()
                .is_ok_and(|q| q.graph_name.is_default_graph())
        );
        Ok(())
    }

    #[test]
    fn test_wrong_root() -> Result<(), TrixSyntaxError> {
        let document = XmlDocument::parse_slice(b"<RDF><graph/></RDF>")?;
        let results = TrixParser::new().for_document(&document).collect::<Vec<_>>();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].as_ref().unwrap_err().kind(),
            TrixErrorKind::Structural
        );
        Ok(())
    }

    #[test]
    fn test_malformed_document() {
        let error = TrixParser::new()
            .parse_slice(b"<TriX><graph></TriX>")
            .unwrap_err();
        assert!(
            matches!(&error, TrixParseError::Syntax(e) if e.kind() == TrixErrorKind::MalformedDocument)
        );
    }
}
