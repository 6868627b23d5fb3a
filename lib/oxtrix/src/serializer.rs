use crate::blank_node::BlankNode;
use crate::dom::{DomBuilder, XmlDocument, XmlWriteOptions};
use crate::element::TrixElementBuilder;
use crate::error::TrixSerializeError;
use crate::literal::Literal;
use crate::named_node::NamedNode;
use crate::triple::{GraphName, Quad, Subject, Term, Triple};
use crate::vocab::rdf;
use crate::TRIX_NAMESPACE;
use oxiri::{Iri, IriParseError};
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Write;
use tracing::warn;

/// A [TriX](https://www.hpl.hp.com/techreports/2004/HPL-2004-56.html) serializer.
///
/// Contiguous statements sharing the same graph name are grouped in a single `graph` element.
/// Statements are never reordered: a graph name used again after another one opens a new `graph` element.
///
/// ```
/// use oxtrix::{NamedNode, TrixSerializer, Triple};
///
/// let mut serializer = TrixSerializer::new().for_writer(Vec::new());
/// serializer.write_triple(&Triple::new(
///     NamedNode::new("http://example.com#me")?,
///     NamedNode::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#type")?,
///     NamedNode::new("http://schema.org/Person")?,
/// ))?;
/// assert_eq!(
///     b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<TriX xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\">\n\t<graph>\n\t\t<triple>\n\t\t\t<uri>http://example.com#me</uri>\n\t\t\t<uri>http://www.w3.org/1999/02/22-rdf-syntax-ns#type</uri>\n\t\t\t<uri>http://schema.org/Person</uri>\n\t\t</triple>\n\t</graph>\n</TriX>",
///     serializer.finish()?.as_slice()
/// );
/// # Result::<_,Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default, Clone, Debug)]
#[must_use]
pub struct TrixSerializer {
    base: Option<Iri<String>>,
    write_options: XmlWriteOptions,
    strict: bool,
}

impl TrixSerializer {
    /// Builds a new [`TrixSerializer`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `xml:base` of the document. IRIs are written relative to it when possible.
    ///
    /// ```
    /// use oxtrix::{NamedNode, TrixSerializer, Triple};
    ///
    /// let mut serializer = TrixSerializer::new()
    ///     .with_base_iri("http://example.org/")?
    ///     .without_indentation()
    ///     .for_writer(Vec::new());
    /// serializer.write_triple(&Triple::new(
    ///     NamedNode::new("http://example.org/a")?,
    ///     NamedNode::new("http://example.org/b")?,
    ///     NamedNode::new("http://example.com/c")?,
    /// ))?;
    /// assert_eq!(
    ///     b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<TriX xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\" xml:base=\"http://example.org/\"><graph><triple><uri>a</uri><uri>b</uri><uri>http://example.com/c</uri></triple></graph></TriX>",
    ///     serializer.finish()?.as_slice()
    /// );
    /// # Result::<_,Box<dyn std::error::Error>>::Ok(())
    /// ```
    #[inline]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Result<Self, IriParseError> {
        self.base = Some(Iri::parse(base_iri.into())?);
        Ok(self)
    }

    /// Sets the encoding label written in the XML declaration.
    ///
    /// The output is always UTF-8 so only labels of this encoding are allowed.
    #[inline]
    pub fn with_encoding(
        mut self,
        encoding: impl Into<String>,
    ) -> Result<Self, TrixSerializeError> {
        self.write_options = self.write_options.with_encoding(encoding)?;
        Ok(self)
    }

    /// Indents nested elements with `size` times `indent_char` per level (one tab by default).
    #[inline]
    pub fn with_indentation(mut self, indent_char: char, size: usize) -> Self {
        self.write_options = self.write_options.with_indentation(indent_char, size);
        self
    }

    /// Writes the whole document on a single line.
    #[inline]
    pub fn without_indentation(mut self) -> Self {
        self.write_options = self.write_options.without_indentation();
        self
    }

    /// Makes the serializer refuse any operation after a statement failed to be written.
    #[inline]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Builds the TriX document with the given [`TrixElementBuilder`].
    pub fn for_builder<B: TrixElementBuilder>(self, mut builder: B) -> ElementTrixSerializer<B> {
        let base = self.base.as_ref().map(Iri::as_str);
        let root = if let Some(base) = base {
            builder.make_element("TriX", None, &[("xmlns", TRIX_NAMESPACE), ("xml:base", base)])
        } else {
            builder.make_element("TriX", None, &[("xmlns", TRIX_NAMESPACE)])
        };
        ElementTrixSerializer {
            builder,
            root,
            current_graph: None,
            base: self.base,
            bnodes: HashMap::new(),
            strict: self.strict,
            is_aborted: false,
        }
    }

    /// Writes a TriX file to a [`Write`] implementation.
    ///
    /// The document is kept in memory and written on [`WriterTrixSerializer::finish`].
    pub fn for_writer<W: Write>(self, write: W) -> WriterTrixSerializer<W> {
        let write_options = self.write_options.clone();
        WriterTrixSerializer {
            write,
            write_options,
            inner: self.for_builder(DomBuilder),
        }
    }

    /// Builds an [`XmlDocument`] from a sequence of statements.
    ///
    /// Statements that can't be written are skipped, or make the whole serialization fail in [strict](TrixSerializer::strict) mode.
    pub fn serialize_document<'a>(
        self,
        quads: impl IntoIterator<Item = &'a Quad>,
    ) -> Result<XmlDocument, TrixSerializeError> {
        let strict = self.strict;
        let mut serializer = self.for_builder(DomBuilder);
        for quad in quads {
            if let Err(error) = serializer.write_quad(quad) {
                if strict {
                    return Err(error);
                }
            }
        }
        Ok(XmlDocument::new(serializer.finish()?))
    }
}

/// Writes a TriX document into a tree of a [`TrixElementBuilder`]. Can be built using [`TrixSerializer::for_builder`].
///
/// Blank node labels are assigned per serializer: `b0`, `b1`...
/// A blank node used several times, even inside of quoted triples, always gets the same label.
#[must_use]
pub struct ElementTrixSerializer<B: TrixElementBuilder> {
    builder: B,
    root: B::Element,
    current_graph: Option<(GraphName, B::Element)>,
    base: Option<Iri<String>>,
    bnodes: HashMap<BlankNode, String>,
    strict: bool,
    is_aborted: bool,
}

impl<B: TrixElementBuilder> ElementTrixSerializer<B> {
    /// Writes an extra statement.
    ///
    /// It is added to the currently open `graph` element if it has the same graph name.
    pub fn write_quad(&mut self, quad: &Quad) -> Result<(), TrixSerializeError> {
        self.write_statement(&quad.subject, &quad.predicate, &quad.object, &quad.graph_name)
    }

    /// Writes an extra statement in the default graph.
    pub fn write_triple(&mut self, triple: &Triple) -> Result<(), TrixSerializeError> {
        self.write_statement(
            &triple.subject,
            &triple.predicate,
            &triple.object,
            &GraphName::DefaultGraph,
        )
    }

    /// Writes a whole graph in its own `graph` element, even if the previous statements have the same graph name.
    ///
    /// If some triples can't be written, the other ones are still written and the first error is returned.
    pub fn write_graph<'a>(
        &mut self,
        graph_name: &GraphName,
        triples: impl IntoIterator<Item = &'a Triple>,
    ) -> Result<(), TrixSerializeError> {
        self.check_aborted()?;
        let graph = match self.format_graph(graph_name) {
            Ok(graph) => graph,
            Err(message) => {
                let error = TrixSerializeError::InvalidTerm {
                    message,
                    subject: String::new(),
                    predicate: String::new(),
                    object: graph_name.to_string(),
                };
                return Err(self.fail(error));
            }
        };
        self.close_graph();
        self.current_graph = Some((graph_name.clone(), graph));
        let mut first_error = None;
        for triple in triples {
            match self.format_statement(&triple.subject, &triple.predicate, &triple.object) {
                Ok(element) => {
                    if let Some((_, graph)) = &mut self.current_graph {
                        self.builder.append_child(graph, element);
                    }
                }
                Err(message) => {
                    let error = self.fail(invalid_term(
                        message,
                        &triple.subject,
                        &triple.predicate,
                        &triple.object,
                    ));
                    if self.strict {
                        return Err(error);
                    }
                    first_error.get_or_insert(error);
                }
            }
        }
        self.close_graph();
        first_error.map_or(Ok(()), Err)
    }

    /// Writes an XML comment.
    ///
    /// It is added at the end of the currently open `graph` element or, if there is none, of the root element.
    pub fn write_comment(&mut self, text: &str) -> Result<(), TrixSerializeError> {
        self.check_aborted()?;
        if text.contains("--") || text.ends_with('-') || check_xml_text(text).is_err() {
            let error = TrixSerializeError::InvalidComment(text.into());
            return Err(self.fail(error));
        }
        if let Some((_, graph)) = &mut self.current_graph {
            self.builder.append_comment(graph, text);
        } else {
            self.builder.append_comment(&mut self.root, text);
        }
        Ok(())
    }

    /// Ends the write process and returns the root `TriX` element.
    pub fn finish(mut self) -> Result<B::Element, TrixSerializeError> {
        self.check_aborted()?;
        self.close_graph();
        Ok(self.root)
    }

    fn write_statement(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        object: &Term,
        graph_name: &GraphName,
    ) -> Result<(), TrixSerializeError> {
        self.check_aborted()?;
        let triple = match self.format_statement(subject, predicate, object) {
            Ok(triple) => triple,
            Err(message) => {
                return Err(self.fail(invalid_term(message, subject, predicate, object)));
            }
        };
        if self
            .current_graph
            .as_ref()
            .is_none_or(|(current, _)| current != graph_name)
        {
            let graph = match self.format_graph(graph_name) {
                Ok(graph) => graph,
                Err(message) => {
                    return Err(self.fail(invalid_term(message, subject, predicate, object)));
                }
            };
            self.close_graph();
            self.current_graph = Some((graph_name.clone(), graph));
        }
        if let Some((_, graph)) = &mut self.current_graph {
            self.builder.append_child(graph, triple);
        }
        Ok(())
    }

    fn close_graph(&mut self) {
        if let Some((_, graph)) = self.current_graph.take() {
            self.builder.append_child(&mut self.root, graph);
        }
    }

    fn format_graph(&mut self, graph_name: &GraphName) -> Result<B::Element, String> {
        let name = match graph_name {
            GraphName::NamedNode(node) => Some(self.format_named_node(node)?),
            GraphName::BlankNode(node) => Some(self.format_blank_node(node)),
            GraphName::DefaultGraph => None,
        };
        let mut graph = self.builder.make_element("graph", None, &[]);
        if let Some(name) = name {
            self.builder.append_child(&mut graph, name);
        }
        Ok(graph)
    }

    fn format_statement(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        object: &Term,
    ) -> Result<B::Element, String> {
        let subject = match subject {
            Subject::NamedNode(node) => self.format_named_node(node)?,
            Subject::BlankNode(node) => self.format_blank_node(node),
            Subject::Triple(triple) => {
                self.format_statement(&triple.subject, &triple.predicate, &triple.object)?
            }
        };
        let predicate = self.format_named_node(predicate)?;
        let object = match object {
            Term::NamedNode(node) => self.format_named_node(node)?,
            Term::BlankNode(node) => self.format_blank_node(node),
            Term::Literal(literal) => self.format_literal(literal)?,
            Term::Triple(triple) => {
                self.format_statement(&triple.subject, &triple.predicate, &triple.object)?
            }
        };
        let mut triple = self.builder.make_element("triple", None, &[]);
        self.builder.append_child(&mut triple, subject);
        self.builder.append_child(&mut triple, predicate);
        self.builder.append_child(&mut triple, object);
        Ok(triple)
    }

    fn format_named_node(&mut self, node: &NamedNode) -> Result<B::Element, String> {
        let iri = relativize(self.base.as_ref(), node.as_str());
        check_xml_text(&iri)?;
        Ok(self.builder.make_element("uri", Some(&*iri), &[]))
    }

    fn format_blank_node(&mut self, node: &BlankNode) -> B::Element {
        let id = self.bnodes.len();
        let label = self
            .bnodes
            .entry(node.clone())
            .or_insert_with(|| format!("b{id}"));
        self.builder.make_element("id", Some(label.as_str()), &[])
    }

    fn format_literal(&mut self, literal: &Literal) -> Result<B::Element, String> {
        if literal.is_xml_literal() {
            let mut element =
                self.builder
                    .make_element("typedLiteral", None, &[("datatype", rdf::XML_LITERAL)]);
            self.builder
                .append_markup(&mut element, literal.value())
                .map_err(|e| format!("the XML literal value is not well-formed: {e}"))?;
            return Ok(element);
        }
        check_xml_text(literal.value())?;
        Ok(if let Some(datatype) = literal.datatype() {
            check_xml_text(datatype.as_str())?;
            self.builder.make_element(
                "typedLiteral",
                Some(literal.value()),
                &[("datatype", datatype.as_str())],
            )
        } else if let Some(language) = literal.language() {
            check_xml_text(language)?;
            self.builder.make_element(
                "plainLiteral",
                Some(literal.value()),
                &[("xml:lang", language)],
            )
        } else {
            self.builder
                .make_element("plainLiteral", Some(literal.value()), &[])
        })
    }

    fn check_aborted(&self) -> Result<(), TrixSerializeError> {
        if self.is_aborted {
            Err(TrixSerializeError::Aborted)
        } else {
            Ok(())
        }
    }

    fn fail(&mut self, error: TrixSerializeError) -> TrixSerializeError {
        if self.strict {
            self.is_aborted = true;
        } else {
            warn!("Skipping content that can't be written in TriX: {error}");
        }
        error
    }
}

/// Writes a TriX file to a [`Write`] implementation. Can be built using [`TrixSerializer::for_writer`].
///
/// ```
/// use oxtrix::{NamedNode, Quad, TrixSerializer};
///
/// let mut serializer = TrixSerializer::new()
///     .without_indentation()
///     .for_writer(Vec::new());
/// serializer.write_comment("generated")?;
/// serializer.write_quad(&Quad::new(
///     NamedNode::new("http://example.com/s")?,
///     NamedNode::new("http://example.com/p")?,
///     NamedNode::new("http://example.com/o")?,
///     NamedNode::new("http://example.com/g")?,
/// ))?;
/// assert_eq!(
///     b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<TriX xmlns=\"http://www.w3.org/2004/03/trix/trix-1/\"><!--generated--><graph><uri>http://example.com/g</uri><triple><uri>http://example.com/s</uri><uri>http://example.com/p</uri><uri>http://example.com/o</uri></triple></graph></TriX>",
///     serializer.finish()?.as_slice()
/// );
/// # Result::<_,Box<dyn std::error::Error>>::Ok(())
/// ```
#[must_use]
pub struct WriterTrixSerializer<W: Write> {
    write: W,
    write_options: XmlWriteOptions,
    inner: ElementTrixSerializer<DomBuilder>,
}

impl<W: Write> WriterTrixSerializer<W> {
    /// Writes an extra statement.
    #[inline]
    pub fn write_quad(&mut self, quad: &Quad) -> Result<(), TrixSerializeError> {
        self.inner.write_quad(quad)
    }

    /// Writes an extra statement in the default graph.
    #[inline]
    pub fn write_triple(&mut self, triple: &Triple) -> Result<(), TrixSerializeError> {
        self.inner.write_triple(triple)
    }

    /// Writes a whole graph in its own `graph` element.
    #[inline]
    pub fn write_graph<'a>(
        &mut self,
        graph_name: &GraphName,
        triples: impl IntoIterator<Item = &'a Triple>,
    ) -> Result<(), TrixSerializeError> {
        self.inner.write_graph(graph_name, triples)
    }

    /// Writes an XML comment.
    #[inline]
    pub fn write_comment(&mut self, text: &str) -> Result<(), TrixSerializeError> {
        self.inner.write_comment(text)
    }

    /// Ends the write process and returns the underlying [`Write`].
    pub fn finish(self) -> Result<W, TrixSerializeError> {
        let root = self.inner.finish()?;
        Ok(XmlDocument::new(root).write_to(self.write, &self.write_options)?)
    }
}

fn invalid_term(
    message: String,
    subject: &Subject,
    predicate: &NamedNode,
    object: &Term,
) -> TrixSerializeError {
    TrixSerializeError::InvalidTerm {
        message,
        subject: subject.to_string(),
        predicate: predicate.to_string(),
        object: object.to_string(),
    }
}

/// Only returns a relative reference if it resolves back to `iri` and keeps the IRI authority.
fn relativize<'a>(base: Option<&Iri<String>>, iri: &'a str) -> Cow<'a, str> {
    let Some(base) = base else {
        return Cow::Borrowed(iri);
    };
    let Ok(absolute) = Iri::parse(iri) else {
        return Cow::Borrowed(iri);
    };
    if let Ok(relative) = base.relativize(&absolute) {
        let relative = relative.into_inner();
        if !relative.starts_with("//")
            && base
                .resolve(&relative)
                .is_ok_and(|resolved| resolved.as_str() == iri)
        {
            return relative.into();
        }
    }
    Cow::Borrowed(iri)
}

fn check_xml_text(text: &str) -> Result<(), String> {
    match text.chars().find(|c| {
        !matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
    }) {
        Some(c) => Err(format!(
            "the character U+{:04X} is not allowed in XML 1.0",
            u32::from(c)
        )),
        None => Ok(()),
    }
}
