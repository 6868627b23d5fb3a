//! A small materialized XML tree backed by [`quick-xml`](https://docs.rs/quick-xml).
//!
//! It is the default binding of the [`TrixElement`] and [`TrixElementBuilder`] traits.
//!
//! ```
//! use oxtrix::dom::XmlDocument;
//!
//! let document = XmlDocument::parse_slice(
//!     br#"<TriX xmlns="http://www.w3.org/2004/03/trix/trix-1/"><graph/></TriX>"#,
//! )?;
//! assert_eq!(document.root().local_name(), "TriX");
//! assert_eq!(
//!     document.root().namespace(),
//!     Some("http://www.w3.org/2004/03/trix/trix-1/")
//! );
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

use crate::element::{TrixElement, TrixElementBuilder};
use crate::error::{InvalidMarkupError, TrixParseError, TrixSerializeError, TrixSyntaxError};
use quick_xml::NsReader;
use quick_xml::escape::{escape, partial_escape, unescape};
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read, Write};
use std::sync::Arc;
use std::{fmt, io, slice, str};

/// A parsed or built XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    #[inline]
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }

    /// Parses a document from a byte slice.
    pub fn parse_slice(slice: &[u8]) -> Result<Self, TrixSyntaxError> {
        match parse(NsReader::from_reader(slice)) {
            Ok(document) => Ok(document),
            Err(TrixParseError::Syntax(error)) => Err(error),
            Err(TrixParseError::Io(error)) => Err(TrixSyntaxError::malformed(error.to_string())),
        }
    }

    /// Parses a document from a [`Read`] implementation.
    pub fn parse_read(read: impl Read) -> Result<Self, TrixParseError> {
        parse(NsReader::from_reader(BufReader::new(read)))
    }

    #[inline]
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    #[inline]
    pub fn into_root(self) -> XmlElement {
        self.root
    }

    /// Writes the document, with its XML declaration, to a [`Write`] implementation.
    pub fn write_to<W: Write>(&self, mut write: W, options: &XmlWriteOptions) -> io::Result<W> {
        let mut output = String::new();
        write_document(&mut output, &self.root, options)
            .map_err(|_| io::Error::other("XML serialization failed"))?;
        write.write_all(output.as_bytes())?;
        Ok(write)
    }
}

impl fmt::Display for XmlDocument {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_document(f, &self.root, &XmlWriteOptions::default())
    }
}

/// How an [`XmlDocument`] is written.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct XmlWriteOptions {
    indentation: Option<(char, usize)>,
    encoding: String,
}

impl Default for XmlWriteOptions {
    #[inline]
    fn default() -> Self {
        Self {
            indentation: Some(('\t', 1)),
            encoding: "UTF-8".into(),
        }
    }
}

impl XmlWriteOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indents nested elements with `size` times `indent_char` per level.
    #[inline]
    pub fn with_indentation(mut self, indent_char: char, size: usize) -> Self {
        self.indentation = Some((indent_char, size));
        self
    }

    /// Writes the whole document on a single line.
    #[inline]
    pub fn without_indentation(mut self) -> Self {
        self.indentation = None;
        self
    }

    /// Sets the encoding label of the XML declaration.
    ///
    /// Only labels of the UTF-8 encoding are accepted.
    pub fn with_encoding(
        mut self,
        encoding: impl Into<String>,
    ) -> Result<Self, TrixSerializeError> {
        let encoding = encoding.into();
        if !is_utf8(encoding.as_bytes()) {
            return Err(TrixSerializeError::UnsupportedEncoding(encoding));
        }
        self.encoding = encoding;
        Ok(self)
    }
}

/// An XML element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    namespaces: Arc<Vec<(String, String)>>,
    nodes: Vec<XmlNode>,
    verbatim: bool,
}

/// A node of an XML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
}

impl XmlElement {
    /// Builds an empty element with the given qualified name.
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            namespaces: Arc::default(),
            nodes: Vec::new(),
            verbatim: false,
        }
    }

    /// The qualified name, as written in the document.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name without its namespace prefix.
    #[inline]
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// The namespace the element belongs to, if the parser was able to resolve it.
    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The value of the attribute with the given qualified name.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v.as_str()))
    }

    /// Sets an attribute, replacing the existing value if any.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if name == "xmlns" {
            self.namespace = Some(value.clone());
        }
        if is_namespace_declaration(&name) {
            declare_namespace(Arc::make_mut(&mut self.namespaces), &name, &value);
        }
        if let Some((_, v)) = self.attributes.iter_mut().find(|(k, _)| *k == name) {
            *v = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// The attributes in document order.
    #[inline]
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The namespace declarations in scope for this element, its own ones included.
    ///
    /// Each declaration is given as its attribute name (`xmlns` or `xmlns:prefix`) and the namespace IRI.
    /// An empty IRI means the default namespace has been undeclared.
    #[inline]
    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All the child nodes, including text and comments.
    #[inline]
    pub fn nodes(&self) -> &[XmlNode] {
        &self.nodes
    }

    /// Appends a child node. Adjacent text nodes are merged.
    pub fn push_node(&mut self, node: XmlNode) {
        if let XmlNode::Text(text) = &node {
            if let Some(XmlNode::Text(last)) = self.nodes.last_mut() {
                last.push_str(text);
                return;
            }
        }
        self.nodes.push(node);
    }

    /// Whether the element content must be written without added indentation.
    #[inline]
    pub fn is_verbatim(&self) -> bool {
        self.verbatim
    }

    fn collect_text(&self, output: &mut String) {
        for node in &self.nodes {
            match node {
                XmlNode::Element(element) => element.collect_text(output),
                XmlNode::Text(text) => output.push_str(text),
                XmlNode::Comment(_) => (),
            }
        }
    }
}

impl fmt::Display for XmlElement {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_element(f, self, None, 0, false)
    }
}

impl<'a> TrixElement for &'a XmlElement {
    type Children = XmlChildElements<'a>;

    #[inline]
    fn tag_name(&self) -> &str {
        self.local_name()
    }

    #[inline]
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        (*self).attribute(name).map(Cow::Borrowed)
    }

    fn text_content(&self) -> String {
        let mut output = String::new();
        self.collect_text(&mut output);
        output
    }

    #[inline]
    fn children(&self) -> XmlChildElements<'a> {
        XmlChildElements {
            inner: self.nodes.iter(),
        }
    }

    fn inner_markup(&self) -> String {
        let mut output = String::new();
        for node in &self.nodes {
            // Writing into a String never fails
            let _ = if let XmlNode::Element(element) = node {
                write_element(&mut output, element, None, 0, true)
            } else {
                write_node(&mut output, node, None, 0)
            };
        }
        output
    }
}

/// Iterator on the child elements of an [`XmlElement`].
pub struct XmlChildElements<'a> {
    inner: slice::Iter<'a, XmlNode>,
}

impl<'a> Iterator for XmlChildElements<'a> {
    type Item = &'a XmlElement;

    #[inline]
    fn next(&mut self) -> Option<&'a XmlElement> {
        self.inner.find_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) | XmlNode::Comment(_) => None,
        })
    }
}

/// Builds [`XmlElement`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomBuilder;

impl TrixElementBuilder for DomBuilder {
    type Element = XmlElement;

    fn make_element(
        &mut self,
        tag: &str,
        text: Option<&str>,
        attributes: &[(&str, &str)],
    ) -> XmlElement {
        let mut element = XmlElement::new(tag);
        for (name, value) in attributes {
            element.set_attribute(*name, *value);
        }
        if let Some(text) = text {
            if !text.is_empty() {
                element.push_node(XmlNode::Text(text.into()));
            }
        }
        element
    }

    #[inline]
    fn append_child(&mut self, parent: &mut XmlElement, child: XmlElement) {
        parent.push_node(XmlNode::Element(child));
    }

    fn append_markup(
        &mut self,
        parent: &mut XmlElement,
        markup: &str,
    ) -> Result<(), InvalidMarkupError> {
        let wrapped = format!("<fragment>{markup}</fragment>");
        let fragment = XmlDocument::parse_slice(wrapped.as_bytes())
            .map_err(|e| InvalidMarkupError::new(e.to_string()))?;
        for mut node in fragment.into_root().nodes {
            if let XmlNode::Element(element) = &mut node {
                if element.attribute("xmlns").is_none() {
                    // Keeps the markup out of the namespace of the enclosing elements
                    element.set_attribute("xmlns", "");
                }
            }
            parent.push_node(node);
        }
        parent.verbatim = true;
        Ok(())
    }

    #[inline]
    fn append_comment(&mut self, parent: &mut XmlElement, text: &str) {
        parent.push_node(XmlNode::Comment(text.into()));
    }
}

fn parse<R: BufRead>(mut reader: NsReader<R>) -> Result<XmlDocument, TrixParseError> {
    reader.config_mut().expand_empty_elements = true;
    let mut buffer = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;
    loop {
        buffer.clear();
        match reader.read_event_into(&mut buffer)? {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(TrixSyntaxError::malformed(
                        "an XML document must have a single root element",
                    )
                    .into());
                }
                let mut element = XmlElement::new(decode(start.name().as_ref())?);
                element.namespace = match reader.resolve_element(start.name()).0 {
                    ResolveResult::Bound(namespace) => Some(decode(namespace.as_ref())?.into()),
                    ResolveResult::Unbound => None,
                    ResolveResult::Unknown(prefix) => {
                        return Err(TrixSyntaxError::malformed(format!(
                            "the namespace prefix '{}' is not declared",
                            String::from_utf8_lossy(&prefix)
                        ))
                        .into());
                    }
                };
                if let Some(parent) = stack.last() {
                    element.namespaces = Arc::clone(&parent.namespaces);
                }
                for attribute in start.attributes() {
                    let attribute = attribute.map_err(quick_xml::Error::from)?;
                    let value = attribute.decode_and_unescape_value(reader.decoder())?;
                    let name = decode(attribute.key.as_ref())?;
                    if is_namespace_declaration(name) {
                        declare_namespace(Arc::make_mut(&mut element.namespaces), name, &value);
                    }
                    element.attributes.push((name.into(), value.into_owned()));
                }
                stack.push(element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| TrixSyntaxError::malformed("unexpected closing tag"))?;
                if let Some(parent) = stack.last_mut() {
                    parent.push_node(XmlNode::Element(element));
                } else {
                    root = Some(element);
                }
            }
            Event::Empty(_) => {
                return Err(TrixSyntaxError::malformed(
                    "The expand_empty_elements option must be enabled",
                )
                .into());
            }
            Event::Text(text) => {
                let raw = text.into_inner();
                let text = normalize_line_ends(decode(&raw)?);
                let text = unescape(&text).map_err(quick_xml::Error::from)?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(cdata) => {
                push_text(&mut stack, &normalize_line_ends(decode(&cdata.into_inner())?))?;
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_node(XmlNode::Comment(decode(&comment.into_inner())?.into()));
                }
            }
            Event::Decl(decl) => {
                if let Some(encoding) = decl.encoding() {
                    let encoding = encoding.map_err(quick_xml::Error::from)?;
                    if !is_utf8(&encoding) {
                        return Err(TrixSyntaxError::malformed(
                            "only UTF-8 encoded documents are supported",
                        )
                        .into());
                    }
                }
            }
            Event::PI(_) | Event::DocType(_) => (),
            Event::Eof => {
                return match root {
                    Some(root) if stack.is_empty() => Ok(XmlDocument { root }),
                    _ => Err(
                        TrixSyntaxError::malformed("unexpected end of the XML document").into(),
                    ),
                };
            }
        }
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<(), TrixSyntaxError> {
    if let Some(parent) = stack.last_mut() {
        parent.push_node(XmlNode::Text(text.into()));
        Ok(())
    } else if text.bytes().all(is_whitespace) {
        Ok(())
    } else {
        Err(TrixSyntaxError::malformed(format!(
            "unexpected text outside of the root element: '{text}'"
        )))
    }
}

/// Line ends are normalized before character references are expanded, so `&#xD;` is kept.
fn normalize_line_ends(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n").into()
    } else {
        text.into()
    }
}

fn is_namespace_declaration(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

fn declare_namespace(namespaces: &mut Vec<(String, String)>, name: &str, value: &str) {
    if let Some((_, v)) = namespaces.iter_mut().find(|(k, _)| k == name) {
        value.clone_into(v);
    } else {
        namespaces.push((name.into(), value.into()));
    }
}

fn decode(bytes: &[u8]) -> Result<&str, TrixSyntaxError> {
    str::from_utf8(bytes).map_err(|_| TrixSyntaxError::malformed("the document is not valid UTF-8"))
}

fn write_document(
    output: &mut impl fmt::Write,
    root: &XmlElement,
    options: &XmlWriteOptions,
) -> fmt::Result {
    writeln!(
        output,
        "<?xml version=\"1.0\" encoding=\"{}\"?>",
        options.encoding
    )?;
    write_element(output, root, options.indentation, 0, false)
}

fn write_node(
    output: &mut impl fmt::Write,
    node: &XmlNode,
    indentation: Option<(char, usize)>,
    depth: usize,
) -> fmt::Result {
    match node {
        XmlNode::Element(element) => write_element(output, element, indentation, depth, false),
        XmlNode::Text(text) => output.write_str(&escape_text(text)),
        XmlNode::Comment(text) => write!(output, "<!--{text}-->"),
    }
}

fn write_element(
    output: &mut impl fmt::Write,
    element: &XmlElement,
    indentation: Option<(char, usize)>,
    depth: usize,
    with_namespaces_in_scope: bool,
) -> fmt::Result {
    write!(output, "<{}", element.name)?;
    if with_namespaces_in_scope {
        for (name, value) in element.namespaces.iter() {
            if !value.is_empty() && element.attribute(name).is_none() {
                write!(output, " {name}=\"{}\"", escape_attribute(value))?;
            }
        }
    }
    for (name, value) in &element.attributes {
        write!(output, " {name}=\"{}\"", escape_attribute(value))?;
    }
    if element.nodes.is_empty() {
        return output.write_str("/>");
    }
    output.write_char('>')?;
    // Indentation would change the value of text content
    let indentation = indentation.filter(|_| {
        !element.verbatim
            && element
                .nodes
                .iter()
                .all(|node| !matches!(node, XmlNode::Text(_)))
    });
    for node in &element.nodes {
        if let Some(indentation) = indentation {
            write_indent(output, indentation, depth + 1)?;
        }
        write_node(output, node, indentation, depth + 1)?;
    }
    if let Some(indentation) = indentation {
        write_indent(output, indentation, depth)?;
    }
    write!(output, "</{}>", element.name)
}

fn write_indent(
    output: &mut impl fmt::Write,
    (indent_char, size): (char, usize),
    depth: usize,
) -> fmt::Result {
    output.write_char('\n')?;
    for _ in 0..size * depth {
        output.write_char(indent_char)?;
    }
    Ok(())
}

fn escape_text(text: &str) -> Cow<'_, str> {
    let escaped = partial_escape(text);
    if escaped.contains('\r') {
        escaped.replace('\r', "&#xD;").into()
    } else {
        escaped
    }
}

fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if escaped.contains(['\t', '\n', '\r']) {
        let mut output = String::with_capacity(escaped.len());
        for c in escaped.chars() {
            match c {
                '\t' => output.push_str("&#x9;"),
                '\n' => output.push_str("&#xA;"),
                '\r' => output.push_str("&#xD;"),
                c => output.push(c),
            }
        }
        output.into()
    } else {
        escaped
    }
}

fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

pub(crate) fn is_utf8(encoding: &[u8]) -> bool {
    matches!(
        encoding.to_ascii_lowercase().as_slice(),
        b"unicode-1-1-utf-8"
            | b"unicode11utf8"
            | b"unicode20utf8"
            | b"utf-8"
            | b"utf8"
            | b"x-unicode20utf8"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() -> Result<(), TrixSyntaxError> {
        let document = XmlDocument::parse_slice(
            br#"<?xml version="1.0" encoding="utf-8"?>
<t:root xmlns:t="http://example.com/ns" xml:lang="en"><!-- c --><a>foo &amp; <![CDATA[<bar>]]></a><b/></t:root>"#,
        )?;
        let root = document.root();
        assert_eq!(root.name(), "t:root");
        assert_eq!(root.local_name(), "root");
        assert_eq!(root.namespace(), Some("http://example.com/ns"));
        assert_eq!(root.attribute("xml:lang"), Some("en"));
        let children = root.children().collect::<Vec<_>>();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].text_content(), "foo & <bar>");
        assert_eq!(root.text_content(), "foo & <bar>");
        assert_eq!(children[1].inner_markup(), "");
        Ok(())
    }

    #[test]
    fn test_malformed_documents() {
        for input in [
            "<a><b></a>",
            "<a>",
            "",
            "<a/><b/>",
            "text<a/>",
            "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a/>",
            "<p:a/>",
        ] {
            XmlDocument::parse_slice(input.as_bytes()).unwrap_err();
        }
    }

    #[test]
    fn test_inner_markup() -> Result<(), TrixSyntaxError> {
        let document = XmlDocument::parse_slice(
            br#"<l>some <b class="x &quot;y&quot;">bold</b> text<i/></l>"#,
        )?;
        assert_eq!(
            document.root().inner_markup(),
            r#"some <b class="x &quot;y&quot;">bold</b> text<i/>"#
        );
        Ok(())
    }

    #[test]
    fn test_inner_markup_keeps_namespaces_in_scope() -> Result<(), TrixSyntaxError> {
        let document = XmlDocument::parse_slice(
            br#"<r xmlns="http://example.com/d" xmlns:ex="http://example.com/e"><l>t <ex:b>x</ex:b><c xmlns:ex="http://example.com/f"><d/></c><e xmlns="">y</e></l></r>"#,
        )?;
        let literal = document
            .root()
            .children()
            .next()
            .ok_or_else(|| TrixSyntaxError::malformed("no child"))?;
        assert_eq!(
            literal.inner_markup(),
            r#"t <ex:b xmlns="http://example.com/d" xmlns:ex="http://example.com/e">x</ex:b><c xmlns="http://example.com/d" xmlns:ex="http://example.com/f"><d/></c><e xmlns:ex="http://example.com/e" xmlns="">y</e>"#
        );
        assert_eq!(
            literal.namespaces().collect::<Vec<_>>(),
            [
                ("xmlns", "http://example.com/d"),
                ("xmlns:ex", "http://example.com/e")
            ]
        );
        Ok(())
    }

    #[test]
    fn test_line_ends_are_normalized() -> Result<(), TrixSyntaxError> {
        let document = XmlDocument::parse_slice(b"<a>x\r\ny\rz&#xD;<![CDATA[\r\n]]></a>")?;
        assert_eq!(document.root().text_content(), "x\ny\nz\r\n");
        Ok(())
    }

    #[test]
    fn test_write_indented() -> io::Result<()> {
        let mut builder = DomBuilder;
        let mut root = builder.make_element("root", None, &[("xmlns", "http://example.com/")]);
        let mut list = builder.make_element("list", None, &[]);
        let item = builder.make_element("item", Some("a < b"), &[("k", "v\n")]);
        builder.append_child(&mut list, item);
        builder.append_child(&mut root, list);
        let mut literal = builder.make_element("literal", None, &[]);
        builder
            .append_markup(&mut literal, "<x/><y>z</y>")
            .map_err(io::Error::other)?;
        builder.append_child(&mut root, literal);
        assert_eq!(root.namespace(), Some("http://example.com/"));

        let output = XmlDocument::new(root).write_to(
            Vec::new(),
            &XmlWriteOptions::new().with_indentation(' ', 2),
        )?;
        assert_eq!(
            String::from_utf8(output).map_err(io::Error::other)?,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root xmlns=\"http://example.com/\">\n  <list>\n    <item k=\"v&#xA;\">a &lt; b</item>\n  </list>\n  <literal><x xmlns=\"\"/><y xmlns=\"\">z</y></literal>\n</root>"
        );
        Ok(())
    }

    #[test]
    fn test_write_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let input = "<a x=\"1\"><b>line\r\nbreak</b><!--note--></a>";
        let document = XmlDocument::parse_slice(input.as_bytes())?;
        let output = document.write_to(Vec::new(), &XmlWriteOptions::new().without_indentation())?;
        let reparsed = XmlDocument::parse_slice(&output)?;
        assert_eq!(document, reparsed);
        Ok(())
    }

    #[test]
    fn test_invalid_markup() {
        let mut parent = XmlElement::new("p");
        DomBuilder.append_markup(&mut parent, "<a>").unwrap_err();
        DomBuilder
            .append_markup(&mut parent, "plain text")
            .unwrap();
        assert!(parent.is_verbatim());
    }

    #[test]
    fn test_encoding_labels() {
        XmlWriteOptions::new().with_encoding("utf8").unwrap();
        XmlWriteOptions::new().with_encoding("latin1").unwrap_err();
    }
}
