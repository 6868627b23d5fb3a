use crate::error::InvalidMarkupError;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::{fmt, str};

/// Computes the lexical form of `rdf:XMLLiteral` values from the markup of `typedLiteral` elements.
///
/// ```
/// use oxtrix::{C14nCanonicalizer, XmlCanonicalizer};
///
/// assert_eq!(
///     C14nCanonicalizer.canonicalize(r#"<a b="2" a="1"/>"#)?,
///     r#"<a a="1" b="2"></a>"#
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub trait XmlCanonicalizer: Send + Sync {
    /// Canonicalizes an XML fragment: a sequence of elements and text without a single root.
    fn canonicalize(&self, fragment: &str) -> Result<String, InvalidMarkupError>;
}

/// A canonicalizer following the output rules of [Canonical XML 1.0](https://www.w3.org/TR/xml-c14n/).
///
/// Empty elements are written with a start and an end tag,
/// attributes are sorted by qualified name with namespace declarations first,
/// comments and processing instructions are dropped.
/// A namespace declaration is only written if it changes the binding rendered by the output ancestors,
/// so `xmlns=""` disappears from the top-level elements.
/// The fragment must carry its own namespace declarations, as returned by [`TrixElement::inner_markup`](crate::TrixElement::inner_markup).
#[derive(Debug, Clone, Copy, Default)]
pub struct C14nCanonicalizer;

impl XmlCanonicalizer for C14nCanonicalizer {
    fn canonicalize(&self, fragment: &str) -> Result<String, InvalidMarkupError> {
        let wrapped = format!("<c14n>{fragment}</c14n>");
        let mut reader = Reader::from_str(&wrapped);
        reader.config_mut().expand_empty_elements = true;
        let mut output = String::with_capacity(fragment.len());
        let mut depth = 0_usize;
        // Namespace bindings written on the currently open output elements
        let mut scopes: Vec<Vec<(String, String)>> = vec![Vec::new()];
        loop {
            match reader.read_event().map_err(markup_error)? {
                Event::Start(start) => {
                    depth += 1;
                    if depth == 1 {
                        continue;
                    }
                    output.push('<');
                    output.push_str(decode(start.name().as_ref())?);
                    let mut namespaces = Vec::new();
                    let mut attributes = Vec::new();
                    for attribute in start.attributes() {
                        let attribute = attribute.map_err(markup_error)?;
                        let key = decode(attribute.key.as_ref())?.to_owned();
                        let value = attribute.unescape_value().map_err(markup_error)?;
                        if key == "xmlns" || key.starts_with("xmlns:") {
                            namespaces.push((key, value.into_owned()));
                        } else {
                            attributes.push((key, value.into_owned()));
                        }
                    }
                    let mut scope = scopes.last().cloned().unwrap_or_default();
                    namespaces.retain(|(key, value)| {
                        let rendered = scope
                            .iter()
                            .find_map(|(k, v)| (k == key).then_some(v.as_str()));
                        rendered.unwrap_or("") != value.as_str()
                    });
                    for (key, value) in &namespaces {
                        if let Some((_, v)) = scope.iter_mut().find(|(k, _)| *k == *key) {
                            value.clone_into(v);
                        } else {
                            scope.push((key.clone(), value.clone()));
                        }
                    }
                    scopes.push(scope);
                    namespaces.sort();
                    attributes.sort();
                    for (key, value) in namespaces.into_iter().chain(attributes) {
                        output.push(' ');
                        output.push_str(&key);
                        output.push_str("=\"");
                        escape_attribute(&value, &mut output);
                        output.push('"');
                    }
                    output.push('>');
                }
                Event::End(end) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        continue;
                    }
                    scopes.pop();
                    output.push_str("</");
                    output.push_str(decode(end.name().as_ref())?);
                    output.push('>');
                }
                Event::Text(text) => {
                    escape_text(&text.unescape().map_err(markup_error)?, &mut output);
                }
                Event::CData(cdata) => {
                    escape_text(decode(&cdata.into_inner())?, &mut output);
                }
                Event::Empty(_) => {
                    return Err(InvalidMarkupError::new(
                        "The expand_empty_elements option must be enabled",
                    ));
                }
                Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => (),
                Event::Eof => return Ok(output),
            }
        }
    }
}

fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\r' => output.push_str("&#xD;"),
            c => output.push(c),
        }
    }
}

fn escape_attribute(value: &str, output: &mut String) {
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '"' => output.push_str("&quot;"),
            '\t' => output.push_str("&#x9;"),
            '\n' => output.push_str("&#xA;"),
            '\r' => output.push_str("&#xD;"),
            c => output.push(c),
        }
    }
}

fn decode(bytes: &[u8]) -> Result<&str, InvalidMarkupError> {
    str::from_utf8(bytes).map_err(markup_error)
}

fn markup_error(error: impl fmt::Display) -> InvalidMarkupError {
    InvalidMarkupError::new(error.to_string())
}
