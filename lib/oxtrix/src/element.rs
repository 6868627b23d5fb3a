//! The narrow view of an XML tree the TriX mapping needs.
//!
//! The mapping between TriX elements and RDF statements is written once against these two traits.
//! [`crate::dom`] provides the implementation backed by `quick-xml`, other XML libraries only have
//! to implement them to be usable with [`TrixParser`](crate::TrixParser) and
//! [`TrixSerializer`](crate::TrixSerializer).

use crate::error::InvalidMarkupError;
use std::borrow::Cow;

/// Read access to an element of an already materialized XML tree.
///
/// It is usually implemented on a cheap handle (a reference, an arena index...) because
/// the TriX parser keeps element handles while it lazily walks the document.
pub trait TrixElement: Sized {
    /// Iterator on the child elements, in document order.
    type Children: Iterator<Item = Self>;

    /// The local name of the element, without any namespace prefix.
    fn tag_name(&self) -> &str;

    /// The value of an attribute.
    ///
    /// `name` is the qualified name: `xml:lang` and `xml:base` must be looked up through the
    /// reserved `xml` prefix, other TriX attributes are unprefixed.
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>>;

    /// The concatenation of all the text nodes below this element.
    fn text_content(&self) -> String;

    /// The child elements of this element, text and comments are skipped.
    fn children(&self) -> Self::Children;

    /// The serialization of the element content (children elements, text...) as written in the document.
    ///
    /// The namespace declarations in scope must be added to the top-level child elements
    /// so that the markup stays meaningful outside of the document.
    fn inner_markup(&self) -> String;
}

/// Construction of an XML tree.
pub trait TrixElementBuilder {
    /// The built elements.
    type Element;

    /// Builds a new element with the given unprefixed `tag`, optional text content and attributes.
    fn make_element(
        &mut self,
        tag: &str,
        text: Option<&str>,
        attributes: &[(&str, &str)],
    ) -> Self::Element;

    /// Adds `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &mut Self::Element, child: Self::Element);

    /// Parses `markup` as XML content and adds the resulting nodes at the end of `parent`.
    ///
    /// The markup does not belong to the default namespace of `parent`.
    /// The content of `parent` must then be written as is, without any indentation added.
    fn append_markup(
        &mut self,
        parent: &mut Self::Element,
        markup: &str,
    ) -> Result<(), InvalidMarkupError>;

    /// Adds a comment at the end of `parent`.
    fn append_comment(&mut self, parent: &mut Self::Element, text: &str);
}
