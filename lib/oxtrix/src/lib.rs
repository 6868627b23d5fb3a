//! OxTriX is a parser and serializer for [TriX](https://www.hpl.hp.com/techreports/2004/HPL-2004-56.html),
//! the XML syntax for named graphs.
//!
//! It maps TriX documents to [RDF 1.1](https://www.w3.org/TR/rdf11-concepts/) quads and back,
//! including [RDF-star](https://w3c.github.io/rdf-star/cg-spec/) quoted triples written as nested `triple` elements.
//!
//! The mapping works on an already materialized XML tree exposed through the [`TrixElement`] and
//! [`TrixElementBuilder`] traits. The [`dom`] module provides an implementation based on [quick-xml](https://docs.rs/quick-xml).
//!
//! ```
//! use oxtrix::{NamedNode, Quad, TrixParser, TrixSerializer};
//!
//! let quad = Quad::new(
//!     NamedNode::new("http://example.org/Bob")?,
//!     NamedNode::new("http://example.org/wife")?,
//!     NamedNode::new("http://example.org/Mary")?,
//!     NamedNode::new("http://example.org/graph1")?,
//! );
//!
//! let mut serializer = TrixSerializer::new().for_writer(Vec::new());
//! serializer.write_quad(&quad)?;
//! let file = serializer.finish()?;
//!
//! assert_eq!(TrixParser::new().parse_slice(&file)?, [quad]);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod blank_node;
mod c14n;
mod datatypes;
pub mod dom;
mod element;
mod error;
mod literal;
mod named_node;
mod parser;
mod serializer;
mod triple;
pub mod vocab;

pub use crate::blank_node::BlankNode;
pub use crate::c14n::{C14nCanonicalizer, XmlCanonicalizer};
pub use crate::datatypes::canonical_form;
pub use crate::element::{TrixElement, TrixElementBuilder};
pub use crate::error::{
    InvalidMarkupError, TrixErrorKind, TrixParseError, TrixSerializeError, TrixSyntaxError,
};
pub use crate::literal::Literal;
pub use crate::named_node::NamedNode;
pub use crate::parser::{ElementTrixParser, TrixParser};
pub use crate::serializer::{ElementTrixSerializer, TrixSerializer, WriterTrixSerializer};
pub use crate::triple::{GraphName, NamedOrBlankNode, Quad, Subject, Term, Triple};
pub use oxilangtag::LanguageTagParseError;
pub use oxiri::IriParseError;

/// The TriX XML namespace.
pub const TRIX_NAMESPACE: &str = "http://www.w3.org/2004/03/trix/trix-1/";

/// The [IANA media type](https://www.iana.org/assignments/media-types/) of TriX.
pub const TRIX_MEDIA_TYPE: &str = "application/trix";

/// The usual file extension of TriX files.
pub const TRIX_FILE_EXTENSION: &str = "xml";
