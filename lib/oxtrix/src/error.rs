use oxilangtag::LanguageTagParseError;
use oxiri::IriParseError;
use std::error::Error;
use std::sync::Arc;
use std::{fmt, io};
use thiserror::Error;

/// Error returned during TriX parsing.
#[derive(Debug, Error)]
pub enum TrixParseError {
    /// I/O error during parsing (file not found...).
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error in the file syntax.
    #[error(transparent)]
    Syntax(#[from] TrixSyntaxError),
}

impl From<TrixParseError> for io::Error {
    #[inline]
    fn from(error: TrixParseError) -> Self {
        match error {
            TrixParseError::Io(error) => error,
            TrixParseError::Syntax(error) => error.into(),
        }
    }
}

impl From<quick_xml::Error> for TrixParseError {
    #[inline]
    fn from(error: quick_xml::Error) -> Self {
        match error {
            quick_xml::Error::Io(error) => {
                Self::Io(Arc::try_unwrap(error).unwrap_or_else(|e| io::Error::new(e.kind(), e)))
            }
            _ => Self::Syntax(TrixSyntaxError {
                inner: SyntaxErrorKind::Xml(error),
            }),
        }
    }
}

/// The family a [`TrixSyntaxError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TrixErrorKind {
    /// An unknown element name is used where a term is expected.
    UnrecognizedTerm,
    /// The element tree does not have the TriX shape (wrong number of terms, literal predicate...).
    Structural,
    /// A quoted triple is used while RDF-star support is not enabled.
    UnsupportedFeature,
    /// An IRI, a language tag or a literal lexical form is not valid.
    Validation,
    /// The underlying XML is not well-formed.
    MalformedDocument,
}

/// An error in the syntax of the parsed file.
#[derive(Debug)]
pub struct TrixSyntaxError {
    pub(crate) inner: SyntaxErrorKind,
}

#[derive(Debug)]
pub(crate) enum SyntaxErrorKind {
    Xml(quick_xml::Error),
    UnrecognizedTerm {
        tag: String,
    },
    Structural {
        msg: String,
    },
    QuotedTriple,
    InvalidIri {
        iri: String,
        error: IriParseError,
    },
    InvalidLanguageTag {
        tag: String,
        error: LanguageTagParseError,
    },
    InvalidLiteral {
        value: String,
        datatype: String,
        msg: String,
    },
    InvalidXmlLiteral {
        error: InvalidMarkupError,
    },
    Malformed {
        msg: String,
    },
}

impl TrixSyntaxError {
    /// The family of this error.
    pub fn kind(&self) -> TrixErrorKind {
        match &self.inner {
            SyntaxErrorKind::Xml(_) | SyntaxErrorKind::Malformed { .. } => {
                TrixErrorKind::MalformedDocument
            }
            SyntaxErrorKind::UnrecognizedTerm { .. } => TrixErrorKind::UnrecognizedTerm,
            SyntaxErrorKind::Structural { .. } => TrixErrorKind::Structural,
            SyntaxErrorKind::QuotedTriple => TrixErrorKind::UnsupportedFeature,
            SyntaxErrorKind::InvalidIri { .. }
            | SyntaxErrorKind::InvalidLanguageTag { .. }
            | SyntaxErrorKind::InvalidLiteral { .. }
            | SyntaxErrorKind::InvalidXmlLiteral { .. } => TrixErrorKind::Validation,
        }
    }

    #[inline]
    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        Self {
            inner: SyntaxErrorKind::Structural { msg: msg.into() },
        }
    }

    #[inline]
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self {
            inner: SyntaxErrorKind::Malformed { msg: msg.into() },
        }
    }

    #[inline]
    pub(crate) fn unrecognized_term(tag: impl Into<String>) -> Self {
        Self {
            inner: SyntaxErrorKind::UnrecognizedTerm { tag: tag.into() },
        }
    }

    #[inline]
    pub(crate) fn quoted_triple() -> Self {
        Self {
            inner: SyntaxErrorKind::QuotedTriple,
        }
    }

    #[inline]
    pub(crate) fn invalid_iri(iri: String, error: IriParseError) -> Self {
        Self {
            inner: SyntaxErrorKind::InvalidIri { iri, error },
        }
    }

    #[inline]
    pub(crate) fn invalid_language_tag(tag: String, error: LanguageTagParseError) -> Self {
        Self {
            inner: SyntaxErrorKind::InvalidLanguageTag { tag, error },
        }
    }

    #[inline]
    pub(crate) fn invalid_literal(value: String, datatype: String, msg: String) -> Self {
        Self {
            inner: SyntaxErrorKind::InvalidLiteral {
                value,
                datatype,
                msg,
            },
        }
    }

    #[inline]
    pub(crate) fn invalid_xml_literal(error: InvalidMarkupError) -> Self {
        Self {
            inner: SyntaxErrorKind::InvalidXmlLiteral { error },
        }
    }
}

impl fmt::Display for TrixSyntaxError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            SyntaxErrorKind::Xml(error) => error.fmt(f),
            SyntaxErrorKind::UnrecognizedTerm { tag } => {
                write!(f, "<{tag}> is not a TriX term element")
            }
            SyntaxErrorKind::Structural { msg } | SyntaxErrorKind::Malformed { msg } => {
                f.write_str(msg)
            }
            SyntaxErrorKind::QuotedTriple => {
                f.write_str("quoted triples are only allowed when RDF-star support is enabled")
            }
            SyntaxErrorKind::InvalidIri { iri, error } => {
                write!(f, "error while parsing IRI '{iri}': {error}")
            }
            SyntaxErrorKind::InvalidLanguageTag { tag, error } => {
                write!(f, "error while parsing language tag '{tag}': {error}")
            }
            SyntaxErrorKind::InvalidLiteral {
                value,
                datatype,
                msg,
            } => write!(f, "'{value}' is not a valid <{datatype}> value: {msg}"),
            SyntaxErrorKind::InvalidXmlLiteral { error } => {
                write!(f, "invalid XML literal: {error}")
            }
        }
    }
}

impl Error for TrixSyntaxError {
    #[inline]
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.inner {
            SyntaxErrorKind::Xml(error) => Some(error),
            SyntaxErrorKind::InvalidIri { error, .. } => Some(error),
            SyntaxErrorKind::InvalidLanguageTag { error, .. } => Some(error),
            SyntaxErrorKind::InvalidXmlLiteral { error } => Some(error),
            _ => None,
        }
    }
}

impl From<TrixSyntaxError> for io::Error {
    #[inline]
    fn from(error: TrixSyntaxError) -> Self {
        match error.inner {
            SyntaxErrorKind::Xml(error) => match error {
                quick_xml::Error::Io(error) => {
                    Arc::try_unwrap(error).unwrap_or_else(|e| Self::new(e.kind(), e))
                }
                _ => Self::new(io::ErrorKind::InvalidData, error),
            },
            _ => Self::new(io::ErrorKind::InvalidData, error),
        }
    }
}

/// A piece of markup handed to an XML collaborator is not well-formed.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct InvalidMarkupError(pub(crate) String);

impl InvalidMarkupError {
    /// Builds an error from a printable error message.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Error returned during TriX serialization.
#[derive(Debug, Error)]
pub enum TrixSerializeError {
    /// I/O error during serialization.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A statement could not be turned into TriX elements.
    ///
    /// The statement terms are kept in their N-Triples form.
    #[error("the statement {subject} {predicate} {object} can't be serialized in TriX: {message}")]
    InvalidTerm {
        message: String,
        subject: String,
        predicate: String,
        object: String,
    },
    /// The comment content can't be carried by an XML comment.
    #[error("'{0}' can't be written in an XML comment")]
    InvalidComment(String),
    /// Only UTF-8 output is supported.
    #[error("the {0} encoding is not supported, only UTF-8 is")]
    UnsupportedEncoding(String),
    /// Strict serialization already failed on a previous statement.
    #[error("the serialization has been aborted by a previous error")]
    Aborted,
}

impl From<TrixSerializeError> for io::Error {
    #[inline]
    fn from(error: TrixSerializeError) -> Self {
        match error {
            TrixSerializeError::Io(error) => error,
            TrixSerializeError::UnsupportedEncoding(_) => {
                Self::new(io::ErrorKind::Unsupported, error)
            }
            _ => Self::new(io::ErrorKind::InvalidInput, error),
        }
    }
}
