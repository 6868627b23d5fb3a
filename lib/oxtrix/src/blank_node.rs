use rand::random;
use std::fmt;

/// An owned RDF [blank node](https://www.w3.org/TR/rdf11-concepts/#dfn-blank-node).
///
/// A blank node is made of a human readable `label` and of an opaque `identity`.
/// The identity is the coreference key: two blank nodes are the same node if and only if they
/// share both label and identity. Parsers allocate a fresh identity for each distinct label
/// they meet in a document, so the same label read from two different documents (or twice from
/// the same document by two different parsers) gives two different blank nodes.
///
/// The common way to create a new blank node is to use the [`BlankNode::default()`] function.
///
/// The default string formatter is returning an N-Triples compatible representation:
/// ```
/// use oxtrix::BlankNode;
///
/// assert_eq!("_:a122", BlankNode::new_with_identity("a122", 1).to_string());
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct BlankNode {
    label: String,
    identity: u128,
}

impl BlankNode {
    /// Creates a blank node with the given label and a fresh random identity.
    ///
    /// Calling this function twice with the same label returns two distinct blank nodes.
    #[inline]
    pub fn new(label: impl Into<String>) -> Self {
        Self::new_with_identity(label, random())
    }

    /// Creates a blank node from a label and an explicit identity.
    #[inline]
    pub fn new_with_identity(label: impl Into<String>, identity: u128) -> Self {
        Self {
            label: label.into(),
            identity,
        }
    }

    /// The label this blank node has been created with.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// The opaque coreference key of this blank node.
    #[inline]
    pub fn identity(&self) -> u128 {
        self.identity
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.label
    }
}

impl fmt::Display for BlankNode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.label)
    }
}

impl Default for BlankNode {
    /// Builds a new RDF [blank node](https://www.w3.org/TR/rdf11-concepts/#dfn-blank-node) with a unique id.
    #[inline]
    fn default() -> Self {
        // The label does not start with a digit to stay a valid XML name
        loop {
            let identity: u128 = random();
            let label = format!("{identity:x}");
            if matches!(label.as_bytes().first(), Some(b'a'..=b'f')) {
                return Self { label, identity };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_label_is_not_same_node() {
        assert_ne!(BlankNode::new("x"), BlankNode::new("x"));
        assert_eq!(
            BlankNode::new_with_identity("x", 12),
            BlankNode::new_with_identity("x", 12)
        );
    }

    #[test]
    fn test_default_label() {
        let node = BlankNode::default();
        assert_eq!(node.as_str(), format!("{:x}", node.identity()));
        assert!(
            node.as_str().starts_with(|c: char| c.is_ascii_alphabetic()),
            "default labels should start with a letter"
        );
    }
}
