//! Decoded DBD model — segments and the child records they own.

use serde::{Deserialize, Serialize};

/// A single `KEY=VALUE` attribute.
///
/// A parenthesized value list is carried as one flattened string, e.g.
/// `"(PATNO,SEQ,U)"`. Attribute order within a record matches source
/// order and is preserved through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// A `FIELD` record — one field definition within a segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub attributes: Vec<Attribute>,
}

/// An `LCHILD` record — a logical-child relationship of a segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeftChild {
    pub attributes: Vec<Attribute>,
}

/// An `XDFLD` record — an indexed-field cross-reference of a segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    pub attributes: Vec<Attribute>,
}

/// A `SEGM` record and the child records it owns.
///
/// Ownership is exclusive and tree-shaped: every child record belongs to
/// the segment whose header most recently preceded it in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub attributes: Vec<Attribute>,
    pub fields: Vec<Field>,
    pub left_children: Vec<LeftChild>,
    pub cross_references: Vec<CrossReference>,
}

impl Segment {
    /// Look up an attribute value by key (first match wins).
    pub fn attribute(&self, key: &str) -> Option<&str> {
        lookup(&self.attributes, key)
    }

    /// The segment's NAME attribute, if present.
    pub fn name(&self) -> Option<&str> {
        self.attribute("NAME")
    }
}

impl Field {
    /// Look up an attribute value by key (first match wins).
    pub fn attribute(&self, key: &str) -> Option<&str> {
        lookup(&self.attributes, key)
    }
}

fn lookup<'a>(attributes: &'a [Attribute], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.as_str())
}
