//! Repository descriptor meta-model.
//!
//! Entities are built once from a node of a descriptor document and never
//! mutated afterwards. The document itself is reached only through
//! [`DescriptorNode`], so any tree source can feed the model.

mod error;
mod header;
mod item_descriptor;
mod property;
mod repository;
mod selection;
mod table;

pub use error::MetaModelError;
pub use header::Header;
pub use item_descriptor::ItemDescriptor;
pub use property::Property;
pub use repository::SqlRepository;
pub use table::Table;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural kind of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Element => "element",
            NodeKind::Text => "text",
            NodeKind::Comment => "comment",
        };
        f.write_str(s)
    }
}

/// A node of a structured descriptor document.
pub trait DescriptorNode {
    fn kind(&self) -> NodeKind;

    /// Element name; empty for non-element nodes.
    fn tag(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Direct child elements with the given name, in document order.
    fn children_named(&self, tag: &str) -> Vec<&Self>;

    /// All descendant elements with the given name, in document order.
    fn descendants_named(&self, tag: &str) -> Vec<&Self>;

    /// Concatenated text content.
    fn text(&self) -> String;
}

/// What to do when two entities in one mapping share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// The later entity silently replaces the earlier one.
    #[default]
    Replace,
    /// A duplicate name is a validation failure.
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub duplicates: DuplicatePolicy,
}

/// Read a boolean attribute; only a case-insensitive "true" counts.
fn flag(node: &impl DescriptorNode, name: &str) -> bool {
    node.attribute(name)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Read an optional attribute, treating blank values as absent.
fn optional_attr(node: &impl DescriptorNode, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Read a mandatory, non-empty attribute.
fn required_attr(
    node: &impl DescriptorNode,
    entity: &'static str,
    field: &'static str,
) -> Result<String, MetaModelError> {
    optional_attr(node, field).ok_or(MetaModelError::MissingField { entity, field })
}

/// Split a comma-joined attribute value into trimmed, non-empty parts.
fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}
