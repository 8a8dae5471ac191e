//! Field tree output.
//!
//! Decoders only talk to [`FieldSink`]; how the tree is stored or rendered is
//! the sink's business. [`FieldTree`] is the owned implementation used by the
//! analysis layer and the tests.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::date::AfpDate;
use super::fields::Field;

/// Decoded value attached to a field node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    None,
    Bool(bool),
    Uint(u64),
    Int(i64),
    Text(String),
    /// Raw bytes, hex encoded.
    Bytes(String),
    Date(AfpDate),
}

/// One node of a decoded field tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    /// Stable field identifier (e.g. `afp.vol_id`).
    pub id: String,
    /// Display name from the field catalog.
    pub name: String,
    /// Display override for group nodes (e.g. `Path: Documents`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Offset of the first byte in the message.
    pub offset: usize,
    /// Number of bytes covered in the message.
    pub len: usize,
    pub value: FieldValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldNode>,
}

impl FieldNode {
    fn new(field: &Field, range: Range<usize>, value: FieldValue, label: Option<String>) -> Self {
        Self {
            id: field.id.to_string(),
            name: field.name.to_string(),
            label,
            offset: range.start,
            len: range.end.saturating_sub(range.start),
            value,
            children: Vec::new(),
        }
    }

    /// Depth-first search for the first node with `id`.
    pub fn find(&self, id: &str) -> Option<&FieldNode> {
        if self.id == id {
            return Some(self);
        }
        find_field(&self.children, id)
    }
}

/// Depth-first search over a forest of nodes.
pub fn find_field<'a>(nodes: &'a [FieldNode], id: &str) -> Option<&'a FieldNode> {
    nodes.iter().find_map(|node| node.find(id))
}

/// Collect every node with `id`, depth-first, in emission order.
pub fn find_all<'a>(nodes: &'a [FieldNode], id: &str) -> Vec<&'a FieldNode> {
    let mut out = Vec::new();
    collect(nodes, id, &mut out);
    out
}

fn collect<'a>(nodes: &'a [FieldNode], id: &str, out: &mut Vec<&'a FieldNode>) {
    for node in nodes {
        if node.id == id {
            out.push(node);
        }
        collect(&node.children, id, out);
    }
}

/// Destination for decoded fields.
pub trait FieldSink {
    /// Add a leaf under the current group.
    fn add(&mut self, field: &'static Field, range: Range<usize>, value: FieldValue);

    /// Add a node and make it the current group until [`FieldSink::close`].
    fn open(
        &mut self,
        field: &'static Field,
        range: Range<usize>,
        value: FieldValue,
        label: Option<String>,
    );

    /// Close the current group.
    fn close(&mut self);
}

/// Owned field tree built from sink calls.
#[derive(Debug, Default)]
pub struct FieldTree {
    roots: Vec<FieldNode>,
    open: Vec<FieldNode>,
}

impl FieldTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close any groups left open (e.g. after a decode error) and return the
    /// top-level nodes.
    pub fn finish(mut self) -> Vec<FieldNode> {
        while !self.open.is_empty() {
            self.close();
        }
        self.roots
    }

    fn attach(&mut self, node: FieldNode) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }
}

impl FieldSink for FieldTree {
    fn add(&mut self, field: &'static Field, range: Range<usize>, value: FieldValue) {
        self.attach(FieldNode::new(field, range, value, None));
    }

    fn open(
        &mut self,
        field: &'static Field,
        range: Range<usize>,
        value: FieldValue,
        label: Option<String>,
    ) {
        self.open.push(FieldNode::new(field, range, value, label));
    }

    fn close(&mut self) {
        if let Some(node) = self.open.pop() {
            self.attach(node);
        }
    }
}
