// Parameter path codec
//
// GenieACS returns device parameters as a nested document where every
// leaf is an object carrying `_value` (plus `_type`, `_timestamp`, ...).
// Callers think in dotted paths (`InternetGatewayDevice.DeviceInfo.SoftwareVersion`).
// This module converts between the two: building a nested document from a
// path, extracting a leaf by path, and projecting several paths into a
// merged tree of plain values.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Key under which GenieACS stores a parameter's value.
pub const VALUE_KEY: &str = "_value";

/// Split a dotted path into its segments, ignoring empty ones so that
/// object paths with a trailing dot (`A.B.`) behave like `A.B`.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|s| !s.is_empty())
}

/// Build the server-side nested form of a single parameter:
/// `build_nested("A.B", v)` yields `{"A":{"B":{"_value":v}}}`.
///
/// This mirrors how device documents store parameters. Task bodies use
/// [`ParameterValue`](crate::ParameterValue) arrays instead.
pub fn build_nested(path: &str, value: Value) -> Value {
    let parts: Vec<&str> = segments(path).collect();
    parts
        .into_iter()
        .rev()
        .fold(single(VALUE_KEY, value), |node, part| single(part, node))
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_owned(), value);
    Value::Object(map)
}

/// Walk `nested` along `path` and return the reached node's `_value`.
///
/// A missing segment (or a node without `_value`) yields `None`; absent
/// parameters are a normal outcome, not an error.
pub fn extract_leaf<'a>(nested: &'a Value, path: &str) -> Option<&'a Value> {
    let mut parts = segments(path).peekable();
    parts.peek()?;
    let mut node = nested;
    for part in parts {
        node = node.get(part)?;
    }
    node.get(VALUE_KEY)
}

/// Extract every comma-separated path from `nested` into one merged tree.
///
/// Each path is resolved independently; a path that can't be resolved
/// becomes a `null` leaf instead of aborting the others.
pub fn project_multiple(nested: &Value, paths: &str) -> ParamTree {
    let mut tree = ParamTree::new();
    for path in paths.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let value = extract_leaf(nested, path).cloned().unwrap_or(Value::Null);
        tree.insert(path, value);
    }
    tree
}

// ── ParamTree ────────────────────────────────────────────────────────

/// One node of a [`ParamTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamNode {
    Branch(ParamTree),
    Leaf(Value),
}

/// Ordered tree of parameter values keyed by path segment.
///
/// Inserting `A.B.C` and then `A.B.D` shares the `A.B` subtree. When a
/// path runs through an existing leaf (or ends on an existing branch),
/// the later insert replaces the conflicting node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamTree {
    children: IndexMap<String, ParamNode>,
}

impl ParamTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Insert `value` at `path`, merging with existing subtrees.
    /// Paths with no segments are ignored.
    pub fn insert(&mut self, path: &str, value: Value) {
        let parts: Vec<&str> = segments(path).collect();
        self.insert_parts(&parts, value);
    }

    fn insert_parts(&mut self, parts: &[&str], value: Value) {
        match parts {
            [] => {}
            [last] => {
                self.children
                    .insert((*last).to_owned(), ParamNode::Leaf(value));
            }
            [first, rest @ ..] => {
                let node = self
                    .children
                    .entry((*first).to_owned())
                    .or_insert_with(|| ParamNode::Branch(ParamTree::new()));
                match node {
                    ParamNode::Branch(sub) => sub.insert_parts(rest, value),
                    ParamNode::Leaf(_) => {
                        let mut sub = ParamTree::new();
                        sub.insert_parts(rest, value);
                        *node = ParamNode::Branch(sub);
                    }
                }
            }
        }
    }

    /// Look up a value by dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut tree = self;
        let mut parts = segments(path).peekable();
        while let Some(part) = parts.next() {
            match (tree.children.get(part)?, parts.peek()) {
                (ParamNode::Leaf(v), None) => return Some(v),
                (ParamNode::Branch(sub), Some(_)) => tree = sub,
                _ => return None,
            }
        }
        None
    }

    /// Iterate `(dotted_path, value)` pairs depth-first in insertion order.
    pub fn leaves(&self) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Value)>) {
        for (key, node) in &self.children {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match node {
                ParamNode::Leaf(v) => out.push((path, v)),
                ParamNode::Branch(sub) => sub.collect_leaves(&path, out),
            }
        }
    }

    /// Convert into a plain nested JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.children
                .iter()
                .map(|(k, node)| {
                    let v = match node {
                        ParamNode::Leaf(v) => v.clone(),
                        ParamNode::Branch(sub) => sub.to_value(),
                    };
                    (k.clone(), v)
                })
                .collect(),
        )
    }
}

impl Serialize for ParamTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.children.iter())
    }
}

impl Serialize for ParamNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(v) => v.serialize(serializer),
            Self::Branch(tree) => tree.serialize(serializer),
        }
    }
}
