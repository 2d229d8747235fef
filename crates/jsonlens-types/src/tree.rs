//! Reference navigation backend over an already-parsed JSON tree.
//!
//! [`DocumentTree`] resolves [`NodePath`]s against a `serde_json::Value` and
//! produces descriptors without ever handing out a subtree. Parsing the
//! input is a single `serde_json` call at construction; this module owns no
//! tokenizer.

use crate::backend::NavigationBackend;
use crate::error::{FaultKind, RemoteFault};
use crate::node::{NodeDescriptor, NodePath, NodeType, PathSegment};
use serde_json::Value;

/// An in-memory JSON document addressable by node path.
#[derive(Debug)]
pub struct DocumentTree {
    root: Value,
}

impl DocumentTree {
    /// Wrap an already-parsed value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse a byte buffer.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RemoteFault> {
        let root = serde_json::from_slice(bytes).map_err(|err| {
            RemoteFault::new(FaultKind::Internal, format!("invalid JSON input: {err}"))
        })?;
        Ok(Self { root })
    }

    /// Parse a string.
    pub fn from_str(text: &str) -> Result<Self, RemoteFault> {
        Self::from_slice(text.as_bytes())
    }

    /// Resolve `path` to the value it names.
    fn resolve(&self, path: &NodePath) -> Result<&Value, RemoteFault> {
        let mut current = &self.root;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key),
                (PathSegment::Index(index), Value::Array(items)) => items.get(*index),
                _ => None,
            }
            .ok_or_else(|| {
                RemoteFault::new(FaultKind::InvalidPath, format!("no node at path {path}"))
                    .with_detail(serde_json::json!({ "path": path }))
            })?;
        }
        Ok(current)
    }

    fn resolve_object(
        &self,
        path: &NodePath,
    ) -> Result<&serde_json::Map<String, Value>, RemoteFault> {
        match self.resolve(path)? {
            Value::Object(map) => Ok(map),
            other => Err(RemoteFault::new(
                FaultKind::WrongType,
                format!("expected object at {path}, found {}", type_of(other)),
            )),
        }
    }

    fn resolve_array(&self, path: &NodePath) -> Result<&Vec<Value>, RemoteFault> {
        match self.resolve(path)? {
            Value::Array(items) => Ok(items),
            other => Err(RemoteFault::new(
                FaultKind::WrongType,
                format!("expected array at {path}, found {}", type_of(other)),
            )),
        }
    }
}

/// The [`NodeType`] of a value.
fn type_of(value: &Value) -> NodeType {
    match value {
        Value::Object(_) => NodeType::Object,
        Value::Array(_) => NodeType::Array,
        Value::String(_) => NodeType::String,
        Value::Number(_) => NodeType::Number,
        Value::Bool(_) => NodeType::Boolean,
        Value::Null => NodeType::Null,
    }
}

/// Type-dependent length: element count for containers, character count for
/// strings, rendered length for the remaining scalars.
fn length_of(value: &Value) -> u64 {
    match value {
        Value::Object(map) => map.len() as u64,
        Value::Array(items) => items.len() as u64,
        Value::String(text) => text.chars().count() as u64,
        Value::Number(number) => number.to_string().len() as u64,
        Value::Bool(true) => 4,
        Value::Bool(false) => 5,
        Value::Null => 4,
    }
}

fn describe(value: &Value, path: NodePath) -> NodeDescriptor {
    NodeDescriptor {
        node_type: type_of(value),
        path,
        length: length_of(value),
    }
}

/// Clamp a `start`/`limit` window to `len` items; out-of-range windows are
/// empty, never an error.
fn window(len: usize, start: Option<u64>, limit: Option<u64>) -> std::ops::Range<usize> {
    let start = (start.unwrap_or(0) as usize).min(len);
    let end = match limit {
        Some(limit) => start.saturating_add(limit as usize).min(len),
        None => len,
    };
    start..end
}

impl NavigationBackend for DocumentTree {
    fn root(&self) -> NodeDescriptor {
        describe(&self.root, NodePath::root())
    }

    fn object_keys(
        &self,
        path: &NodePath,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Vec<String>, RemoteFault> {
        let map = self.resolve_object(path)?;
        let range = window(map.len(), start, limit);
        Ok(map
            .keys()
            .skip(range.start)
            .take(range.len())
            .cloned()
            .collect())
    }

    fn by_index(&self, path: &NodePath, index: u64) -> Result<NodeDescriptor, RemoteFault> {
        let items = self.resolve_array(path)?;
        let item = items.get(index as usize).ok_or_else(|| {
            RemoteFault::new(
                FaultKind::IndexOutOfRange,
                format!("index {index} out of range for array of {} at {path}", items.len()),
            )
        })?;
        Ok(describe(item, path.child_index(index as usize)))
    }

    fn by_key(&self, path: &NodePath, key: &str) -> Result<NodeDescriptor, RemoteFault> {
        let map = self.resolve_object(path)?;
        let member = map.get(key).ok_or_else(|| {
            RemoteFault::new(FaultKind::KeyNotFound, format!("no key {key:?} at {path}"))
                .with_detail(serde_json::json!({ "key": key }))
        })?;
        Ok(describe(member, path.child_key(key)))
    }

    fn by_path(
        &self,
        base: &NodePath,
        relative: &NodePath,
    ) -> Result<NodeDescriptor, RemoteFault> {
        let absolute = base.join(relative);
        let value = self.resolve(&absolute)?;
        Ok(describe(value, absolute))
    }

    fn object_nodes(
        &self,
        path: &NodePath,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Vec<NodeDescriptor>, RemoteFault> {
        let map = self.resolve_object(path)?;
        let range = window(map.len(), start, limit);
        Ok(map
            .iter()
            .skip(range.start)
            .take(range.len())
            .map(|(key, value)| describe(value, path.child_key(key)))
            .collect())
    }

    fn array_nodes(
        &self,
        path: &NodePath,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Vec<NodeDescriptor>, RemoteFault> {
        let items = self.resolve_array(path)?;
        let range = window(items.len(), start, limit);
        Ok(items[range.clone()]
            .iter()
            .enumerate()
            .map(|(offset, value)| describe(value, path.child_index(range.start + offset)))
            .collect())
    }

    fn value(&self, path: &NodePath) -> Result<Value, RemoteFault> {
        Ok(self.resolve(path)?.clone())
    }
}
