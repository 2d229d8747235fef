//! The synchronous navigation backend contract.
//!
//! Both strategies ultimately drive one of these: the worker host calls it
//! from the remote context, the synchronous adapter calls it in place. All
//! methods resolve a [`NodePath`] against the backend's own parsed state and
//! report failures as [`RemoteFault`] envelopes.

use crate::error::RemoteFault;
use crate::node::{NodeDescriptor, NodePath};
use serde_json::Value;

/// A local, synchronous view over an already-parsed JSON document.
pub trait NavigationBackend: Send + Sync {
    /// Descriptor of the document root.
    fn root(&self) -> NodeDescriptor;

    /// Keys of the object at `path`, windowed by `start`/`limit`.
    fn object_keys(
        &self,
        path: &NodePath,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Vec<String>, RemoteFault>;

    /// Descriptor of element `index` of the array at `path`.
    fn by_index(&self, path: &NodePath, index: u64) -> Result<NodeDescriptor, RemoteFault>;

    /// Descriptor of member `key` of the object at `path`.
    fn by_key(&self, path: &NodePath, key: &str) -> Result<NodeDescriptor, RemoteFault>;

    /// Descriptor of the node at `base` + `relative`.
    fn by_path(&self, base: &NodePath, relative: &NodePath)
        -> Result<NodeDescriptor, RemoteFault>;

    /// Descriptors of the member values of the object at `path`, windowed.
    fn object_nodes(
        &self,
        path: &NodePath,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Vec<NodeDescriptor>, RemoteFault>;

    /// Descriptors of the elements of the array at `path`, windowed.
    fn array_nodes(
        &self,
        path: &NodePath,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Vec<NodeDescriptor>, RemoteFault>;

    /// The concrete value at `path`. Intended for leaf-sized nodes; how huge
    /// nodes are handled is the backend's concern.
    fn value(&self, path: &NodePath) -> Result<Value, RemoteFault>;
}
