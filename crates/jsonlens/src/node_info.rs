//! The navigation contract.
//!
//! One interface, two implementations: [`crate::RemoteNode`] issues one RPC
//! per call against a worker, [`crate::LocalNode`] answers in place from a
//! local parser. Callers receive a boxed handle from the bootstrap and never
//! inspect which variant they hold.

use async_trait::async_trait;
use jsonlens_types::{NavResult, NodeDescriptor, NodePath, NodeType};
use serde_json::Value;

/// A closable handle onto one node of a parsed JSON document.
///
/// Navigation methods return fresh handles sharing the same session; any
/// number of calls may be in flight concurrently and resolve in any order.
/// After [`close`](Self::close) resolves the handle is terminal: every
/// further call fails fast with [`jsonlens_types::NavError::HandleClosed`].
#[async_trait]
pub trait JsonNodeInfo: Send + Sync {
    /// The descriptor summarizing this node.
    fn descriptor(&self) -> &NodeDescriptor;

    /// The JSON type of this node.
    fn node_type(&self) -> NodeType {
        self.descriptor().node_type
    }

    /// Path from the document root; this node's stable identity.
    fn path(&self) -> &NodePath {
        &self.descriptor().path
    }

    /// Type-dependent element/character count.
    fn length(&self) -> u64 {
        self.descriptor().length
    }

    /// Keys of this object node, windowed by `start`/`limit` (forwarded
    /// verbatim; paging semantics belong to the parser).
    async fn get_object_keys(
        &self,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> NavResult<Vec<String>>;

    /// Handle onto element `index` of this array node.
    async fn get_by_index(&self, index: u64) -> NavResult<Box<dyn JsonNodeInfo>>;

    /// Handle onto member `key` of this object node.
    async fn get_by_key(&self, key: &str) -> NavResult<Box<dyn JsonNodeInfo>>;

    /// Handle onto the node at `path`, relative to this node.
    async fn get_by_path(&self, path: &NodePath) -> NavResult<Box<dyn JsonNodeInfo>>;

    /// Handles onto the member values of this object node, windowed.
    async fn get_object_nodes(
        &self,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> NavResult<Vec<Box<dyn JsonNodeInfo>>>;

    /// Handles onto the elements of this array node, windowed.
    async fn get_array_nodes(
        &self,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> NavResult<Vec<Box<dyn JsonNodeInfo>>>;

    /// The concrete value at this node. Intended for leaf-sized nodes.
    async fn get_value(&self) -> NavResult<Value>;

    /// Release the session's parser. Terminal: the handle and every other
    /// handle minted from the same session become closed.
    async fn close(&self) -> NavResult<()>;
}

impl std::fmt::Debug for dyn JsonNodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("JsonNodeInfo").field(self.descriptor()).finish()
    }
}
