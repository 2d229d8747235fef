//! jsonlens — navigate large parsed JSON documents without moving the tree.
//!
//! The document's in-memory representation lives in a worker task; callers
//! hold a closable navigation handle that traverses it one node at a time.
//! Only descriptors (`type`, `path`, `length`) and leaf values cross the
//! boundary. In environments without worker parallelism the same handle
//! contract is served by a synchronous adapter over a local parser — the
//! choice is made once at [`open_document`] and is invisible afterwards.
//!
//! ```no_run
//! # use jsonlens::JsonNodeInfo;
//! # async fn demo() -> jsonlens::NavResult<()> {
//! let root = jsonlens::open_document(r#"{"users": [{"name": "ada"}]}"#).await?;
//! let users = root.get_by_key("users").await?;
//! let first = users.get_by_index(0).await?;
//! let name = first.get_by_key("name").await?.get_value().await?;
//! root.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod local;
pub mod node_info;
pub mod remote;

pub use bootstrap::{detect_capability, open_document, open_document_with, Capability, DocumentInput};
pub use local::LocalNode;
pub use node_info::JsonNodeInfo;
pub use remote::RemoteNode;

pub use jsonlens_types::{
    FaultKind, NavError, NavResult, NodeDescriptor, NodePath, NodeType, PathSegment, RemoteFault,
};
