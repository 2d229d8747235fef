//! Bootstrap — capability detection and session setup.
//!
//! Executed once per navigation session: detect whether worker parallelism
//! is available, then either spawn a worker and open a parser over the
//! transferred buffer (remote arm) or parse in place (local arm). Both arms
//! yield the same closable [`JsonNodeInfo`] contract, so callers never learn
//! which strategy was chosen.

use crate::local::LocalNode;
use crate::node_info::JsonNodeInfo;
use crate::remote::RemoteNode;
use bytes::Bytes;
use jsonlens_types::{DocumentTree, NavError, NavResult, NodeDescriptor};
use jsonlens_wire::message::HANDLER_OPEN_PARSER;
use jsonlens_wire::spawn_worker;
use std::sync::Arc;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::info;

/// The navigation strategy available in this environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Worker parallelism is available; navigate over a transport.
    Remote,
    /// No separate execution context; parse and navigate in place.
    Local,
}

/// Decide which strategy the current environment supports.
///
/// A pure function from the runtime environment: the remote arm needs the
/// worker to run on a separate OS thread, which only a multi-threaded tokio
/// runtime provides. Embedders and tests can bypass detection with
/// [`open_document_with`].
pub fn detect_capability() -> Capability {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => Capability::Remote,
        _ => Capability::Local,
    }
}

/// An input document: UTF-8 text or a raw byte buffer.
///
/// Held as [`Bytes`] so the remote arm can transfer it to the worker without
/// copying.
#[derive(Debug, Clone)]
pub struct DocumentInput(Bytes);

impl DocumentInput {
    /// The raw bytes.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<Bytes> for DocumentInput {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for DocumentInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<String> for DocumentInput {
    fn from(text: String) -> Self {
        Self(Bytes::from(text))
    }
}

impl From<&str> for DocumentInput {
    fn from(text: &str) -> Self {
        Self(Bytes::copy_from_slice(text.as_bytes()))
    }
}

/// Open a navigation session over `input`, choosing the strategy via
/// [`detect_capability`].
pub async fn open_document(
    input: impl Into<DocumentInput>,
) -> NavResult<Box<dyn JsonNodeInfo>> {
    open_document_with(input, detect_capability()).await
}

/// Open a navigation session with an explicit strategy.
pub async fn open_document_with(
    input: impl Into<DocumentInput>,
    capability: Capability,
) -> NavResult<Box<dyn JsonNodeInfo>> {
    let bytes = input.into().into_bytes();
    match capability {
        Capability::Local => {
            // Never opens a worker-style channel.
            let tree = DocumentTree::from_slice(&bytes).map_err(NavError::Local)?;
            info!(strategy = "local", "navigation session opened");
            Ok(Box::new(LocalNode::new(Arc::new(tree))))
        }
        Capability::Remote => {
            let (transport, _worker) = spawn_worker();
            let root = transport
                .send(HANDLER_OPEN_PARSER, vec![], Some(bytes))
                .await?;
            let descriptor: NodeDescriptor = serde_json::from_value(root)?;
            info!(strategy = "remote", "navigation session opened");
            Ok(Box::new(RemoteNode::new(descriptor, transport)))
        }
    }
}
