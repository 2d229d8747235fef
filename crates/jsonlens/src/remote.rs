//! Remote node proxy — one RPC per navigation call.
//!
//! A [`RemoteNode`] holds a descriptor, a shared transport, and the
//! session's closed flag. It owns no parsed data: every call is addressed by
//! `(path, method, args)` and the worker resolves the path against its own
//! parser state. Descriptors coming back are wrapped into new proxies over
//! the same transport.

use crate::node_info::JsonNodeInfo;
use async_trait::async_trait;
use jsonlens_types::{NavError, NavResult, NodeDescriptor, NodePath};
use jsonlens_wire::message::{HANDLER_CALL_PARSER, HANDLER_CLOSE_PARSER};
use jsonlens_wire::WorkerTransport;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Navigation handle backed by a worker over a [`WorkerTransport`].
pub struct RemoteNode {
    descriptor: NodeDescriptor,
    transport: Arc<WorkerTransport>,
    /// Shared by every proxy minted from the same session: they all address
    /// one remote parser, so closing any of them closes all of them.
    closed: Arc<AtomicBool>,
}

impl RemoteNode {
    /// Wrap a descriptor the worker reported, starting a fresh session over
    /// `transport`.
    pub fn new(descriptor: NodeDescriptor, transport: Arc<WorkerTransport>) -> Self {
        Self {
            descriptor,
            transport,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Wrap a descriptor into a sibling proxy sharing this session.
    fn wrap(&self, value: Value) -> NavResult<Box<dyn JsonNodeInfo>> {
        let descriptor: NodeDescriptor = serde_json::from_value(value)?;
        Ok(Box::new(Self {
            descriptor,
            transport: Arc::clone(&self.transport),
            closed: Arc::clone(&self.closed),
        }))
    }

    fn wrap_list(&self, value: Value) -> NavResult<Vec<Box<dyn JsonNodeInfo>>> {
        let descriptors: Vec<Value> = serde_json::from_value(value)?;
        descriptors
            .into_iter()
            .map(|descriptor| self.wrap(descriptor))
            .collect()
    }

    /// Fail fast once the session is closed; nothing is sent.
    fn ensure_open(&self) -> NavResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(NavError::HandleClosed);
        }
        Ok(())
    }

    /// Issue one `callParser` request addressed at this node's path.
    async fn call(&self, method: &str, rest: Vec<Value>) -> NavResult<Value> {
        self.ensure_open()?;
        let mut args = vec![
            serde_json::to_value(&self.descriptor.path)?,
            Value::String(method.to_string()),
        ];
        args.extend(rest);
        self.transport.send(HANDLER_CALL_PARSER, args, None).await
    }
}

/// `start`/`limit` forwarded verbatim; absent values travel as `null`.
fn paging_args(start: Option<u64>, limit: Option<u64>) -> Vec<Value> {
    vec![serde_json::json!(start), serde_json::json!(limit)]
}

#[async_trait]
impl JsonNodeInfo for RemoteNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    async fn get_object_keys(
        &self,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> NavResult<Vec<String>> {
        let keys = self.call("getObjectKeys", paging_args(start, limit)).await?;
        Ok(serde_json::from_value(keys)?)
    }

    async fn get_by_index(&self, index: u64) -> NavResult<Box<dyn JsonNodeInfo>> {
        let descriptor = self
            .call("getByIndex", vec![serde_json::json!(index)])
            .await?;
        self.wrap(descriptor)
    }

    async fn get_by_key(&self, key: &str) -> NavResult<Box<dyn JsonNodeInfo>> {
        let descriptor = self.call("getByKey", vec![serde_json::json!(key)]).await?;
        self.wrap(descriptor)
    }

    async fn get_by_path(&self, path: &NodePath) -> NavResult<Box<dyn JsonNodeInfo>> {
        let descriptor = self
            .call("getByPath", vec![serde_json::to_value(path)?])
            .await?;
        self.wrap(descriptor)
    }

    async fn get_object_nodes(
        &self,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> NavResult<Vec<Box<dyn JsonNodeInfo>>> {
        let descriptors = self
            .call("getObjectNodes", paging_args(start, limit))
            .await?;
        self.wrap_list(descriptors)
    }

    async fn get_array_nodes(
        &self,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> NavResult<Vec<Box<dyn JsonNodeInfo>>> {
        let descriptors = self
            .call("getArrayNodes", paging_args(start, limit))
            .await?;
        self.wrap_list(descriptors)
    }

    async fn get_value(&self) -> NavResult<Value> {
        self.call("getValue", vec![]).await
    }

    async fn close(&self) -> NavResult<()> {
        self.ensure_open()?;
        self.transport
            .send(HANDLER_CLOSE_PARSER, vec![], None)
            .await?;
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
