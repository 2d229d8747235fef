//! Synchronous adapter — the same contract served by a local parser.
//!
//! When no worker parallelism is available the document is parsed in place
//! and a [`LocalNode`] answers every call without suspension or messages.
//! `close()` releases nothing across a boundary (the parser's lifetime is
//! tied to the adapter), but the post-close fail-fast behavior matches the
//! remote arm so the two are indistinguishable to callers.

use crate::node_info::JsonNodeInfo;
use async_trait::async_trait;
use jsonlens_types::{NavError, NavResult, NavigationBackend, NodeDescriptor, NodePath};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Navigation handle over a local, synchronous backend.
pub struct LocalNode {
    descriptor: NodeDescriptor,
    backend: Arc<dyn NavigationBackend>,
    closed: Arc<AtomicBool>,
}

impl LocalNode {
    /// Root handle over `backend`.
    pub fn new(backend: Arc<dyn NavigationBackend>) -> Self {
        let descriptor = backend.root();
        Self {
            descriptor,
            backend,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    fn wrap(&self, descriptor: NodeDescriptor) -> Box<dyn JsonNodeInfo> {
        Box::new(Self {
            descriptor,
            backend: Arc::clone(&self.backend),
            closed: Arc::clone(&self.closed),
        })
    }

    fn ensure_open(&self) -> NavResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(NavError::HandleClosed);
        }
        Ok(())
    }
}

#[async_trait]
impl JsonNodeInfo for LocalNode {
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    async fn get_object_keys(
        &self,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> NavResult<Vec<String>> {
        self.ensure_open()?;
        self.backend
            .object_keys(&self.descriptor.path, start, limit)
            .map_err(NavError::Local)
    }

    async fn get_by_index(&self, index: u64) -> NavResult<Box<dyn JsonNodeInfo>> {
        self.ensure_open()?;
        let descriptor = self
            .backend
            .by_index(&self.descriptor.path, index)
            .map_err(NavError::Local)?;
        Ok(self.wrap(descriptor))
    }

    async fn get_by_key(&self, key: &str) -> NavResult<Box<dyn JsonNodeInfo>> {
        self.ensure_open()?;
        let descriptor = self
            .backend
            .by_key(&self.descriptor.path, key)
            .map_err(NavError::Local)?;
        Ok(self.wrap(descriptor))
    }

    async fn get_by_path(&self, path: &NodePath) -> NavResult<Box<dyn JsonNodeInfo>> {
        self.ensure_open()?;
        let descriptor = self
            .backend
            .by_path(&self.descriptor.path, path)
            .map_err(NavError::Local)?;
        Ok(self.wrap(descriptor))
    }

    async fn get_object_nodes(
        &self,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> NavResult<Vec<Box<dyn JsonNodeInfo>>> {
        self.ensure_open()?;
        let descriptors = self
            .backend
            .object_nodes(&self.descriptor.path, start, limit)
            .map_err(NavError::Local)?;
        Ok(descriptors
            .into_iter()
            .map(|descriptor| self.wrap(descriptor))
            .collect())
    }

    async fn get_array_nodes(
        &self,
        start: Option<u64>,
        limit: Option<u64>,
    ) -> NavResult<Vec<Box<dyn JsonNodeInfo>>> {
        self.ensure_open()?;
        let descriptors = self
            .backend
            .array_nodes(&self.descriptor.path, start, limit)
            .map_err(NavError::Local)?;
        Ok(descriptors
            .into_iter()
            .map(|descriptor| self.wrap(descriptor))
            .collect())
    }

    async fn get_value(&self) -> NavResult<Value> {
        self.ensure_open()?;
        self.backend
            .value(&self.descriptor.path)
            .map_err(NavError::Local)
    }

    async fn close(&self) -> NavResult<()> {
        self.ensure_open()?;
        // No cross-boundary resource to release; only the state flips.
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
