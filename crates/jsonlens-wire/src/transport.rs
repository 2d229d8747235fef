//! Correlation-based request/response transport.
//!
//! One [`WorkerTransport`] owns the correlation-ID counter and the
//! outstanding-request table for a session. Any number of calls may be in
//! flight at once; responses are matched purely by `resultId`, so delivery
//! order is irrelevant. There is no timeout, retry, or cancellation: a sent
//! request stays outstanding until a matching response arrives or the
//! transport is dropped.

use crate::message::{WorkerRequest, WorkerResponse};
use bytes::Bytes;
use jsonlens_types::{NavError, NavResult, RemoteFault};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

type Continuation = oneshot::Sender<Result<Value, RemoteFault>>;
type PendingTable = Arc<RwLock<HashMap<u64, Continuation>>>;

/// Multiplexes request/response pairs over one channel pair to the worker.
pub struct WorkerTransport {
    /// Outgoing request channel toward the worker.
    requests: mpsc::UnboundedSender<WorkerRequest>,
    /// Continuations keyed by correlation ID; each entry fires exactly once.
    pending: PendingTable,
    /// Next correlation ID; strictly increasing, never reused while
    /// outstanding.
    next_id: AtomicU64,
}

impl WorkerTransport {
    /// Build a transport over the given channel endpoints and start its
    /// response dispatch loop.
    pub fn start(
        requests: mpsc::UnboundedSender<WorkerRequest>,
        responses: mpsc::UnboundedReceiver<WorkerResponse>,
    ) -> Arc<Self> {
        let transport = Arc::new(Self {
            requests,
            pending: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        });
        tokio::spawn(dispatch_loop(Arc::clone(&transport.pending), responses));
        transport
    }

    /// Send one request and await its matching response.
    ///
    /// Allocates the next correlation ID, registers a continuation under it,
    /// and emits the request. Resolves with the `result` value or rejects
    /// with the remote fault; a dead channel on either leg maps to
    /// [`NavError::ChannelClosed`].
    pub async fn send(
        &self,
        handler: &str,
        args: Vec<Value>,
        payload: Option<Bytes>,
    ) -> NavResult<Value> {
        let result_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.write().unwrap_or_else(|e| e.into_inner());
            pending.insert(result_id, tx);
        }

        let request = WorkerRequest {
            handler: handler.to_string(),
            args,
            payload,
            result_id,
        };
        debug!(handler, result_id, "sending worker request");
        if self.requests.send(request).is_err() {
            let mut pending = self.pending.write().unwrap_or_else(|e| e.into_inner());
            pending.remove(&result_id);
            return Err(NavError::ChannelClosed);
        }

        match rx.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(fault)) => Err(NavError::Remote(fault)),
            // Dispatch loop gone without delivering a response.
            Err(_) => Err(NavError::ChannelClosed),
        }
    }

    /// Number of requests currently outstanding. The table is unbounded;
    /// this is the observability hook for embedders that care.
    pub fn pending_len(&self) -> usize {
        self.pending.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Deliver responses to their continuations until the worker side hangs up.
///
/// The pending entry is removed before the continuation fires, so each
/// continuation completes exactly once. A response with an unknown or
/// already-resolved ID is dropped silently: no caller is waiting.
async fn dispatch_loop(
    pending: PendingTable,
    mut responses: mpsc::UnboundedReceiver<WorkerResponse>,
) {
    while let Some(response) = responses.recv().await {
        let continuation = {
            let mut pending = pending.write().unwrap_or_else(|e| e.into_inner());
            pending.remove(&response.result_id)
        };
        match continuation {
            Some(tx) => {
                // The caller may have dropped its future; that is fine.
                let _ = tx.send(response.into_outcome());
            }
            None => {
                debug!(result_id = response.result_id, "dropping unroutable response");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonlens_types::FaultKind;

    /// A transport plus the raw far ends of its channels, for scripting the
    /// worker side by hand.
    fn harness() -> (
        Arc<WorkerTransport>,
        mpsc::UnboundedReceiver<WorkerRequest>,
        mpsc::UnboundedSender<WorkerResponse>,
    ) {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        let transport = WorkerTransport::start(request_tx, response_rx);
        (transport, request_rx, response_tx)
    }

    #[tokio::test]
    async fn response_resolves_matching_request() {
        let (transport, mut requests, responses) = harness();

        let call = tokio::spawn({
            let transport = Arc::clone(&transport);
            async move {
                transport
                    .send("getValue", vec![serde_json::json!(["a"])], None)
                    .await
            }
        });

        let request = requests.recv().await.unwrap();
        assert_eq!(request.handler, "getValue");
        assert_eq!(request.args, vec![serde_json::json!(["a"])]);
        responses
            .send(WorkerResponse::ok(request.result_id, serde_json::json!(42)))
            .unwrap();

        assert_eq!(call.await.unwrap().unwrap(), serde_json::json!(42));
        assert_eq!(transport.pending_len(), 0);
    }

    #[tokio::test]
    async fn out_of_order_responses_resolve_correct_callers() {
        let (transport, mut requests, responses) = harness();

        let first = tokio::spawn({
            let transport = Arc::clone(&transport);
            async move { transport.send("getByIndex", vec![serde_json::json!(0)], None).await }
        });
        let request_one = requests.recv().await.unwrap();
        let second = tokio::spawn({
            let transport = Arc::clone(&transport);
            async move { transport.send("getByIndex", vec![serde_json::json!(1)], None).await }
        });
        let request_two = requests.recv().await.unwrap();

        // Distinct, increasing correlation IDs.
        assert!(request_two.result_id > request_one.result_id);
        assert_eq!(transport.pending_len(), 2);

        // Deliver the second response first.
        responses
            .send(WorkerResponse::ok(
                request_two.result_id,
                serde_json::json!("second"),
            ))
            .unwrap();
        responses
            .send(WorkerResponse::ok(
                request_one.result_id,
                serde_json::json!("first"),
            ))
            .unwrap();

        assert_eq!(second.await.unwrap().unwrap(), serde_json::json!("second"));
        assert_eq!(first.await.unwrap().unwrap(), serde_json::json!("first"));
        assert_eq!(transport.pending_len(), 0);
    }

    #[tokio::test]
    async fn error_response_rejects_the_caller() {
        let (transport, mut requests, responses) = harness();

        let call = tokio::spawn({
            let transport = Arc::clone(&transport);
            async move { transport.send("getByKey", vec![serde_json::json!("nope")], None).await }
        });
        let request = requests.recv().await.unwrap();
        responses
            .send(WorkerResponse::fail(
                request.result_id,
                RemoteFault::new(FaultKind::KeyNotFound, "no key"),
            ))
            .unwrap();

        let err = call.await.unwrap().unwrap_err();
        match err {
            NavError::Remote(fault) => assert_eq!(fault.kind, FaultKind::KeyNotFound),
            other => panic!("expected Remote fault, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_and_duplicate_ids_are_dropped_silently() {
        let (transport, mut requests, responses) = harness();

        // Unknown ID: nothing is waiting, nothing breaks.
        responses.send(WorkerResponse::ok(999, Value::Null)).unwrap();

        let call = tokio::spawn({
            let transport = Arc::clone(&transport);
            async move { transport.send("getValue", vec![], None).await }
        });
        let request = requests.recv().await.unwrap();
        responses
            .send(WorkerResponse::ok(request.result_id, serde_json::json!(1)))
            .unwrap();
        // Duplicate of an already-resolved ID.
        responses
            .send(WorkerResponse::ok(request.result_id, serde_json::json!(2)))
            .unwrap();

        assert_eq!(call.await.unwrap().unwrap(), serde_json::json!(1));
        assert_eq!(transport.pending_len(), 0);
    }

    #[tokio::test]
    async fn dead_worker_channel_fails_the_call() {
        let (transport, requests, responses) = harness();
        drop(requests);
        drop(responses);

        let err = transport.send("getValue", vec![], None).await.unwrap_err();
        assert!(matches!(err, NavError::ChannelClosed));
        // The aborted request does not leak a pending entry.
        assert_eq!(transport.pending_len(), 0);
    }
}
