//! Worker host — the remote execution context.
//!
//! [`spawn_worker`] runs a tokio task that owns the parser instance and
//! serves requests from its channel: `openParser` parses the transferred
//! buffer and answers with the root descriptor, `callParser` dispatches a
//! navigation method against a path, `closeParser` releases the parser.
//! Every request, malformed ones included, gets a response addressed at its
//! `resultId` so no caller ever hangs.

use crate::message::{
    WorkerRequest, WorkerResponse, HANDLER_CALL_PARSER, HANDLER_CLOSE_PARSER, HANDLER_OPEN_PARSER,
};
use crate::transport::WorkerTransport;
use jsonlens_types::{
    DocumentTree, FaultKind, NavigationBackend, NodePath, RemoteFault,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn a worker task and return a transport connected to it.
///
/// The task exits when the transport (and every proxy sharing it) is
/// dropped, closing the request channel.
pub fn spawn_worker() -> (Arc<WorkerTransport>, JoinHandle<()>) {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (response_tx, response_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(host_loop(request_rx, response_tx));
    let transport = WorkerTransport::start(request_tx, response_rx);
    (transport, handle)
}

/// Serve requests until the client side hangs up.
async fn host_loop(
    mut requests: mpsc::UnboundedReceiver<WorkerRequest>,
    responses: mpsc::UnboundedSender<WorkerResponse>,
) {
    // One parser per worker, opened by `openParser`, dropped by
    // `closeParser`.
    let mut parser: Option<DocumentTree> = None;

    while let Some(request) = requests.recv().await {
        debug!(handler = %request.handler, result_id = request.result_id, "worker request");
        let result_id = request.result_id;
        let outcome = handle_request(&mut parser, request);
        if let Err(fault) = &outcome {
            warn!(result_id, fault = %fault, "worker request failed");
        }
        let response = match outcome {
            Ok(value) => WorkerResponse::ok(result_id, value),
            Err(fault) => WorkerResponse::fail(result_id, fault),
        };
        if responses.send(response).is_err() {
            // Client gone; the computed result has no recipient.
            return;
        }
    }
}

fn handle_request(
    parser: &mut Option<DocumentTree>,
    request: WorkerRequest,
) -> Result<Value, RemoteFault> {
    match request.handler.as_str() {
        HANDLER_OPEN_PARSER => {
            let payload = request.payload.ok_or_else(|| {
                RemoteFault::new(FaultKind::Internal, "openParser carried no payload")
            })?;
            let tree = DocumentTree::from_slice(&payload)?;
            let root = tree.root();
            *parser = Some(tree);
            encode(root)
        }
        HANDLER_CALL_PARSER => {
            let tree = parser.as_ref().ok_or_else(|| {
                RemoteFault::new(FaultKind::ParserGone, "no parser is open on this worker")
            })?;
            dispatch_call(tree, &request.args)
        }
        HANDLER_CLOSE_PARSER => {
            *parser = None;
            Ok(Value::Null)
        }
        other => Err(RemoteFault::new(
            FaultKind::Internal,
            format!("unknown handler {other:?}"),
        )),
    }
}

/// Dispatch a `callParser` request: args are `[path, method, ...rest]`.
fn dispatch_call(tree: &DocumentTree, args: &[Value]) -> Result<Value, RemoteFault> {
    let path: NodePath = decode_arg(args, 0, "path")?;
    let method: String = decode_arg(args, 1, "method")?;
    let rest = &args[2..];

    match method.as_str() {
        "getObjectKeys" => {
            let keys = tree.object_keys(&path, opt_u64(rest, 0)?, opt_u64(rest, 1)?)?;
            encode(keys)
        }
        "getByIndex" => {
            let index: u64 = decode_arg(rest, 0, "index")?;
            encode(tree.by_index(&path, index)?)
        }
        "getByKey" => {
            let key: String = decode_arg(rest, 0, "key")?;
            encode(tree.by_key(&path, &key)?)
        }
        "getByPath" => {
            let relative: NodePath = decode_arg(rest, 0, "path")?;
            encode(tree.by_path(&path, &relative)?)
        }
        "getObjectNodes" => {
            let nodes = tree.object_nodes(&path, opt_u64(rest, 0)?, opt_u64(rest, 1)?)?;
            encode(nodes)
        }
        "getArrayNodes" => {
            let nodes = tree.array_nodes(&path, opt_u64(rest, 0)?, opt_u64(rest, 1)?)?;
            encode(nodes)
        }
        "getValue" => tree.value(&path),
        other => Err(RemoteFault::new(
            FaultKind::Internal,
            format!("unknown navigation method {other:?}"),
        )),
    }
}

fn encode<T: serde::Serialize>(value: T) -> Result<Value, RemoteFault> {
    serde_json::to_value(value).map_err(|err| RemoteFault::internal(err.to_string()))
}

fn decode_arg<T: serde::de::DeserializeOwned>(
    args: &[Value],
    index: usize,
    name: &str,
) -> Result<T, RemoteFault> {
    let value = args.get(index).ok_or_else(|| {
        RemoteFault::new(FaultKind::Internal, format!("missing argument {name:?}"))
    })?;
    serde_json::from_value(value.clone()).map_err(|err| {
        RemoteFault::new(FaultKind::Internal, format!("bad argument {name:?}: {err}"))
    })
}

/// Optional numeric argument: absent or `null` means `None`.
fn opt_u64(args: &[Value], index: usize) -> Result<Option<u64>, RemoteFault> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            RemoteFault::new(
                FaultKind::Internal,
                format!("expected integer argument, got {value}"),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonlens_types::NodeDescriptor;

    async fn open(transport: &WorkerTransport, json: &str) -> NodeDescriptor {
        let root = transport
            .send(
                HANDLER_OPEN_PARSER,
                vec![],
                Some(bytes::Bytes::copy_from_slice(json.as_bytes())),
            )
            .await
            .unwrap();
        serde_json::from_value(root).unwrap()
    }

    #[tokio::test]
    async fn open_parser_answers_with_root_descriptor() {
        let (transport, _worker) = spawn_worker();
        let root = open(&transport, r#"{"a": 1, "b": [1, 2, 3]}"#).await;
        assert_eq!(root.length, 2);
        assert!(root.path.is_root());
    }

    #[tokio::test]
    async fn call_parser_dispatches_navigation_methods() {
        let (transport, _worker) = spawn_worker();
        open(&transport, r#"{"items": [10, 20, 30]}"#).await;

        let keys = transport
            .send(
                HANDLER_CALL_PARSER,
                vec![serde_json::json!([]), serde_json::json!("getObjectKeys")],
                None,
            )
            .await
            .unwrap();
        assert_eq!(keys, serde_json::json!(["items"]));

        let value = transport
            .send(
                HANDLER_CALL_PARSER,
                vec![
                    serde_json::json!(["items", 1]),
                    serde_json::json!("getValue"),
                ],
                None,
            )
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!(20));
    }

    #[tokio::test]
    async fn call_before_open_is_a_parser_gone_fault() {
        let (transport, _worker) = spawn_worker();
        let err = transport
            .send(
                HANDLER_CALL_PARSER,
                vec![serde_json::json!([]), serde_json::json!("getValue")],
                None,
            )
            .await
            .unwrap_err();
        match err {
            jsonlens_types::NavError::Remote(fault) => {
                assert_eq!(fault.kind, FaultKind::ParserGone)
            }
            other => panic!("expected Remote fault, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn close_parser_releases_and_keeps_serving() {
        let (transport, _worker) = spawn_worker();
        open(&transport, "[1, 2]").await;

        let closed = transport.send(HANDLER_CLOSE_PARSER, vec![], None).await.unwrap();
        assert_eq!(closed, Value::Null);

        // Loop is still alive; navigation now reports the parser gone.
        let err = transport
            .send(
                HANDLER_CALL_PARSER,
                vec![serde_json::json!([]), serde_json::json!("getValue")],
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            jsonlens_types::NavError::Remote(fault) if fault.kind == FaultKind::ParserGone
        ));
    }

    #[tokio::test]
    async fn malformed_args_fault_instead_of_hanging() {
        let (transport, _worker) = spawn_worker();
        open(&transport, "{}").await;

        let err = transport
            .send(HANDLER_CALL_PARSER, vec![serde_json::json!([])], None)
            .await
            .unwrap_err();
        assert!(matches!(err, jsonlens_types::NavError::Remote(_)));

        let err = transport
            .send(
                HANDLER_CALL_PARSER,
                vec![serde_json::json!([]), serde_json::json!("noSuchMethod")],
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            jsonlens_types::NavError::Remote(fault) if fault.kind == FaultKind::Internal
        ));
    }

    #[tokio::test]
    async fn invalid_json_payload_faults_on_open() {
        let (transport, _worker) = spawn_worker();
        let err = transport
            .send(
                HANDLER_OPEN_PARSER,
                vec![],
                Some(bytes::Bytes::from_static(b"{not json")),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, jsonlens_types::NavError::Remote(_)));
    }
}
