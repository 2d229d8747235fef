//! Wire protocol message types.
//!
//! Requests carry a handler name, positional JSON arguments, an optional
//! raw byte payload (moved through the channel, never copied), and the
//! correlation ID under its wire name `resultId`. Responses carry the same
//! ID plus exactly one of `result`/`error`.

use bytes::Bytes;
use jsonlens_types::{FaultKind, RemoteFault};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Handler name for opening a parser over a buffer.
pub const HANDLER_OPEN_PARSER: &str = "openParser";
/// Handler name for invoking a navigation method against a path.
pub const HANDLER_CALL_PARSER: &str = "callParser";
/// Handler name for releasing the parser.
pub const HANDLER_CLOSE_PARSER: &str = "closeParser";

/// A request message sent to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRequest {
    /// Name of the remote operation.
    pub handler: String,
    /// Positional arguments, forwarded verbatim.
    pub args: Vec<Value>,
    /// Raw byte payload transferred by move (the document buffer for
    /// `openParser`); absent from the envelope when not used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Bytes>,
    /// Correlation ID linking this request to its response.
    #[serde(rename = "resultId")]
    pub result_id: u64,
}

/// A response message from the worker. Exactly one of `result`/`error` is
/// present; the constructors enforce this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerResponse {
    /// Correlation ID of the request this answers.
    #[serde(rename = "resultId")]
    pub result_id: u64,
    /// Success value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RemoteFault>,
}

impl WorkerResponse {
    /// A successful response.
    pub fn ok(result_id: u64, result: Value) -> Self {
        Self {
            result_id,
            result: Some(result),
            error: None,
        }
    }

    /// A failed response.
    pub fn fail(result_id: u64, fault: RemoteFault) -> Self {
        Self {
            result_id,
            result: None,
            error: Some(fault),
        }
    }

    /// Collapse into a `Result`. A malformed peer that sets both fields is
    /// treated as a failure; one that sets neither maps to an internal
    /// fault, so the contract stays total.
    pub fn into_outcome(self) -> Result<Value, RemoteFault> {
        match (self.result, self.error) {
            (_, Some(fault)) => Err(fault),
            (Some(value), None) => Ok(value),
            (None, None) => Err(RemoteFault::new(
                FaultKind::Internal,
                "response carried neither result nor error",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_wire_field_names() {
        let request = WorkerRequest {
            handler: HANDLER_CALL_PARSER.to_string(),
            args: vec![serde_json::json!(["a", 0]), serde_json::json!("getValue")],
            payload: None,
            result_id: 7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["handler"], "callParser");
        assert_eq!(json["resultId"], 7);
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn response_constructors_set_exactly_one_field() {
        let ok = WorkerResponse::ok(1, serde_json::json!([1, 2]));
        assert!(ok.result.is_some() && ok.error.is_none());
        let fail = WorkerResponse::fail(2, RemoteFault::internal("boom"));
        assert!(fail.result.is_none() && fail.error.is_some());
    }

    #[test]
    fn outcome_prefers_error_and_rejects_empty() {
        let both = WorkerResponse {
            result_id: 1,
            result: Some(Value::Null),
            error: Some(RemoteFault::internal("boom")),
        };
        assert!(both.into_outcome().is_err());

        let neither = WorkerResponse {
            result_id: 2,
            result: None,
            error: None,
        };
        let fault = neither.into_outcome().unwrap_err();
        assert_eq!(fault.kind, FaultKind::Internal);
    }

    #[test]
    fn response_roundtrips_through_json() {
        let response = WorkerResponse::fail(
            9,
            RemoteFault::new(FaultKind::KeyNotFound, "no key \"x\""),
        );
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("resultId"));
        assert!(!json.contains("result\":"));
        let back: WorkerResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.result_id, 9);
        assert_eq!(back.error.unwrap().kind, FaultKind::KeyNotFound);
    }
}
