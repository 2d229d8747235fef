//! Shared error types for the jsonlens protocol.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a fault reported by a navigation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// A path did not resolve to a node in the document.
    InvalidPath,
    /// An object lookup named a key that does not exist.
    KeyNotFound,
    /// An array lookup indexed past the end.
    IndexOutOfRange,
    /// An operation was applied to a node of the wrong type.
    WrongType,
    /// The worker no longer holds a parser for this session.
    ParserGone,
    /// Any other backend failure.
    Internal,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultKind::InvalidPath => "invalid_path",
            FaultKind::KeyNotFound => "key_not_found",
            FaultKind::IndexOutOfRange => "index_out_of_range",
            FaultKind::WrongType => "wrong_type",
            FaultKind::ParserGone => "parser_gone",
            FaultKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Serializable error envelope crossing the worker boundary.
///
/// Carries a kind tag, a human-readable message, and optional structured
/// detail, so the failure contract stays testable across implementations
/// instead of passing arbitrary values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFault {
    /// What went wrong, coarsely.
    pub kind: FaultKind,
    /// Human-readable description.
    pub message: String,
    /// Optional structured detail (e.g. the offending path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl RemoteFault {
    /// Build a fault with no structured detail.
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach structured detail.
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Shorthand for an [`FaultKind::Internal`] fault.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Internal, message)
    }
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Top-level error type for navigation calls.
#[derive(Error, Debug)]
pub enum NavError {
    /// The remote handler reported a failure for this call.
    #[error("remote fault: {0}")]
    Remote(RemoteFault),

    /// The local backend reported a failure (same envelope, no boundary
    /// crossed).
    #[error("local fault: {0}")]
    Local(RemoteFault),

    /// A navigation call was issued after `close()` resolved.
    #[error("navigation handle is closed")]
    HandleClosed,

    /// The worker side of the channel is gone; the call can never complete.
    #[error("worker channel closed")]
    ChannelClosed,

    /// An envelope failed to encode or decode.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NavError {
    /// The fault envelope, if this error carries one.
    pub fn fault(&self) -> Option<&RemoteFault> {
        match self {
            NavError::Remote(fault) | NavError::Local(fault) => Some(fault),
            _ => None,
        }
    }
}

/// Alias for Result with [`NavError`].
pub type NavResult<T> = Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_roundtrips_through_json() {
        let fault = RemoteFault::new(FaultKind::KeyNotFound, "no such key: foo")
            .with_detail(serde_json::json!({"key": "foo"}));
        let json = serde_json::to_string(&fault).unwrap();
        assert!(json.contains("key_not_found"));
        let back: RemoteFault = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fault);
    }

    #[test]
    fn fault_without_detail_omits_the_field() {
        let fault = RemoteFault::internal("boom");
        let json = serde_json::to_string(&fault).unwrap();
        assert!(!json.contains("detail"));
    }

    #[test]
    fn nav_error_exposes_fault() {
        let err = NavError::Remote(RemoteFault::internal("boom"));
        assert_eq!(err.fault().unwrap().kind, FaultKind::Internal);
        assert!(NavError::HandleClosed.fault().is_none());
    }
}
