//! Core types for the jsonlens remote JSON navigation protocol.
//!
//! This crate defines the shared data model used across the wire layer and
//! the public navigation API: node descriptors and paths, the serializable
//! fault envelope, the synchronous navigation backend contract, and a
//! reference backend over an already-parsed `serde_json::Value` tree. It
//! contains no channel or task logic.

pub mod backend;
pub mod error;
pub mod node;
pub mod tree;

pub use backend::NavigationBackend;
pub use error::{FaultKind, NavError, NavResult, RemoteFault};
pub use node::{NodeDescriptor, NodePath, NodeType, PathSegment};
pub use tree::DocumentTree;
