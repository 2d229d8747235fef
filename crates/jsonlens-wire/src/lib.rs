//! Wire layer for jsonlens — message envelopes, the correlation transport,
//! and the worker host loop.
//!
//! A [`WorkerTransport`] multiplexes any number of request/response pairs
//! over one bidirectional channel pair; responses are matched to requests
//! purely by correlation ID, so delivery order never matters. The worker
//! host ([`spawn_worker`]) runs the parser in a separate tokio task and
//! serves three named operations: open a parser over a buffer, invoke a
//! navigation method against a path, and close the parser.

pub mod message;
pub mod transport;
pub mod worker;

pub use message::{WorkerRequest, WorkerResponse};
pub use transport::WorkerTransport;
pub use worker::spawn_worker;
