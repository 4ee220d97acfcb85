//! Typed client for the superglue tool execution API.
//!
//! The crate is split into three layers:
//! - [`models`]: records exchanged with the API, with tri-state optional fields
//!   ([`Field`]) and a bag for unknown keys on every record
//! - [`api`]: one [`Endpoint`] per operation, mapping typed arguments to a request and
//!   status codes to typed outcomes
//! - [`Client`] / [`BlockingClient`]: the async and blocking transports
//!
//! The library emits `tracing` events but never installs a subscriber.

pub mod api;
pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod field;
pub mod models;
pub mod wire;

pub use api::runs::{CancelRun, CancelRunResponse, GetRun, GetRunResponse, ListRuns};
pub use api::tools::{GetTool, GetToolResponse, ListTools, RunTool, RunToolResponse};
pub use api::{Endpoint, RequestDescriptor, Response};
pub use blocking::BlockingClient;
pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, ModelError, Result};
pub use field::Field;
pub use wire::WireModel;
