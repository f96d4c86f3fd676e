//! Daily integration: REST provisioning and the room signaling transport.
//!
//! - `rest` - REST client for rooms and meeting tokens
//! - `transport` - WebSocket transport for one room (transcripts in, speech out)
//! - `types` - shared request/response types and errors

pub mod rest;
pub mod transport;
pub mod types;

pub use rest::DailyRestClient;
pub use transport::DailyTransport;
pub use types::{DailyError, SessionDescriptor};
