//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `sessions` - Session provisioning and bot startup
//! - `status` - Bot process status polling

pub mod api;
pub mod sessions;
pub mod status;
