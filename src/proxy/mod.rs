//! Upstream relaying
//!
//! Fetches bodies from an upstream server so routes can stream them back
//! to the client.

pub mod upstream;

pub use upstream::{UpstreamClient, UpstreamError, UpstreamResponse};
