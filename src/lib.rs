//! rawhttp - HTTP/1.1 framing over raw byte streams
//!
//! Incremental request parsing and ordered response writing, plus a small
//! server that exercises both.

pub mod config;
pub mod http;
pub mod proxy;
pub mod routes;
pub mod server;
