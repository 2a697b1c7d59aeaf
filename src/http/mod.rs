//! HTTP/1.1 framing.
//!
//! # Architecture
//!
//! - **`headers`**: Case-insensitive header collection and the one-line header parser
//! - **`buffer`**: Growable read buffer that doubles when full
//! - **`request`**: Request types and parser states
//! - **`parser`**: The request state machine and the read loop that drives it
//! - **`response`**: Status codes and the default header set
//! - **`writer`**: Ordered response writer (fixed-length and chunked bodies, trailers)
//! - **`connection`**: One connection: parse, dispatch, write, close
//!
//! # Request Parser
//!
//! ```text
//!        ┌──────────────────┐
//!        │   Initialized    │ ← Wait for a full request line
//!        └──────┬───────────┘
//!               │ Request line parsed
//!               ▼
//!        ┌──────────────────┐
//!        │  ParsingHeaders  │ ← One header line per step
//!        └──────┬───────────┘
//!               │ Blank line
//!               ├─ no content-length → Done
//!               ▼
//!        ┌──────────────────┐
//!        │   ParsingBody    │ ← Accumulate until content-length bytes
//!        └──────┬───────────┘
//!               ▼
//!             Done
//! ```
//!
//! # Response Writer
//!
//! ```text
//! StatusLine → Headers → Body ──────────────────────────────→ (end)
//!                          └─ chunk* → chunked done → Trailers → Finished
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rawhttp::http::parser::request_from_reader;
//! use rawhttp::http::response::{StatusCode, default_headers};
//! use rawhttp::http::writer::ResponseWriter;
//!
//! let req = request_from_reader(&mut stream).await?;
//! let mut w = ResponseWriter::new(&mut stream);
//! w.write_status_line(StatusCode::Ok).await?;
//! w.write_headers(&default_headers(2)).await?;
//! w.write_body(b"ok").await?;
//! ```

pub mod buffer;
pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
