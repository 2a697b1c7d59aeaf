use crate::http::headers::Headers;

/// Progress of a request through the parser.
///
/// States only move forward:
/// `Initialized → ParsingHeaders → [ParsingBody →] Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Waiting for the request line
    Initialized,
    /// Request line read, header block in progress
    ParsingHeaders,
    /// Header block complete, body declared by `content-length`
    ParsingBody,
    /// Request fully parsed
    Done,
}

/// The first line of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// Method token, e.g. `GET`
    pub method: String,
    /// Request target as sent, e.g. `/search?q=rust`
    pub request_target: String,
    /// Version number without the `HTTP/` prefix; always `1.1`
    pub http_version: String,
}

/// A request read off a connection.
///
/// Built incrementally by `Request::parse` and only
/// trustworthy once [`Request::is_done`] returns `true`.
#[derive(Debug, Clone)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: Headers,
    pub body: Vec<u8>,
    pub(crate) body_read_len: usize,
    pub(crate) state: RequestState,
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// Creates an empty request in the `Initialized` state.
    pub fn new() -> Self {
        Self {
            request_line: RequestLine::default(),
            headers: Headers::new(),
            body: Vec::new(),
            body_read_len: 0,
            state: RequestState::Initialized,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == RequestState::Done
    }

    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.request_target
    }

    /// Retrieves a header value by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}
