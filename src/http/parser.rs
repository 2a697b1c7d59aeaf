use thiserror::Error;
use tokio::io::AsyncRead;
use tracing::trace;

use crate::http::buffer::ReadBuffer;
use crate::http::headers::{HeaderError, find_crlf};
use crate::http::request::{Request, RequestLine, RequestState};

const SUPPORTED_VERSION: &str = "HTTP/1.1";
const INITIAL_BUFFER_SIZE: usize = 8;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
    #[error("invalid method: {0:?}")]
    InvalidMethod(String),
    #[error("unsupported http version: {0:?}")]
    UnsupportedVersion(String),
    #[error("invalid header: {0}")]
    InvalidHeader(#[from] HeaderError),
    #[error("invalid content-length: {0:?}")]
    InvalidContentLength(String),
    #[error("body is longer than content-length")]
    BodyOverflow,
    #[error("content-length {declared} does not match body length {actual}")]
    ContentLengthMismatch { declared: usize, actual: usize },
    #[error("parse called on a request that is already done")]
    ParseAfterDone,
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses the request line at the front of `data`.
///
/// Returns `Ok(None)` until a full CRLF-terminated line is available,
/// otherwise the line and the number of bytes it occupied including CRLF.
pub fn parse_request_line(data: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(line_end) = find_crlf(data) else {
        return Ok(None);
    };

    let raw_line = &data[..line_end];
    let line = std::str::from_utf8(raw_line).map_err(|_| {
        ParseError::MalformedRequestLine(String::from_utf8_lossy(raw_line).into_owned())
    })?;
    let parts: Vec<&str> = line.split(' ').collect();

    let [method, target, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    };

    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ParseError::InvalidMethod(method.to_string()));
    }

    if *version != SUPPORTED_VERSION {
        return Err(ParseError::UnsupportedVersion(version.to_string()));
    }

    let request_line = RequestLine {
        method: method.to_string(),
        request_target: target.to_string(),
        http_version: version.trim_start_matches("HTTP/").to_string(),
    };

    Ok(Some((request_line, line_end + 2)))
}

impl Request {
    /// Parses the declared `content-length`, if any.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        self.headers
            .get("content-length")
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|_| ParseError::InvalidContentLength(v.to_string()))
            })
            .transpose()
    }

    /// Advances the state machine over `data`, the unconsumed tail of the
    /// read buffer.
    ///
    /// Returns how many bytes were consumed. `Ok(0)` on a request that is
    /// not done means more input is needed.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.state == RequestState::Done {
            return Err(ParseError::ParseAfterDone);
        }

        let mut consumed = 0;

        while self.state != RequestState::Done {
            let n = self.parse_single(&data[consumed..])?;
            consumed += n;

            if n == 0 {
                break;
            }
        }

        Ok(consumed)
    }

    fn parse_single(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            RequestState::Initialized => {
                let Some((request_line, n)) = parse_request_line(data)? else {
                    return Ok(0);
                };

                trace!(
                    method = %request_line.method,
                    target = %request_line.request_target,
                    "request line parsed"
                );
                self.request_line = request_line;
                self.state = RequestState::ParsingHeaders;
                Ok(n)
            }

            RequestState::ParsingHeaders => {
                let (n, done) = self.headers.parse_one(data)?;

                if done {
                    self.state = if self.headers.contains("content-length") {
                        RequestState::ParsingBody
                    } else {
                        RequestState::Done
                    };
                    trace!(headers = self.headers.len(), state = ?self.state, "header block parsed");
                }

                Ok(n)
            }

            RequestState::ParsingBody => {
                let Some(content_length) = self.content_length()? else {
                    self.state = RequestState::Done;
                    return Ok(data.len());
                };

                self.body.extend_from_slice(data);
                self.body_read_len += data.len();

                if self.body_read_len > content_length {
                    return Err(ParseError::BodyOverflow);
                }
                if self.body_read_len == content_length {
                    trace!(len = self.body_read_len, "body complete");
                    self.state = RequestState::Done;
                }

                Ok(data.len())
            }

            RequestState::Done => Err(ParseError::ParseAfterDone),
        }
    }
}

/// Reads and parses one request from `reader`.
///
/// Reads stop once the request is done or the reader reports end of input.
/// A request cut short by end of input is returned as-is; check
/// [`Request::is_done`] before trusting it.
pub async fn request_from_reader<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = ReadBuffer::with_capacity(INITIAL_BUFFER_SIZE);
    let mut req = Request::new();

    while !req.is_done() {
        let consumed = req.parse(buf.unconsumed())?;
        if consumed > 0 {
            buf.consume(consumed);
            continue;
        }

        let n = buf.read_from(reader).await?;
        if n == 0 {
            trace!(state = ?req.state(), buffered = buf.len(), "end of input");
            break;
        }
    }

    if !buf.is_empty() && !req.is_done() {
        req.parse(buf.unconsumed())?;
    }

    if let Some(declared) = req.content_length()? {
        if declared != req.body.len() {
            return Err(ParseError::ContentLengthMismatch {
                declared,
                actual: req.body.len(),
            });
        }
    }

    Ok(req)
}
