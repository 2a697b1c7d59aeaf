use rawhttp::http::parser::ParseError;
use rawhttp::http::request::{Request, RequestState};

#[test]
fn test_new_request_is_initialized() {
    let req = Request::new();

    assert_eq!(req.state(), RequestState::Initialized);
    assert!(!req.is_done());
    assert!(req.headers.is_empty());
    assert!(req.body.is_empty());
}

#[test]
fn test_request_header_retrieval() {
    let mut req = Request::new();
    req.headers.add("Host", "example.com");
    req.headers.add("Content-Type", "application/json");

    assert_eq!(req.header("host"), Some("example.com"));
    assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_content_length_parsing() {
    let mut req = Request::new();
    req.headers.add("Content-Length", "42");

    assert_eq!(req.content_length().unwrap(), Some(42));
}

#[test]
fn test_request_content_length_missing() {
    let req = Request::new();

    assert_eq!(req.content_length().unwrap(), None);
}

#[test]
fn test_request_content_length_invalid() {
    let mut req = Request::new();
    req.headers.add("Content-Length", "not-a-number");

    assert!(matches!(
        req.content_length(),
        Err(ParseError::InvalidContentLength(_))
    ));
}

#[test]
fn test_request_content_length_negative() {
    let mut req = Request::new();
    req.headers.add("Content-Length", "-1");

    assert!(req.content_length().is_err());
}

#[test]
fn test_request_accessors_after_parse() {
    let mut req = Request::new();
    req.parse(b"OPTIONS * HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(req.method(), "OPTIONS");
    assert_eq!(req.target(), "*");
    assert_eq!(req.request_line.http_version, "1.1");
}
