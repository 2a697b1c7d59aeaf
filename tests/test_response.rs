use rawhttp::http::response::{StatusCode, default_headers};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_status_code_from_u16() {
    assert_eq!(StatusCode::from_u16(200), Some(StatusCode::Ok));
    assert_eq!(StatusCode::from_u16(400), Some(StatusCode::BadRequest));
    assert_eq!(StatusCode::from_u16(500), Some(StatusCode::InternalServerError));
    assert_eq!(StatusCode::from_u16(404), None);
}

#[test]
fn test_status_line() {
    assert_eq!(StatusCode::BadRequest.status_line(), "HTTP/1.1 400 Bad Request\r\n");
}

#[test]
fn test_default_headers() {
    let headers = default_headers(42);

    assert_eq!(headers.len(), 3);
    assert_eq!(headers.get("Content-Length"), Some("42"));
    assert_eq!(headers.get("Connection"), Some("close"));
    assert_eq!(headers.get("Content-Type"), Some("text/plain"));
}

#[test]
fn test_default_headers_for_chunked() {
    let mut headers = default_headers(0);
    headers.remove("Content-Length");
    headers.add("Transfer-Encoding", "chunked");
    headers.override_value("Content-Type", "application/json");

    assert!(!headers.contains("content-length"));
    assert_eq!(headers.get("transfer-encoding"), Some("chunked"));
    assert_eq!(headers.get("content-type"), Some("application/json"));
}
