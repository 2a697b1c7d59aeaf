use std::time::Duration;

use rawhttp::proxy::UpstreamClient;
use rawhttp::routes::Router;
use rawhttp::server::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn start() -> Server {
    let upstream = UpstreamClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
    Server::serve("127.0.0.1:0", Router::new(upstream, "missing.mp4"))
        .await
        .unwrap()
}

async fn round_trip(server: &Server, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn test_serves_one_request_per_connection() {
    let server = start().await;

    let response = round_trip(&server, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("connection: close\r\n"));
    assert!(response.contains("<h1>Success!</h1>"));

    server.close().await;
}

#[tokio::test]
async fn test_request_split_across_writes() {
    let server = start().await;

    let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
    for part in [&b"POST /myprob"[..], b"lem HTTP/1.1\r\nContent-", b"Length: 3\r\n\r\nab", b"c"] {
        stream.write_all(part).await.unwrap();
        stream.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));

    server.close().await;
}

#[tokio::test]
async fn test_malformed_request_gets_bad_request() {
    let server = start().await;

    // only the request line: unread bytes left behind would turn the close into a reset
    let response = round_trip(&server, b"get / HTTP/1.1\r\n").await;

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(response.contains("content-type: text/plain\r\n"));
    assert!(response.ends_with("invalid method: \"get\""));

    server.close().await;
}

#[tokio::test]
async fn test_unsupported_version_gets_bad_request() {
    let server = start().await;

    let response = round_trip(&server, b"GET / HTTP/2.0\r\n").await;

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    server.close().await;
}

#[tokio::test]
async fn test_close_stops_accepting() {
    let server = start().await;
    let addr = server.local_addr();
    assert!(!server.is_closed());

    server.close().await;

    assert!(TcpStream::connect(addr).await.is_err());
}
