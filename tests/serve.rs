use devserve::config::{AppState, EnvMap};
use devserve::{server, Config};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

const HEADERS: [&str; 4] = [
    "Access-Control-Allow-Origin: *",
    "Cache-Control: no-cache, no-store, must-revalidate",
    "Pragma: no-cache",
    "Expires: 0",
];

/// Build a listener on an ephemeral loopback port serving `root`, going
/// through the same config path as the binary.
fn start(root: &Path) -> (TcpListener, Arc<AppState>) {
    let env: EnvMap = [
        ("PORT".to_string(), "0".to_string()),
        ("SERVE_LOGGING__ACCESS_LOG".to_string(), "false".to_string()),
    ]
    .into_iter()
    .collect();

    let mut cfg = Config::load_from_env(Some(env)).unwrap();
    cfg.root = root.to_path_buf();
    let state = Arc::new(AppState::new(&cfg).unwrap());
    let listener = server::bind(cfg.socket_addr()).unwrap();
    (listener, state)
}

/// Send one raw HTTP/1.1 request and return the full response text
async fn fetch(addr: SocketAddr, method: &str, target: &str) -> String {
    let request =
        format!("{method} {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    send_raw(addr, request.as_bytes()).await
}

/// Write `bytes` as-is and read until the server closes the connection
async fn send_raw(addr: SocketAddr, bytes: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(bytes).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

fn split(response: &str) -> (&str, &str) {
    response.split_once("\r\n\r\n").unwrap()
}

fn assert_headers_once(head: &str) {
    for header in HEADERS {
        let count = head.lines().filter(|line| *line == header).count();
        assert_eq!(count, 1, "expected exactly one `{header}` in:\n{head}");
    }
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hello.txt"), b"hello from disk\n").unwrap();
    std::fs::write(dir.path().join("index.html"), b"<h1>floor plan</h1>").unwrap();
    dir
}

#[tokio::test]
async fn test_serves_files_with_cors_no_cache_headers() {
    let dir = fixture();
    let (listener, state) = start(dir.path());
    let addr = listener.local_addr().unwrap();
    assert!(addr.ip().is_loopback());

    let (stop, stopped) = oneshot::channel::<()>();
    let server = server::serve(listener, state, async move {
        let _ = stopped.await;
    });

    let client = async move {
        let file = fetch(addr, "GET", "/hello.txt").await;
        let again = fetch(addr, "GET", "/hello.txt").await;
        let index = fetch(addr, "GET", "/").await;
        let missing = fetch(addr, "GET", "/nope.txt").await;
        let post = fetch(addr, "POST", "/hello.txt").await;
        drop(stop);
        (file, again, index, missing, post)
    };

    let ((), (file, again, index, missing, post)) = tokio::join!(server, client);

    let (head, body) = split(&file);
    assert!(head.starts_with("HTTP/1.1 200 OK"), "{head}");
    assert_headers_once(head);
    assert_eq!(body, "hello from disk\n");

    // No caching layer anywhere: the same bytes come back from disk
    assert_eq!(split(&again).1, body);
    assert_headers_once(split(&again).0);

    let (head, body) = split(&index);
    assert!(head.starts_with("HTTP/1.1 200 OK"), "{head}");
    assert_headers_once(head);
    assert_eq!(body, "<h1>floor plan</h1>");

    let (head, _) = split(&missing);
    assert!(head.starts_with("HTTP/1.1 404"), "{head}");
    assert_headers_once(head);

    let (head, _) = split(&post);
    assert!(head.starts_with("HTTP/1.1 501"), "{head}");
    assert_headers_once(head);
}

#[tokio::test]
async fn test_malformed_requests_get_headers() {
    let dir = fixture();
    let (listener, state) = start(dir.path());
    let addr = listener.local_addr().unwrap();

    let (stop, stopped) = oneshot::channel::<()>();
    let server = server::serve(listener, state, async move {
        let _ = stopped.await;
    });

    let client = async move {
        let garbage = send_raw(addr, b"GARBAGE\r\n\r\n").await;
        let bad_header = send_raw(addr, b"GET /hello.txt HTTP/1.1\r\nno colon\r\n\r\n").await;
        let bad_version = send_raw(addr, b"GET /hello.txt HTTP/9.9\r\n\r\n").await;
        // A valid request still works after the rejections
        let file = fetch(addr, "GET", "/hello.txt").await;
        drop(stop);
        (garbage, bad_header, bad_version, file)
    };

    let ((), (garbage, bad_header, bad_version, file)) = tokio::join!(server, client);

    for response in [&garbage, &bad_header, &bad_version] {
        let (head, body) = split(response);
        assert!(head.starts_with("HTTP/1.1 400 Bad Request"), "{head}");
        assert_headers_once(head);
        assert!(body.contains("<p>Error code: 400</p>"), "{body}");
    }
    assert_eq!(split(&file).1, "hello from disk\n");
}

#[tokio::test]
async fn test_file_changes_are_visible_immediately() {
    let dir = fixture();
    let (listener, state) = start(dir.path());
    let addr = listener.local_addr().unwrap();

    let (stop, stopped) = oneshot::channel::<()>();
    let server = server::serve(listener, state, async move {
        let _ = stopped.await;
    });

    let path = dir.path().join("hello.txt");
    let client = async move {
        let before = fetch(addr, "GET", "/hello.txt").await;
        tokio::fs::write(&path, b"edited\n").await.unwrap();
        let after = fetch(addr, "GET", "/hello.txt").await;
        drop(stop);
        (before, after)
    };

    let ((), (before, after)) = tokio::join!(server, client);
    assert_eq!(split(&before).1, "hello from disk\n");
    assert_eq!(split(&after).1, "edited\n");
}

#[tokio::test]
async fn test_shutdown_releases_port() {
    let dir = fixture();
    let (listener, state) = start(dir.path());
    let addr = listener.local_addr().unwrap();

    server::serve(listener, state, async {}).await;

    // Listener is gone, so the same port can be bound again
    let rebound = server::bind(addr).unwrap();
    assert_eq!(rebound.local_addr().unwrap(), addr);
}

#[tokio::test]
async fn test_port_in_use_is_startup_error() {
    let dir = fixture();
    let (listener, _state) = start(dir.path());
    let addr = listener.local_addr().unwrap();

    let err = server::bind(addr).unwrap_err();
    assert!(err.to_string().contains(&addr.to_string()), "{err}");
}

#[test]
fn test_invalid_port_is_rejected() {
    let env: EnvMap = [("PORT".to_string(), "not-a-port".to_string())]
        .into_iter()
        .collect();
    assert!(Config::load_from_env(Some(env)).is_err());
}
