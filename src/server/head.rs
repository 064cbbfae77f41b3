// Request head module
// Reads and validates the request head before hyper sees the connection
//
// Malformed heads are answered here with a decorated 400; hyper never sees
// them.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{
    HeaderName, HeaderValue, CONNECTION, CONTENT_LENGTH, DATE, TRANSFER_ENCODING,
};
use hyper::{Method, Response, Uri};
use std::time::SystemTime;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::{build_400_response, cache, with_cors_no_cache};

/// Upper bound on a request head; anything longer is rejected
const MAX_HEAD_SIZE: usize = 64 * 1024;

/// Header slots offered to httparse, matching hyper's default limit
const MAX_HEADERS: usize = 100;

/// Outcome of reading the start of a connection
#[derive(Debug, PartialEq, Eq)]
pub enum HeadCheck {
    /// A complete, acceptable head; holds every byte read so far, which
    /// must be replayed to the HTTP server
    Valid(Vec<u8>),
    /// Not a request we can answer; holds the reason
    Malformed(String),
    /// Peer closed before sending a complete head
    Closed,
}

/// Read from `reader` until a full request head has arrived, then validate it
pub async fn read_head<R>(reader: &mut R) -> std::io::Result<HeadCheck>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(1024);

    loop {
        if reader.read_buf(&mut buf).await? == 0 {
            return Ok(HeadCheck::Closed);
        }

        match check_head(&buf) {
            Ok(true) => return Ok(HeadCheck::Valid(buf)),
            Ok(false) if buf.len() > MAX_HEAD_SIZE => {
                return Ok(HeadCheck::Malformed("request head too large".to_string()));
            }
            Ok(false) => {}
            Err(reason) => return Ok(HeadCheck::Malformed(reason)),
        }
    }
}

/// `Ok(true)` for a complete valid head, `Ok(false)` when more bytes are needed
fn check_head(buf: &[u8]) -> Result<bool, String> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut headers);

    match req.parse(buf) {
        Ok(httparse::Status::Complete(_)) => {
            validate(&req)?;
            Ok(true)
        }
        Ok(httparse::Status::Partial) => Ok(false),
        Err(e) => Err(format!("Bad request syntax ({e})")),
    }
}

/// Apply the checks hyper makes on top of httparse
fn validate(req: &httparse::Request<'_, '_>) -> Result<(), String> {
    let method = req.method.unwrap_or_default();
    Method::from_bytes(method.as_bytes())
        .map_err(|_| format!("Bad request method ({method})"))?;

    let target = req.path.unwrap_or_default();
    target
        .parse::<Uri>()
        .map_err(|_| format!("Bad request target ({target})"))?;

    let mut content_length: Option<u64> = None;
    for header in req.headers.iter() {
        let name = HeaderName::from_bytes(header.name.as_bytes())
            .map_err(|_| format!("Bad header name ({})", header.name))?;
        HeaderValue::from_bytes(header.value)
            .map_err(|_| format!("Bad value for header {}", header.name))?;

        if name == CONTENT_LENGTH {
            let length = std::str::from_utf8(header.value)
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .ok_or_else(|| "Bad Content-Length".to_string())?;
            if content_length.is_some_and(|seen| seen != length) {
                return Err("Conflicting Content-Length".to_string());
            }
            content_length = Some(length);
        } else if name == TRANSFER_ENCODING {
            let chunked_last = std::str::from_utf8(header.value)
                .ok()
                .and_then(|v| v.rsplit(',').next())
                .is_some_and(|last| last.trim().eq_ignore_ascii_case("chunked"));
            if !chunked_last {
                return Err("Unsupported Transfer-Encoding".to_string());
            }
        }
    }

    Ok(())
}

/// Write a decorated 400 for a malformed head
pub async fn write_rejection<W>(writer: &mut W, reason: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut resp = with_cors_no_cache(build_400_response(reason));
    resp.headers_mut().insert(CONNECTION, HeaderValue::from_static("close"));
    if let Ok(date) = HeaderValue::from_str(&cache::format_http_date(SystemTime::now())) {
        resp.headers_mut().insert(DATE, date);
    }

    let bytes = encode_response(resp).await;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    writer.shutdown().await
}

/// Serialize a response as HTTP/1.1, header names in Title-Case
async fn encode_response(resp: Response<Full<Bytes>>) -> Vec<u8> {
    let (parts, body) = resp.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    };

    let mut out = format!(
        "HTTP/1.1 {} {}\r\n",
        parts.status.as_u16(),
        parts.status.canonical_reason().unwrap_or("")
    )
    .into_bytes();
    for (name, value) in &parts.headers {
        out.extend_from_slice(title_case(name.as_str()).as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(&body);
    out
}

/// `access-control-allow-origin` -> `Access-Control-Allow-Origin`
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        upper = c == '-';
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read(input: &[u8]) -> HeadCheck {
        let mut reader = input;
        read_head(&mut reader).await.unwrap()
    }

    #[tokio::test]
    async fn test_valid_head_is_kept_for_replay() {
        let raw = b"GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n";
        assert_eq!(read(raw).await, HeadCheck::Valid(raw.to_vec()));
    }

    #[tokio::test]
    async fn test_garbage_is_malformed() {
        assert!(matches!(read(b"GARBAGE\r\n\r\n").await, HeadCheck::Malformed(_)));
        assert!(matches!(
            read(b"GET / HTTP/1.1\r\nNo colon here\r\n\r\n").await,
            HeadCheck::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn test_early_close() {
        assert_eq!(read(b"").await, HeadCheck::Closed);
        assert_eq!(read(b"GET / HTTP/1.1\r\nHost: x\r\n").await, HeadCheck::Closed);
    }

    #[test]
    fn test_body_framing_checks() {
        assert!(check_head(b"GET / HTTP/1.1\r\nContent-Length: abc\r\n\r\n").is_err());
        assert!(check_head(
            b"GET / HTTP/1.1\r\nContent-Length: 1\r\nContent-Length: 2\r\n\r\n"
        )
        .is_err());
        assert!(check_head(b"GET / HTTP/1.1\r\nTransfer-Encoding: gzip\r\n\r\n").is_err());
        assert_eq!(
            check_head(b"POST / HTTP/1.1\r\nTransfer-Encoding: gzip, chunked\r\n\r\n"),
            Ok(true)
        );
    }

    #[test]
    fn test_partial_head_needs_more() {
        assert_eq!(check_head(b"GET /index.html HTTP/1.1\r\nHo"), Ok(false));
    }

    #[tokio::test]
    async fn test_rejection_is_decorated() {
        let mut out = Vec::new();
        write_rejection(&mut out, "Bad request syntax").await.unwrap();
        let text = String::from_utf8(out).unwrap();

        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        assert!(head.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        for line in [
            "Access-Control-Allow-Origin: *",
            "Cache-Control: no-cache, no-store, must-revalidate",
            "Pragma: no-cache",
            "Expires: 0",
            "Connection: close",
        ] {
            assert_eq!(head.lines().filter(|l| *l == line).count(), 1, "{line}");
        }
        assert!(head.contains(&format!("Content-Length: {}", body.len())));
        assert!(body.contains("<p>Error code: 400</p>"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("access-control-allow-origin"), "Access-Control-Allow-Origin");
        assert_eq!(title_case("expires"), "Expires");
    }
}
