//! Local HTTP JSON-RPC endpoint for client tests
//!
//! Serves one request per connection; the responder sees the decoded request
//! body and returns an HTTP status with a raw body.

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

type Responder = Arc<dyn Fn(&Value) -> (u16, String) + Send + Sync>;

/// Start the endpoint and return its URL
pub async fn serve(responder: impl Fn(&Value) -> (u16, String) + Send + Sync + 'static) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let responder: Responder = Arc::new(responder);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let responder = Arc::clone(&responder);
            tokio::spawn(async move {
                let _ = handle(stream, responder).await;
            });
        }
    });
    url
}

/// JSON-RPC success reply echoing the request id
pub fn reply(request: &Value, result: Value) -> (u16, String) {
    let body = json!({"jsonrpc": "2.0", "id": request["id"].clone(), "result": result});
    (200, body.to_string())
}

async fn handle(mut stream: TcpStream, responder: Responder) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let (body_start, content_length) = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            break (pos + 4, length);
        }
    };

    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let end = buf.len().min(body_start + content_length);
    let request: Value = serde_json::from_slice(&buf[body_start..end]).unwrap_or(Value::Null);
    let (status, body) = responder(&request);

    let response = format!(
        "HTTP/1.1 {} OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
