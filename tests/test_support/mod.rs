//! One-shot HTTP stub shared by the remote provider tests
//!
//! The stub accepts exactly one connection, records the raw request, and
//! replies with a canned status and body.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub(crate) struct StubServer {
    /// `http://127.0.0.1:<port>` followed by the path given to `start`
    pub(crate) url: String,
    request: JoinHandle<Result<String>>,
}

impl StubServer {
    /// Serve one request under `path`, answering with `status` and `body`.
    pub(crate) async fn start(path: &str, status: u16, body: &'static str) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}{path}", listener.local_addr()?);

        let request = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await?;
            let raw = read_http_request(&mut socket).await?;
            let response = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await?;
            socket.shutdown().await?;
            Ok(raw)
        });

        Ok(Self { url, request })
    }

    /// Accept one connection and never answer.
    pub(crate) async fn silent(path: &str) -> Result<(String, JoinHandle<()>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}{path}", listener.local_addr()?);
        let handle = tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            }
        });
        Ok((url, handle))
    }

    pub(crate) async fn captured_request(self) -> Result<String> {
        self.request.await?
    }
}

async fn read_http_request(socket: &mut TcpStream) -> Result<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            bail!("connection closed before request was complete");
        }
        buffer.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buffer);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .context("request without content-length")?;
            if buffer.len() >= header_end + 4 + content_length {
                return Ok(String::from_utf8_lossy(&buffer).into_owned());
            }
        }
    }
}

pub(crate) fn request_body(raw: &str) -> serde_json::Value {
    let (_, body) = raw.split_once("\r\n\r\n").expect("http body");
    serde_json::from_str(body).expect("json body")
}
