//! In-process stand-in for the telemetry backend

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// A request as the backend saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Bytes,
}

/// How the backend answers
#[derive(Debug, Clone)]
pub struct Reply {
    /// Answer every request with this status instead
    pub fail: Option<StatusCode>,
    /// Body returned for GET requests
    pub status_body: String,
}

impl Default for Reply {
    fn default() -> Self {
        Self {
            fail: None,
            status_body: r#"{"connected":true}"#.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    reply: Arc<Reply>,
}

impl MockBackend {
    pub async fn start(reply: Reply) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let backend = Self {
            addr: listener.local_addr().unwrap(),
            requests: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(reply),
        };

        let app = Router::new().fallback(record).with_state(backend.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        backend
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    backend.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        body,
    });

    if let Some(status) = backend.reply.fail {
        return (status, "ingestion unavailable").into_response();
    }
    if method == Method::GET {
        return (
            [(header::CONTENT_TYPE, "application/json")],
            backend.reply.status_body.clone(),
        )
            .into_response();
    }
    StatusCode::ACCEPTED.into_response()
}

/// Address nothing is listening on
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Accepts connections and never answers them
pub async fn silent_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

/// Answers each request with a 500 whose body is cut short
pub async fn truncated_error_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut head = Vec::new();
            let mut chunk = [0u8; 512];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&chunk[..n]),
                }
            }
            let _ = socket
                .write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\n\
                      Content-Length: 100\r\n\r\npartial",
                )
                .await;
            let _ = socket.shutdown().await;
        }
    });
    addr
}
