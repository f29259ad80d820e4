#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use terminal_pos::domain::ports::OperatorConsole;
use terminal_pos::error::TerminalError;
use tokio::net::TcpListener;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Routes {
    replies: HashMap<String, (StatusCode, String)>,
    requests: Vec<RecordedRequest>,
}

/// A stand-in for the demo backend that answers each path with a canned body.
#[derive(Clone, Default)]
pub struct FakeBackend {
    routes: Arc<Mutex<Routes>>,
}

impl FakeBackend {
    pub fn reply(&self, path: &str, status: StatusCode, body: impl Into<String>) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .replies
            .insert(path.to_string(), (status, body.into()));
        self
    }

    pub fn reply_json(&self, path: &str, body: Value) -> &Self {
        self.reply(path, StatusCode::OK, body.to_string())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.routes.lock().unwrap().requests.clone()
    }

    /// Serves on an ephemeral local port and returns the base URL.
    pub async fn serve(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn handle(
    State(fake): State<FakeBackend>,
    method: Method,
    uri: Uri,
    body: String,
) -> impl IntoResponse {
    let mut routes = fake.routes.lock().unwrap();
    routes.requests.push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        body: serde_json::from_str(&body).ok(),
    });
    let (status, body) = routes
        .replies
        .get(uri.path())
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, "Not Found".to_string()));
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// A local address nothing listens on.
pub async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[derive(Clone, Default)]
pub struct RecordingConsole {
    pub lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingConsole {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl OperatorConsole for RecordingConsole {
    fn failure(&self, context: &str, error: &TerminalError) {
        self.lines.lock().unwrap().push(format!("{context}: {error}"));
    }

    fn warning(&self, context: &str, message: &str) {
        self.lines.lock().unwrap().push(format!("{context}: {message}"));
    }

    fn notice(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}
