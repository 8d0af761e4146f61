//! Test utilities for OpenProdoc integration tests
//!
//! `MockServer` is an in-process stand-in for the OpenProdoc REST API: every
//! request is recorded and answered from a fixed (method, endpoint) table.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode, header};
use axum::response::Response;
use openprodoc::client::Transport;
use openprodoc::config::EnvConfig;
use openprodoc::http::create_client_with_timeout;
use openprodoc::session::Session;
use openprodoc::tools::ToolContext;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Mount point of the REST API on the mock host
pub const API_ROOT: &str = "/ProdocWeb2/APIRest";

// ============================================================================
// Mock remote service
// ============================================================================

/// Canned answer for one route
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl MockResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string().into_bytes(),
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    pub fn binary(content_type: &'static str, bytes: &[u8]) -> Self {
        Self {
            status: 200,
            content_type,
            body: bytes.to_vec(),
        }
    }
}

/// One request as received by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path relative to the API root, e.g. `folders/ById/f-1`
    pub endpoint: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn body_json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// Value of one `application/x-www-form-urlencoded` field
    pub fn form_field(&self, name: &str) -> Option<String> {
        url::form_urlencoded::parse(&self.body)
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.to_string())
    }
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<Vec<(Method, String, MockResponse)>>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn handle(State(state): State<MockState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default().to_vec();
    let endpoint = parts
        .uri
        .path()
        .strip_prefix(API_ROOT)
        .unwrap_or(parts.uri.path())
        .trim_start_matches('/')
        .to_string();
    let header_text = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.recorded.lock().unwrap().push(RecordedRequest {
        method: parts.method.clone(),
        endpoint: endpoint.clone(),
        query: parts.uri.query().map(str::to_string),
        authorization: header_text(header::AUTHORIZATION),
        accept: header_text(header::ACCEPT),
        content_type: header_text(header::CONTENT_TYPE),
        body,
    });

    let reply = state
        .routes
        .iter()
        .find(|(method, path, _)| *method == parts.method && *path == endpoint)
        .map(|(_, _, reply)| reply.clone())
        .unwrap_or_else(|| MockResponse::json(404, serde_json::json!({"Res": "KO"})));

    Response::builder()
        .status(StatusCode::from_u16(reply.status).unwrap())
        .header(header::CONTENT_TYPE, reply.content_type)
        .body(Body::from(reply.body))
        .unwrap()
}

/// In-process OpenProdoc REST API bound to an ephemeral port
pub struct MockServer {
    base_url: String,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Serve `routes`; unknown routes answer 404
    pub async fn start(routes: Vec<(Method, &str, MockResponse)>) -> Self {
        let state = MockState {
            routes: Arc::new(
                routes
                    .into_iter()
                    .map(|(m, p, r)| (m, p.to_string(), r))
                    .collect(),
            ),
            recorded: Arc::default(),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}{}", addr, API_ROOT),
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.recorded.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Host that accepts connections and never answers
pub struct StalledServer {
    base_url: String,
    handle: JoinHandle<()>,
}

impl StalledServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            // Held so the peer sees an open, silent connection
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        Self {
            base_url: format!("http://{}{}", addr, API_ROOT),
            handle,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for StalledServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ============================================================================
// Tool context
// ============================================================================

/// Test context that implements ToolContext against a mock endpoint
pub struct TestContext {
    session: Session,
    transport: Transport,
    config: EnvConfig,
}

impl TestContext {
    /// Unauthenticated context pointing at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self::with_config(EnvConfig::with_base_url(base_url))
    }

    pub fn with_config(config: EnvConfig) -> Self {
        Self::with_timeout(config, Duration::from_secs(5))
    }

    pub fn with_timeout(config: EnvConfig, timeout: Duration) -> Self {
        Self {
            session: Session::new(config.base_url.clone()),
            transport: Transport::new(create_client_with_timeout(timeout)),
            config,
        }
    }

    /// Context already holding `token`, as after a successful login
    pub async fn authenticated(base_url: &str, token: &str) -> Self {
        let ctx = Self::new(base_url);
        ctx.session.set_credentials(token, base_url).await;
        ctx
    }
}

impl ToolContext for TestContext {
    fn session(&self) -> &Session {
        &self.session
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn config(&self) -> &EnvConfig {
        &self.config
    }
}
