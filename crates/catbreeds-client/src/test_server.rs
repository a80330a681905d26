//! In-process HTTP server for tests: canned replies, per-path hit counts.
//!
//! Every request lands on the router's fallback, so tests route on the raw
//! path instead of registering endpoints up front.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tokio::net::TcpListener;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self::bytes(status, "application/json", body.as_bytes().to_vec())
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self::bytes(status, "text/plain", body.as_bytes().to_vec())
    }

    pub fn status(status: u16) -> Self {
        Self::text(status, "")
    }

    pub fn bytes(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

type Handler = Arc<dyn Fn(&str, usize) -> Reply + Send + Sync>;

#[derive(Clone)]
struct ServerState {
    handler: Handler,
    hits: Arc<Mutex<HashMap<String, usize>>>,
    served: Arc<AtomicUsize>,
    gate: Option<Arc<Notify>>,
}

pub struct TestServer {
    addr: SocketAddr,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl TestServer {
    /// Serve `route(path)` for every request.
    pub async fn start<F>(route: F) -> Self
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        Self::spawn(Arc::new(move |path: &str, _n: usize| route(path)), None).await
    }

    /// Like [`TestServer::start`], but each request is counted and then held
    /// until `gate` is notified once for it.
    pub async fn start_gated<F>(route: F, gate: Arc<Notify>) -> Self
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        Self::spawn(
            Arc::new(move |path: &str, _n: usize| route(path)),
            Some(gate),
        )
        .await
    }

    /// Serve `replies` in request order; the last one repeats.
    pub async fn start_sequence(replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty());
        Self::spawn(
            Arc::new(move |_path: &str, n: usize| replies[n.min(replies.len() - 1)].clone()),
            None,
        )
        .await
    }

    async fn spawn(handler: Handler, gate: Option<Arc<Notify>>) -> Self {
        let hits = Arc::new(Mutex::new(HashMap::new()));
        let state = ServerState {
            handler,
            hits: hits.clone(),
            served: Arc::new(AtomicUsize::new(0)),
            gate,
        };
        let app = Router::new().fallback(respond).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, hits }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

async fn respond(State(state): State<ServerState>, uri: Uri) -> Reply {
    let path = uri.path().to_string();
    let n = state.served.fetch_add(1, Ordering::SeqCst);
    *state.hits.lock().unwrap().entry(path.clone()).or_default() += 1;

    if let Some(gate) = &state.gate {
        gate.notified().await;
    }
    (state.handler)(&path, n)
}
