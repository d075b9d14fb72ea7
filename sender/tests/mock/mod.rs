//! Mock ingest server shared by the integration tests.
#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use protocol::InputPayload;
use serde_json::json;

#[derive(Clone)]
pub struct MockIngest {
    pub received: Arc<Mutex<Vec<(Instant, InputPayload)>>>,
    pub reject_from: Option<usize>,
    pub plain_text: bool,
    pub health: &'static str,
}

impl Default for MockIngest {
    fn default() -> Self {
        Self {
            received: Arc::default(),
            reject_from: None,
            plain_text: false,
            health: "ok",
        }
    }
}

impl MockIngest {
    pub fn received(&self) -> Vec<(Instant, InputPayload)> {
        self.received.lock().unwrap().clone()
    }
}

async fn accept_input(
    State(mock): State<MockIngest>,
    Json(payload): Json<InputPayload>,
) -> Response {
    let index = {
        let mut received = mock.received.lock().unwrap();
        received.push((Instant::now(), payload));
        received.len() - 1
    };
    if mock.plain_text {
        return (StatusCode::OK, "queued").into_response();
    }
    match mock.reject_from {
        Some(from) if index >= from => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "queue unavailable" })),
        )
            .into_response(),
        _ => Json(json!({ "ok": true, "queue_path": "out/input_queue.jsonl" })).into_response(),
    }
}

async fn health(State(mock): State<MockIngest>) -> Json<serde_json::Value> {
    Json(json!({ "status": mock.health }))
}

/// Serves the mock on an ephemeral port and returns its base URL.
pub fn spawn_ingest(mock: MockIngest) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/v1/inputs", post(accept_input))
        .route("/health", get(health))
        .with_state(mock);

    tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service())
            .await
            .unwrap();
    });

    format!("http://{}", addr)
}
