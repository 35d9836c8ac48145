// Common test utilities

use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;

/// Canned reply for one stub endpoint.
#[derive(Clone)]
pub struct StubReply {
    pub status: StatusCode,
    pub body: String,
}

impl StubReply {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn respond(State(state): State<StubState>, Json(body): Json<Value>) -> (StatusCode, String) {
    state.received.lock().unwrap().push(body);
    (state.reply.status, state.reply.body.clone())
}

/// A local stand-in for the Walking Buddy backend.
pub struct StubServer {
    pub base_url: String,
    received: Arc<Mutex<Vec<Value>>>,
}

impl StubServer {
    /// Serve `reply` on both service endpoints from an ephemeral port.
    pub async fn start(reply: StubReply) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            reply,
            received: received.clone(),
        };

        let app = Router::new()
            .route("/service/v1/walking_buddy", post(respond))
            .route("/service/v1/route", post(respond))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            received,
        }
    }

    /// Request bodies received so far, in arrival order.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
