//! Shared helpers for the test suites.
//!
//! [`StubBackend`] is an axum app on a random local port that answers lookup
//! POSTs from a handler and records every request body.

#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use axum::extract::{Json, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const LOOKUP_PATH: &str = "/api/masterdata/lookup";

type Handler = dyn Fn(&Value) -> (u16, String) + Send + Sync;

#[derive(Clone)]
struct StubState {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn lookup(State(state): State<StubState>, Json(body): Json<Value>) -> impl IntoResponse {
    state.requests.lock().unwrap().push(body.clone());
    let (status, payload) = (state.handler)(&body);
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], payload)
}

pub struct StubBackend {
    url: String,
    requests: Arc<Mutex<Vec<Value>>>,
    task: JoinHandle<()>,
}

impl StubBackend {
    /// Serve every request with `handler(request_body)` -> `(status, body)`.
    pub async fn start<F>(handler: F) -> Result<Self>
    where
        F: Fn(&Value) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}{LOOKUP_PATH}", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new().route(LOOKUP_PATH, post(lookup)).with_state(StubState {
            handler: Arc::new(handler),
            requests: Arc::clone(&requests),
        });
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            url,
            requests,
            task,
        })
    }

    /// Answer from a routing table of message type -> `ResponseData` records.
    ///
    /// On-select calls get `ResponsePayload` from `details` keyed by the
    /// selected code; unknown message types get an empty envelope.
    pub async fn master_data(lists: Vec<(&str, Option<&str>, Value)>, details: Vec<(&str, Value)>) -> Result<Self> {
        let lists: Vec<(String, Option<String>, Value)> = lists
            .into_iter()
            .map(|(mt, filter, data)| (mt.to_string(), filter.map(str::to_string), data))
            .collect();
        let details: Vec<(String, Value)> = details.into_iter().map(|(code, v)| (code.to_string(), v)).collect();

        Self::start(move |request| {
            let message_type = request["messageType"].as_str().unwrap_or_default();
            if let Some(id) = request["searchCriteria"]["id"].as_str() {
                let payload = details.iter().find(|(code, _)| code == id).map(|(_, v)| v.to_string());
                let body = match payload {
                    Some(payload) => json!({ "ResponsePayload": payload }),
                    None => json!({}),
                };
                return (200, body.to_string());
            }

            let filter = request["additionalFilter"][0]["FilterValue"].as_str();
            let data = lists
                .iter()
                .find(|(mt, f, _)| mt == message_type && f.as_deref() == filter)
                .map(|(_, _, data)| data.to_string())
                .unwrap_or_else(|| "[]".to_string());
            // ResponseData travels as a JSON-encoded string
            (200, json!({ "ResponseData": data }).to_string())
        })
        .await
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_of(&self, message_type: &str) -> Vec<Value> {
        self.requests().into_iter().filter(|r| r["messageType"] == message_type).collect()
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A temp directory holding a config that points at `endpoint`.
pub struct TestConfig {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestConfig {
    pub fn new(endpoint: &str) -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            format!("[backend]\nendpoint = \"{endpoint}\"\ntimeout_secs = 5\n\n[options]\npage_limit = 50\n"),
        )?;
        Ok(Self {
            dir,
            path,
        })
    }

    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

/// `cgrid` with an isolated config location and no inherited log filter.
pub fn cgrid(config_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cgrid").unwrap();
    cmd.env("CGRID_CONFIG", config_path).env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}
