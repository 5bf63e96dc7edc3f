//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use evcharge_client::api::{ApiError, ApiRequest};
use evcharge_client::config::Config;
use evcharge_client::transport::Transport;
use evcharge_client::EvChargingApi;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::oneshot;

type Reply = Result<Value, ApiError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// In-process transport answering from a script.
///
/// Replies are consumed in call order. A gated reply blocks the call until
/// the test releases it, which is how tests hold requests in flight.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    calls: Arc<Mutex<Vec<(ApiRequest, Option<String>)>>>,
    script: Arc<Mutex<VecDeque<Scripted>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, data: Value) {
        self.script.lock().push_back(Scripted::Ready(Ok(data)));
    }

    pub fn push_err(&self, error: ApiError) {
        self.script.lock().push_back(Scripted::Ready(Err(error)));
    }

    /// Queue a reply the test sends later.
    pub fn push_gated(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.calls.lock().iter().map(|(r, _)| r.clone()).collect()
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        self.calls.lock().iter().map(|(_, t)| t.clone()).collect()
    }

    /// Wait until at least `n` requests were issued.
    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..200 {
            if self.call_count() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {} calls, saw {}", n, self.call_count());
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest, token: Option<String>) -> Result<Value, ApiError> {
        self.calls.lock().push((request, token));
        let next = self.script.lock().pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::network("gate dropped"))),
            None => Err(ApiError::network("no scripted reply")),
        }
    }
}

pub fn make_api(transport: &ScriptedTransport) -> EvChargingApi {
    make_api_with(transport, Config::default())
}

pub fn make_api_with(transport: &ScriptedTransport, config: Config) -> EvChargingApi {
    EvChargingApi::new(&config, Arc::new(transport.clone()))
}

/// Wait for the next store change (e.g. a discarded response being applied).
pub async fn next_change(api: &EvChargingApi) {
    let mut changes = api.store().changes();
    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .expect("no store change within 1s")
        .expect("store dropped");
}

pub fn dashboard_json(total_stations: u64) -> Value {
    json!({
        "period": "week",
        "stats": {"totalStations": total_stations, "activeSessions": 2},
    })
}

pub fn user_json(id: &str, name: &str) -> Value {
    json!({"id": id, "email": format!("{}@example.com", id), "name": name, "role": "admin"})
}

pub fn login_json(id: &str, token: &str) -> Value {
    json!({
        "user": {"id": id, "email": "a@b.com", "name": "A"},
        "token": token,
    })
}
