//! Test helpers for integration tests.
//!
//! Every backend is in-memory. The concrete handles are kept alongside the
//! router so tests can inspect queue depth, live locks, and ledger rows.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use seatgate_api::{Backends, build_app, build_state, build_worker};
use seatgate_cache::memory::MemoryCacheProvider;
use seatgate_core::config::AppConfig;
use seatgate_database::{Ledger, MemoryLedger};
use seatgate_lock::MemoryLockStore;
use seatgate_queue::MemoryQueue;
use seatgate_worker::CommitWorker;

/// Test application with direct access to the in-memory backends.
pub struct TestApp {
    pub router: Router,
    pub worker: CommitWorker,
    pub queue: MemoryQueue,
    pub locks: MemoryLockStore,
    pub ledger: MemoryLedger,
    pub backends: Backends,
}

/// Response captured from the router.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Header value as a string, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    /// Create a new test application with default settings.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application from a custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let queue = MemoryQueue::new(
            Duration::from_secs(config.queue.dedup_window_seconds),
            config.queue.max_receive_count,
        );
        let locks = MemoryLockStore::new();
        let ledger = MemoryLedger::new();

        let backends = Backends {
            cache: Arc::new(MemoryCacheProvider::new(&config.cache.memory)),
            locks: Arc::new(locks.clone()),
            queue: Arc::new(queue.clone()),
            ledger: Ledger::in_memory(ledger.clone()),
        };

        let worker = build_worker(&config, &backends);
        let router = build_app(build_state(config, &backends));

        Self {
            router,
            worker,
            queue,
            locks,
            ledger,
            backends,
        }
    }

    /// Send a request through the router.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = match body {
            Some(json) => Body::from(serde_json::to_string(&json).unwrap()),
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// GET request without extra headers.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None, &[]).await
    }

    /// POST a JSON body without extra headers.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    /// Enter the waiting room and return the room token.
    pub async fn enter(&self, user_id: &str, event_id: &str) -> String {
        let resp = self
            .post(
                "/public/enter",
                serde_json::json!({ "userId": user_id, "eventId": event_id }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "enter failed: {}", resp.body);
        resp.body["roomToken"].as_str().unwrap().to_string()
    }

    /// Hold a seat with a room token.
    pub async fn hold(&self, token: &str, event_id: &str, seat_id: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/public/hold",
            Some(serde_json::json!({ "eventId": event_id, "seatId": seat_id })),
            &[("X-Room-Token", token)],
        )
        .await
    }

    /// Create a payment intent under an idempotency key.
    pub async fn create_intent(
        &self,
        key: &str,
        user_id: &str,
        event_id: &str,
        seat_ids: &[&str],
    ) -> TestResponse {
        self.request(
            Method::POST,
            "/confirm/payment-intent",
            Some(serde_json::json!({
                "userId": user_id,
                "eventId": event_id,
                "seatIds": seat_ids,
            })),
            &[("Idempotency-Key", key)],
        )
        .await
    }

    /// Submit a commit under an idempotency key.
    pub async fn commit(
        &self,
        key: &str,
        intent_id: &str,
        user_id: &str,
        event_id: &str,
        seat_ids: &[&str],
    ) -> TestResponse {
        self.request(
            Method::POST,
            "/confirm/commit",
            Some(serde_json::json!({
                "intentId": intent_id,
                "userId": user_id,
                "eventId": event_id,
                "seatIds": seat_ids,
            })),
            &[("Idempotency-Key", key)],
        )
        .await
    }

    /// Poll the worker until the queue hands out nothing visible.
    pub async fn drain_worker(&self) {
        for _ in 0..10 {
            let report = self.worker.poll_once().await.unwrap();
            if report.received == 0 {
                return;
            }
        }
        panic!("worker did not drain the queue");
    }
}

/// Default configuration with a non-blocking receive.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.worker.wait_time_seconds = 0;
    config.worker.enabled = false;
    config
}
