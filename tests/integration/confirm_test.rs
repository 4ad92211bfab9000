//! Payment intent, callback, commit, and status integration tests.

mod helpers;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tokio::task::JoinSet;

use helpers::TestApp;

#[tokio::test]
async fn test_payment_intent_create_then_replay() {
    let app = TestApp::new();

    let first = app.create_intent("intent-key-01", "u1", "e1", &["R1C1"]).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["amount"], 10_000);
    assert_eq!(first.body["replay"], false);
    assert!(first.header("idempotent-replay").is_none());
    let intent_id = first.body["intentId"].as_str().unwrap().to_string();
    assert!(intent_id.starts_with("pi_"));

    let second = app.create_intent("intent-key-01", "u1", "e1", &["R1C1"]).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.header("idempotent-replay"), Some("true"));
    assert_eq!(second.body["intentId"], intent_id.as_str());
    assert_eq!(second.body["amount"], 10_000);
    assert_eq!(second.body["replay"], true);
}

#[tokio::test]
async fn test_payment_intent_amount_scales_with_seats() {
    let app = TestApp::new();
    let resp = app
        .create_intent("intent-key-02", "u1", "e1", &["R1C1", "R1C2", "R1C3"])
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["amount"], 30_000);
}

#[tokio::test]
async fn test_concurrent_intents_share_one_row() {
    let app = Arc::new(TestApp::new());
    let mut set = JoinSet::new();
    for _ in 0..8 {
        let app = Arc::clone(&app);
        set.spawn(async move {
            app.create_intent("intent-key-race", "u1", "e1", &["R1C1"])
                .await
        });
    }

    let mut created = 0;
    let mut ids = Vec::new();
    while let Some(resp) = set.join_next().await {
        let resp = resp.unwrap();
        if resp.status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(resp.status, StatusCode::OK);
        }
        ids.push(resp.body["intentId"].as_str().unwrap().to_string());
    }
    assert_eq!(created, 1);
    ids.dedup();
    assert_eq!(ids.len(), 1);
}

#[tokio::test]
async fn test_payment_intent_rejects_bad_input() {
    let app = TestApp::new();

    let resp = app
        .request(
            Method::POST,
            "/confirm/payment-intent",
            Some(json!({ "userId": "u1", "eventId": "e1", "seatIds": ["R1C1"] })),
            &[],
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_code(), "bad_request");

    let resp = app.create_intent("short", "u1", "e1", &["R1C1"]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.create_intent("intent-key-03", "u1", "e1", &[]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .create_intent("intent-key-04", "u1", "e1", &["R1C1", "R1C1"])
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_payment_intent_database_outage_is_masked() {
    let app = TestApp::new();
    app.ledger.set_unavailable(true);

    let resp = app.create_intent("intent-key-05", "u1", "e1", &["R1C1"]).await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.error_code(), "internal_error");
    assert_eq!(resp.body["message"], "internal error");
}

#[tokio::test]
async fn test_commit_is_accepted_with_location() {
    let app = TestApp::new();
    let resp = app
        .commit("commit-key-01", "pi_1", "u1", "e1", &["R1C1"])
        .await;
    assert_eq!(resp.status, StatusCode::ACCEPTED);
    assert_eq!(resp.body["accepted"], true);
    assert_eq!(resp.body["status"], "PROCESSING");
    assert_eq!(resp.body["idem"], "commit-key-01");
    assert_eq!(
        resp.header("location"),
        Some("/confirm/status?idem=commit-key-01")
    );
    assert_eq!(app.queue.depth().await, 1);
}

#[tokio::test]
async fn test_duplicate_commit_is_absorbed() {
    let app = TestApp::new();
    for _ in 0..3 {
        let resp = app
            .commit("commit-key-02", "pi_1", "u1", "e1", &["R1C1"])
            .await;
        assert_eq!(resp.status, StatusCode::ACCEPTED);
    }
    assert_eq!(app.queue.depth().await, 1);
}

#[tokio::test]
async fn test_invalid_commit_is_not_enqueued() {
    let app = TestApp::new();

    let resp = app.commit("commit-key-03", "", "u1", "e1", &["R1C1"]).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .request(
            Method::POST,
            "/confirm/commit",
            Some(json!({
                "intentId": "pi_1",
                "userId": "u1",
                "eventId": "e1",
                "seatIds": ["R1C1"],
            })),
            &[],
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.queue.depth().await, 0);
}

#[tokio::test]
async fn test_status_before_commit_lands() {
    let app = TestApp::new();

    let resp = app.get("/confirm/status?idem=unknown-key").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["order"].is_null());
    assert!(resp.body["payment"].is_null());

    let resp = app.get("/confirm/status").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_payment_callback_is_enqueued() {
    let app = TestApp::new();

    let resp = app
        .post(
            "/confirm/payment-callback",
            json!({ "intentId": "pi_1", "status": "APPROVED", "amount": 10000, "txnId": "t1" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["ok"], true);
    assert_eq!(app.queue.depth().await, 1);

    let resp = app
        .post("/confirm/payment-callback", json!({ "intentId": "pi_1" }))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.queue.depth().await, 1);
}
