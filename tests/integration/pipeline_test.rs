//! End-to-end tests: hold, intent, commit, worker, and status.

mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use seatgate_core::traits::queue::OutboundMessage;
use seatgate_entity::message::{CommitRequest, QueueEnvelope};

use helpers::{TestApp, test_config};

/// Enter, hold every seat, and create the payment intent. Returns the intent id.
async fn reserve(app: &TestApp, user: &str, event: &str, seats: &[&str], key: &str) -> String {
    let token = app.enter(user, event).await;
    for seat in seats {
        let resp = app.hold(&token, event, seat).await;
        assert_eq!(resp.status, StatusCode::OK, "hold {seat}: {}", resp.body);
    }
    let resp = app.create_intent(key, user, event, seats).await;
    assert_eq!(resp.status, StatusCode::CREATED);
    resp.body["intentId"].as_str().unwrap().to_string()
}

fn commit_message(request: &CommitRequest, group: &str, dedup: &str) -> OutboundMessage {
    OutboundMessage {
        body: serde_json::to_string(&QueueEnvelope::commit(request)).unwrap(),
        group_id: group.to_string(),
        dedup_id: dedup.to_string(),
    }
}

#[tokio::test]
async fn test_commit_confirms_order_and_releases_locks() {
    let app = TestApp::new();
    let intent = reserve(&app, "u1", "e1", &["R1C1"], "intent-key-p1").await;

    let resp = app.commit("order-key-p1", &intent, "u1", "e1", &["R1C1"]).await;
    assert_eq!(resp.status, StatusCode::ACCEPTED);
    let location = resp.header("location").unwrap().to_string();

    app.drain_worker().await;

    let status = app.get(&location).await;
    assert_eq!(status.status, StatusCode::OK);
    let order = &status.body["order"];
    assert_eq!(order["status"], "CONFIRMED");
    assert_eq!(order["idempotencyKey"], "order-key-p1");
    assert_eq!(order["intentId"], intent.as_str());
    assert_eq!(order["total"], 10_000);
    assert_eq!(order["items"].as_array().unwrap().len(), 1);
    assert_eq!(order["items"][0]["seatId"], "R1C1");

    assert_eq!(app.locks.live_count().await, 0);
    assert_eq!(app.queue.depth().await, 0);

    // The sold seat is free in the lock store but owned by the order.
    assert_eq!(app.ledger.item_count().await, 1);
}

#[tokio::test]
async fn test_redelivered_commit_is_applied_once() {
    let app = TestApp::new();
    let intent = reserve(&app, "u1", "e1", &["R1C1", "R1C2"], "intent-key-p2").await;

    let request = CommitRequest {
        idempotency_key: "order-key-p2".to_string(),
        intent_id: intent,
        event_id: "e1".to_string(),
        seat_ids: vec!["R1C1".to_string(), "R1C2".to_string()],
        user_id: "u1".to_string(),
    };
    app.backends
        .queue
        .send(commit_message(&request, "g-1", "delivery-1"))
        .await
        .unwrap();
    app.backends
        .queue
        .send(commit_message(&request, "g-1", "delivery-2"))
        .await
        .unwrap();

    let report = app.worker.poll_once().await.unwrap();
    assert_eq!(report.received, 2);
    assert_eq!(report.succeeded, 2);

    assert_eq!(app.ledger.item_count().await, 2);
    assert_eq!(app.locks.live_count().await, 0);

    let status = app.get("/confirm/status?idem=order-key-p2").await;
    assert_eq!(status.body["order"]["status"], "CONFIRMED");
    assert_eq!(status.body["order"]["total"], 20_000);
}

#[tokio::test]
async fn test_duplicate_commit_requests_create_one_order() {
    let app = TestApp::new();
    let intent = reserve(&app, "u1", "e1", &["R3C1"], "intent-key-p3").await;

    for _ in 0..2 {
        let resp = app.commit("order-key-p3", &intent, "u1", "e1", &["R3C1"]).await;
        assert_eq!(resp.status, StatusCode::ACCEPTED);
    }
    app.drain_worker().await;

    assert_eq!(app.ledger.item_count().await, 1);
    let status = app.get("/confirm/status?idem=order-key-p3").await;
    assert_eq!(status.body["order"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_group_order_holds_after_failure() {
    let app = TestApp::new();
    let token = app.enter("u1", "e1").await;
    assert_eq!(app.hold(&token, "e1", "B1").await.status, StatusCode::OK);

    let first = CommitRequest {
        idempotency_key: "order-key-a".to_string(),
        intent_id: "pi_a".to_string(),
        event_id: "e1".to_string(),
        seat_ids: vec!["A1".to_string()],
        user_id: "u1".to_string(),
    };
    let second = CommitRequest {
        idempotency_key: "order-key-b".to_string(),
        intent_id: "pi_b".to_string(),
        event_id: "e1".to_string(),
        seat_ids: vec!["B1".to_string()],
        user_id: "u1".to_string(),
    };
    for request in [&first, &second] {
        app.backends
            .queue
            .send(commit_message(request, "shared", &request.idempotency_key))
            .await
            .unwrap();
    }

    // A has no hold yet, so B must wait behind it.
    let report = app.worker.poll_once().await.unwrap();
    assert_eq!(report.retried, 1);
    assert_eq!(report.deferred, 1);
    let status = app.get("/confirm/status?idem=order-key-b").await;
    assert!(status.body["order"].is_null());

    assert_eq!(app.hold(&token, "e1", "A1").await.status, StatusCode::OK);
    tokio::time::advance(Duration::from_secs(61)).await;

    let report = app.worker.poll_once().await.unwrap();
    assert_eq!(report.received, 2);
    assert_eq!(report.succeeded, 2);

    let a = app.get("/confirm/status?idem=order-key-a").await;
    let b = app.get("/confirm/status?idem=order-key-b").await;
    assert_eq!(a.body["order"]["status"], "CONFIRMED");
    assert_eq!(b.body["order"]["status"], "CONFIRMED");
}

#[tokio::test(start_paused = true)]
async fn test_commit_without_hold_is_dead_lettered() {
    let app = TestApp::new();
    let resp = app.commit("order-key-p4", "pi_x", "u1", "e1", &["R4C4"]).await;
    assert_eq!(resp.status, StatusCode::ACCEPTED);

    let report = app.worker.poll_once().await.unwrap();
    assert_eq!(report.retried, 1);

    tokio::time::advance(Duration::from_secs(6)).await;
    let report = app.worker.poll_once().await.unwrap();
    assert_eq!(report.retried, 1);

    tokio::time::advance(Duration::from_secs(11)).await;
    let report = app.worker.poll_once().await.unwrap();
    assert_eq!(report.poisoned, 1);

    let dead = app.queue.dead_letters().await;
    assert_eq!(dead.len(), 1);
    assert!(dead[0].reason.contains("LockMissing"));

    let status = app.get("/confirm/status?idem=order-key-p4").await;
    assert!(status.body["order"].is_null());
}

#[tokio::test]
async fn test_payment_callback_links_order() {
    let app = TestApp::new();
    let intent = reserve(&app, "u1", "e1", &["R5C5"], "intent-key-p5").await;

    app.commit("order-key-p5", &intent, "u1", "e1", &["R5C5"]).await;
    app.drain_worker().await;

    let resp = app
        .post(
            "/confirm/payment-callback",
            json!({ "intentId": intent, "status": "APPROVED", "amount": 10000, "txnId": "txn-1" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    app.drain_worker().await;

    let status = app.get("/confirm/status?idem=order-key-p5").await;
    let payment = &status.body["payment"];
    assert_eq!(payment["intentId"], intent.as_str());
    assert_eq!(payment["status"], "APPROVED");
    assert_eq!(payment["orderId"], "order-key-p5");
    assert_eq!(payment["txnId"], "txn-1");
}

#[tokio::test(start_paused = true)]
async fn test_payment_gate_waits_for_approval() {
    let mut config = test_config();
    config.worker.require_payment_approval = true;
    let app = TestApp::with_config(config);
    let intent = reserve(&app, "u1", "e1", &["R6C6"], "intent-key-p6").await;

    app.commit("order-key-p6", &intent, "u1", "e1", &["R6C6"]).await;
    let report = app.worker.poll_once().await.unwrap();
    assert_eq!(report.retried, 1);
    assert_eq!(app.locks.live_count().await, 1);

    app.post(
        "/confirm/payment-callback",
        json!({ "intentId": intent, "status": "APPROVED" }),
    )
    .await;
    let report = app.worker.poll_once().await.unwrap();
    assert_eq!(report.succeeded, 1);

    tokio::time::advance(Duration::from_secs(6)).await;
    app.drain_worker().await;

    let status = app.get("/confirm/status?idem=order-key-p6").await;
    assert_eq!(status.body["order"]["status"], "CONFIRMED");
    assert_eq!(app.locks.live_count().await, 0);
}
