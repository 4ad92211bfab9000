//! Waiting room, hold, release, and summary integration tests.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tokio::task::JoinSet;

use helpers::TestApp;

#[tokio::test]
async fn test_enter_issues_live_token() {
    let app = TestApp::new();
    let token = app.enter("u1", "e1").await;
    assert_eq!(token.len(), 32);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

    let resp = app.get(&format!("/public/room-status?token={token}")).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["ready"], true);
    let left = resp.body["leftSec"].as_u64().unwrap();
    assert!((170..=180).contains(&left), "leftSec was {left}");
}

#[tokio::test]
async fn test_enter_rejects_missing_fields() {
    let app = TestApp::new();
    let resp = app.post("/public/enter", json!({ "userId": "u1" })).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_code(), "bad_request");
}

#[tokio::test]
async fn test_room_status_for_unknown_token() {
    let app = TestApp::new();
    let resp = app.get("/public/room-status?token=nope").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["ready"], false);
    assert_eq!(resp.body["leftSec"], 0);

    let resp = app.get("/public/room-status").await;
    assert_eq!(resp.body["ready"], false);
}

#[tokio::test]
async fn test_hold_release_scenario() {
    let app = TestApp::new();
    let token = app.enter("u1", "e1").await;
    let other = app.enter("u2", "e1").await;

    let resp = app.hold(&token, "e1", "R1C1").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["holdId"], "e1:R1C1");
    assert!(resp.body["expiresAt"].as_str().is_some());

    let resp = app.hold(&other, "e1", "R1C1").await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(resp.error_code(), "seat_already_held_or_sold");

    let resp = app
        .post("/public/release", json!({ "eventId": "e1", "seatId": "R1C1" }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["released"], true);

    let resp = app
        .post("/public/release", json!({ "eventId": "e1", "seatId": "R1C1" }))
        .await;
    assert_eq!(resp.body["released"], false);

    let resp = app.hold(&other, "e1", "R1C1").await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_hold_error_precedence() {
    let app = TestApp::new();

    // No token wins over a missing body.
    let resp = app
        .request(Method::POST, "/public/hold", Some(json!({})), &[])
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    // A dead token wins over missing ids.
    let resp = app.hold("deadbeef", "", "").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error_code(), "room_expired");

    let token = app.enter("u1", "e1").await;
    let resp = app.hold(&token, "e1", "").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_code(), "bad_request");
}

#[tokio::test]
async fn test_release_without_ids_releases_nothing() {
    let app = TestApp::new();
    let resp = app.post("/public/release", json!({ "eventId": "e1" })).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["released"], false);
}

#[tokio::test]
async fn test_concurrent_holds_have_one_winner() {
    let app = Arc::new(TestApp::new());
    let mut tokens = Vec::new();
    for i in 0..20 {
        tokens.push(app.enter(&format!("u{i}"), "e1").await);
    }

    let mut set = JoinSet::new();
    for token in tokens {
        let app = Arc::clone(&app);
        set.spawn(async move { app.hold(&token, "e1", "R9C9").await.status });
    }

    let mut ok = 0;
    let mut conflict = 0;
    while let Some(status) = set.join_next().await {
        match status.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflict += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(conflict, 19);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_hold_is_reclaimed_after_ttl() {
    let app = TestApp::new();
    let token = app.enter("u1", "e1").await;
    assert_eq!(app.hold(&token, "e1", "R2C2").await.status, StatusCode::OK);
    assert_eq!(app.locks.live_count().await, 1);

    tokio::time::advance(Duration::from_secs(121)).await;
    assert_eq!(app.locks.live_count().await, 0);

    let other = app.enter("u2", "e1").await;
    assert_eq!(app.hold(&other, "e1", "R2C2").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_seat_summary() {
    let app = TestApp::new();
    let resp = app.get("/public/events/e1/sections/A/summary").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["event"], "e1");
    assert_eq!(resp.body["section"], "A");
    assert_eq!(resp.body["seatsAvailable"], 1000);
    assert!(resp.body["updatedAt"].as_str().is_some());

    let again = app.get("/public/events/e1/sections/A/summary").await;
    assert_eq!(again.body["updatedAt"], resp.body["updatedAt"]);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    for path in ["/public/health", "/confirm/health"] {
        let resp = app.get(path).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["ok"], true);
        assert!(resp.body["ts"].is_number());
    }

    let resp = app.get("/health/detailed").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["cache"], true);
    assert_eq!(resp.body["lockStore"], true);
    assert_eq!(resp.body["queue"], true);
    assert_eq!(resp.body["database"], true);
}
