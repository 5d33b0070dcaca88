mod common;

use common::{fast_config, refused_url, FlakyServer, HangingServer, ResetServer};
use course_portal_client::domain::model::{Course, Empty};
use course_portal_client::utils::error::TIMEOUT_MESSAGE;
use course_portal_client::{ApiError, RequestOptions, ResilientClient};
use httpmock::prelude::*;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_json_response_is_parsed() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/courses/5");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"id": 5, "title": "Rust 101", "body": "Ownership"}));
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 2)).unwrap();
    let course: Course = client.get("/courses/5").await.unwrap();

    api_mock.assert();
    assert_eq!(course.id, 5);
    assert_eq!(course.title, "Rust 101");
}

#[tokio::test]
async fn test_json_content_type_with_charset_is_parsed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/ping");
        then.status(200)
            .header("content-type", "application/json;charset=UTF-8")
            .body(r#"{"ok":true}"#);
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 1)).unwrap();
    let body: Value = client.get("/ping").await.unwrap();

    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_non_json_response_resolves_to_empty_object() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/status");
        then.status(200)
            .header("content-type", "text/plain")
            .body("all good");
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 1)).unwrap();
    let body: Value = client.get("/status").await.unwrap();

    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_delete_with_204_resolves_to_empty() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/courses/5");
        then.status(204);
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 2)).unwrap();
    let result: Empty = client.delete("/courses/5").await.unwrap();

    api_mock.assert();
    assert_eq!(result, Empty::default());
}

#[tokio::test]
async fn test_http_error_uses_json_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/courses");
        then.status(400)
            .header("content-type", "application/json")
            .json_body(json!({"message": "Course title already taken", "status": 400}));
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 2)).unwrap();
    let err = client
        .post::<Course, _>("/courses", &json!({"title": "dup", "body": ""}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Course title already taken");
}

#[tokio::test]
async fn test_http_error_uses_json_error_field() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/courses/99");
        then.status(404)
            .header("content-type", "application/json")
            .json_body(json!({"error": "Not Found", "path": "/api/courses/99"}));
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 2)).unwrap();
    let err = client.get::<Course>("/courses/99").await.unwrap_err();

    match err {
        ApiError::Http { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_error_falls_back_to_raw_text() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/courses");
        then.status(500).body("java.lang.NullPointerException");
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 2)).unwrap();
    let err = client.get::<Vec<Course>>("/courses").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "java.lang.NullPointerException");
}

#[tokio::test]
async fn test_http_error_without_body_uses_status_line() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/courses");
        then.status(503);
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 2)).unwrap();
    let err = client.get::<Vec<Course>>("/courses").await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
}

#[tokio::test]
async fn test_http_error_is_never_retried() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/courses");
        then.status(502).body("bad gateway");
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 5)).unwrap();
    let err = client.get::<Vec<Course>>("/courses").await.unwrap_err();

    assert!(!err.is_retryable());
    api_mock.assert_hits(1);
}

#[tokio::test]
async fn test_malformed_success_body_is_a_decode_error() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/courses/1");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([1, 2, 3]));
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 3)).unwrap();
    let err = client.get::<Course>("/courses/1").await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }));
    api_mock.assert_hits(1);
}

#[tokio::test]
async fn test_default_content_type_and_caller_headers_on_the_wire() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/content/3/answer")
            .header("content-type", "application/json")
            .header("authorization", "Bearer token-123")
            .json_body(json!({"answer": "blue"}));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"accepted": true}));
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 1)).unwrap();
    let options = RequestOptions::new(Method::POST)
        .header("Authorization", "Bearer token-123")
        .unwrap()
        .json(&json!({"answer": "blue"}))
        .unwrap();
    let body: Value = client.request("/content/3/answer", options).await.unwrap();

    api_mock.assert();
    assert_eq!(body["accepted"], json!(true));
}

#[tokio::test]
async fn test_caller_content_type_wins() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/notes")
            .header("content-type", "text/plain")
            .body("raw note");
        then.status(204);
    });

    let client = ResilientClient::new(&fast_config(server.url("/api"), 1)).unwrap();
    let mut options = RequestOptions::new(Method::PUT)
        .header("Content-Type", "text/plain")
        .unwrap();
    options.body = Some("raw note".to_string());
    let _: Empty = client.request("/notes", options).await.unwrap();

    api_mock.assert();
}

#[tokio::test]
async fn test_persistent_network_failure_uses_every_attempt() {
    let server = ResetServer::start().await;
    let client = ResilientClient::new(
        &fast_config(server.url.clone(), 3).with_retry_delay(Duration::from_millis(50)),
    )
    .unwrap();

    let started = Instant::now();
    let err = client.get::<Value>("/courses").await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, ApiError::Network { .. }), "got {:?}", err);
    assert!(err.to_string().starts_with("Network error: "));
    assert_eq!(server.hits(), 3);
    // 50ms after attempt 1, 100ms after attempt 2
    assert!(elapsed >= Duration::from_millis(150), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_refused_connection_stops_at_attempt_ceiling() {
    let client = ResilientClient::new(&fast_config(refused_url().await, 2)).unwrap();

    let started = Instant::now();
    let err = client.get::<Value>("/courses").await.unwrap_err();

    assert!(matches!(err, ApiError::Network { .. }), "got {:?}", err);
    assert_eq!(err.status(), None);
    // one backoff of 10ms × 1 between the two attempts, no third wait
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(10));
    assert!(elapsed < Duration::from_secs(2), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_single_attempt_budget_never_retries() {
    let server = ResetServer::start().await;
    let client = ResilientClient::new(&fast_config(server.url.clone(), 1)).unwrap();

    let err = client.get::<Value>("/courses").await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_request_with_attempt_counts_spent_attempts() {
    let server = ResetServer::start().await;
    let client = ResilientClient::new(&fast_config(server.url.clone(), 3)).unwrap();

    let err = client
        .request_with_attempt::<Value>("/courses", RequestOptions::new(Method::GET), 2)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network { .. }));
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn test_timeout_is_reported_distinctly() {
    let server = HangingServer::start().await;
    let client = ResilientClient::new(
        &fast_config(server.url.clone(), 1).with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let started = Instant::now();
    let err = client.get::<Value>("/courses").await.unwrap_err();

    assert!(err.is_timeout(), "got {:?}", err);
    assert_eq!(err.to_string(), TIMEOUT_MESSAGE);
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_timeout_shares_the_retry_budget() {
    let server = HangingServer::start().await;
    let client = ResilientClient::new(
        &fast_config(server.url.clone(), 2).with_timeout(Duration::from_millis(150)),
    )
    .unwrap();

    let err = client.get::<Value>("/courses").await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout));
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn test_recovers_when_a_later_attempt_succeeds() {
    let server = FlakyServer::start(1, "[]").await;
    let client = ResilientClient::new(&fast_config(server.url.clone(), 2)).unwrap();

    let courses: Vec<Course> = client.get("/courses").await.unwrap();

    assert!(courses.is_empty());
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn test_two_failures_with_two_attempts_never_reach_a_third() {
    let server = FlakyServer::start(2, "[]").await;
    let client = ResilientClient::new(&fast_config(server.url.clone(), 2)).unwrap();

    let err = client.get::<Vec<Course>>("/courses").await.unwrap_err();

    assert!(matches!(err, ApiError::Network { .. }));
    assert_eq!(server.hits(), 2);
}
