// HTTP client adapter: URL building, headers, status handling and throttling retry
mod common;

use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use common::{client, FakeTransport, BASE_URL};
use spacetraders_graph::{ErrorKind, ProxyError, Session};

#[tokio::test]
async fn undefined_query_params_are_dropped() {
    let transport = FakeTransport::new();
    transport.ok(Method::GET, "/systems", json!({"data": [], "meta": {"total": 0, "page": 1, "limit": 10}}));
    let client = client(&transport, Arc::new(Session::new()));

    client
        .get("/systems", &[("page", Some("2".to_string())), ("traits", None), ("limit", Some("5".to_string()))])
        .await
        .unwrap();

    let url = transport.requests()[0].url.to_string();
    assert_eq!(url, format!("{}/systems?page=2&limit=5", BASE_URL));
    assert!(!url.contains("traits"));
}

#[tokio::test]
async fn no_question_mark_without_defined_params() {
    let transport = FakeTransport::new();
    let client = client(&transport, Arc::new(Session::new()));
    let url = client.build_url("/my/agent", &[("page", None)]).unwrap();
    assert_eq!(url.as_str(), format!("{}/my/agent", BASE_URL));
}

#[tokio::test]
async fn json_headers_always_and_bearer_only_with_a_credential() {
    let transport = FakeTransport::new();
    transport.ok(Method::GET, "/my/agent", json!({"data": {"symbol": "AGENT"}}));

    let anonymous = client(&transport, Arc::new(Session::new()));
    anonymous.get("/my/agent", &[]).await.unwrap();

    let authed = client(&transport, Arc::new(Session::with_token("abc123")));
    authed.get("/my/agent", &[]).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].headers["content-type"], "application/json");
    assert_eq!(requests[0].headers["accept"], "application/json");
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(requests[1].headers["authorization"], "Bearer abc123");
}

#[tokio::test]
async fn no_content_becomes_an_empty_object() {
    let transport = FakeTransport::new();
    transport.respond(Method::GET, "/my/ships/S-1/cooldown", 204, serde_json::Value::Null);
    let client = client(&transport, Arc::new(Session::new()));

    let value = client.get("/my/ships/S-1/cooldown", &[]).await.unwrap();
    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn error_statuses_are_classified() {
    let transport = FakeTransport::new();
    transport.respond(Method::POST, "/my/ships/S-1/dock", 400, json!({"error": {"message": "in transit"}}));
    let client = client(&transport, Arc::new(Session::new()));

    let err = client.post("/my/ships/S-1/dock", None).await.unwrap_err();
    match err {
        ProxyError::Api { kind, status, message } => {
            assert_eq!(kind, ErrorKind::Invalid);
            assert_eq!(status, 400);
            assert!(message.contains("in transit"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // not retried
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn throttled_requests_are_retried_with_the_same_request() {
    let transport = FakeTransport::new();
    transport.respond(Method::POST, "/my/ships/S-1/sell", 429, json!({"error": {"message": "slow down"}}));
    transport.respond(Method::POST, "/my/ships/S-1/sell", 429, json!({"error": {"message": "slow down"}}));
    transport.ok(Method::POST, "/my/ships/S-1/sell", json!({"data": {"sold": true}}));
    let client = client(&transport, Arc::new(Session::with_token("t")));

    let start = tokio::time::Instant::now();
    let value = client
        .post("/my/ships/S-1/sell", Some(&json!({"symbol": "IRON_ORE", "units": 3})))
        .await
        .unwrap();
    assert_eq!(value, json!({"data": {"sold": true}}));

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    for request in &requests {
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, requests[0].url);
        assert_eq!(request.body, requests[0].body);
    }
    // 0.5 + 1.4^0, then 0.5 + 1.4^1
    assert!(start.elapsed() >= Duration::from_secs_f64(1.5 + 1.9));
}

#[tokio::test(start_paused = true)]
async fn throttling_gives_up_after_five_retries() {
    let transport = FakeTransport::new();
    transport.respond(Method::GET, "/my/agent", 429, json!({"error": {"message": "slow down"}}));
    let client = client(&transport, Arc::new(Session::new()));

    let err = client.get("/my/agent", &[]).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Throttled));
    assert_eq!(err.status(), Some(429));
    // the original request plus five retries
    assert_eq!(transport.request_count(), 6);
}

#[tokio::test(start_paused = true)]
async fn request_timeouts_count_as_throttling() {
    let transport = FakeTransport::new();
    transport.respond(Method::GET, "/my/agent", 408, json!({}));
    transport.ok(Method::GET, "/my/agent", json!({"data": {"symbol": "AGENT"}}));
    let client = client(&transport, Arc::new(Session::new()));

    client.get("/my/agent", &[]).await.unwrap();
    assert_eq!(transport.request_count(), 2);
}
