// Read side of the graph: lazy nodes, pages, caches and conditional facilities
mod common;

use reqwest::Method;
use serde_json::json;

use common::{proxy, FakeTransport};
use spacetraders_graph::{execute_str, ProxyError};

fn page(data: serde_json::Value, total: u32, page: u32, limit: u32) -> serde_json::Value {
    json!({ "data": data, "meta": { "total": total, "page": page, "limit": limit } })
}

#[tokio::test]
async fn system_symbol_only_needs_no_request() {
    let transport = FakeTransport::new();
    let proxy = proxy(&transport);

    let data = execute_str(&proxy, r#"{ system(symbol: "X1-AB12") { symbol } }"#).await.unwrap();
    assert_eq!(data, json!({"system": {"symbol": "X1-AB12"}}));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn system_fields_beyond_the_symbol_fetch_once() {
    let transport = FakeTransport::new();
    transport.ok(
        Method::GET,
        "/systems/X1-AB12",
        json!({"data": {"symbol": "X1-AB12", "type": "RED_STAR", "x": 4, "y": -2, "waypoints": [], "factions": []}}),
    );
    let proxy = proxy(&transport);

    let data = execute_str(&proxy, r#"{ system(symbol: "X1-AB12") { symbol type x __typename } }"#)
        .await
        .unwrap();
    assert_eq!(
        data,
        json!({"system": {"symbol": "X1-AB12", "type": "RED_STAR", "x": 4, "__typename": "System"}})
    );
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn pages_expose_the_next_request() {
    let transport = FakeTransport::new();
    transport.ok(
        Method::GET,
        "/my/ships",
        page(json!([{"symbol": "S-1"}, {"symbol": "S-2"}]), 3, 1, 2),
    );
    let proxy = proxy(&transport);

    let data = execute_str(&proxy, "{ ships(page: 1, limit: 2) { items { symbol } next { page limit } } }")
        .await
        .unwrap();
    assert_eq!(
        data,
        json!({"ships": {
            "items": [{"symbol": "S-1"}, {"symbol": "S-2"}],
            "next": {"page": 2, "limit": 2}
        }})
    );
    let url = transport.requests()[0].url.to_string();
    assert!(url.ends_with("/my/ships?page=1&limit=2"), "{url}");
}

#[tokio::test]
async fn last_page_has_no_next() {
    let transport = FakeTransport::new();
    transport.ok(Method::GET, "/factions", page(json!([{"symbol": "COSMIC"}]), 20, 2, 10));
    let proxy = proxy(&transport);

    let data = execute_str(&proxy, "{ factions(page: 2) { items { symbol } next { page } } }")
        .await
        .unwrap();
    assert_eq!(data["factions"]["next"], serde_json::Value::Null);
}

#[tokio::test]
async fn market_with_transactions_is_served_from_cache() {
    let transport = FakeTransport::new();
    transport.ok(
        Method::GET,
        "/systems/X1-DF55/waypoints/X1-DF55-A1/market",
        json!({"data": {"symbol": "X1-DF55-A1", "exports": [], "transactions": [{"units": 1}]}}),
    );
    let proxy = proxy(&transport);
    let query = r#"{ market(symbol: "X1-DF55-A1") { symbol transactions { units } } }"#;

    let first = execute_str(&proxy, query).await.unwrap();
    let second = execute_str(&proxy, query).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first["market"]["transactions"], json!([{"units": 1}]));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn market_without_transactions_is_refetched() {
    let transport = FakeTransport::new();
    transport.ok(
        Method::GET,
        "/systems/X1-DF55/waypoints/X1-DF55-A1/market",
        json!({"data": {"symbol": "X1-DF55-A1", "exports": []}}),
    );
    let proxy = proxy(&transport);
    let query = r#"{ market(symbol: "X1-DF55-A1") { symbol } }"#;

    execute_str(&proxy, query).await.unwrap();
    execute_str(&proxy, query).await.unwrap();
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn jump_gate_is_cached_after_any_success() {
    let transport = FakeTransport::new();
    transport.ok(
        Method::GET,
        "/systems/X1-DF55/waypoints/X1-DF55-JG/jump-gate",
        json!({"data": {"symbol": "X1-DF55-JG", "connections": ["X1-ZZ9"]}}),
    );
    let proxy = proxy(&transport);
    let query = r#"{ jumpGate(symbol: "X1-DF55-JG") { connections } }"#;

    execute_str(&proxy, query).await.unwrap();
    let data = execute_str(&proxy, query).await.unwrap();
    assert_eq!(data, json!({"jumpGate": {"connections": ["X1-ZZ9"]}}));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn not_found_markets_and_gates_are_null_but_server_errors_raise() {
    let transport = FakeTransport::new();
    transport.respond(
        Method::GET,
        "/systems/X1-DF55/waypoints/X1-DF55-A1/market",
        404,
        json!({"error": {"message": "no market"}}),
    );
    transport.respond(
        Method::GET,
        "/systems/X1-DF55/waypoints/X1-DF55-A1/jump-gate",
        404,
        json!({"error": {"message": "no jump gate"}}),
    );
    transport.respond(
        Method::GET,
        "/systems/X1-DF55/waypoints/X1-DF55-B7/market",
        500,
        json!({"error": {"message": "internal error"}}),
    );
    let proxy = proxy(&transport);

    let data = execute_str(
        &proxy,
        r#"{ market(symbol: "X1-DF55-A1") { symbol } jumpGate(symbol: "X1-DF55-A1") { connections } }"#,
    )
    .await
    .unwrap();
    assert_eq!(data, json!({"market": null, "jumpGate": null}));

    let err = execute_str(&proxy, r#"{ market(symbol: "X1-DF55-B7") { symbol } }"#)
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::Api { status: 500, .. }), "got {:?}", err);
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn missing_facilities_resolve_to_null() {
    let transport = FakeTransport::new();
    transport.respond(
        Method::GET,
        "/systems/X1-DF55/waypoints/X1-DF55-A1/shipyard",
        404,
        json!({"error": {"message": "no shipyard"}}),
    );
    transport.respond(
        Method::GET,
        "/systems/X1-DF55/waypoints/X1-DF55-A1/jump-gate",
        400,
        json!({"error": {"message": "not a jump gate"}}),
    );
    let proxy = proxy(&transport);

    let data = execute_str(
        &proxy,
        r#"{ waypoint(symbol: "X1-DF55-A1") { symbol shipyard { symbol } jumpGate { connections } } }"#,
    )
    .await
    .unwrap();
    assert_eq!(
        data,
        json!({"waypoint": {"symbol": "X1-DF55-A1", "shipyard": null, "jumpGate": null}})
    );
}

#[tokio::test]
async fn known_traits_rule_out_facilities_without_a_request() {
    let transport = FakeTransport::new();
    transport.ok(
        Method::GET,
        "/systems/X1-DF55/waypoints",
        page(
            json!([{
                "symbol": "X1-DF55-A1",
                "systemSymbol": "X1-DF55",
                "type": "PLANET",
                "traits": [{"symbol": "ROCKY"}]
            }]),
            1,
            1,
            10,
        ),
    );
    let proxy = proxy(&transport);

    let data = execute_str(
        &proxy,
        r#"{ waypoints(system: "X1-DF55") { items { symbol market { symbol } shipyard { symbol } jumpGate { symbol } } } }"#,
    )
    .await
    .unwrap();
    assert_eq!(
        data["waypoints"]["items"][0],
        json!({"symbol": "X1-DF55-A1", "market": null, "shipyard": null, "jumpGate": null})
    );
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn waypoint_filters_are_forwarded_only_when_given() {
    let transport = FakeTransport::new();
    transport.ok(Method::GET, "/systems/X1-DF55/waypoints", page(json!([]), 0, 1, 10));
    let proxy = proxy(&transport);

    execute_str(&proxy, r#"{ waypoints(system: "X1-DF55", traits: "SHIPYARD") { items { symbol } } }"#)
        .await
        .unwrap();
    let url = transport.requests()[0].url.to_string();
    assert!(url.contains("traits=SHIPYARD"));
    assert!(!url.contains("type="));
}

#[tokio::test]
async fn ship_status_and_links_derive_from_nav() {
    let transport = FakeTransport::new();
    transport.ok(
        Method::GET,
        "/my/ships/S-1",
        json!({"data": {
            "symbol": "S-1",
            "nav": {
                "systemSymbol": "X1-DF55",
                "waypointSymbol": "X1-DF55-A1",
                "status": "DOCKED",
                "flightMode": "CRUISE"
            }
        }}),
    );
    let proxy = proxy(&transport);

    let data = execute_str(
        &proxy,
        r#"{ ship(symbol: "S-1") { statusText location { symbol systemSymbol } system { symbol } } }"#,
    )
    .await
    .unwrap();
    assert_eq!(
        data,
        json!({"ship": {
            "statusText": "DOCKED at X1-DF55-A1",
            "location": {"symbol": "X1-DF55-A1", "systemSymbol": "X1-DF55"},
            "system": {"symbol": "X1-DF55"}
        }})
    );
    // the ship is fetched once; its links are stubs
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn agent_headquarters_is_a_waypoint_reference() {
    let transport = FakeTransport::new();
    transport.ok(
        Method::GET,
        "/my/agent",
        json!({"data": {"symbol": "AGENT", "headquarters": "X1-DF55-A1", "credits": 175000, "startingFaction": "COSMIC"}}),
    );
    let proxy = proxy(&transport);

    let data = execute_str(
        &proxy,
        "{ agent { symbol credits headquarters { symbol systemSymbol } startingFaction { symbol } } }",
    )
    .await
    .unwrap();
    assert_eq!(
        data,
        json!({"agent": {
            "symbol": "AGENT",
            "credits": 175000,
            "headquarters": {"symbol": "X1-DF55-A1", "systemSymbol": "X1-DF55"},
            "startingFaction": {"symbol": "COSMIC"}
        }})
    );
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn lookup_turns_text_into_references() {
    let transport = FakeTransport::new();
    let proxy = proxy(&transport);

    let data = execute_str(
        &proxy,
        r#"{
            a: lookup(text: "x1-ab12") { __typename symbol }
            b: lookup(text: "X1-AB12-XYZ") { __typename symbol systemSymbol }
            c: lookup(text: "hello") { symbol }
        }"#,
    )
    .await
    .unwrap();
    assert_eq!(
        data,
        json!({
            "a": [{"__typename": "System", "symbol": "X1-AB12"}],
            "b": [{"__typename": "Waypoint", "symbol": "X1-AB12-XYZ", "systemSymbol": "X1-AB12"}],
            "c": []
        })
    );
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn unknown_root_fields_are_rejected() {
    let transport = FakeTransport::new();
    let proxy = proxy(&transport);

    let err = execute_str(&proxy, "{ planets { symbol } }").await.unwrap_err();
    assert!(matches!(err, ProxyError::InvalidArgument(_)));
}

#[tokio::test]
async fn malformed_documents_fail_to_parse() {
    let transport = FakeTransport::new();
    let proxy = proxy(&transport);

    let err = execute_str(&proxy, "{ agent { symbol }").await.unwrap_err();
    assert!(matches!(err, ProxyError::Parse { .. }));
}
