use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use super::common::*;
use crate::shop::menu::MenuCatalog;
use crate::shop::router::{login_handler, orders_handler, storefront_router, LoginRequest};
use crate::shop::StorefrontService;

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(payload) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&payload).expect("serializable"))
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).expect("request builds"))
        .await
        .expect("route executes");
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, Value::Null);
    }
    (status, read_json_body(response).await)
}

async fn open_session(router: &Router) -> String {
    let (status, body) = call(
        router,
        Method::POST,
        "/api/v1/sessions",
        Some(json!({ "username": "admin", "password": "adminpassword" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"]
        .as_str()
        .expect("session id returned")
        .to_string()
}

#[tokio::test]
async fn login_handler_rejects_bad_credentials() {
    let (service, _) = build_service();
    let response = login_handler(
        State(service),
        axum::Json(LoginRequest {
            username: "admin".to_string(),
            password: "guess".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "invalid username or password");
}

#[tokio::test]
async fn orders_handler_returns_not_found_for_unknown_session() {
    let (service, _) = build_service();
    let response = orders_handler(State(service), Path("sess-missing".to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_reports_phase_and_disabled_notification() {
    let (service, _) = build_service();
    let router = storefront_router(service);
    let (status, body) = call(
        &router,
        Method::POST,
        "/api/v1/sessions",
        Some(json!({ "username": "admin", "password": "adminpassword" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["phase"], "browsing");
    assert_eq!(body["notification"], "disabled");
}

#[tokio::test]
async fn browse_select_and_checkout_over_http() {
    let (service, _) = build_service();
    let router = storefront_router(service);
    let session = open_session(&router).await;
    let base = format!("/api/v1/sessions/{session}");

    let (status, listing) = call(
        &router,
        Method::PUT,
        &format!("{base}/filters"),
        Some(json!({ "price_tier": "€€", "sort": "rating" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["restaurants"][0]["name"], "Trattoria Roma");

    let (status, view) = call(
        &router,
        Method::PUT,
        &format!("{base}/restaurant"),
        Some(json!({ "restaurant_id": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["restaurant"]["id"], 5);
    assert!(view["menu"]["sections"].as_array().is_some_and(|s| !s.is_empty()));

    let (status, _) = call(
        &router,
        Method::POST,
        &format!("{base}/checkout"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    for name in ["Classic Burger", "Chicken Curry"] {
        let (status, _) = call(
            &router,
            Method::POST,
            &format!("{base}/cart/items"),
            Some(json!({ "category": "Mains", "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, cart) = call(&router, Method::GET, &format!("{base}/cart"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["subtotal"], "26.40");
    assert_eq!(cart["delivery_fee"], "0");
    assert_eq!(cart["total"], "26.40");

    let (status, _) = call(
        &router,
        Method::PUT,
        &format!("{base}/delivery"),
        Some(json!({ "address": "1 Canal Street", "mode": "delivery" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, order) = call(&router, Method::POST, &format!("{base}/checkout"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "in_preparation");
    assert_eq!(order["total"], "26.40");
    assert_eq!(order["delivery_address"], "1 Canal Street");

    let (_, orders) = call(&router, Method::GET, &format!("{base}/orders"), None).await;
    assert_eq!(orders.as_array().map(Vec::len), Some(1));
    let (_, cart) = call(&router, Method::GET, &format!("{base}/cart"), None).await;
    assert_eq!(cart["entries"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn cart_errors_map_to_client_statuses() {
    let (service, _) = build_service();
    let router = storefront_router(service);
    let session = open_session(&router).await;
    let base = format!("/api/v1/sessions/{session}");

    let (status, _) = call(
        &router,
        Method::POST,
        &format!("{base}/cart/items"),
        Some(json!({ "category": "Mains", "name": "Classic Burger" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &router,
        Method::DELETE,
        &format!("{base}/cart/items/0"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &router,
        Method::PUT,
        &format!("{base}/restaurant"),
        Some(json!({ "restaurant_id": 99 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let (service, _) = build_service();
    let router = storefront_router(service);
    let session = open_session(&router).await;

    let (status, _) = call(
        &router,
        Method::DELETE,
        &format!("/api/v1/sessions/{session}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(
        &router,
        Method::GET,
        &format!("/api/v1/sessions/{session}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn facets_and_reload_are_session_free() {
    let service = Arc::new(StorefrontService::new(
        shared_catalog(),
        Arc::new(MenuCatalog::default()),
        Arc::new(InMemorySessionStore::default()),
        credentials(),
    ));
    let router = storefront_router(service);

    let (status, facets) = call(&router, Method::GET, "/api/v1/catalog/facets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(facets["categories"][0], "All");

    // The fixture path does not exist on disk, so a reload swaps in an empty catalog.
    let (status, reloaded) = call(&router, Method::POST, "/api/v1/catalog/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reloaded["restaurants"], 0);
    assert!(reloaded["warning"].is_string());
}
