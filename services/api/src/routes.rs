use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use storefront::shop::{storefront_router, SessionStore, StorefrontService};

pub(crate) fn with_storefront_routes<S>(service: Arc<StorefrontService<S>>) -> axum::Router
where
    S: SessionStore + 'static,
{
    storefront_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::io::Cursor;
    use storefront::config::AuthConfig;
    use storefront::shop::{
        CredentialCheck, InMemorySessionStore, MenuCatalog, RestaurantCatalog, SharedCatalog,
    };
    use tower::ServiceExt;

    fn service() -> Arc<StorefrontService<InMemorySessionStore>> {
        let csv = "id,name,rating,price,categories_list,image_url\n\
1,Pho Saigon,4.3,€,['Vietnamese'],\n";
        let catalog = RestaurantCatalog::from_reader(Cursor::new(csv), 3).expect("parses");
        Arc::new(StorefrontService::new(
            Arc::new(SharedCatalog::preloaded("data/restaurants.csv", catalog)),
            Arc::new(MenuCatalog::default()),
            Arc::new(InMemorySessionStore::default()),
            CredentialCheck::new(AuthConfig {
                username: "admin".to_string(),
                password: "adminpassword".to_string(),
            }),
        ))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn storefront_routes_are_mounted_alongside_health() {
        let router = with_storefront_routes(service());

        let response = router
            .clone()
            .oneshot(
                Request::get("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::get("/api/v1/catalog/facets")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(payload["categories"][1], "Vietnamese");
    }
}
