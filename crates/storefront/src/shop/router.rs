use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::auth::AuthError;
use super::cart::CartError;
use super::catalog::RestaurantId;
use super::order::CheckoutError;
use super::repository::{SessionId, SessionStore, StoreError};
use super::service::{StorefrontError, StorefrontService};
use super::session::{DeliveryMode, FilterUpdate, SessionError};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRestaurantRequest {
    pub restaurant_id: RestaurantId,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub category: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeliveryRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub mode: Option<DeliveryMode>,
}

/// Router builder exposing the storefront queries and commands.
pub fn storefront_router<S>(service: Arc<StorefrontService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/sessions", post(login_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id",
            get(session_handler::<S>).delete(logout_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/restaurants",
            get(restaurants_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/filters",
            put(filters_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/restaurant",
            put(select_handler::<S>).delete(back_handler::<S>),
        )
        .route("/api/v1/sessions/:session_id/menu", get(menu_handler::<S>))
        .route("/api/v1/sessions/:session_id/cart", get(cart_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id/cart/items",
            post(add_item_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/cart/items/:position",
            delete(remove_item_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/delivery",
            put(delivery_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/checkout",
            post(checkout_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/orders",
            get(orders_handler::<S>),
        )
        .route("/api/v1/catalog/facets", get(facets_handler::<S>))
        .route("/api/v1/catalog/reload", post(reload_handler::<S>))
        .with_state(service)
}

type ServiceState<S> = State<Arc<StorefrontService<S>>>;

pub(crate) async fn login_handler<S>(
    State(service): ServiceState<S>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.login(&request.username, &request.password) {
        Ok(outcome) => {
            let notification = match outcome.notification {
                Some(_) => "dispatched",
                None => "disabled",
            };
            let payload = json!({
                "session_id": outcome.session_id,
                "username": outcome.summary.username,
                "phase": outcome.summary.phase,
                "notification": notification,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn logout_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.logout(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    respond(service.session(&SessionId(session_id)))
}

pub(crate) async fn restaurants_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    respond(service.restaurants(&SessionId(session_id)))
}

pub(crate) async fn filters_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
    Json(update): Json<FilterUpdate>,
) -> Response
where
    S: SessionStore + 'static,
{
    respond(service.update_filters(&SessionId(session_id), update))
}

pub(crate) async fn select_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
    Json(request): Json<SelectRestaurantRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    respond(service.select_restaurant(&SessionId(session_id), request.restaurant_id))
}

pub(crate) async fn back_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    respond(service.back(&SessionId(session_id)))
}

pub(crate) async fn menu_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    respond(service.menu(&SessionId(session_id)))
}

pub(crate) async fn cart_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    respond(service.cart(&SessionId(session_id)))
}

pub(crate) async fn add_item_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
    Json(request): Json<AddItemRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    respond(service.add_item(&SessionId(session_id), &request.category, &request.name))
}

pub(crate) async fn remove_item_handler<S>(
    State(service): ServiceState<S>,
    Path((session_id, position)): Path<(String, usize)>,
) -> Response
where
    S: SessionStore + 'static,
{
    respond(service.remove_item(&SessionId(session_id), position))
}

pub(crate) async fn delivery_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
    Json(request): Json<DeliveryRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    respond(service.set_delivery(&SessionId(session_id), request.address, request.mode))
}

pub(crate) async fn checkout_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.checkout(&SessionId(session_id)) {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn orders_handler<S>(
    State(service): ServiceState<S>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    respond(service.orders(&SessionId(session_id)))
}

pub(crate) async fn facets_handler<S>(State(service): ServiceState<S>) -> Response
where
    S: SessionStore + 'static,
{
    (StatusCode::OK, Json(service.facets())).into_response()
}

pub(crate) async fn reload_handler<S>(State(service): ServiceState<S>) -> Response
where
    S: SessionStore + 'static,
{
    (StatusCode::OK, Json(service.reload_catalog())).into_response()
}

fn respond<T: serde::Serialize>(result: Result<T, StorefrontError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_status(err: &StorefrontError) -> StatusCode {
    match err {
        StorefrontError::Session(SessionError::Auth(AuthError::InvalidCredentials))
        | StorefrontError::Session(SessionError::NotLoggedIn) => StatusCode::UNAUTHORIZED,
        StorefrontError::SessionNotFound
        | StorefrontError::UnknownRestaurant(_)
        | StorefrontError::UnknownMenuItem { .. } => StatusCode::NOT_FOUND,
        StorefrontError::Session(SessionError::NoRestaurantSelected) => StatusCode::CONFLICT,
        StorefrontError::Session(SessionError::Cart(CartError::IndexOutOfRange { .. })) => {
            StatusCode::BAD_REQUEST
        }
        StorefrontError::Session(SessionError::Checkout(
            CheckoutError::EmptyCart | CheckoutError::MissingAddress,
        )) => StatusCode::UNPROCESSABLE_ENTITY,
        StorefrontError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        StorefrontError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        StorefrontError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: StorefrontError) -> Response {
    let status = error_status(&err);
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
