use std::io::Cursor;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::config::AuthConfig;
use crate::shop::catalog::{Restaurant, RestaurantCatalog, RestaurantId, SharedCatalog};
use crate::shop::menu::{MenuCatalog, MenuItem};
use crate::shop::notify::{LoginEvent, LoginNotifier, NotificationError, NotifyFuture};
use crate::shop::repository::{SessionId, SessionStore, StoreError};
use crate::shop::session::SessionState;
use crate::shop::{CredentialCheck, StorefrontService};

pub(super) use crate::shop::repository::InMemorySessionStore;

pub(super) const CATALOG_CSV: &str = "id,name,rating,price,categories_list,image_url\n\
1,Chez Marcel,4.6,€€€,\"['French', 'Bistro']\",\n\
2,Pizza Nova,4.1,€€,\"['Pizza', 'Italian']\",\n\
3,Sushi Kan,4.8,€€€€,['Japanese'],\n\
4,Burger Shack,3.9,€,\"Burgers, Fast Food\",\n\
5,Trattoria Roma,4.4,€€,\"Italian, Pasta\",\n";

pub(super) const SEED: u64 = 2024;

pub(super) fn catalog() -> RestaurantCatalog {
    RestaurantCatalog::from_reader(Cursor::new(CATALOG_CSV), SEED).expect("fixture parses")
}

pub(super) fn shared_catalog() -> Arc<SharedCatalog> {
    Arc::new(SharedCatalog::preloaded("fixtures/restaurants.csv", catalog()))
}

pub(super) fn restaurant(
    id: u64,
    name: &str,
    rating: f64,
    price: &str,
    categories: &[&str],
    delivery_time: u32,
    delivery_fee: i64,
) -> Restaurant {
    Restaurant {
        id: RestaurantId(id),
        name: name.to_string(),
        rating,
        price: price.to_string(),
        categories: categories.iter().map(|tag| tag.to_string()).collect(),
        delivery_time,
        delivery_fee: Decimal::from(delivery_fee),
        min_order: Decimal::from(15),
        image_url: String::new(),
    }
}

/// Hand-built rows with ties on every sort key.
pub(super) fn restaurants() -> Vec<Restaurant> {
    vec![
        restaurant(1, "Chez Marcel", 4.6, "€€€", &["French", "Bistro"], 30, 3),
        restaurant(2, "Pizza Nova", 4.1, "€€", &["Pizza", "Italian"], 20, 2),
        restaurant(3, "Sushi Kan", 4.8, "€€€€", &["Japanese"], 40, 4),
        restaurant(4, "Burger Shack", 4.1, "€", &["Burgers", "Fast Food"], 20, 1),
        restaurant(5, "Trattoria Roma", 4.4, "€€", &["Italian", "Pasta"], 25, 2),
    ]
}

pub(super) fn ids(restaurants: &[Restaurant]) -> Vec<u64> {
    restaurants.iter().map(|restaurant| restaurant.id.0).collect()
}

pub(super) fn item(name: &str, cents: i64) -> MenuItem {
    MenuItem {
        name: name.to_string(),
        price: Decimal::new(cents, 2),
        description: String::new(),
        image_url: String::new(),
        category: "Mains".to_string(),
    }
}

pub(super) fn credentials() -> CredentialCheck {
    CredentialCheck::new(AuthConfig {
        username: "admin".to_string(),
        password: "adminpassword".to_string(),
    })
}

pub(super) fn logged_in_state() -> SessionState {
    let mut state = SessionState::new();
    state
        .login(&credentials(), "admin", "adminpassword")
        .expect("login succeeds");
    state
}

pub(super) struct UnavailableSessions;

impl SessionStore for UnavailableSessions {
    fn insert(&self, _id: SessionId, _state: SessionState) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionState>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn modify<T, E, F>(&self, _id: &SessionId, _command: F) -> Result<T, E>
    where
        F: FnOnce(&mut SessionState) -> Result<T, E>,
        E: From<StoreError>,
    {
        Err(StoreError::Unavailable("offline".to_string()).into())
    }

    fn remove(&self, _id: &SessionId) -> Result<Option<SessionState>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

/// Records every event and answers with a fixed outcome.
#[derive(Default, Clone)]
pub(super) struct RecordingNotifier {
    events: Arc<Mutex<Vec<LoginEvent>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn events(&self) -> Vec<LoginEvent> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl LoginNotifier for RecordingNotifier {
    fn notify(&self, event: LoginEvent) -> NotifyFuture {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(event);
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(NotificationError::UnexpectedStatus(503))
            } else {
                Ok(())
            }
        })
    }
}

pub(super) fn build_service() -> (
    Arc<StorefrontService<InMemorySessionStore>>,
    InMemorySessionStore,
) {
    let sessions = InMemorySessionStore::default();
    let service = StorefrontService::new(
        shared_catalog(),
        Arc::new(MenuCatalog::default()),
        Arc::new(sessions.clone()),
        credentials(),
    );
    (Arc::new(service), sessions)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
