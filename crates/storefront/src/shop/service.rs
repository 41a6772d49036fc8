use chrono::{Local, NaiveDateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::auth::CredentialCheck;
use super::cart::CartSummary;
use super::catalog::{CatalogSnapshot, Restaurant, RestaurantId, SharedCatalog};
use super::filter::{CatalogFacets, RestaurantQuery};
use super::menu::{Menu, MenuCatalog};
use super::notify::{self, LoginEvent, LoginNotifier, NotificationError};
use super::order::Order;
use super::repository::{SessionId, SessionStore, StoreError};
use super::session::{DeliveryMode, FilterUpdate, SessionError, SessionState, SessionSummary};

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let sequence = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let nonce: u32 = rand::thread_rng().gen();
    SessionId(format!("sess-{sequence:06}-{nonce:08x}"))
}

/// Facade composing the shared catalog, menus and per-session state.
///
/// Each command runs through [`SessionStore::modify`]: commands on one session
/// apply one after another, and a rejected command leaves the stored session
/// untouched.
pub struct StorefrontService<S> {
    catalog: Arc<SharedCatalog>,
    menus: Arc<MenuCatalog>,
    sessions: Arc<S>,
    credentials: CredentialCheck,
    notifier: Option<Arc<dyn LoginNotifier>>,
}

impl<S> StorefrontService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(
        catalog: Arc<SharedCatalog>,
        menus: Arc<MenuCatalog>,
        sessions: Arc<S>,
        credentials: CredentialCheck,
    ) -> Self {
        Self {
            catalog,
            menus,
            sessions,
            credentials,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn LoginNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Opens a logged-in session. The webhook, when configured, is dispatched
    /// only after the session has been stored.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, StorefrontError> {
        let mut state = SessionState::new();
        state.login(&self.credentials, username, password)?;

        let session_id = next_session_id();
        let summary = state.summary();
        self.sessions.insert(session_id.clone(), state)?;
        info!(%session_id, %username, "session opened");

        let notification = self.notifier.as_ref().and_then(|notifier| {
            notify::dispatch(notifier.clone(), LoginEvent::login(username, Utc::now()))
        });

        Ok(LoginOutcome {
            session_id,
            summary,
            notification,
        })
    }

    pub fn logout(&self, id: &SessionId) -> Result<(), StorefrontError> {
        let mut state = self
            .sessions
            .remove(id)?
            .ok_or(StorefrontError::SessionNotFound)?;
        state.logout();
        info!(session_id = %id, "session closed");
        Ok(())
    }

    pub fn session(&self, id: &SessionId) -> Result<SessionSummary, StorefrontError> {
        Ok(self.load(id)?.summary())
    }

    pub fn restaurants(&self, id: &SessionId) -> Result<RestaurantListing, StorefrontError> {
        let state = self.load(id)?;
        Ok(self.listing(state.filters()))
    }

    pub fn update_filters(
        &self,
        id: &SessionId,
        update: FilterUpdate,
    ) -> Result<RestaurantListing, StorefrontError> {
        let filters = self.with_session(id, |state| Ok(state.update_filters(update)?.clone()))?;
        debug!(session_id = %id, ?filters, "filters updated");
        Ok(self.listing(&filters))
    }

    pub fn facets(&self) -> CatalogFacets {
        CatalogFacets::from_catalog(&self.catalog.snapshot().catalog)
    }

    pub fn reload_catalog(&self) -> CatalogStatus {
        CatalogStatus::from_snapshot(&self.catalog.reload())
    }

    pub fn catalog_status(&self) -> CatalogStatus {
        CatalogStatus::from_snapshot(&self.catalog.snapshot())
    }

    pub fn select_restaurant(
        &self,
        id: &SessionId,
        restaurant_id: RestaurantId,
    ) -> Result<MenuView, StorefrontError> {
        let restaurant = self.restaurant(restaurant_id)?;
        let estimated_time = self.with_session(id, |state| {
            Ok(state
                .select_restaurant(restaurant_id, &mut rand::thread_rng())?
                .to_string())
        })?;

        Ok(MenuView {
            menu: self.menus.menu_for(restaurant_id).clone(),
            restaurant,
            estimated_time,
        })
    }

    pub fn back(&self, id: &SessionId) -> Result<SessionSummary, StorefrontError> {
        self.with_session(id, |state| {
            state.back()?;
            Ok(state.summary())
        })
    }

    pub fn menu(&self, id: &SessionId) -> Result<MenuView, StorefrontError> {
        let state = self.load(id)?;
        let restaurant_id = state.require_restaurant()?;
        Ok(MenuView {
            restaurant: self.restaurant(restaurant_id)?,
            menu: self.menus.menu_for(restaurant_id).clone(),
            estimated_time: state.estimated_time().to_string(),
        })
    }

    /// Adds an item from the selected restaurant's menu.
    pub fn add_item(
        &self,
        id: &SessionId,
        category: &str,
        name: &str,
    ) -> Result<CartSummary, StorefrontError> {
        self.with_session(id, |state| {
            let restaurant_id = state.require_restaurant()?;
            let item = self
                .menus
                .menu_for(restaurant_id)
                .find(category, name)
                .cloned()
                .ok_or_else(|| StorefrontError::UnknownMenuItem {
                    category: category.to_string(),
                    name: name.to_string(),
                })?;
            state.add_item(item)?;
            Ok(state.cart().summary())
        })
    }

    pub fn remove_item(
        &self,
        id: &SessionId,
        position: usize,
    ) -> Result<CartSummary, StorefrontError> {
        self.with_session(id, |state| {
            state.remove_item(position)?;
            Ok(state.cart().summary())
        })
    }

    pub fn cart(&self, id: &SessionId) -> Result<CartSummary, StorefrontError> {
        Ok(self.load(id)?.cart().summary())
    }

    pub fn set_delivery(
        &self,
        id: &SessionId,
        address: Option<String>,
        mode: Option<DeliveryMode>,
    ) -> Result<SessionSummary, StorefrontError> {
        self.with_session(id, |state| {
            state.set_delivery(address, mode)?;
            Ok(state.summary())
        })
    }

    pub fn checkout(&self, id: &SessionId) -> Result<Order, StorefrontError> {
        self.checkout_at(id, Local::now().naive_local())
    }

    pub fn checkout_at(&self, id: &SessionId, now: NaiveDateTime) -> Result<Order, StorefrontError> {
        let order = self.with_session(id, |state| {
            Ok(state.checkout(now, &mut rand::thread_rng())?)
        })?;
        info!(session_id = %id, order_id = %order.id, total = %order.total, "order placed");
        Ok(order)
    }

    pub fn orders(&self, id: &SessionId) -> Result<Vec<Order>, StorefrontError> {
        Ok(self.load(id)?.orders().to_vec())
    }

    fn load(&self, id: &SessionId) -> Result<SessionState, StorefrontError> {
        self.sessions
            .fetch(id)?
            .ok_or(StorefrontError::SessionNotFound)
    }

    fn with_session<T>(
        &self,
        id: &SessionId,
        command: impl FnOnce(&mut SessionState) -> Result<T, StorefrontError>,
    ) -> Result<T, StorefrontError> {
        self.sessions.modify(id, command).map_err(|err| match err {
            StorefrontError::Store(StoreError::NotFound) => StorefrontError::SessionNotFound,
            other => other,
        })
    }

    fn restaurant(&self, id: RestaurantId) -> Result<Restaurant, StorefrontError> {
        self.catalog
            .snapshot()
            .catalog
            .find(id)
            .cloned()
            .ok_or(StorefrontError::UnknownRestaurant(id))
    }

    fn listing(&self, filters: &RestaurantQuery) -> RestaurantListing {
        let snapshot = self.catalog.snapshot();
        let restaurants = filters.apply(&snapshot.catalog);
        RestaurantListing {
            total: restaurants.len(),
            restaurants,
            filters: filters.clone(),
            warning: snapshot.error.map(|err| err.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct LoginOutcome {
    pub session_id: SessionId,
    pub summary: SessionSummary,
    /// Present when a webhook is configured and a runtime was available.
    pub notification: Option<JoinHandle<Result<(), NotificationError>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantListing {
    pub restaurants: Vec<Restaurant>,
    pub total: usize,
    pub filters: RestaurantQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuView {
    pub restaurant: Restaurant,
    pub estimated_time: String,
    pub menu: Menu,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogStatus {
    pub restaurants: usize,
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl CatalogStatus {
    fn from_snapshot(snapshot: &CatalogSnapshot) -> Self {
        Self {
            restaurants: snapshot.catalog.len(),
            seed: snapshot.catalog.seed(),
            warning: snapshot.error.as_ref().map(ToString::to_string),
        }
    }
}

/// Error raised by the storefront service.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("session not found")]
    SessionNotFound,
    #[error("restaurant {0} is not in the catalog")]
    UnknownRestaurant(RestaurantId),
    #[error("menu has no item '{name}' under '{category}'")]
    UnknownMenuItem { category: String, name: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}
