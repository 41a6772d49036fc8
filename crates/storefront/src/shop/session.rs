use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::auth::{AuthError, CredentialCheck};
use super::cart::{Cart, CartError, CartSummary};
use super::catalog::RestaurantId;
use super::filter::{RestaurantQuery, SortKey};
use super::menu::MenuItem;
use super::order::{CheckoutError, CheckoutRequest, Order, OrderFactory};

/// Cosmetic estimate shown once a restaurant is picked, `[20, 50)` minutes.
const ESTIMATE_MINUTES_RANGE: std::ops::Range<u32> = 20..50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    LoggedOut,
    Browsing,
    ViewingMenu,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    #[default]
    Delivery,
    Pickup,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("log in first")]
    NotLoggedIn,
    #[error("no restaurant selected")]
    NoRestaurantSelected,
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Partial update of the browse selections; `None` leaves a field as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterUpdate {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price_tier: Option<String>,
    #[serde(default)]
    pub sort: Option<SortKey>,
}

/// Everything one user has touched since logging in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    logged_in: bool,
    username: String,
    filters: RestaurantQuery,
    current_restaurant: Option<RestaurantId>,
    delivery_address: String,
    estimated_time: String,
    delivery_mode: DeliveryMode,
    cart: Cart,
    orders: Vec<Order>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.logged_in, self.current_restaurant) {
            (false, _) => SessionPhase::LoggedOut,
            (true, None) => SessionPhase::Browsing,
            (true, Some(_)) => SessionPhase::ViewingMenu,
        }
    }

    /// Replaces every field with its default, including cart and order history.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn login(
        &mut self,
        check: &CredentialCheck,
        username: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        check.verify(username, password)?;
        self.logged_in = true;
        self.username = username.to_string();
        Ok(())
    }

    pub fn logout(&mut self) {
        self.reset();
    }

    pub fn update_filters(&mut self, update: FilterUpdate) -> Result<&RestaurantQuery, SessionError> {
        self.require_login()?;
        if let Some(search) = update.search {
            self.filters.search = Some(search).filter(|value| !value.trim().is_empty());
        }
        if let Some(category) = update.category {
            self.filters.category = category;
        }
        if let Some(price_tier) = update.price_tier {
            self.filters.price_tier = price_tier;
        }
        if let Some(sort) = update.sort {
            self.filters.sort = sort;
        }
        Ok(&self.filters)
    }

    /// The caller is responsible for checking that `restaurant` exists in the catalog.
    pub fn select_restaurant<R: Rng>(
        &mut self,
        restaurant: RestaurantId,
        rng: &mut R,
    ) -> Result<&str, SessionError> {
        self.require_login()?;
        self.current_restaurant = Some(restaurant);
        self.estimated_time = format!("{} min", rng.gen_range(ESTIMATE_MINUTES_RANGE));
        Ok(&self.estimated_time)
    }

    pub fn back(&mut self) -> Result<(), SessionError> {
        self.require_login()?;
        self.current_restaurant = None;
        Ok(())
    }

    pub fn set_delivery(
        &mut self,
        address: Option<String>,
        mode: Option<DeliveryMode>,
    ) -> Result<(), SessionError> {
        self.require_login()?;
        if let Some(address) = address {
            self.delivery_address = address.trim().to_string();
        }
        if let Some(mode) = mode {
            self.delivery_mode = mode;
        }
        Ok(())
    }

    pub fn add_item(&mut self, item: MenuItem) -> Result<usize, SessionError> {
        self.require_login()?;
        self.cart.add(item);
        Ok(self.cart.len())
    }

    pub fn remove_item(&mut self, position: usize) -> Result<MenuItem, SessionError> {
        self.require_login()?;
        Ok(self.cart.remove_at(position)?)
    }

    /// Appends the order to history and empties the cart, or changes nothing.
    pub fn checkout<R: Rng>(
        &mut self,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<Order, SessionError> {
        self.require_login()?;
        let request = CheckoutRequest {
            address: &self.delivery_address,
            estimated_time: &self.estimated_time,
            delivery_mode: self.delivery_mode,
            restaurant_id: self.current_restaurant,
            now,
        };
        Ok(OrderFactory::checkout(
            &mut self.cart,
            &mut self.orders,
            request,
            rng,
        )?)
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn filters(&self) -> &RestaurantQuery {
        &self.filters
    }

    pub fn current_restaurant(&self) -> Option<RestaurantId> {
        self.current_restaurant
    }

    pub fn require_restaurant(&self) -> Result<RestaurantId, SessionError> {
        self.current_restaurant
            .ok_or(SessionError::NoRestaurantSelected)
    }

    pub fn delivery_address(&self) -> &str {
        &self.delivery_address
    }

    pub fn estimated_time(&self) -> &str {
        &self.estimated_time
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        self.delivery_mode
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Checkout is only offered once the cart has items and an address is set.
    pub fn can_checkout(&self) -> bool {
        !self.cart.is_empty() && !self.delivery_address.trim().is_empty()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            phase: self.phase(),
            username: self.username.clone(),
            filters: self.filters.clone(),
            current_restaurant: self.current_restaurant,
            delivery_address: self.delivery_address.clone(),
            estimated_time: self.estimated_time.clone(),
            delivery_mode: self.delivery_mode,
            cart: self.cart.summary(),
            can_checkout: self.can_checkout(),
            order_count: self.orders.len(),
        }
    }

    fn require_login(&self) -> Result<(), SessionError> {
        if self.logged_in {
            Ok(())
        } else {
            Err(SessionError::NotLoggedIn)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub phase: SessionPhase,
    pub username: String,
    pub filters: RestaurantQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_restaurant: Option<RestaurantId>,
    pub delivery_address: String,
    pub estimated_time: String,
    pub delivery_mode: DeliveryMode,
    pub cart: CartSummary,
    pub can_checkout: bool,
    pub order_count: usize,
}
