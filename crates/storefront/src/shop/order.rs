use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::cart::Cart;
use super::catalog::RestaurantId;
use super::menu::MenuItem;
use super::session::DeliveryMode;

/// Upper bound is exclusive, matching `[1000, 9999)`.
const ORDER_SUFFIX_RANGE: std::ops::Range<u16> = 1000..9999;

/// `ORDER-<YYYYMMDD>-<4 digits>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn generate<R: Rng>(date: NaiveDate, rng: &mut R) -> Self {
        let suffix = rng.gen_range(ORDER_SUFFIX_RANGE);
        Self(format!("ORDER-{}-{suffix}", date.format("%Y%m%d")))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Orders start in preparation and no further transitions are tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    InPreparation,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::InPreparation => "In preparation",
        }
    }
}

/// Immutable record of a checked-out cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<MenuItem>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    #[serde(serialize_with = "serialize_minutes")]
    pub created_at: NaiveDateTime,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub estimated_delivery: String,
    pub delivery_mode: DeliveryMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,
}

impl Order {
    pub fn created_at_label(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

fn serialize_minutes<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("cannot check out an empty cart")]
    EmptyCart,
    #[error("a delivery address is required to check out")]
    MissingAddress,
}

/// Everything an order needs besides the cart contents.
#[derive(Debug, Clone)]
pub struct CheckoutRequest<'a> {
    pub address: &'a str,
    pub estimated_time: &'a str,
    pub delivery_mode: DeliveryMode,
    pub restaurant_id: Option<RestaurantId>,
    pub now: NaiveDateTime,
}

pub struct OrderFactory;

impl OrderFactory {
    /// Builds the order without touching the cart; the caller decides when to clear it.
    pub fn build<R: Rng>(
        cart: &Cart,
        request: CheckoutRequest<'_>,
        rng: &mut R,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let address = request.address.trim();
        if address.is_empty() {
            return Err(CheckoutError::MissingAddress);
        }

        let subtotal = cart.subtotal();
        let delivery_fee = Cart::delivery_fee(subtotal);
        let created_at = request
            .now
            .with_second(0)
            .and_then(|at| at.with_nanosecond(0))
            .unwrap_or(request.now);

        Ok(Order {
            id: OrderId::generate(request.now.date(), rng),
            items: cart.entries().to_vec(),
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
            created_at,
            status: OrderStatus::InPreparation,
            delivery_address: address.to_string(),
            estimated_delivery: request.estimated_time.to_string(),
            delivery_mode: request.delivery_mode,
            restaurant_id: request.restaurant_id,
        })
    }

    /// Builds the order, then records it and empties the cart. Nothing changes on error.
    pub fn checkout<R: Rng>(
        cart: &mut Cart,
        history: &mut Vec<Order>,
        request: CheckoutRequest<'_>,
        rng: &mut R,
    ) -> Result<Order, CheckoutError> {
        let order = Self::build(cart, request, rng)?;
        history.push(order.clone());
        cart.clear();
        Ok(order)
    }
}
