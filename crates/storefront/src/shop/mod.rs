//! Restaurant browsing, cart and checkout for a single-user storefront session.
//!
//! The catalog is shared and read-only once loaded; everything a user changes
//! lives in their own [`SessionState`], reached through [`StorefrontService`].

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod filter;
pub mod menu;
pub mod notify;
pub mod order;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use auth::{AuthError, CredentialCheck};
pub use cart::{Cart, CartError, CartLine, CartSummary, FREE_DELIVERY_THRESHOLD, SMALL_ORDER_FEE};
pub use catalog::{
    CatalogError, CatalogSnapshot, Restaurant, RestaurantCatalog, RestaurantId, SharedCatalog,
    PLACEHOLDER_IMAGE_URL,
};
pub use filter::{CatalogFacets, RestaurantQuery, SortKey, ALL_CATEGORIES, ALL_PRICES};
pub use menu::{Menu, MenuCatalog, MenuItem, MenuSection};
pub use notify::{HttpLoginNotifier, LoginEvent, LoginNotifier, NotificationError, NotifyFuture};
pub use order::{CheckoutError, CheckoutRequest, Order, OrderFactory, OrderId, OrderStatus};
pub use repository::{InMemorySessionStore, SessionId, SessionStore, StoreError};
pub use router::storefront_router;
pub use service::{
    CatalogStatus, LoginOutcome, MenuView, RestaurantListing, StorefrontError, StorefrontService,
};
pub use session::{
    DeliveryMode, FilterUpdate, SessionError, SessionPhase, SessionState, SessionSummary,
};
