//! Search, filter and sort over a catalog snapshot.
//!
//! Steps run in a fixed order (name search, category, price tier, sort) and
//! each is a pure transform of the previous step's output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::catalog::{Restaurant, RestaurantCatalog};

/// Category selection that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";
/// Price tier selection that disables price filtering.
pub const ALL_PRICES: &str = "All prices";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Catalog order.
    #[default]
    Recommended,
    DeliveryTime,
    Rating,
    DeliveryFee,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Recommended => "Recommended",
            SortKey::DeliveryTime => "Fastest delivery",
            SortKey::Rating => "Top rated",
            SortKey::DeliveryFee => "Lowest delivery fee",
        }
    }
}

/// The browse selections a session keeps between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_price_tier")]
    pub price_tier: String,
    #[serde(default)]
    pub sort: SortKey,
}

fn default_category() -> String {
    ALL_CATEGORIES.to_string()
}

fn default_price_tier() -> String {
    ALL_PRICES.to_string()
}

impl Default for RestaurantQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: default_category(),
            price_tier: default_price_tier(),
            sort: SortKey::default(),
        }
    }
}

impl RestaurantQuery {
    pub fn apply(&self, catalog: &RestaurantCatalog) -> Vec<Restaurant> {
        apply(catalog.restaurants(), self)
    }
}

pub fn apply(restaurants: &[Restaurant], query: &RestaurantQuery) -> Vec<Restaurant> {
    let mut selected: Vec<Restaurant> = restaurants
        .iter()
        .filter(|restaurant| matches_search(restaurant, query.search.as_deref()))
        .filter(|restaurant| matches_category(restaurant, &query.category))
        .filter(|restaurant| matches_price_tier(restaurant, &query.price_tier))
        .cloned()
        .collect();

    sort(&mut selected, query.sort);
    selected
}

/// The text is matched as typed; only a blank search is treated as absent.
fn matches_search(restaurant: &Restaurant, search: Option<&str>) -> bool {
    match search {
        None => true,
        Some(needle) if needle.trim().is_empty() => true,
        Some(needle) => restaurant
            .name
            .to_lowercase()
            .contains(&needle.to_lowercase()),
    }
}

fn matches_category(restaurant: &Restaurant, category: &str) -> bool {
    if category == ALL_CATEGORIES {
        return true;
    }

    let needle = category.to_lowercase();
    restaurant
        .categories
        .iter()
        .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Tiers match on symbol length only, so `€€` also selects `$$`.
fn matches_price_tier(restaurant: &Restaurant, tier: &str) -> bool {
    if tier == ALL_PRICES {
        return true;
    }

    restaurant.price.chars().count() == tier.chars().count()
}

/// `sort_by` is stable, so ties keep catalog order.
fn sort(restaurants: &mut [Restaurant], key: SortKey) {
    match key {
        SortKey::Recommended => {}
        SortKey::DeliveryTime => restaurants.sort_by_key(|restaurant| restaurant.delivery_time),
        SortKey::Rating => restaurants.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::DeliveryFee => restaurants.sort_by_key(|restaurant| restaurant.delivery_fee),
    }
}

/// Selector values the browse view can offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogFacets {
    pub categories: Vec<String>,
    pub price_tiers: Vec<String>,
}

impl CatalogFacets {
    /// Categories in alphabetical order, tiers from cheapest (shortest symbol) up.
    pub fn from_catalog(catalog: &RestaurantCatalog) -> Self {
        let categories: BTreeSet<&str> = catalog
            .restaurants()
            .iter()
            .flat_map(|restaurant| restaurant.categories.iter().map(String::as_str))
            .collect();

        let mut price_tiers: Vec<String> = catalog
            .restaurants()
            .iter()
            .map(|restaurant| restaurant.price.clone())
            .filter(|tier| !tier.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        price_tiers.sort_by_key(|tier| tier.chars().count());

        Self {
            categories: std::iter::once(ALL_CATEGORIES)
                .chain(categories)
                .map(str::to_string)
                .collect(),
            price_tiers: std::iter::once(ALL_PRICES.to_string())
                .chain(price_tiers)
                .collect(),
        }
    }
}
