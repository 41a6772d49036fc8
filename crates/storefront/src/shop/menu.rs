use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::catalog::RestaurantId;

/// Identity within a menu is `(category, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub image_url: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSection {
    pub category: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub sections: Vec<MenuSection>,
}

impl Menu {
    pub fn find(&self, category: &str, name: &str) -> Option<&MenuItem> {
        self.sections
            .iter()
            .filter(|section| section.category == category)
            .flat_map(|section| section.items.iter())
            .find(|item| item.name == name)
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.sections.iter().flat_map(|section| section.items.iter())
    }

    /// Menu served by every restaurant without a dedicated one.
    pub fn placeholder() -> Self {
        let section = |category: &str, items: &[(&str, i64, &str)]| MenuSection {
            category: category.to_string(),
            items: items
                .iter()
                .map(|(name, cents, description)| MenuItem {
                    name: (*name).to_string(),
                    price: Decimal::new(*cents, 2),
                    description: (*description).to_string(),
                    image_url: format!(
                        "https://placehold.co/300x200?text={}",
                        name.replace(' ', "+")
                    ),
                    category: category.to_string(),
                })
                .collect(),
        };

        Self {
            sections: vec![
                section(
                    "Starters",
                    &[
                        ("Caesar Salad", 850, "Romaine, parmesan, croutons"),
                        ("Garlic Bread", 450, "Toasted baguette with herb butter"),
                    ],
                ),
                section(
                    "Mains",
                    &[
                        ("Classic Burger", 1290, "Beef patty, cheddar, pickles"),
                        ("Margherita Pizza", 1100, "Tomato, mozzarella, basil"),
                        ("Chicken Curry", 1350, "Served with basmati rice"),
                    ],
                ),
                section(
                    "Desserts",
                    &[
                        ("Chocolate Fondant", 650, "Warm centre, vanilla ice cream"),
                        ("Tiramisu", 600, "Mascarpone, espresso, cocoa"),
                    ],
                ),
                section(
                    "Drinks",
                    &[
                        ("Sparkling Water", 250, "50cl bottle"),
                        ("Lemonade", 350, "Freshly squeezed"),
                    ],
                ),
            ],
        }
    }
}

/// Menus keyed by restaurant, falling back to a shared default menu.
#[derive(Debug, Clone)]
pub struct MenuCatalog {
    menus: HashMap<RestaurantId, Menu>,
    fallback: Menu,
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self::new(Menu::placeholder())
    }
}

impl MenuCatalog {
    pub fn new(fallback: Menu) -> Self {
        Self {
            menus: HashMap::new(),
            fallback,
        }
    }

    pub fn with_menu(mut self, restaurant: RestaurantId, menu: Menu) -> Self {
        self.menus.insert(restaurant, menu);
        self
    }

    pub fn menu_for(&self, restaurant: RestaurantId) -> &Menu {
        self.menus.get(&restaurant).unwrap_or(&self.fallback)
    }
}
