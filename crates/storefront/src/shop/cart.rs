use rust_decimal::Decimal;
use serde::Serialize;

use super::menu::MenuItem;

/// Orders below this subtotal pay [`SMALL_ORDER_FEE`].
pub const FREE_DELIVERY_THRESHOLD: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
pub const SMALL_ORDER_FEE: Decimal = Decimal::from_parts(299, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("no cart entry at position {position} (cart holds {len})")]
    IndexOutOfRange { position: usize, len: usize },
}

/// Ordered multiset of menu items; the same item may appear more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<MenuItem>,
}

impl Cart {
    pub fn add(&mut self, item: MenuItem) {
        self.entries.push(item);
    }

    pub fn remove_at(&mut self, position: usize) -> Result<MenuItem, CartError> {
        if position >= self.entries.len() {
            return Err(CartError::IndexOutOfRange {
                position,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(position))
    }

    pub fn entries(&self) -> &[MenuItem] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn subtotal(&self) -> Decimal {
        self.entries.iter().map(|item| item.price).sum()
    }

    pub fn delivery_fee(subtotal: Decimal) -> Decimal {
        if subtotal < FREE_DELIVERY_THRESHOLD {
            SMALL_ORDER_FEE
        } else {
            Decimal::ZERO
        }
    }

    pub fn total(&self) -> Decimal {
        let subtotal = self.subtotal();
        subtotal + Self::delivery_fee(subtotal)
    }

    pub fn summary(&self) -> CartSummary {
        let subtotal = self.subtotal();
        let delivery_fee = Self::delivery_fee(subtotal);
        CartSummary {
            entries: self
                .entries
                .iter()
                .enumerate()
                .map(|(position, item)| CartLine {
                    position,
                    item: item.clone(),
                })
                .collect(),
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
            until_free_delivery: (FREE_DELIVERY_THRESHOLD - subtotal).max(Decimal::ZERO),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub position: usize,
    #[serde(flatten)]
    pub item: MenuItem,
}

/// Read model of a cart for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub entries: Vec<CartLine>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    /// Extra spend needed before the small-order fee is waived.
    pub until_free_delivery: Decimal,
}
