//! Session-local shopping cart.
//!
//! The cart is a reducer: [`reduce`] maps the current [`Cart`] and a
//! [`CartAction`] to the next cart. Every transition is total, so none of them
//! return errors. Totals are derived on each read and never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

pub const MIN_QUANTITY: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Effective price times quantity, saturating at the `Decimal` bounds.
    pub fn line_total(&self) -> Decimal {
        self.product.effective_price().saturating_mul(Decimal::from(self.quantity))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartAction {
    Add(Product),
    ChangeQuantity { id: ProductId, delta: i64 },
    Remove(ProductId),
}

/// Cart entries keyed by product id, kept in the order they were first added.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of effective price times quantity over all entries.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Sum of quantities, used for the cart badge.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add(product) => self.add(product),
            CartAction::ChangeQuantity { id, delta } => self.change_quantity(id, delta),
            CartAction::Remove(id) => self.remove(id),
        }
    }

    fn add(&mut self, product: Product) {
        match self.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartItem { product, quantity: MIN_QUANTITY }),
        }
    }

    fn change_quantity(&mut self, id: ProductId, delta: i64) {
        if let Some(item) = self.items.iter_mut().find(|item| item.product.id == id) {
            item.quantity = clamp_quantity(i64::from(item.quantity).saturating_add(delta));
        }
    }

    fn remove(&mut self, id: ProductId) {
        self.items.retain(|item| item.product.id != id);
    }
}

pub fn reduce(mut cart: Cart, action: CartAction) -> Cart {
    cart.apply(action);
    cart
}

fn clamp_quantity(requested: i64) -> u32 {
    u32::try_from(requested.max(i64::from(MIN_QUANTITY))).unwrap_or(u32::MAX)
}
