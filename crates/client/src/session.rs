//! Client-side storefront state: the loaded catalog and the visitor's cart.
//!
//! The cart lives only as long as the session; nothing is persisted.

use rust_decimal::Decimal;
use storefront_core::cart::{reduce, Cart, CartAction};
use storefront_core::catalog::Catalog;
use storefront_core::domain::product::ProductId;
use tracing::warn;

use crate::loader::CatalogLoader;
use crate::transport::ClientError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
pub struct StorefrontSession {
    state: LoadState,
    catalog: Catalog,
    cart: Cart,
}

impl Default for StorefrontSession {
    fn default() -> Self {
        Self { state: LoadState::Loading, catalog: Catalog::default(), cart: Cart::new() }
    }
}

impl StorefrontSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, loader: &CatalogLoader) -> &LoadState {
        self.state = LoadState::Loading;
        let result = loader.load().await;
        self.finish_load(result);
        &self.state
    }

    pub fn finish_load(&mut self, result: Result<Catalog, ClientError>) {
        match result {
            Ok(catalog) => {
                self.catalog = catalog;
                self.state = LoadState::Ready;
            }
            Err(error) => {
                warn!(
                    event_name = "client.catalog.failed",
                    correlation_id = "catalog-load",
                    error = %error,
                    "catalog could not be loaded"
                );
                self.state = LoadState::Failed(error.to_string());
            }
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds one unit of a loaded product. Returns false for ids the catalog
    /// does not contain.
    pub fn add_to_cart(&mut self, id: ProductId) -> bool {
        let Some(product) = self.catalog.find(id).cloned() else {
            return false;
        };
        self.dispatch(CartAction::Add(product));
        true
    }

    pub fn change_quantity(&mut self, id: ProductId, delta: i64) {
        self.dispatch(CartAction::ChangeQuantity { id, delta });
    }

    pub fn remove_from_cart(&mut self, id: ProductId) {
        self.dispatch(CartAction::Remove(id));
    }

    pub fn cart_total(&self) -> Decimal {
        self.cart.total()
    }

    pub fn cart_count(&self) -> u64 {
        self.cart.item_count()
    }

    fn dispatch(&mut self, action: CartAction) {
        self.cart = reduce(std::mem::take(&mut self.cart), action);
    }
}
