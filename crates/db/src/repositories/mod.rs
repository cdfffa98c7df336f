use async_trait::async_trait;
use thiserror::Error;

use storefront_core::domain::product::{NewProduct, Product, ProductId};
use storefront_core::errors::DomainError;

pub mod memory;
pub mod product;

pub use memory::InMemoryProductRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Read access to the product catalog, plus the insert used by seeding.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products in storage order.
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn count(&self) -> Result<i64, RepositoryError>;
    /// Validates and stores a product, returning it with its assigned id.
    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError>;
}
