use std::collections::BTreeMap;

use tokio::sync::RwLock;

use storefront_core::domain::product::{NewProduct, Product, ProductId};

use super::{ProductRepository, RepositoryError};

#[derive(Default)]
struct ProductTable {
    rows: BTreeMap<i64, Product>,
    last_id: i64,
}

/// Catalog store backed by process memory; ids are assigned sequentially
/// from 1 the way the sqlite autoincrement column assigns them.
#[derive(Default)]
pub struct InMemoryProductRepository {
    table: RwLock<ProductTable>,
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id.0).cloned())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.len() as i64)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        product.validate()?;

        let mut table = self.table.write().await;
        table.last_id += 1;
        let product = product.with_id(ProductId(table.last_id));
        table.rows.insert(product.id.0, product.clone());
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use storefront_core::domain::product::{NewProduct, ProductId};

    use crate::repositories::{InMemoryProductRepository, ProductRepository, RepositoryError};

    fn new_product(name: &str, promo_price: Option<Decimal>) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(24_999, 2),
            promo_price,
            stock: 2,
            image_url: String::new(),
            category: "Paredões".to_string(),
        }
    }

    #[tokio::test]
    async fn in_memory_product_repo_round_trip() {
        let repo = InMemoryProductRepository::default();

        let saved = repo.insert(new_product("Mini Paredão #8", None)).await.expect("save product");
        let found = repo.find_by_id(saved.id).await.expect("find product");

        assert_eq!(saved.id, ProductId(1));
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn in_memory_product_repo_lists_in_id_order() {
        let repo = InMemoryProductRepository::default();
        for name in ["first", "second", "third"] {
            repo.insert(new_product(name, None)).await.expect("save product");
        }

        let names: Vec<String> = repo
            .list_all()
            .await
            .expect("list products")
            .into_iter()
            .map(|product| product.name)
            .collect();

        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(repo.count().await.expect("count"), 3);
        assert!(repo.find_by_id(ProductId(4)).await.expect("find").is_none());
    }

    #[tokio::test]
    async fn in_memory_product_repo_validates_before_assigning_ids() {
        let repo = InMemoryProductRepository::default();

        let rejected = repo.insert(new_product("bad", Some(Decimal::new(30_000, 2)))).await;
        assert!(matches!(rejected, Err(RepositoryError::Domain(_))));

        let accepted = repo.insert(new_product("good", None)).await.expect("save product");
        assert_eq!(accepted.id, ProductId(1));
    }
}
