use crate::domain::product::{Product, ProductId};

/// Products loaded from the catalog API, in the order the API returned them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::Catalog;
    use crate::domain::product::{Product, ProductId};

    fn product(id: i64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Decimal::new(24_999, 2),
            promo_price: None,
            stock: 0,
            image_url: String::new(),
            category: "Paredões".to_string(),
        }
    }

    #[test]
    fn find_returns_matching_product() {
        let catalog = Catalog::new(vec![product(1), product(2)]);

        assert_eq!(catalog.find(ProductId(2)).map(|product| product.id), Some(ProductId(2)));
        assert!(catalog.find(ProductId(3)).is_none());
        assert_eq!(catalog.len(), 2);
    }
}
