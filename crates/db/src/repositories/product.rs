use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{Executor, Row, Sqlite};

use storefront_core::domain::product::{NewProduct, Product, ProductId};

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, promo_price, stock, image_url, category";

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode_error(error: sqlx::Error) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}

// Prices are stored as REAL. Reads take the shortest decimal that round-trips
// the stored double, so `249.99` reads back as `249.99` and `10.555` stays `10.555`.
fn price_from_column(column: &str, value: f64) -> Result<Decimal, RepositoryError> {
    Decimal::try_from(value).map(|price| price.normalize()).map_err(|error| {
        RepositoryError::Decode(format!("column `{column}` holds {value}: {error}"))
    })
}

fn price_to_column(name: &str, price: Decimal) -> Result<f64, RepositoryError> {
    price.to_f64().ok_or_else(|| {
        RepositoryError::Decode(format!("price {price} of `{name}` does not fit a REAL column"))
    })
}

pub(crate) fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(decode_error)?;
    let name: String = row.try_get("name").map_err(decode_error)?;
    let description: Option<String> = row.try_get("description").map_err(decode_error)?;
    let price: f64 = row.try_get("price").map_err(decode_error)?;
    let promo_price: Option<f64> = row.try_get("promo_price").map_err(decode_error)?;
    let stock: Option<i64> = row.try_get("stock").map_err(decode_error)?;
    let image_url: Option<String> = row.try_get("image_url").map_err(decode_error)?;
    let category: Option<String> = row.try_get("category").map_err(decode_error)?;

    Ok(Product {
        id: ProductId(id),
        name,
        description: description.unwrap_or_default(),
        price: price_from_column("price", price)?,
        promo_price: promo_price.map(|value| price_from_column("promo_price", value)).transpose()?,
        stock: stock.unwrap_or(0),
        image_url: image_url.unwrap_or_default(),
        category: category.unwrap_or_default(),
    })
}

/// Inserts one validated product with any sqlite executor, so seeding can
/// share the statement inside its transaction.
pub(crate) async fn insert_product<'e, E>(
    executor: E,
    product: &NewProduct,
) -> Result<ProductId, RepositoryError>
where
    E: Executor<'e, Database = Sqlite>,
{
    product.validate()?;

    let price = price_to_column(&product.name, product.price)?;
    let promo_price =
        product.promo_price.map(|value| price_to_column(&product.name, value)).transpose()?;

    let result = sqlx::query(
        "INSERT INTO products (name, description, price, promo_price, stock, image_url, category)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(price)
    .bind(promo_price)
    .bind(product.stock)
    .bind(&product.image_url)
    .bind(&product.category)
    .execute(executor)
    .await?;

    Ok(ProductId(result.last_insert_rowid()))
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_product).collect()
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_product(r)?)),
            None => Ok(None),
        }
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let id = insert_product(&self.pool, &product).await?;
        Ok(product.with_id(id))
    }
}
