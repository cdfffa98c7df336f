use std::path::Path;

use storefront_db::{
    connect_with_settings, migrations, CatalogSeed, DbPool, ProductRepository,
    SqlProductRepository, SEED_PRODUCTS,
};
use tempfile::TempDir;

type SeedContractTestResult<T = ()> = Result<T, String>;

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left, $right
            ));
        }
    };
}

async fn open_store(path: &Path) -> SeedContractTestResult<DbPool> {
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let pool = connect_with_settings(&url, 2, 5).await.map_err(|error| error.to_string())?;
    migrations::run_pending(&pool).await.map_err(|error| error.to_string())?;
    Ok(pool)
}

#[tokio::test]
async fn seed_runs_once_across_restarts_of_a_file_store() -> SeedContractTestResult {
    let dir = TempDir::new().map_err(|error| error.to_string())?;
    let path = dir.path().join("storefront.db");

    let first_boot = open_store(&path).await?;
    let outcome = CatalogSeed::ensure_seeded(&first_boot).await.map_err(|e| e.to_string())?;
    require_eq!(outcome.inserted, SEED_PRODUCTS.len());
    first_boot.close().await;

    let second_boot = open_store(&path).await?;
    let outcome = CatalogSeed::ensure_seeded(&second_boot).await.map_err(|e| e.to_string())?;
    require_eq!(outcome.inserted, 0);
    require_eq!(outcome.total, 10);

    let products = SqlProductRepository::new(second_boot.clone())
        .list_all()
        .await
        .map_err(|error| error.to_string())?;
    let ids: Vec<i64> = products.iter().map(|product| product.id.0).collect();
    require_eq!(ids, (1..=10).collect::<Vec<i64>>());

    second_boot.close().await;
    Ok(())
}

#[tokio::test]
async fn seed_contract_matches_declared_records() -> SeedContractTestResult {
    let dir = TempDir::new().map_err(|error| error.to_string())?;
    let pool = open_store(&dir.path().join("contract.db")).await?;
    CatalogSeed::ensure_seeded(&pool).await.map_err(|error| error.to_string())?;

    let repo = SqlProductRepository::new(pool.clone());
    let products = repo.list_all().await.map_err(|error| error.to_string())?;
    require_eq!(products.len(), SEED_PRODUCTS.len());

    for (product, seed) in products.iter().zip(SEED_PRODUCTS) {
        let expected = seed.to_new_product();
        require_eq!(product.name, expected.name);
        require_eq!(product.description, expected.description);
        require_eq!(product.price, expected.price);
        require_eq!(product.promo_price, expected.promo_price);
        require_eq!(product.stock, expected.stock);
        require_eq!(product.image_url, expected.image_url);
        require_eq!(product.category, expected.category);
    }

    pool.close().await;
    Ok(())
}
