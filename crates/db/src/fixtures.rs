use rust_decimal::Decimal;
use tracing::info;

use storefront_core::domain::product::NewProduct;

use crate::connection::DbPool;
use crate::repositories::product::insert_product;
use crate::repositories::RepositoryError;

/// One record of the bootstrap catalog. Prices are in cents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedProduct {
    pub name: &'static str,
    pub description: &'static str,
    pub price_cents: i64,
    pub promo_price_cents: Option<i64>,
    pub stock: i64,
    pub image_url: &'static str,
    pub category: &'static str,
}

impl SeedProduct {
    pub fn to_new_product(&self) -> NewProduct {
        NewProduct {
            name: self.name.to_string(),
            description: self.description.to_string(),
            price: Decimal::new(self.price_cents, 2),
            promo_price: self.promo_price_cents.map(|cents| Decimal::new(cents, 2)),
            stock: self.stock,
            image_url: self.image_url.to_string(),
            category: self.category.to_string(),
        }
    }
}

const CATEGORY: &str = "Paredões";

/// Inserted, in this order, into an empty store at startup.
pub const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Mini Paredão #13",
        description: "Sistema de som automotivo em miniatura, detalhes realistas.",
        price_cents: 24_999,
        promo_price_cents: Some(13_790),
        stock: 5,
        image_url: "https://picsum.photos/seed/p13/400/400",
        category: CATEGORY,
    },
    SeedProduct {
        name: "Mini Paredão #10",
        description: "Réplica de paredão de som com iluminação LED.",
        price_cents: 24_999,
        promo_price_cents: Some(22_599),
        stock: 3,
        image_url: "https://picsum.photos/seed/p10/400/400",
        category: CATEGORY,
    },
    SeedProduct {
        name: "Mini Paredão #9",
        description: "Miniatura de som automotivo, alta fidelidade visual.",
        price_cents: 24_999,
        promo_price_cents: Some(13_999),
        stock: 10,
        image_url: "https://picsum.photos/seed/p9/400/400",
        category: CATEGORY,
    },
    SeedProduct {
        name: "Mini Paredão #1",
        description: "O clássico que deu início a tudo.",
        price_cents: 24_999,
        promo_price_cents: Some(12_790),
        stock: 8,
        image_url: "https://picsum.photos/seed/p1/400/400",
        category: CATEGORY,
    },
    SeedProduct {
        name: "Mini Paredão #8",
        description: "Design moderno e agressivo.",
        price_cents: 24_999,
        promo_price_cents: Some(17_900),
        stock: 2,
        image_url: "https://picsum.photos/seed/p8/400/400",
        category: CATEGORY,
    },
    SeedProduct {
        name: "Mini Paredão #11",
        description: "Compacto e potente na aparência.",
        price_cents: 24_999,
        promo_price_cents: Some(16_029),
        stock: 4,
        image_url: "https://picsum.photos/seed/p11/400/400",
        category: CATEGORY,
    },
    SeedProduct {
        name: "Mini Paredão #7",
        description: "Estilo único para sua coleção.",
        price_cents: 24_999,
        promo_price_cents: Some(16_889),
        stock: 6,
        image_url: "https://picsum.photos/seed/p7/400/400",
        category: CATEGORY,
    },
    SeedProduct {
        name: "Mini Paredão #6",
        description: "Cores vibrantes e acabamento premium.",
        price_cents: 24_999,
        promo_price_cents: Some(14_999),
        stock: 7,
        image_url: "https://picsum.photos/seed/p6/400/400",
        category: CATEGORY,
    },
    SeedProduct {
        name: "Mini Paredão #5",
        description: "O favorito dos entusiastas.",
        price_cents: 24_999,
        promo_price_cents: Some(12_028),
        stock: 5,
        image_url: "https://picsum.photos/seed/p5/400/400",
        category: CATEGORY,
    },
    SeedProduct {
        name: "Mini Paredão #4",
        description: "Detalhes que impressionam.",
        price_cents: 24_999,
        promo_price_cents: Some(14_999),
        stock: 9,
        image_url: "https://picsum.photos/seed/p4/400/400",
        category: CATEGORY,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Rows inserted by this call; zero when the store already had products.
    pub inserted: usize,
    /// Rows present after the call.
    pub total: i64,
}

impl SeedOutcome {
    pub fn seeded(&self) -> bool {
        self.inserted > 0
    }
}

pub struct CatalogSeed;

impl CatalogSeed {
    /// Inserts [`SEED_PRODUCTS`] when the products table is empty.
    ///
    /// The emptiness check and the inserts share one transaction, so a failed
    /// insert leaves the store empty and the next start seeds again.
    pub async fn ensure_seeded(pool: &DbPool) -> Result<SeedOutcome, RepositoryError> {
        let mut tx = pool.begin().await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(&mut *tx).await?;
        if existing > 0 {
            tx.rollback().await?;
            info!(
                event_name = "system.seed.skipped",
                correlation_id = "bootstrap",
                existing,
                "catalog already populated; seed skipped"
            );
            return Ok(SeedOutcome { inserted: 0, total: existing });
        }

        for seed in SEED_PRODUCTS {
            insert_product(&mut *tx, &seed.to_new_product()).await?;
        }
        tx.commit().await?;

        info!(
            event_name = "system.seed.applied",
            correlation_id = "bootstrap",
            inserted = SEED_PRODUCTS.len(),
            "catalog seed inserted"
        );
        Ok(SeedOutcome { inserted: SEED_PRODUCTS.len(), total: SEED_PRODUCTS.len() as i64 })
    }

    /// Names of seed products missing from the store.
    pub async fn missing_products(pool: &DbPool) -> Result<Vec<&'static str>, RepositoryError> {
        let mut missing = Vec::new();
        for seed in SEED_PRODUCTS {
            let (present,): (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM products WHERE name = ?")
                    .bind(seed.name)
                    .fetch_one(pool)
                    .await?;
            if present == 0 {
                missing.push(seed.name);
            }
        }
        Ok(missing)
    }
}
