use std::path::Path;
use std::sync::Arc;

use axum::Router;
use storefront_db::{DbPool, SqlProductRepository};
use tower_http::services::{ServeDir, ServeFile};

use crate::catalog::{self, CatalogService};
use crate::health;

/// API and health routes, plus the built storefront bundle when a static
/// directory is configured. Unknown non-API paths fall back to `index.html`
/// so client-side routes survive a reload.
pub fn build_router(db_pool: DbPool, static_dir: Option<&Path>) -> Router {
    let service = CatalogService::new(Arc::new(SqlProductRepository::new(db_pool.clone())));
    let router = catalog::router(service).merge(health::router(db_pool));

    match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router,
    }
}
