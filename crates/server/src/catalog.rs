//! Read-only catalog API.
//!
//! JSON Endpoints:
//! - `GET /api/products`: every product in storage order
//! - `GET /api/products/{id}`: one product, or 404 `{"error":"Product not found"}`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use storefront_core::domain::product::{Product, ProductId};
use storefront_core::errors::{ApplicationError, InterfaceError};
use storefront_db::ProductRepository;
use tracing::{debug, error};

/// Catalog operations over an explicitly supplied product store.
#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn ProductRepository>,
    request_seq: Arc<AtomicU64>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository, request_seq: Arc::new(AtomicU64::new(0)) }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ApplicationError> {
        self.repository
            .list_all()
            .await
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApplicationError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(|error| ApplicationError::Persistence(error.to_string()))?
            .ok_or(ApplicationError::ProductNotFound(id))
    }

    fn next_correlation_id(&self) -> String {
        let seq = self.request_seq.fetch_add(1, Ordering::Relaxed) + 1;
        format!("req-{seq:06}")
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                event_name = "api.catalog.error",
                correlation_id = self.0.correlation_id(),
                error = %self.0,
                "catalog request failed"
            );
        } else {
            debug!(
                event_name = "api.catalog.rejected",
                correlation_id = self.0.correlation_id(),
                error = %self.0,
                "catalog request rejected"
            );
        }

        let body = ApiErrorBody { error: self.0.user_message().to_string() };
        (status, Json(body)).into_response()
    }
}

pub fn router(service: CatalogService) -> Router {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
        .with_state(service)
}

pub async fn list_products(
    State(service): State<CatalogService>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let correlation_id = service.next_correlation_id();
    service
        .list_products()
        .await
        .map(Json)
        .map_err(|error| ApiError(error.into_interface(correlation_id)))
}

pub async fn get_product(
    State(service): State<CatalogService>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let correlation_id = service.next_correlation_id();

    let Some(id) = parse_product_id(&raw_id) else {
        return Err(ApiError(InterfaceError::NotFound {
            message: format!("product `{raw_id}` not found"),
            correlation_id,
        }));
    };

    service
        .get_product(id)
        .await
        .map(Json)
        .map_err(|error| ApiError(error.into_interface(correlation_id)))
}

/// Accepts integer ids and numeric forms that name an integer exactly, so
/// `5`, `5.0` and `5e0` all address row 5. Anything else matches no row.
fn parse_product_id(raw: &str) -> Option<ProductId> {
    if let Ok(id) = raw.parse::<ProductId>() {
        return Some(id);
    }

    let value = raw.trim().parse::<f64>().ok()?;
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    if value.is_finite() && value.fract() == 0.0 && in_range {
        Some(ProductId(value as i64))
    } else {
        None
    }
}
