use std::time::Duration;

use async_trait::async_trait;
use storefront_core::config::ClientConfig;
use storefront_core::domain::product::{Product, ProductId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("catalog request failed: {0}")]
    Request(String),
    #[error("catalog service answered with status {status}")]
    Status { status: u16 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("product {0} not found")]
    NotFound(ProductId),
    /// Retryable: the request did not reach the service or was not answered.
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("catalog payload could not be decoded: {0}")]
    Decode(String),
    #[error("client could not be built: {0}")]
    Build(String),
}

/// Read access to the catalog service.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;
    async fn get_product(&self, id: ProductId) -> Result<Product, ClientError>;
}

pub struct HttpCatalogTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ClientError::Build(error.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.base_url.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn products_url(&self) -> String {
        format!("{}/api/products", self.base_url)
    }

    pub fn product_url(&self, id: ProductId) -> String {
        format!("{}/api/products/{id}", self.base_url)
    }

    async fn fetch(&self, url: &str) -> Result<reqwest::Response, TransportError> {
        self.http.get(url).send().await.map_err(|error| TransportError::Request(error.to_string()))
    }
}

#[async_trait]
impl CatalogTransport for HttpCatalogTransport {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.fetch(&self.products_url()).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16() }.into());
        }

        response
            .json::<Vec<Product>>()
            .await
            .map_err(|error| ClientError::Decode(error.to_string()))
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ClientError> {
        let response = self.fetch(&self.product_url(id)).await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id));
        }
        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16() }.into());
        }

        response
            .json::<Product>()
            .await
            .map_err(|error| ClientError::Decode(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        extract::Path,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use storefront_core::config::AppConfig;
    use storefront_core::domain::product::ProductId;

    use super::{CatalogTransport, ClientError, HttpCatalogTransport, TransportError};

    fn product_json(id: i64) -> Value {
        json!({
            "id": id,
            "name": format!("Mini Paredão #{id}"),
            "description": "O clássico que deu início a tudo.",
            "price": 249.99,
            "promo_price": 137.9,
            "stock": 8,
            "image_url": "https://picsum.photos/seed/p1/400/400",
            "category": "Paredões"
        })
    }

    async fn list_products() -> Json<Value> {
        Json(json!([product_json(1), product_json(2)]))
    }

    async fn get_product(Path(id): Path<i64>) -> Response {
        match id {
            1 => Json(product_json(1)).into_response(),
            2 => {
                let body = Json(json!({ "error": "Internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            3 => (StatusCode::OK, "<html>not json</html>").into_response(),
            _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "Product not found" })))
                .into_response(),
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let address = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub server");
        });
        format!("http://{address}")
    }

    async fn stub_transport() -> HttpCatalogTransport {
        let router = Router::new()
            .route("/api/products", get(list_products))
            .route("/api/products/{id}", get(get_product));
        let base_url = serve(router).await;
        HttpCatalogTransport::new(base_url, Duration::from_secs(5)).expect("client should build")
    }

    #[test]
    fn urls_are_built_from_trimmed_base_url() {
        let transport = HttpCatalogTransport::new("http://localhost:3000/", Duration::from_secs(1))
            .expect("client should build");

        assert_eq!(transport.products_url(), "http://localhost:3000/api/products");
        assert_eq!(transport.product_url(ProductId(7)), "http://localhost:3000/api/products/7");
    }

    #[test]
    fn default_config_targets_local_server() {
        let transport =
            HttpCatalogTransport::from_config(&AppConfig::default().client).expect("client");

        assert_eq!(transport.products_url(), "http://localhost:3000/api/products");
    }

    #[tokio::test]
    async fn list_decodes_float_prices_from_the_catalog_api() {
        let transport = stub_transport().await;

        let products = transport.list_products().await.expect("list should succeed");

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, ProductId(1));
        assert_eq!(products[0].price, Decimal::new(24_999, 2));
        assert_eq!(products[0].promo_price, Some(Decimal::new(1_379, 1)));
        assert_eq!(products[1].category, "Paredões");
    }

    #[tokio::test]
    async fn get_maps_statuses_to_client_errors() {
        let transport = stub_transport().await;

        let found = transport.get_product(ProductId(1)).await.expect("product 1 exists");
        assert_eq!(found.stock, 8);

        assert_eq!(
            transport.get_product(ProductId(9999)).await,
            Err(ClientError::NotFound(ProductId(9999)))
        );
        assert_eq!(
            transport.get_product(ProductId(2)).await,
            Err(ClientError::Transport(TransportError::Status { status: 500 }))
        );
        assert!(matches!(
            transport.get_product(ProductId(3)).await,
            Err(ClientError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn refused_connection_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("address");
        drop(listener);

        let transport =
            HttpCatalogTransport::new(format!("http://{address}"), Duration::from_secs(2))
                .expect("client should build");

        assert!(matches!(
            transport.list_products().await,
            Err(ClientError::Transport(TransportError::Request(_)))
        ));
    }
}
