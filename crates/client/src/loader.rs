use std::future::Future;
use std::sync::Arc;

use storefront_core::catalog::Catalog;
use storefront_core::domain::product::{Product, ProductId};
use tracing::{info, warn};

use crate::retry::RetryPolicy;
use crate::transport::{CatalogTransport, ClientError};

/// Fetches the catalog, retrying transport failures with backoff.
pub struct CatalogLoader {
    transport: Arc<dyn CatalogTransport>,
    retry_policy: RetryPolicy,
}

impl CatalogLoader {
    pub fn new(transport: Arc<dyn CatalogTransport>, retry_policy: RetryPolicy) -> Self {
        Self { transport, retry_policy }
    }

    pub async fn load(&self) -> Result<Catalog, ClientError> {
        let products = self.with_retry("list_products", || self.transport.list_products()).await?;
        info!(
            event_name = "client.catalog.loaded",
            correlation_id = "catalog-load",
            products = products.len(),
            "catalog loaded"
        );
        Ok(Catalog::new(products))
    }

    pub async fn load_product(&self, id: ProductId) -> Result<Product, ClientError> {
        self.with_retry("get_product", || self.transport.get_product(id)).await
    }

    async fn with_retry<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(error @ ClientError::Transport(_)) => {
                    warn!(
                        event_name = "client.catalog.retry",
                        correlation_id = "catalog-load",
                        operation,
                        attempt,
                        max_retries = self.retry_policy.max_retries,
                        error = %error,
                        "catalog request failed"
                    );

                    if attempt >= self.retry_policy.max_retries {
                        return Err(error);
                    }

                    let delay = self.retry_policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
