pub mod loader;
pub mod retry;
pub mod session;
pub mod transport;

pub use loader::CatalogLoader;
pub use retry::RetryPolicy;
pub use session::{LoadState, StorefrontSession};
pub use transport::{CatalogTransport, ClientError, HttpCatalogTransport, TransportError};
