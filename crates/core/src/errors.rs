use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("product {0} not found")]
    ProductNotFound(ProductId),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Product not found",
            Self::Internal { .. } => "Internal server error",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::NotFound { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::ProductNotFound(id) => Self::NotFound {
                message: format!("product {id} not found"),
                correlation_id: "unassigned".to_owned(),
            },
            // No recovery is defined for store faults.
            ApplicationError::Persistence(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::product::ProductId;
    use crate::errors::{ApplicationError, InterfaceError};

    #[test]
    fn missing_product_maps_to_not_found_with_fixed_message() {
        let interface = ApplicationError::ProductNotFound(ProductId(9999)).into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::NotFound {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(interface.user_message(), "Product not found");
    }

    #[test]
    fn persistence_error_maps_to_internal() {
        let interface =
            ApplicationError::Persistence("database is locked".to_owned()).into_interface("req-3");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.user_message(), "Internal server error");
        assert_eq!(interface.correlation_id(), "req-3");
    }
}
