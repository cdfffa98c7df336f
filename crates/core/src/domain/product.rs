use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse::<i64>().map(Self)
    }
}

/// A catalog entry as served by `/api/products`.
///
/// Prices travel as JSON numbers so the payload matches what storefront
/// clients already render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub promo_price: Option<Decimal>,
    pub stock: i64,
    pub image_url: String,
    pub category: String,
}

impl Product {
    /// Promo price when present, base price otherwise.
    pub fn effective_price(&self) -> Decimal {
        self.promo_price.unwrap_or(self.price)
    }
}

/// Product attributes before the store assigns an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub promo_price: Option<Decimal>,
    pub stock: i64,
    pub image_url: String,
    pub category: String,
}

impl NewProduct {
    /// Write-time checks. Rows already in the store are served as-is.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvariantViolation("product name must not be empty".into()));
        }
        if self.price <= Decimal::ZERO {
            return Err(DomainError::InvariantViolation(format!(
                "product `{}` must have a positive price",
                self.name
            )));
        }
        if let Some(promo_price) = self.promo_price {
            if promo_price <= Decimal::ZERO || promo_price >= self.price {
                return Err(DomainError::InvariantViolation(format!(
                    "product `{}` promo price {promo_price} must be positive and below {}",
                    self.name, self.price
                )));
            }
        }
        if self.stock < 0 {
            return Err(DomainError::InvariantViolation(format!(
                "product `{}` stock must not be negative",
                self.name
            )));
        }
        Ok(())
    }

    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            promo_price: self.promo_price,
            stock: self.stock,
            image_url: self.image_url,
            category: self.category,
        }
    }
}
