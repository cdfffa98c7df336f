pub mod cart;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;

pub use cart::{reduce, Cart, CartAction, CartItem};
pub use catalog::Catalog;
pub use domain::product::{NewProduct, Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
