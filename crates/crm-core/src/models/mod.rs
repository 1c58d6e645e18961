//! Data models for the customer and orders service.
//!
//! - `Customer`, `CustomerInput`: customer records and create/update payloads
//! - `Order`, `OrderInput`: orders and the create payload
//! - `LoginRequest`, `AuthToken`: the authentication exchange

pub mod auth;
pub mod customer;
pub mod order;

use thiserror::Error;

pub use auth::{AuthToken, LoginRequest};
pub use customer::{Customer, CustomerInput, CustomerList};
pub use order::{Order, OrderInput, OrderList};

/// Raised when a required field is missing before a request is built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Field '{0}' must be a number")]
    InvalidNumber(&'static str),
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}
