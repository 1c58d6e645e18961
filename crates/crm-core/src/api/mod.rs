//! REST API client module for the CRM gateway.
//!
//! This module provides the `ApiClient` for the customer and order endpoints.
//! Protected endpoints use bearer token authentication; the token comes from
//! the injected session store and is obtained through `/login` or `/register`.

pub mod client;
pub mod error;

pub use client::{ApiClient, Method};
pub use error::ApiError;
