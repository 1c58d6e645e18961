//! Core library for the CRM client.
//!
//! `crm-core` holds everything a front end needs to talk to the customer and
//! orders gateway: the authenticated [`ApiClient`](api::ApiClient), the
//! [`SessionGuard`](auth::SessionGuard) that gates pages on the stored token,
//! and the data models exchanged with the server.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, Method};
pub use auth::{SessionGuard, SessionStore};
pub use config::Config;
