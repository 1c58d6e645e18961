//! Session management for the CRM client.
//!
//! This module provides:
//! - `SessionStore`: where the bearer token and last username live
//! - `SessionGuard`: page gating, login, registration and logout
//!
//! Tokens never expire on the client side; the server decides.

pub mod guard;
pub mod login;
pub mod store;

pub use guard::{pages, Access, Navigator, PageManifest, Redirect, SessionGuard};
pub use login::LoginStatus;
pub use store::{
    FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionStore, StoreError,
};
