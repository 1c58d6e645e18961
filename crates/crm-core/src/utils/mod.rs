//! Formatting helpers for rendering customers and orders.

pub mod format;

pub use format::{format_date, format_price, truncate};
