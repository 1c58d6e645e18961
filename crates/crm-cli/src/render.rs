//! Plain-text rendering for customer and order lists.

use crm_core::models::{Customer, Order};
use crm_core::utils::truncate;

/// Longest product name shown before truncation
const MAX_PRODUCT_WIDTH: usize = 40;

pub fn render_customers(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return "No customers".to_string();
    }
    customers
        .iter()
        .map(Customer::summary)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "No orders".to_string();
    }
    orders
        .iter()
        .map(|order| {
            format!(
                "{} - {} ({})",
                truncate(&order.product_name, MAX_PRODUCT_WIDTH),
                order.price_display(),
                order.created_display()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
