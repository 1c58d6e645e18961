use serde::{Deserialize, Serialize};

use super::{require, ValidationError};
use crate::utils::{format_date, format_price};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub product_name: String,
    pub price: f64,
    #[serde(default)]
    pub created_at: String,
}

impl Order {
    pub fn price_display(&self) -> String {
        format_price(self.price)
    }

    pub fn created_display(&self) -> String {
        format_date(&self.created_at)
    }
}

/// Response of `GET /orders/customer/:id`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderList {
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Body of `POST /orders`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderInput {
    pub customer_id: String,
    pub product_name: String,
    pub price: f64,
}

impl OrderInput {
    pub fn new(customer_id: &str, product_name: &str, price: f64) -> Result<Self, ValidationError> {
        if !price.is_finite() {
            return Err(ValidationError::InvalidNumber("price"));
        }
        Ok(Self {
            customer_id: require("customer_id", customer_id)?,
            product_name: require("product_name", product_name)?,
            price,
        })
    }

    /// Build from raw text fields, as read from a form or command line.
    pub fn parse(customer_id: &str, product_name: &str, price: &str) -> Result<Self, ValidationError> {
        let price = require("price", price)?
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidNumber("price"))?;
        Self::new(customer_id, product_name, price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_orders_field_is_empty() {
        let list: OrderList = serde_json::from_str("{}").expect("parse empty");
        assert!(list.orders.is_empty());
    }

    #[test]
    fn test_order_display() {
        let json = r#"{"id":"o1","product_name":"Widget","price":12.5,"created_at":"2024-05-01T10:00:00+00:00"}"#;
        let order: Order = serde_json::from_str(json).expect("parse order");
        assert_eq!(order.price_display(), "12.50 RUB");
        assert_eq!(order.created_display(), "May 01, 2024 10:00");
    }

    #[test]
    fn test_order_input_parse() {
        let input = OrderInput::parse("c1", "Widget", "9.99").expect("valid order");
        assert_eq!(input.price, 9.99);

        assert_eq!(
            OrderInput::parse("c1", "Widget", "abc"),
            Err(ValidationError::InvalidNumber("price"))
        );
        assert_eq!(
            OrderInput::parse("", "Widget", "1"),
            Err(ValidationError::MissingField("customer_id"))
        );
        assert_eq!(
            OrderInput::new("c1", "Widget", f64::NAN),
            Err(ValidationError::InvalidNumber("price"))
        );
    }
}
