use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    /// The order's lifecycle state, owned by the backend.
    pub status: String,
    pub total_price: f64,
    #[serde(default)]
    pub order_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<String>,
}

/// A line item inside an order, priced at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}

/// The payload for creating an order directly from line items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub user_id: i64,
    pub order_items: Vec<CreateOrderItem>,
    pub shipping_address: String,
    pub billing_address: String,
}

/// One line of a [`CreateOrder`] payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: i64,
    pub quantity: i64,
}
