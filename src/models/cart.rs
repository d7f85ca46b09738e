use serde::{Deserialize, Serialize};

/// One user's cart, with server-computed totals.
///
/// The backend is the only place `total_price` and `total_items` are
/// computed; the client never derives them from `items` except in the
/// [`Cart::empty`] placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    /// The cart's line items. The backend names this field `cartItems`.
    #[serde(rename = "cartItems", default)]
    pub items: Vec<CartItem>,
    pub total_price: f64,
    pub total_items: i64,
}

impl Cart {
    /// The well-defined empty cart substituted when a fetch fails or a
    /// clear succeeds.
    pub fn empty(user_id: i64) -> Self {
        Self {
            id: 0,
            user_id,
            items: Vec::new(),
            total_price: 0.0,
            total_items: 0,
        }
    }
}

/// A line item inside a cart. Identity is the server-assigned `id`;
/// `product_id` is a back-reference only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
}
