use serde::Serialize;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::cart::Cart;

/// The add-item request payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItem {
    pub product_id: i64,
    pub quantity: i64,
}

/// Fetches a user's cart.
pub async fn fetch(client: &ApiClient, user_id: i64) -> Result<Cart> {
    client.get(&format!("/cart/{}", user_id)).await
}

/// Adds an item, returning the full updated cart.
pub async fn add_item(client: &ApiClient, user_id: i64, item: &AddItem) -> Result<Cart> {
    client.post(&format!("/cart/{}/add-item", user_id), item).await
}

/// Changes a line item's quantity, returning the full updated cart.
pub async fn update_item_quantity(
    client: &ApiClient,
    user_id: i64,
    item_id: i64,
    quantity: i64,
) -> Result<Cart> {
    client
        .put_query(
            &format!("/cart/{}/update-item/{}", user_id, item_id),
            &[("quantity", quantity.to_string())],
        )
        .await
}

/// Removes a line item, returning the full updated cart.
pub async fn remove_item(client: &ApiClient, user_id: i64, item_id: i64) -> Result<Cart> {
    client
        .delete(&format!("/cart/{}/remove-item/{}", user_id, item_id))
        .await
}

/// Empties the cart. The backend returns no body.
pub async fn clear(client: &ApiClient, user_id: i64) -> Result<()> {
    client.delete_unit(&format!("/cart/{}/clear", user_id)).await
}
