use crate::error::Result;
use crate::http::ApiClient;
use crate::models::order::{CreateOrder, Order};

/// Places an order from explicit line items.
pub async fn create(client: &ApiClient, order: &CreateOrder) -> Result<Order> {
    client.post("/orders", order).await
}

/// Places an order from the user's current cart.
pub async fn create_from_cart(
    client: &ApiClient,
    user_id: i64,
    shipping_address: &str,
    billing_address: &str,
) -> Result<Order> {
    client
        .post_query(
            &format!("/orders/from-cart/{}", user_id),
            &[
                ("shippingAddress", shipping_address.to_string()),
                ("billingAddress", billing_address.to_string()),
            ],
        )
        .await
}

/// Fetches a single order.
pub async fn get(client: &ApiClient, order_id: i64) -> Result<Order> {
    client.get(&format!("/orders/{}", order_id)).await
}

/// Lists a user's orders.
pub async fn for_user(client: &ApiClient, user_id: i64) -> Result<Vec<Order>> {
    client.get(&format!("/orders/user/{}", user_id)).await
}

/// Lists every order. Admin by backend convention.
pub async fn all(client: &ApiClient) -> Result<Vec<Order>> {
    client.get("/orders").await
}

/// Lists orders in a given state.
pub async fn by_status(client: &ApiClient, status: &str) -> Result<Vec<Order>> {
    client.get(&format!("/orders/status/{}", status)).await
}

/// Moves an order to a new state. Admin by backend convention.
pub async fn update_status(client: &ApiClient, order_id: i64, status: &str) -> Result<Order> {
    client
        .put_query(
            &format!("/orders/{}/status", order_id),
            &[("status", status.to_string())],
        )
        .await
}

/// Cancels an order.
pub async fn cancel(client: &ApiClient, order_id: i64) -> Result<Order> {
    client.delete(&format!("/orders/{}/cancel", order_id)).await
}
