use serde::Serialize;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::product::{Product, ProductPage};

/// The payload for creating a product. Admin by backend convention; the
/// client does not enforce roles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_active: bool,
}

/// A partial product update; unset fields are omitted from the body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Lists products, optionally filtered by category or search text.
pub async fn list(
    client: &ApiClient,
    page: i64,
    size: i64,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<ProductPage> {
    let mut query = vec![
        ("page", page.to_string()),
        ("size", size.to_string()),
    ];
    if let Some(category) = category {
        query.push(("category", category.to_string()));
    }
    if let Some(search) = search {
        query.push(("search", search.to_string()));
    }
    client.get_query("/products", &query).await
}

/// Fetches a single product.
pub async fn get(client: &ApiClient, product_id: i64) -> Result<Product> {
    client.get(&format!("/products/{}", product_id)).await
}

/// Lists the products in a category.
pub async fn by_category(client: &ApiClient, category: &str) -> Result<Vec<Product>> {
    client.get(&format!("/products/category/{}", category)).await
}

/// Searches products by free text.
pub async fn search(client: &ApiClient, query: &str) -> Result<Vec<Product>> {
    client
        .get_query("/products/search", &[("query", query.to_string())])
        .await
}

/// Lists products currently in stock.
pub async fn in_stock(client: &ApiClient) -> Result<Vec<Product>> {
    client.get("/products/in-stock").await
}

/// Creates a product.
pub async fn create(client: &ApiClient, product: &NewProduct) -> Result<Product> {
    client.post("/products", product).await
}

/// Applies a partial product update.
pub async fn update(
    client: &ApiClient,
    product_id: i64,
    update: &ProductUpdate,
) -> Result<Product> {
    client.put(&format!("/products/{}", product_id), update).await
}

/// Deletes a product.
pub async fn delete(client: &ApiClient, product_id: i64) -> Result<()> {
    client.delete_unit(&format!("/products/{}", product_id)).await
}

/// Sets a product's stock level.
pub async fn update_stock(client: &ApiClient, product_id: i64, quantity: i64) -> Result<Product> {
    client
        .put_query(
            &format!("/products/{}/stock", product_id),
            &[("quantity", quantity.to_string())],
        )
        .await
}
