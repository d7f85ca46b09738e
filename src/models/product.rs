use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    /// The units in stock. Stock authority lives on the backend.
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

fn default_active() -> bool {
    true
}

/// The product-list response: either a Spring-style page or a flat array,
/// depending on the backend's query handling.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProductPage {
    Paged(PagedProducts),
    Flat(Vec<Product>),
}

/// A Spring-style page of products.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedProducts {
    pub content: Vec<Product>,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub total_elements: i64,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub size: i64,
}

impl ProductPage {
    /// The products on this page, regardless of response shape.
    pub fn products(&self) -> &[Product] {
        match self {
            ProductPage::Paged(page) => &page.content,
            ProductPage::Flat(products) => products,
        }
    }

    /// Consumes the page, returning its products.
    pub fn into_products(self) -> Vec<Product> {
        match self {
            ProductPage::Paged(page) => page.content,
            ProductPage::Flat(products) => products,
        }
    }

    /// The total page count, when the backend paginated the response.
    pub fn total_pages(&self) -> Option<i64> {
        match self {
            ProductPage::Paged(page) => Some(page.total_pages),
            ProductPage::Flat(_) => None,
        }
    }
}
