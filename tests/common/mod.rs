//! An in-process stand-in for the storefront backend.
//!
//! Serves the same paths and JSON shapes as the real API, computes cart
//! totals server-side, and records enough about incoming requests for the
//! tests to assert on (fetch counts, auth headers). Failure modes are
//! toggled per test through `BackendState`.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// One cart line held by the fake backend.
#[derive(Clone)]
pub struct Line {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Default)]
pub struct BackendState {
    pub carts: Mutex<HashMap<i64, Vec<Line>>>,
    next_item_id: Mutex<i64>,
    /// GET /cart/{userId} hits, per user.
    pub cart_fetches: Mutex<HashMap<i64, usize>>,
    /// The Authorization header seen on the most recent cart fetch.
    pub last_auth_header: Mutex<Option<String>>,
    pub fail_cart_fetch: AtomicBool,
    pub fail_cart_clear: AtomicBool,
}

impl BackendState {
    fn next_item_id(&self) -> i64 {
        let mut id = self.next_item_id.lock().unwrap();
        *id += 1;
        *id
    }

    pub fn cart_fetch_count(&self, user_id: i64) -> usize {
        *self.cart_fetches.lock().unwrap().get(&user_id).unwrap_or(&0)
    }

    /// Seeds a line into a user's server-side cart.
    pub fn seed_item(&self, user_id: i64, product_id: i64, quantity: i64) {
        let line = Line {
            id: self.next_item_id(),
            product_id,
            quantity,
            price: price_of(product_id),
        };
        self.carts.lock().unwrap().entry(user_id).or_default().push(line);
    }
}

/// The fixed catalog price used for server-side totals.
pub fn price_of(product_id: i64) -> f64 {
    match product_id {
        42 => 9.99,
        43 => 4.50,
        _ => 5.00,
    }
}

fn cart_json(user_id: i64, lines: &[Line]) -> Value {
    let total_items: i64 = lines.iter().map(|l| l.quantity).sum();
    let total_price: f64 = lines.iter().map(|l| l.price * l.quantity as f64).sum();
    json!({
        "id": 1,
        "userId": user_id,
        "cartItems": lines
            .iter()
            .map(|l| json!({
                "id": l.id,
                "productId": l.product_id,
                "quantity": l.quantity,
                "productName": format!("Product {}", l.product_id),
                "productPrice": l.price,
                "subtotal": l.price * l.quantity as f64,
            }))
            .collect::<Vec<_>>(),
        "totalPrice": total_price,
        "totalItems": total_items,
    })
}

fn known_user(username: &str) -> Option<i64> {
    match username {
        "alice" => Some(7),
        "bob" => Some(9),
        _ => None,
    }
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match known_user(username) {
        Some(user_id) if password == "secret" => (
            StatusCode::OK,
            Json(json!({
                "message": "Login successful!",
                "userId": user_id,
                "username": username,
                "role": "CUSTOMER",
                "token": format!("token-{}", username),
            })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials!"})),
        ),
    }
}

async fn register(Json(body): Json<Value>) -> impl IntoResponse {
    if body["username"].as_str() == Some("taken") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Username already exists!"})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({"message": "User registered successfully!", "userId": 11})),
    )
}

fn profile_json(user_id: i64) -> Value {
    json!({
        "id": user_id,
        "username": if user_id == 7 { "alice" } else { "bob" },
        "email": "alice@example.com",
        "firstName": "Alice",
        "role": "CUSTOMER",
        "isActive": true,
        "createdAt": "2024-01-01T09:00:00",
        "updatedAt": "2024-05-01T09:00:00",
    })
}

async fn get_profile(Path(user_id): Path<i64>) -> Json<Value> {
    Json(profile_json(user_id))
}

async fn update_profile(Path(user_id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    let mut profile = profile_json(user_id);
    if let Some(email) = body.get("email") {
        profile["email"] = email.clone();
    }
    Json(profile)
}

async fn get_cart(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    *state.cart_fetches.lock().unwrap().entry(user_id).or_default() += 1;
    *state.last_auth_header.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    if state.fail_cart_fetch.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"})));
    }
    let carts = state.carts.lock().unwrap();
    let lines = carts.get(&user_id).cloned().unwrap_or_default();
    (StatusCode::OK, Json(cart_json(user_id, &lines)))
}

async fn add_item(
    State(state): State<Arc<BackendState>>,
    Path(user_id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let product_id = body["productId"].as_i64().unwrap();
    let quantity = body["quantity"].as_i64().unwrap();
    let line = Line {
        id: state.next_item_id(),
        product_id,
        quantity,
        price: price_of(product_id),
    };
    let mut carts = state.carts.lock().unwrap();
    let lines = carts.entry(user_id).or_default();
    lines.push(line);
    Json(cart_json(user_id, lines))
}

async fn update_item(
    State(state): State<Arc<BackendState>>,
    Path((user_id, item_id)): Path<(i64, i64)>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let quantity: i64 = params
        .get("quantity")
        .and_then(|q| q.parse().ok())
        .unwrap_or(1);
    let mut carts = state.carts.lock().unwrap();
    let lines = carts.entry(user_id).or_default();
    let mut found = false;
    for line in lines.iter_mut() {
        if line.id == item_id {
            line.quantity = quantity;
            found = true;
        }
    }
    if !found {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Cart item not found!"})),
        );
    }
    (StatusCode::OK, Json(cart_json(user_id, lines)))
}

async fn remove_item(
    State(state): State<Arc<BackendState>>,
    Path((user_id, item_id)): Path<(i64, i64)>,
) -> Json<Value> {
    let mut carts = state.carts.lock().unwrap();
    let lines = carts.entry(user_id).or_default();
    lines.retain(|l| l.id != item_id);
    Json(cart_json(user_id, lines))
}

async fn clear_cart(
    State(state): State<Arc<BackendState>>,
    Path(user_id): Path<i64>,
) -> Response {
    if state.fail_cart_clear.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to clear cart"})),
        )
            .into_response();
    }
    state.carts.lock().unwrap().remove(&user_id);
    StatusCode::NO_CONTENT.into_response()
}

fn product_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Product {}", id),
        "price": price_of(id),
        "quantity": 10,
        "category": "mugs",
        "isActive": true,
    })
}

async fn list_products(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let size: i64 = params.get("size").and_then(|s| s.parse().ok()).unwrap_or(10);
    Json(json!({
        "content": [product_json(42), product_json(43)],
        "totalPages": 1,
        "totalElements": 2,
        "number": 0,
        "size": size,
    }))
}

async fn get_product(Path(id): Path<i64>) -> Json<Value> {
    Json(product_json(id))
}

async fn create_product(Json(body): Json<Value>) -> impl IntoResponse {
    let mut product = product_json(100);
    product["name"] = body["name"].clone();
    (StatusCode::CREATED, Json(product))
}

async fn search_products() -> Json<Value> {
    Json(json!([product_json(42)]))
}

async fn in_stock_products() -> Json<Value> {
    Json(json!([product_json(42), product_json(43)]))
}

async fn update_stock(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let quantity: i64 = params
        .get("quantity")
        .and_then(|q| q.parse().ok())
        .unwrap_or(0);
    let mut product = product_json(id);
    product["quantity"] = json!(quantity);
    Json(product)
}

async fn delete_product(Path(_id): Path<i64>) -> StatusCode {
    StatusCode::NO_CONTENT
}

fn order_json(id: i64, user_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "userId": user_id,
        "orderItems": [{"id": 1, "productId": 42, "quantity": 2, "price": 9.99}],
        "status": status,
        "totalPrice": 19.98,
        "orderDate": "2024-05-02T10:00:00",
        "shippingAddress": "1 Main St",
    })
}

async fn create_order(Json(body): Json<Value>) -> impl IntoResponse {
    let user_id = body["userId"].as_i64().unwrap_or(0);
    (StatusCode::CREATED, Json(order_json(5, user_id, "PENDING")))
}

async fn create_order_from_cart(Path(user_id): Path<i64>) -> Json<Value> {
    Json(order_json(6, user_id, "PENDING"))
}

async fn user_orders(Path(user_id): Path<i64>) -> Json<Value> {
    Json(json!([order_json(5, user_id, "PENDING")]))
}

async fn update_order_status(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let status = params.get("status").cloned().unwrap_or_default();
    Json(order_json(id, 7, &status))
}

async fn cancel_order(Path(id): Path<i64>) -> Json<Value> {
    Json(order_json(id, 7, "CANCELLED"))
}

/// Binds the fake backend to an ephemeral port and returns its base URL
/// (including the `/api` prefix) plus the shared state handle.
pub async fn spawn_backend() -> (String, Arc<BackendState>) {
    let state = Arc::new(BackendState::default());

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/profile/{user_id}", get(get_profile))
        .route("/api/auth/profile/{user_id}", put(update_profile))
        .route("/api/cart/{user_id}", get(get_cart))
        .route("/api/cart/{user_id}/add-item", post(add_item))
        .route("/api/cart/{user_id}/update-item/{item_id}", put(update_item))
        .route("/api/cart/{user_id}/remove-item/{item_id}", delete(remove_item))
        .route("/api/cart/{user_id}/clear", delete(clear_cart))
        .route("/api/products", get(list_products))
        .route("/api/products", post(create_product))
        .route("/api/products/search", get(search_products))
        .route("/api/products/in-stock", get(in_stock_products))
        .route("/api/products/{id}", get(get_product))
        .route("/api/products/{id}", delete(delete_product))
        .route("/api/products/{id}/stock", put(update_stock))
        .route("/api/orders", post(create_order))
        .route("/api/orders/from-cart/{user_id}", post(create_order_from_cart))
        .route("/api/orders/user/{user_id}", get(user_orders))
        .route("/api/orders/{id}/status", put(update_order_status))
        .route("/api/orders/{id}/cancel", delete(cancel_order))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), state)
}

/// Polls `condition` until it holds, or panics after ~2 seconds.
pub async fn wait_until(what: &str, condition: impl Fn() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for: {}", what);
}
