use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::api::cart as cart_api;
use crate::api::cart::AddItem;
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::cart::Cart;
use crate::models::product::Product;

/// Keeps a server-backed cart in sync with local mutation intents, scoped
/// to whatever user the session store currently reports.
///
/// Every successful mutation replaces the whole cart with the server's
/// returned snapshot; totals are never recomputed locally. Each state
/// write carries a monotonic ticket so a response that was superseded by
/// a later call (or by a user switch) is discarded instead of clobbering
/// newer state.
pub struct CartStore {
    api: Arc<ApiClient>,
    cart: RwLock<Option<Cart>>,
    user: RwLock<Option<i64>>,
    in_flight: AtomicUsize,
    /// Tickets handed to state-writing operations, in issue order.
    issued: AtomicU64,
    /// The highest ticket whose write landed. Read and written only under
    /// the `cart` write lock.
    applied: AtomicU64,
}

/// Decrements the in-flight gauge when dropped, whatever the outcome of
/// the call it brackets.
struct LoadGuard<'a>(&'a AtomicUsize);

impl<'a> LoadGuard<'a> {
    fn new(gauge: &'a AtomicUsize) -> Self {
        gauge.fetch_add(1, Ordering::SeqCst);
        Self(gauge)
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl CartStore {
    /// Creates a new `CartStore` bound to no user.
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            cart: RwLock::new(None),
            user: RwLock::new(None),
            in_flight: AtomicUsize::new(0),
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    fn next_ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Writes `cart` into the store unless a later-issued operation
    /// already landed its write.
    fn apply(&self, ticket: u64, cart: Option<Cart>) -> bool {
        let mut slot = self.cart.write().unwrap();
        let applied = self.applied.load(Ordering::SeqCst);
        if ticket <= applied {
            tracing::debug!(
                "Discarding superseded cart snapshot (ticket {} <= {})",
                ticket,
                applied
            );
            return false;
        }
        self.applied.store(ticket, Ordering::SeqCst);
        *slot = cart;
        true
    }

    fn bound_user(&self) -> Option<i64> {
        *self.user.read().unwrap()
    }

    /// Reacts to a session change: the previous user's cart is discarded
    /// first, then the new user's cart (if any) is fetched — exactly one
    /// reload per change. Driven by [`CartStore::watch_session`].
    pub async fn handle_session_change(&self, user: Option<i64>) {
        *self.user.write().unwrap() = user;
        let ticket = self.next_ticket();
        self.apply(ticket, None);

        match user {
            Some(user_id) => {
                tracing::debug!("Session now user {}, reloading cart", user_id);
                self.load_cart().await;
            }
            None => tracing::debug!("Session cleared, cart discarded"),
        }
    }

    /// Consumes session-change notifications until the sender goes away.
    /// The composition root spawns this on the runtime.
    pub async fn watch_session(self: Arc<Self>, mut sessions: watch::Receiver<Option<i64>>) {
        while sessions.changed().await.is_ok() {
            let user = *sessions.borrow_and_update();
            self.handle_session_change(user).await;
        }
    }

    /// Fetches the bound user's cart.
    ///
    /// Fail-soft: any failure substitutes the well-defined empty cart so
    /// totals are never left undefined. No-op when no user is bound.
    pub async fn load_cart(&self) {
        let Some(user_id) = self.bound_user() else {
            return;
        };
        let _loading = LoadGuard::new(&self.in_flight);
        let ticket = self.next_ticket();

        let cart = match cart_api::fetch(&self.api, user_id).await {
            Ok(cart) => cart,
            Err(e) => {
                tracing::warn!(
                    "Failed to load cart for user {}: {} (substituting empty cart)",
                    user_id,
                    e
                );
                Cart::empty(user_id)
            }
        };
        self.apply(ticket, Some(cart));
    }

    /// Adds `quantity` of `product` to the cart, replacing local state
    /// with the server's returned snapshot. Silently a no-op when no user
    /// is bound; on failure state is unchanged and the error propagates.
    pub async fn add_to_cart(&self, product: &Product, quantity: i64) -> Result<()> {
        let Some(user_id) = self.bound_user() else {
            return Ok(());
        };
        let _loading = LoadGuard::new(&self.in_flight);
        let ticket = self.next_ticket();

        let item = AddItem {
            product_id: product.id,
            quantity,
        };
        match cart_api::add_item(&self.api, user_id, &item).await {
            Ok(cart) => {
                self.apply(ticket, Some(cart));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to add product {} to cart: {}", product.id, e);
                Err(e)
            }
        }
    }

    /// Removes a line item from the cart.
    pub async fn remove_from_cart(&self, item_id: i64) -> Result<()> {
        let Some(user_id) = self.bound_user() else {
            return Ok(());
        };
        let _loading = LoadGuard::new(&self.in_flight);
        let ticket = self.next_ticket();

        match cart_api::remove_item(&self.api, user_id, item_id).await {
            Ok(cart) => {
                self.apply(ticket, Some(cart));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to remove cart item {}: {}", item_id, e);
                Err(e)
            }
        }
    }

    /// Changes a line item's quantity.
    pub async fn update_quantity(&self, item_id: i64, quantity: i64) -> Result<()> {
        let Some(user_id) = self.bound_user() else {
            return Ok(());
        };
        let _loading = LoadGuard::new(&self.in_flight);
        let ticket = self.next_ticket();

        match cart_api::update_item_quantity(&self.api, user_id, item_id, quantity).await {
            Ok(cart) => {
                self.apply(ticket, Some(cart));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to update cart item {}: {}", item_id, e);
                Err(e)
            }
        }
    }

    /// Empties the cart.
    ///
    /// On success the empty placeholder is substituted client-side without
    /// a re-fetch. On failure the true server state is unknown, so the
    /// store re-syncs with a (fail-soft) load before propagating the
    /// error. Clearing an already-empty cart is a harmless repeat.
    pub async fn clear_cart(&self) -> Result<()> {
        let Some(user_id) = self.bound_user() else {
            return Ok(());
        };
        let _loading = LoadGuard::new(&self.in_flight);
        let ticket = self.next_ticket();

        match cart_api::clear(&self.api, user_id).await {
            Ok(()) => {
                self.apply(ticket, Some(Cart::empty(user_id)));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to clear cart for user {}: {}", user_id, e);
                self.load_cart().await;
                Err(e)
            }
        }
    }

    /// Returns the current cart, if one is loaded.
    pub fn cart(&self) -> Option<Cart> {
        self.cart.read().unwrap().clone()
    }

    /// The server-reported item count; `0` when no cart is loaded.
    pub fn item_count(&self) -> i64 {
        self.cart
            .read()
            .unwrap()
            .as_ref()
            .map(|cart| cart.total_items)
            .unwrap_or(0)
    }

    /// The server-reported total price; `0` when no cart is loaded.
    pub fn total(&self) -> f64 {
        self.cart
            .read()
            .unwrap()
            .as_ref()
            .map(|cart| cart.total_price)
            .unwrap_or(0.0)
    }

    /// Whether any cart call is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}
