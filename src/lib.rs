//! Headless client for the storefront backend.
//!
//! Owns the client-side session and cart state and keeps both in sync
//! with the remote API: the backend stays authoritative for pricing,
//! stock, and totals, while this crate mediates authentication, restart
//! survival, and cart mutations for whatever front end embeds it.

pub mod config;
pub mod error;
pub mod http;
pub mod state;
pub mod storage;
pub mod telemetry;

pub mod models {
    pub mod cart;
    pub mod order;
    pub mod product;
    pub mod user;
}

pub mod api {
    pub mod auth;
    pub mod cart;
    pub mod orders;
    pub mod products;
}

pub mod stores {
    pub mod cart;
    pub mod session;
}

pub mod validation {
    pub mod auth;
}

pub use config::Config;
pub use error::{ClientError, Result};
pub use state::Storefront;
