use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::user::UserProfile;

/// The login request payload.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The registration payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl NewAccount {
    /// A minimal account payload; the optional profile fields stay unset.
    pub fn new(username: impl Into<String>, password: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
            phone_number: None,
            shipping_address: None,
            billing_address: None,
            role: None,
        }
    }
}

/// A partial profile update; unset fields are omitted from the body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<String>,
}

/// The scalars the backend returns on a successful login. The token is
/// optional: a backend without token issuance leaves it out, and the
/// session then only lives until the process exits.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub user_id: i64,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// A `{message}` acknowledgement body.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: String,
}

/// Authenticates against the backend.
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<LoginOutcome> {
    client.post("/auth/login", credentials).await
}

/// Registers a new customer account.
pub async fn register(client: &ApiClient, account: &NewAccount) -> Result<ServerMessage> {
    client.post("/auth/register", account).await
}

/// Registers a new admin account.
pub async fn register_admin(client: &ApiClient, account: &NewAccount) -> Result<ServerMessage> {
    client.post("/auth/register-admin", account).await
}

/// Fetches a user's full profile.
pub async fn fetch_profile(client: &ApiClient, user_id: i64) -> Result<UserProfile> {
    client.get(&format!("/auth/profile/{}", user_id)).await
}

/// Applies a partial profile update, returning the updated record.
pub async fn update_profile(
    client: &ApiClient,
    user_id: i64,
    update: &ProfileUpdate,
) -> Result<UserProfile> {
    client.put(&format!("/auth/profile/{}", user_id), update).await
}
