use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated identity.
///
/// Constructed client-side from the login response plus the persisted
/// markers; the backend's login payload carries no email or timestamps, so
/// those are defaulted at construction and only become accurate after a
/// profile refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The authenticated user's id.
    pub id: i64,
    /// The authenticated user's username.
    pub username: String,
    /// The authenticated user's role, e.g. `CUSTOMER` or `ADMIN`.
    pub role: String,
    /// The user's email address, empty until refreshed from the server.
    #[serde(default)]
    pub email: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// The timestamp when the session record was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Builds a session from the scalars the backend returns on login,
    /// defaulting the fields the login payload does not carry.
    pub fn from_login(id: i64, username: String, role: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            role,
            email: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A full user record as returned by the profile endpoints.
///
/// The backend serializes timestamps without a zone, hence the naive types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<String>,
    pub role: String,
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
