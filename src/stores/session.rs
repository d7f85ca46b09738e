use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::api::auth as auth_api;
use crate::api::auth::{Credentials, NewAccount, ProfileUpdate};
use crate::error::{ClientError, Result};
use crate::http::ApiClient;
use crate::models::user::Session;
use crate::storage::{CredentialStore, StoredIdentity};
use crate::validation::auth::*;

/// The single source of truth for "who is logged in".
///
/// Holds the in-memory session, mirrors the restart markers into the
/// credential store, and broadcasts user-id changes on a watch channel so
/// dependent stores can re-sync without reaching back into this one.
///
/// Transitions: `loading → {anonymous, authenticated}`; `anonymous →
/// authenticated` only via a successful login; `authenticated → anonymous`
/// only via logout.
pub struct SessionStore {
    api: Arc<ApiClient>,
    credentials: Arc<dyn CredentialStore>,
    session: RwLock<Option<Session>>,
    loading: AtomicBool,
    changes: watch::Sender<Option<i64>>,
}

impl SessionStore {
    /// Creates a new `SessionStore` in the `loading` state.
    pub fn new(api: Arc<ApiClient>, credentials: Arc<dyn CredentialStore>) -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            api,
            credentials,
            session: RwLock::new(None),
            loading: AtomicBool::new(true),
            changes,
        }
    }

    /// Restores the session from the persisted markers, if all of them are
    /// present. Never touches the network: a persisted token is trusted
    /// as-is, and a revoked one surfaces on the next authenticated call.
    ///
    /// Completes synchronously and flips the loading flag exactly once;
    /// repeated calls are no-ops.
    pub fn bootstrap(&self) {
        if !self.loading.load(Ordering::SeqCst) {
            return;
        }

        let restored = self
            .credentials
            .load()
            .filter(StoredIdentity::is_restorable);

        if let Some(markers) = restored {
            let session = Session::from_login(markers.user_id, markers.username, markers.role);
            let user_id = session.id;
            *self.session.write().unwrap() = Some(session);
            self.loading.store(false, Ordering::SeqCst);
            self.changes.send_replace(Some(user_id));
            tracing::info!("✅ Session restored for user {}", user_id);
        } else {
            self.loading.store(false, Ordering::SeqCst);
            tracing::debug!("No persisted session to restore");
        }
    }

    /// Authenticates against the backend.
    ///
    /// On success the four restart markers are persisted together and the
    /// in-memory session is built from the login scalars (email empty,
    /// timestamps defaulted — the response does not carry them). On failure
    /// the session is left unchanged and the error propagates.
    pub async fn login(&self, credentials: Credentials) -> Result<Session> {
        validate_username(&credentials.username)?;
        tracing::info!("🔐 Login attempt for {}", credentials.username);

        let outcome = auth_api::login(&self.api, &credentials).await.map_err(|e| {
            tracing::warn!("Login failed for {}: {}", credentials.username, e);
            e
        })?;

        let markers = StoredIdentity {
            token: outcome.token.clone().unwrap_or_default(),
            user_id: outcome.user_id,
            username: outcome.username.clone(),
            role: outcome.role.clone(),
        };
        let session = Session::from_login(outcome.user_id, outcome.username, outcome.role);

        {
            let mut current = self.session.write().unwrap();
            self.credentials.store(&markers)?;
            *current = Some(session.clone());
        }
        self.changes.send_replace(Some(session.id));

        tracing::info!("✅ User logged in: {}", session.id);
        Ok(session)
    }

    /// Registers a new account. Never mutates session state, whatever the
    /// outcome; the caller decides whether to log in afterwards.
    pub async fn register(&self, account: NewAccount) -> Result<()> {
        validate_username(&account.username)?;
        validate_password(&account.password)?;
        validate_email(&account.email)?;
        tracing::info!("📝 Registering account {}", account.username);

        let receipt = auth_api::register(&self.api, &account).await.map_err(|e| {
            tracing::warn!("Registration failed for {}: {}", account.username, e);
            e
        })?;

        tracing::info!("✅ Registration accepted: {}", receipt.message);
        Ok(())
    }

    /// Clears the persisted markers and the in-memory session together.
    ///
    /// Both are cleared under the session write lock so no reader can
    /// observe a half-logged-out state; if clearing the markers fails,
    /// nothing is cleared and the error propagates.
    pub fn logout(&self) -> Result<()> {
        {
            let mut current = self.session.write().unwrap();
            self.credentials.clear()?;
            *current = None;
        }
        self.changes.send_replace(None);
        tracing::info!("👋 Logged out");
        Ok(())
    }

    /// Sends a partial profile update.
    ///
    /// Deliberately fire-and-forget with respect to local state: the server
    /// stays the source of truth and the response is not merged here. Call
    /// [`SessionStore::refresh_profile`] to re-sync the session afterwards.
    pub async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<()> {
        if let Some(password) = &update.password {
            validate_password(password)?;
        }
        if let Some(email) = &update.email {
            validate_email(email)?;
        }

        auth_api::update_profile(&self.api, user_id, update)
            .await
            .map_err(|e| {
                tracing::warn!("Profile update failed for user {}: {}", user_id, e);
                e
            })?;

        tracing::info!("✅ Profile updated for user {}", user_id);
        Ok(())
    }

    /// Re-reads the authenticated user's profile from the server and
    /// merges it into the in-memory session.
    pub async fn refresh_profile(&self) -> Result<Session> {
        let user_id = self
            .current_user_id()
            .ok_or(ClientError::NotAuthenticated)?;

        let profile = auth_api::fetch_profile(&self.api, user_id).await?;

        let mut current = self.session.write().unwrap();
        match current.as_mut() {
            Some(session) if session.id == user_id => {
                session.username = profile.username;
                session.role = profile.role;
                session.email = profile.email;
                session.is_active = profile.is_active;
                if let Some(created) = profile.created_at {
                    session.created_at = created.and_utc();
                }
                if let Some(updated) = profile.updated_at {
                    session.updated_at = updated.and_utc();
                }
                tracing::debug!("Session refreshed for user {}", user_id);
                Ok(session.clone())
            }
            // Logged out while the fetch was in flight.
            _ => Err(ClientError::NotAuthenticated),
        }
    }

    /// Returns the current session, if any.
    pub fn current_user(&self) -> Option<Session> {
        self.session.read().unwrap().clone()
    }

    /// Returns the current user's id, if authenticated.
    pub fn current_user_id(&self) -> Option<i64> {
        self.session.read().unwrap().as_ref().map(|s| s.id)
    }

    /// Whether a user is logged in. Holds iff a session is present.
    pub fn is_authenticated(&self) -> bool {
        self.session.read().unwrap().is_some()
    }

    /// Whether bootstrap has not completed yet.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Subscribes to user-id changes: `Some(id)` after bootstrap-restore or
    /// login, `None` after logout.
    pub fn subscribe(&self) -> watch::Receiver<Option<i64>> {
        self.changes.subscribe()
    }
}
