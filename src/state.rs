use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::Result;
use crate::http::ApiClient;
use crate::storage::{CredentialStore, FileCredentials};
use crate::stores::cart::CartStore;
use crate::stores::session::SessionStore;

/// The composition root: wires the credential store, the API client, and
/// the two state stores together, and runs the session→cart sync task.
///
/// Dependencies are passed explicitly — the cart store never reaches into
/// the session store; it only consumes the watch channel handed over
/// here. Must be constructed on a Tokio runtime.
pub struct Storefront {
    config: Config,
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    cart: Arc<CartStore>,
    sync_task: JoinHandle<()>,
}

impl Storefront {
    /// Creates a new `Storefront` with file-backed credentials at the
    /// configured path.
    ///
    /// # Arguments
    ///
    /// * `config` - The client configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Storefront`.
    pub fn new(config: &Config) -> Result<Self> {
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentials::open(&config.credentials_file));
        Self::with_credentials(config, credentials)
    }

    /// Creates a new `Storefront` over a caller-provided credential store.
    pub fn with_credentials(
        config: &Config,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let api = Arc::new(ApiClient::new(config, credentials.clone())?);
        let session = Arc::new(SessionStore::new(api.clone(), credentials));
        let cart = Arc::new(CartStore::new(api.clone()));

        let sync_task = tokio::spawn(cart.clone().watch_session(session.subscribe()));
        tracing::info!("✅ Storefront wired against {}", config.api_base_url);

        Ok(Self {
            config: config.clone(),
            api,
            session,
            cart,
            sync_task,
        })
    }

    /// Restores any persisted session. Call once at startup.
    pub fn bootstrap(&self) {
        self.session.bootstrap();
    }

    /// The session store.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The cart store.
    pub fn cart(&self) -> &Arc<CartStore> {
        &self.cart
    }

    /// The underlying API client, for the stateless endpoint wrappers in
    /// [`crate::api`].
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// The configuration this storefront was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for Storefront {
    fn drop(&mut self) {
        self.sync_task.abort();
    }
}
