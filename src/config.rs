use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// The client's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The base URL of the storefront API, including the `/api` prefix.
    pub api_base_url: String,
    /// The per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// The path of the file holding the persisted identity markers.
    pub credentials_file: PathBuf,
}

impl Config {
    /// Creates a new `Config` from environment variables, loading a
    /// `.env` file first when one is present.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api_base_url: env::var("STOREFRONT_API_URL")
                .context("STOREFRONT_API_URL must be set (e.g. http://localhost:8080/api)")?
                .trim_end_matches('/')
                .to_string(),
            request_timeout_secs: env::var("STOREFRONT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid STOREFRONT_TIMEOUT_SECS")?,
            credentials_file: env::var("STOREFRONT_CREDENTIALS_FILE")
                .unwrap_or_else(|_| ".storefront-credentials.json".to_string())
                .into(),
        })
    }

    /// Creates a `Config` pointing at the given API base URL, with
    /// defaults for everything else.
    pub fn for_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            request_timeout_secs: 30,
            credentials_file: ".storefront-credentials.json".into(),
        }
    }
}
