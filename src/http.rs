use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::storage::CredentialStore;

/// The HTTP collaborator every remote call goes through.
///
/// Builds URLs from the configured base, attaches the bearer token when one
/// is persisted, decodes 2xx JSON bodies, and maps non-2xx bodies carrying
/// an `error` field into [`ClientError::Api`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - The client configuration.
    /// * `credentials` - The store the bearer token is read from.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ApiClient`.
    pub fn new(config: &Config, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = self.credentials.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.check(builder).await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends the request and resolves the response status, extracting the
    /// backend's `error` message on rejection.
    async fn check(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("error").and_then(|e| e.as_str().map(String::from)))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        tracing::debug!("API rejected request ({}): {}", status, message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Issues a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.request(Method::GET, path)).await
    }

    /// Issues a GET request with query parameters.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute(self.request(Method::GET, path).query(query)).await
    }

    /// Issues a POST request with a JSON body.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    /// Issues a POST request carrying only query parameters.
    pub async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute(self.request(Method::POST, path).query(query)).await
    }

    /// Issues a PUT request with a JSON body.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    /// Issues a PUT request carrying only query parameters.
    pub async fn put_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute(self.request(Method::PUT, path).query(query)).await
    }

    /// Issues a DELETE request and decodes the JSON response.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.request(Method::DELETE, path)).await
    }

    /// Issues a DELETE request, discarding any response body.
    pub async fn delete_unit(&self, path: &str) -> Result<()> {
        self.check(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}
