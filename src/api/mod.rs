pub mod analytics;
pub mod auth;
pub mod error;
pub mod registers;
pub mod types;
pub mod vehicles;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use error::ApiError;
pub use registers::RegistersApi;
pub use vehicles::VehiclesApi;

use crate::config::ApiConfig;
use crate::session::Session;
use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Fixed page size of every paginated list endpoint.
pub const PAGE_SIZE: u32 = 20;

/// The one HTTP client every view shares.
///
/// Attaches the session's bearer token to each authenticated request and
/// tears the session down on the first 401, whoever issued the request.
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) session: Session,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Starts a request carrying the current access token. The token is read
    /// fresh each time; if it is gone the session has already ended.
    pub(crate) fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.session.access_token().ok_or(ApiError::SessionEnded)?;
        Ok(self
            .client
            .request(method, self.url(path))
            .bearer_auth(token)
            .header("Content-Type", "application/json"))
    }

    /// Sends `request` and decodes a JSON body, mapping every failure onto
    /// [`ApiError`].
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        label: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} failed before a response: {}", label, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!("{} -> {}", label, status);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, text);
            if err.ends_session() {
                tracing::info!("{} returned 401, clearing stored credentials", label);
                self.session.clear();
            } else {
                tracing::warn!("{} failed: {}", label, err);
            }
            return Err(err);
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(ApiError::from)
    }

    pub(crate) async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.authorized(Method::GET, path)?.query(query);
        self.send_json(request, &format!("GET {path}")).await
    }

    pub(crate) async fn send_body<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let label = format!("{method} {path}");
        let request = self.authorized(method, path)?.json(body);
        self.send_json(request, &label).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn client_for(base_url: &str, dir: &TempDir) -> ApiClient {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
        };
        ApiClient::new(&config, Session::load(dir.path().join("session.json"))).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let dir = TempDir::new().unwrap();
        let client = client_for("http://localhost:8000/api/v1/", &dir);
        assert_eq!(client.url("/registers/"), "http://localhost:8000/api/v1/registers/");
        assert_eq!(client.url("auth/token/"), "http://localhost:8000/api/v1/auth/token/");
    }

    #[tokio::test]
    async fn test_missing_token_short_circuits() {
        let dir = TempDir::new().unwrap();
        // Nothing listens here; the request must never be attempted.
        let client = client_for("http://127.0.0.1:9", &dir);
        let result: Result<serde_json::Value, ApiError> = client.get_json("registers/", &[("page", "1")]).await;
        assert_eq!(result.unwrap_err(), ApiError::SessionEnded);
    }
}
