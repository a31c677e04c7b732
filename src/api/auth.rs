use super::types::{LoginRequest, TokenResponse};
use super::{ApiClient, ApiError};
use crate::session::Tokens;

#[allow(async_fn_in_trait)]
pub trait AuthApi {
    async fn login(&self, username: &str, password: &str) -> Result<(), ApiError>;
    fn logout(&self);
}

impl AuthApi for ApiClient {
    /// Exchanges credentials for a token pair and stores both tokens.
    async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url("auth/token/"))
            .json(&LoginRequest { username, password });

        let response = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!("Login for {} rejected with {}", username, status);
            // A failed login is not the end of a session that never started.
            return Err(match ApiError::from_status(status, text) {
                ApiError::Unauthorized => ApiError::Client {
                    status: status.as_u16(),
                    body: "invalid credentials or server error".to_string(),
                },
                other => other,
            });
        }

        let tokens = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        self.session
            .store(Tokens {
                access: tokens.access,
                refresh: tokens.refresh,
            })
            .map_err(|e| ApiError::Storage(format!("{e:#}")))?;

        tracing::info!("Logged in as {}", username);
        Ok(())
    }

    fn logout(&self) {
        tracing::info!("Logging out");
        self.session.clear();
    }
}
