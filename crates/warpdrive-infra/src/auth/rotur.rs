use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use warpdrive_core::ports::{AuthError, IdentityValidator};

const VALIDATE_TIMEOUT: Duration = Duration::from_secs(3);

/// Client for the Rotur validation service.
///
/// A validator token has the shape `<username>,<opaque proof>`; the service
/// confirms the proof and this client hands back the username.
pub struct RoturValidator {
    client: reqwest::Client,
    endpoint: String,
    key: String,
}

impl RoturValidator {
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            key: key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    valid: bool,
}

#[async_trait]
impl IdentityValidator for RoturValidator {
    async fn validate(&self, token: &str) -> Result<String, AuthError> {
        let token = token.trim();
        if token.is_empty() || self.key.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let username = token.split(',').next().unwrap_or_default();
        if username.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", self.key.as_str()), ("v", token)])
            .timeout(VALIDATE_TIMEOUT)
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let body: ValidateResponse = response
            .json()
            .await
            .map_err(|_| AuthError::InvalidToken)?;

        if body.valid {
            Ok(username.to_string())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}
