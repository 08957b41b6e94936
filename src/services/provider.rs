//! Client for the external identity provider. The provider is opaque to us:
//! we hand it the session id it issued to the browser and get back a profile
//! plus the session token we store verbatim.

use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;

const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderProfile {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    pub id: String,
    pub session_token: String,
}

#[derive(Clone)]
pub struct AuthProvider {
    client: reqwest::Client,
    url: String,
}

impl AuthProvider {
    pub fn new(url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(EXCHANGE_TIMEOUT)
            .build()
            .map_err(|err| AppError::Config(format!("http client: {err}")))?;
        Ok(Self { client, url })
    }

    /// Exchange a provider session id for the user's profile. Network errors
    /// and non-200 responses both surface as an exchange failure; no retry.
    pub async fn exchange(&self, session_id: &str) -> Result<ProviderProfile, AppError> {
        let response = self
            .client
            .get(&self.url)
            .header("X-Session-ID", session_id)
            .send()
            .await
            .map_err(|err| AppError::AuthExchange(err.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::AuthExchange(format!(
                "provider returned {}",
                response.status()
            )));
        }

        response
            .json::<ProviderProfile>()
            .await
            .map_err(|err| AppError::AuthExchange(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_parses_with_and_without_picture() {
        let full: ProviderProfile = serde_json::from_str(
            r#"{"email":"a@b.c","name":"A","picture":"https://p/x.png","id":"g-1","session_token":"tok"}"#,
        )
        .unwrap();
        assert_eq!(full.picture.as_deref(), Some("https://p/x.png"));

        let bare: ProviderProfile = serde_json::from_str(
            r#"{"email":"a@b.c","name":"A","id":"g-1","session_token":"tok"}"#,
        )
        .unwrap();
        assert!(bare.picture.is_none());
    }
}
