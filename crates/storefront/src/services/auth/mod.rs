//! Google OAuth sign-in.
//!
//! The storefront has no password store: identity comes entirely from
//! Google's OAuth 2.0 authorization-code flow. The client here covers the
//! three legs we need - building the consent URL, exchanging the code for
//! an access token, and fetching the userinfo profile.
//!
//! # Endpoints
//!
//! - Consent: `https://accounts.google.com/o/oauth2/v2/auth`
//! - Token: `https://oauth2.googleapis.com/token`
//! - Userinfo: `https://openidconnect.googleapis.com/v1/userinfo`

mod error;

pub use error::AuthError;

use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::ExposeSecret;
use serde::Deserialize;
use url::Url;

use crate::config::OAuthConfig;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Scopes requested at consent: enough for an email-keyed account with a
/// display name and avatar, nothing more.
const SCOPES: &str = "openid email profile";

/// Length of the anti-CSRF `state` token.
const STATE_LENGTH: usize = 32;

/// The subset of the provider's userinfo response we act on.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityProfile {
    /// Stable provider-side subject identifier.
    #[serde(rename = "sub")]
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OAuth client for the Google sign-in flow.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    config: OAuthConfig,
    redirect_uri: String,
}

impl OAuthClient {
    /// Create a client. `base_url` is this service's public origin; the
    /// callback lands at `{base_url}/auth/callback`.
    #[must_use]
    pub fn new(config: OAuthConfig, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            redirect_uri: format!("{}/auth/callback", base_url.trim_end_matches('/')),
        }
    }

    /// Generate a fresh random `state` token for one sign-in attempt.
    #[must_use]
    pub fn generate_state() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Build the consent URL the browser is redirected to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MalformedResponse` only if the static authorize
    /// endpoint fails to parse, which would be a build-time mistake.
    pub fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        let mut url = Url::parse(AUTHORIZE_URL)
            .map_err(|e| AuthError::MalformedResponse(format!("authorize url: {e}")))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPES)
            .append_pair("state", state);

        Ok(url.into())
    }

    /// Exchange an authorization code for the user's identity profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Http` on transport failure, `Provider` when
    /// either leg returns a non-success status, and `MalformedResponse`
    /// when the profile lacks an email.
    pub async fn exchange_code(&self, code: &str) -> Result<IdentityProfile, AuthError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose_secret()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", &self.redirect_uri),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(format!("token response: {e}")))?;

        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let profile: IdentityProfile = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(format!("userinfo response: {e}")))?;

        if profile.email.trim().is_empty() {
            return Err(AuthError::MalformedResponse(
                "userinfo response missing email".to_owned(),
            ));
        }

        Ok(profile)
    }
}

async fn provider_error(response: reqwest::Response) -> AuthError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_owned());
    AuthError::Provider { status, message }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client() -> OAuthClient {
        OAuthClient::new(
            OAuthConfig {
                client_id: "client-123".to_owned(),
                client_secret: SecretString::from("shhh"),
            },
            "https://shop.example.com/",
        )
    }

    #[test]
    fn authorize_url_carries_state_and_redirect() {
        let url = client().authorize_url("abc123").expect("url");
        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("state=abc123"));
        assert!(url.contains("client_id=client-123"));
        // Trailing slash on base_url must not double up
        assert!(url.contains(
            "redirect_uri=https%3A%2F%2Fshop.example.com%2Fauth%2Fcallback"
        ));
    }

    #[test]
    fn state_tokens_are_unique_and_sized() {
        let a = OAuthClient::generate_state();
        let b = OAuthClient::generate_state();
        assert_eq!(a.len(), STATE_LENGTH);
        assert_ne!(a, b);
    }
}
