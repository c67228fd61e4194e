//! Google OAuth for the admin panel.
//!
//! The handshake mirrors the storefront's, with one difference that matters:
//! the callback refuses to establish a session for anyone off the admin
//! allow-list.

use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::OAuthConfig;
use crate::db::RepositoryError;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

const SCOPES: &str = "openid email profile";
const STATE_LENGTH: usize = 32;

/// Errors during the admin sign-in flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request to the identity provider failed.
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("identity provider error: {status} - {message}")]
    Provider { status: u16, message: String },

    /// The `state` parameter did not match the value stored in the session.
    #[error("oauth state mismatch")]
    StateMismatch,

    /// Provider response was missing a required field.
    #[error("malformed identity response: {0}")]
    MalformedResponse(String),

    /// The account is not on the admin allow-list.
    #[error("account is not an admin")]
    NotAdmin,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Session read/write failed.
    #[error("session error")]
    Session,
}

/// The subset of the provider's userinfo response we act on.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityProfile {
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

/// OAuth client for the admin sign-in flow.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    config: OAuthConfig,
    redirect_uri: String,
}

impl OAuthClient {
    /// Create a client; the callback lands at `{base_url}/auth/callback`.
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
    /// endpoint fails to parse.
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
    /// Returns `AuthError::Http` on transport failure, `Provider` on a
    /// non-success status, `MalformedResponse` on an email-less profile.
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
