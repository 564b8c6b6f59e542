//! Reqwest-backed identity provider adapter.
//!
//! Builds the authorize redirect and performs the authorization-code
//! exchange against the provider's JSON endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use url::Url;

use crate::domain::User;
use crate::domain::ports::{AuthState, IdentityProvider, IdentityProviderError};

use super::dto::TokenResponseDto;

/// OAuth provider name forwarded on the authorize redirect.
const OAUTH_PROVIDER: &str = "google";

/// Errors raised while constructing the adapter.
#[derive(Debug, thiserror::Error)]
pub enum IdentityBuildError {
    /// The base URL cannot host the provider endpoints.
    #[error("invalid identity provider base URL: {0}")]
    Url(#[from] url::ParseError),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Identity provider adapter speaking JSON over HTTPS.
pub struct HttpIdentityProvider {
    client: Client,
    authorize_endpoint: Url,
    token_endpoint: Url,
    redirect_url: Url,
}

impl HttpIdentityProvider {
    /// Build an adapter rooted at `base_url`; `redirect_url` is this
    /// service's own `/auth/callback` as the provider should call it.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityBuildError`] when the endpoints cannot be derived
    /// or the client fails to construct.
    pub fn new(base_url: &Url, redirect_url: Url) -> Result<Self, IdentityBuildError> {
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(Self {
            client: Client::builder().build()?,
            authorize_endpoint: base.join("authorize")?,
            token_endpoint: base.join("token")?,
            redirect_url,
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::transport(error.to_string())
}

fn upstream_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    IdentityProviderError::upstream(status.as_u16(), String::from_utf8_lossy(body).into_owned())
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    fn authorize_url(&self, state: &AuthState) -> Url {
        let mut url = self.authorize_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("provider", OAUTH_PROVIDER)
            .append_pair("redirect_to", self.redirect_url.as_str())
            .append_pair("state", &state.to_string());
        url
    }

    async fn exchange_code(&self, code: &str) -> Result<User, IdentityProviderError> {
        let response = self
            .client
            .post(self.token_endpoint.clone())
            .json(&json!({
                "code": code,
                "redirect_to": self.redirect_url.as_str(),
            }))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(upstream_error(status, bytes.as_ref()));
        }

        let dto: TokenResponseDto = serde_json::from_slice(bytes.as_ref())
            .map_err(|error| IdentityProviderError::decode(error.to_string()))?;
        dto.into_domain_user().map_err(IdentityProviderError::decode)
    }
}
