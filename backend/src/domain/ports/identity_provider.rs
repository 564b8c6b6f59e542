//! Driven port for the external OAuth identity provider.

use std::fmt;

use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

use crate::domain::user::{EmailAddress, User, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by the identity provider adapter.
    pub enum IdentityProviderError {
        /// The provider answered with a non-success status.
        Upstream { status: u16, body: String } => "identity provider status {status}: {body}",
        /// The request never completed.
        Transport { message: String } => "identity provider transport failure: {message}",
        /// The response arrived but could not be decoded.
        Decode { message: String } => "identity provider response decode failed: {message}",
    }
}

/// Per-login CSRF nonce round-tripped through the authorize redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AuthState(Uuid);

impl AuthState {
    /// Mint a fresh nonce.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the nonce echoed back by the provider.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Port for OAuth sign-in against the identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The provider URL to send the visitor to for sign-in.
    fn authorize_url(&self, state: &AuthState) -> Url;

    /// Exchange the callback's authorization code for the provider's user
    /// record.
    async fn exchange_code(&self, code: &str) -> Result<User, IdentityProviderError>;
}

/// Fixture provider issuing a deterministic user, for handler tests and
/// unconfigured development runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

impl FixtureIdentityProvider {
    /// Id of the user every code exchange resolves to.
    pub const USER_ID: &'static str = "123e4567-e89b-12d3-a456-426614174000";
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    fn authorize_url(&self, state: &AuthState) -> Url {
        let mut url = Url::parse("https://identity.invalid/authorize")
            .unwrap_or_else(|err| panic!("fixture authorize URL failed to parse: {err}"));
        url.query_pairs_mut()
            .append_pair("provider", "google")
            .append_pair("state", &state.to_string());
        url
    }

    async fn exchange_code(&self, _code: &str) -> Result<User, IdentityProviderError> {
        let id = UserId::new(Self::USER_ID)
            .map_err(|err| IdentityProviderError::decode(format!("fixture user id: {err}")))?;
        let email = EmailAddress::new("fixture@example.com")
            .map_err(|err| IdentityProviderError::decode(format!("fixture email: {err}")))?;
        Ok(User::new(id, email, None, None))
    }
}
