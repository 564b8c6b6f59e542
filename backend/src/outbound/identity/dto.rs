//! Wire DTOs for the identity provider's token exchange.
//!
//! The provider speaks snake_case JSON; identity fields are validated while
//! converting into the domain user.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{DisplayName, EmailAddress, User, UserId};

/// Response of the code-exchange endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponseDto {
    user: ProviderUserDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderUserDto {
    id: String,
    email: String,
    #[serde(default)]
    user_metadata: ProviderMetadataDto,
    #[serde(default)]
    last_sign_in_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProviderMetadataDto {
    #[serde(default)]
    full_name: Option<String>,
}

impl TokenResponseDto {
    /// Validate the provider record into a domain user.
    pub(crate) fn into_domain_user(self) -> Result<User, String> {
        let ProviderUserDto {
            id,
            email,
            user_metadata,
            last_sign_in_at,
        } = self.user;

        let id = UserId::new(&id).map_err(|error| format!("provider user id: {error}"))?;
        let email =
            EmailAddress::new(email).map_err(|error| format!("provider email: {error}"))?;
        // A blank profile name degrades to "no display name" rather than
        // failing the sign-in.
        let display_name = user_metadata
            .full_name
            .and_then(|name| DisplayName::new(name).ok());

        Ok(User::new(id, email, display_name, last_sign_in_at))
    }
}
