//! Authenticated user identity.
//!
//! Users are owned and issued by the external identity provider; this
//! service only reads them. The record travels in the cookie session and is
//! never persisted locally.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by the identity constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    InvalidEmail,
    EmptyDisplayName,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::InvalidEmail => write!(f, "email address must contain a local part and domain"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier issued by the identity provider (UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from a raw string.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email address reported by the identity provider.
///
/// Validation is intentionally shallow: the provider is authoritative, so
/// only the shape needed for display is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human-readable display name from the provider's profile metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authenticated user as issued by the identity provider.
///
/// ## Invariants
/// - `id` is a valid UUID and `email` has a local part and domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(value_type = String, example = "ada@example.com")]
    email: EmailAddress,
    #[schema(value_type = Option<String>, example = "Ada Lovelace")]
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<DisplayName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_sign_in_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a [`User`] from validated components.
    #[must_use]
    pub const fn new(
        id: UserId,
        email: EmailAddress,
        display_name: Option<DisplayName>,
        last_sign_in_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            email,
            display_name,
            last_sign_in_at,
        }
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Provider-reported email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Profile display name, when the provider supplied one.
    #[must_use]
    pub const fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// Timestamp of the most recent sign-in, when reported.
    #[must_use]
    pub const fn last_sign_in_at(&self) -> Option<DateTime<Utc>> {
        self.last_sign_in_at
    }

    /// The name to greet the user with: display name, falling back to email.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_ref()
            .map_or_else(|| self.email.as_ref(), AsRef::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
            EmailAddress::new("ada@example.com").expect("fixture email"),
            Some(DisplayName::new("Ada Lovelace").expect("fixture name")),
            None,
        )
    }

    #[test]
    fn rejects_non_uuid_ids() {
        assert_eq!(UserId::new("not-a-uuid"), Err(UserValidationError::InvalidId));
        assert_eq!(UserId::new(""), Err(UserValidationError::EmptyId));
    }

    #[test]
    fn rejects_addresses_without_local_part_or_domain() {
        assert!(EmailAddress::new("ada@example.com").is_ok());
        for bad in ["", "ada", "@example.com", "ada@"] {
            assert_eq!(
                EmailAddress::new(bad),
                Err(UserValidationError::InvalidEmail),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn display_label_prefers_the_profile_name() {
        assert_eq!(user().display_label(), "Ada Lovelace");
    }

    #[test]
    fn display_label_falls_back_to_email() {
        let user = User::new(
            UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
            EmailAddress::new("ada@example.com").expect("fixture email"),
            None,
            None,
        );
        assert_eq!(user.display_label(), "ada@example.com");
    }

    #[test]
    fn serialises_to_camel_case() {
        let value = serde_json::to_value(user()).expect("serializable user");
        assert_eq!(value["displayName"], "Ada Lovelace");
        assert_eq!(value["email"], "ada@example.com");
        assert!(value.get("lastSignInAt").is_none());
    }
}
