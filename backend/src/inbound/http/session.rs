//! Session context wrapping the cookie session.
//!
//! Handlers never touch the framework session directly; this wrapper exposes
//! the domain-level operations only. Unreadable or tampered session content
//! reads as "no user" — authentication state degrades, it never errors.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, User};
use crate::domain::ports::AuthState;

pub(crate) const USER_KEY: &str = "user";
pub(crate) const AUTH_STATE_KEY: &str = "auth_state";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user in the session cookie.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0
            .insert(USER_KEY, user)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The current authenticated user, if any.
    ///
    /// Read failures are logged and treated as an absent user.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        match self.0.get::<User>(USER_KEY) {
            Ok(user) => user,
            Err(error) => {
                warn!(%error, "unreadable session user, treating as signed out");
                None
            }
        }
    }

    /// Require an authenticated user or fail with `401 Unauthorized`.
    pub fn require_user(&self) -> Result<User, Error> {
        self.current_user()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Stash the CSRF nonce for an in-flight OAuth login.
    pub fn begin_login(&self, state: &AuthState) -> Result<(), Error> {
        self.0
            .insert(AUTH_STATE_KEY, state)
            .map_err(|error| Error::internal(format!("failed to stash login state: {error}")))
    }

    /// Take (and clear) the stashed login nonce.
    #[must_use]
    pub fn take_login_state(&self) -> Option<AuthState> {
        match self.0.remove_as::<AuthState>(AUTH_STATE_KEY) {
            Some(Ok(state)) => Some(state),
            Some(Err(raw)) => {
                warn!(raw = %raw, "unreadable login state in session");
                None
            }
            None => None,
        }
    }

    /// Drop every session entry, signing the user out.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
