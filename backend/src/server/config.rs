//! HTTP server configuration object.

use actix_web::cookie::Key;
use captionboard::outbound::persistence::DbPool;
use std::net::SocketAddr;
use url::Url;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) caption_api: Option<CaptionApiSettings>,
    pub(crate) identity: Option<IdentitySettings>,
}

/// Captioning API connection settings.
pub struct CaptionApiSettings {
    pub base_url: Url,
    pub token: String,
}

/// Identity provider connection settings.
pub struct IdentitySettings {
    pub base_url: Url,
    pub redirect_url: Url,
}

impl ServerConfig {
    /// Construct a server configuration from the session and bind settings.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
            db_pool: None,
            caption_api: None,
            identity: None,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// Without one, the feed, vote, and theme ports fall back to fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: Option<DbPool>) -> Self {
        self.db_pool = pool;
        self
    }

    /// Attach captioning API settings for the upload proxy.
    #[must_use]
    pub fn with_caption_api(mut self, settings: Option<CaptionApiSettings>) -> Self {
        self.caption_api = settings;
        self
    }

    /// Attach identity provider settings for OAuth sign-in.
    #[must_use]
    pub fn with_identity(mut self, settings: Option<IdentitySettings>) -> Self {
        self.identity = settings;
        self
    }
}
