//! Backend entry-point: configuration, logging, and server bootstrap.

mod server;

use std::net::SocketAddr;

use actix_web::cookie::Key;
use actix_web::web;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use captionboard::inbound::http::health::HealthState;
use captionboard::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{CaptionApiSettings, IdentitySettings, ServerConfig, create_server};

/// Caption-voting backend.
#[derive(Debug, Parser)]
#[command(name = "captionboard", version, about)]
struct Cli {
    /// Socket address to bind.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// PostgreSQL connection URL; feed, votes, and themes serve fixture data
    /// when absent.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Run pending migrations before serving.
    #[arg(long, default_value_t = false)]
    run_migrations: bool,

    /// File holding the session key material.
    #[arg(long, env = "SESSION_KEY_FILE", default_value = "/var/run/secrets/session_key")]
    session_key_file: String,

    /// Allow an ephemeral session key when the key file is unreadable.
    #[arg(long, env = "SESSION_ALLOW_EPHEMERAL", default_value_t = false)]
    session_allow_ephemeral: bool,

    /// Set the Secure attribute on the session cookie.
    #[arg(long, env = "SESSION_COOKIE_SECURE", default_value_t = true, action = clap::ArgAction::Set)]
    cookie_secure: bool,

    /// Captioning API base URL.
    #[arg(long, env = "CAPTION_API_BASE_URL")]
    caption_api_base_url: Option<Url>,

    /// Captioning API bearer token.
    #[arg(long, env = "CAPTION_API_TOKEN", hide_env_values = true)]
    caption_api_token: Option<String>,

    /// Identity provider base URL.
    #[arg(long, env = "AUTH_BASE_URL")]
    auth_base_url: Option<Url>,

    /// Public URL of this service's /auth/callback, as registered with the
    /// provider.
    #[arg(long, env = "AUTH_REDIRECT_URL")]
    auth_redirect_url: Option<Url>,
}

fn load_session_key(cli: &Cli) -> std::io::Result<Key> {
    match std::fs::read(&cli.session_key_file) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(error) => {
            if cfg!(debug_assertions) || cli.session_allow_ephemeral {
                warn!(path = %cli.session_key_file, error = %error, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {error}",
                    cli.session_key_file
                )))
            }
        }
    }
}

fn caption_api_settings(cli: &Cli) -> Option<CaptionApiSettings> {
    match (&cli.caption_api_base_url, &cli.caption_api_token) {
        (Some(base_url), Some(token)) => Some(CaptionApiSettings {
            base_url: base_url.clone(),
            token: token.clone(),
        }),
        _ => None,
    }
}

fn identity_settings(cli: &Cli) -> Option<IdentitySettings> {
    match (&cli.auth_base_url, &cli.auth_redirect_url) {
        (Some(base_url), Some(redirect_url)) => Some(IdentitySettings {
            base_url: base_url.clone(),
            redirect_url: redirect_url.clone(),
        }),
        _ => None,
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let key = load_session_key(&cli)?;

    if cli.run_migrations {
        match &cli.database_url {
            Some(database_url) => run_migrations(database_url).map_err(std::io::Error::other)?,
            None => warn!("--run-migrations set without a database URL, skipping"),
        }
    }

    let db_pool = match &cli.database_url {
        Some(database_url) => Some(
            DbPool::new(PoolConfig::new(database_url.as_str()))
                .await
                .map_err(|error| std::io::Error::other(error.to_string()))?,
        ),
        None => None,
    };

    let config = ServerConfig::new(key, cli.cookie_secure, cli.bind)
        .with_db_pool(db_pool)
        .with_caption_api(caption_api_settings(&cli))
        .with_identity(identity_settings(&cli));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    health_state.mark_ready();
    server.await
}
