//! Server configuration.

use termtrack_auth::AuthConfig;
use termtrack_db::DbConfig;

/// Configuration for the HTTP server and its backing services.
///
/// Defaults run the server on `127.0.0.1:2727` against an embedded
/// in-memory database; environment variables override individual
/// fields for real deployments.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:2727".into(),
            db: DbConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Builds a configuration from `TERMTRACK_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("TERMTRACK_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Ok(endpoint) = std::env::var("TERMTRACK_DB_ENDPOINT") {
            config.db.endpoint = endpoint;
        }
        if let Ok(namespace) = std::env::var("TERMTRACK_DB_NAMESPACE") {
            config.db.namespace = namespace;
        }
        if let Ok(database) = std::env::var("TERMTRACK_DB_DATABASE") {
            config.db.database = database;
        }
        if let Ok(username) = std::env::var("TERMTRACK_DB_USERNAME") {
            config.db.username = username;
        }
        if let Ok(password) = std::env::var("TERMTRACK_DB_PASSWORD") {
            config.db.password = password;
        }
        if let Ok(secs) = std::env::var("TERMTRACK_SESSION_LIFETIME_SECS") {
            match secs.parse() {
                Ok(secs) => config.auth.session_lifetime_secs = secs,
                Err(_) => {
                    tracing::warn!(value = %secs, "Ignoring unparseable TERMTRACK_SESSION_LIFETIME_SECS");
                }
            }
        }
        if let Ok(pepper) = std::env::var("TERMTRACK_PEPPER") {
            config.auth.pepper = Some(pepper);
        }

        config
    }
}
