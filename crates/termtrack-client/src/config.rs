//! Client settings persisted as `settings.toml`
//!
//! The file lives in the data directory next to `session.json` and is
//! written out with defaults on first run, so users have something to
//! edit rather than a format to guess.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{ClientError, Result};

pub const SETTINGS_FILE: &str = "settings.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 2727;

/// Connection settings for the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Load settings from the data directory, creating the file with
/// defaults when it does not exist yet.
pub fn load_or_init(dir: &Path) -> Result<ClientConfig> {
    let path = dir.join(SETTINGS_FILE);
    match fs::read_to_string(&path) {
        Ok(raw) => toml::from_str(&raw).map_err(|e| ClientError::SettingsParse {
            path,
            message: e.to_string(),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let config = ClientConfig::default();
            fs::create_dir_all(dir)?;
            let raw = toml::to_string(&config).map_err(|e| ClientError::SettingsParse {
                path: path.clone(),
                message: e.to_string(),
            })?;
            fs::write(&path, raw)?;
            Ok(config)
        }
        Err(source) => Err(ClientError::SettingsRead { path, source }),
    }
}
