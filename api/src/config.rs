use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;

/// Which store backs the API.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    File,
    Memory,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub address: Ipv4Addr,
    pub port: u16,
    pub log_level: String,
    pub db_path: PathBuf,
    /// Path the whisper routes are nested under. Empty mounts them at the root.
    pub api_prefix: String,
    pub store: StoreKind,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        builder(environment())?.build()?.try_deserialize()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.address, self.port))
    }

    /// `api_prefix` with a leading slash and no trailing one, or empty.
    pub fn route_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

/// `WHISPER__`-prefixed variables, e.g. `WHISPER__DB_PATH`.
fn environment() -> Environment {
    Environment::with_prefix("WHISPER").separator("__")
}

/// Defaults, then an optional `config.{toml,yaml,json}`, then `env`.
fn builder(env: Environment) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(config::Config::builder()
        .set_default("address", "127.0.0.1")?
        .set_default("port", 3000_i64)?
        .set_default("log_level", "info")?
        .set_default("db_path", "db.json")?
        .set_default("api_prefix", "/api/v1")?
        .set_default("store", "file")?
        .add_source(config::File::with_name("config").required(false))
        .add_source(env))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: Ipv4Addr::new(127, 0, 0, 1),
            port: 3000u16,
            log_level: String::from("info"),
            db_path: PathBuf::from("db.json"),
            api_prefix: String::from("/api/v1"),
            store: StoreKind::File,
        }
    }
}
