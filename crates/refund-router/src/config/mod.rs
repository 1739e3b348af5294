//! Service settings from the environment, plus the on-disk routing documents.

pub mod documents;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Runtime stage, taken from `APP_ENV`. Controls log formatting only; routing
/// behavior is identical in every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn detect() -> Self {
        match env::var("APP_ENV")
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Everything the routing service reads from its environment: where to
/// listen, how to log, and where the processor/rule/transaction documents
/// live.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub host: String,
    pub port: u16,
    pub log_filter: String,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port_raw = env::var("APP_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let port = port_raw
            .parse()
            .map_err(|_| ConfigError::InvalidPort { value: port_raw.clone() })?;

        Ok(Self {
            environment: AppEnvironment::detect(),
            host: env::var("APP_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port,
            log_filter: env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            config_dir: dir_from_env("APP_CONFIG_DIR", "config"),
            data_dir: dir_from_env("APP_DATA_DIR", "data"),
        })
    }

    /// The socket to bind. `localhost` is accepted as a convenience alias;
    /// anything else must be a literal IP.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host.parse().map_err(|_| ConfigError::InvalidHost {
                value: self.host.clone(),
            })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn processors_path(&self) -> PathBuf {
        self.config_dir.join("processors.json")
    }

    pub fn rules_path(&self) -> PathBuf {
        self.config_dir.join("rules.json")
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.data_dir.join("transactions.json")
    }
}

fn dir_from_env(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT '{value}' is not a valid port number")]
    InvalidPort { value: String },
    #[error("APP_HOST '{value}' is not an IP address or 'localhost'")]
    InvalidHost { value: String },
}
