//! Server configuration from flags and environment.
//!
//! # Responsibility
//! - Declare every tunable as a CLI flag with an environment fallback.
//! - Validate raw values into a typed `ServerConfig` before startup.

use axum::http::HeaderValue;
use clap::Parser;
use contactbook_core::{default_log_level, FallbackPolicy, StoreConfig};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_CORS_ORIGINS: [&str; 2] = [
    "http://localhost:3000",
    "https://contactsmanagerapp.netlify.app",
];

/// Raw command line / environment input.
#[derive(Debug, Clone, Parser)]
#[command(name = "contactbook_server", version, about = "Contact book REST API")]
pub struct Args {
    /// Interface to bind.
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// SQLite database file.
    #[arg(long, env = "DB_PATH", default_value = "contact.db.sqlite3")]
    pub db_path: PathBuf,

    /// Exit instead of running on an in-memory database when the file cannot be opened.
    #[arg(long, env = "DB_NO_MEMORY_FALLBACK")]
    pub no_memory_fallback: bool,

    /// trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotated log files. Stderr only when unset.
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<String>,

    /// Allowed CORS origins (comma-separated in the environment).
    #[arg(
        long = "cors-origin",
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_values = DEFAULT_CORS_ORIGINS
    )]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidOrigin(String),
    NoOrigins,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOrigin(origin) => write!(f, "invalid CORS origin `{origin}`"),
            Self::NoOrigins => write!(f, "at least one CORS origin is required"),
        }
    }
}

impl Error for ConfigError {}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub cors_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let cors_origins = parse_origins(&args.cors_origins)?;
        let fallback = if args.no_memory_fallback {
            FallbackPolicy::Fail
        } else {
            FallbackPolicy::InMemory
        };

        Ok(Self {
            bind_addr: SocketAddr::new(args.host, args.port),
            store: StoreConfig {
                path: Some(args.db_path),
                fallback,
            },
            log_level: args
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: args.log_dir.filter(|dir| !dir.trim().is_empty()),
            cors_origins,
        })
    }
}

/// Default allow-list as header values.
pub fn default_cors_origins() -> Vec<HeaderValue> {
    DEFAULT_CORS_ORIGINS
        .iter()
        .map(|origin| HeaderValue::from_static(origin))
        .collect()
}

fn parse_origins(raw: &[String]) -> Result<Vec<HeaderValue>, ConfigError> {
    let origins = raw
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            // Credentialed CORS needs explicit origins.
            if origin == "*" {
                return Err(ConfigError::InvalidOrigin(origin.to_string()));
            }
            HeaderValue::from_str(origin.trim_end_matches('/'))
                .map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        return Err(ConfigError::NoOrigins);
    }
    Ok(origins)
}
