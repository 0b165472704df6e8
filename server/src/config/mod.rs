use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

pub mod cors;

pub use cors::create_cors_layer;

const DEFAULT_TABLE: &str = "events-table";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    #[cfg(feature = "dynamodb")]
    DynamoDb,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("STORE_BACKEND '{0}' is not available in this build")]
    BackendUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub table_name: String,
    pub backend: StoreBackend,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; real environment variables still apply.
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = match lookup("HOST") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "HOST",
                value,
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let table_name = lookup("DYNAMODB_TABLE")
            .filter(|table| !table.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        let backend = match lookup("STORE_BACKEND") {
            Some(value) => parse_backend(&value)?,
            None => StoreBackend::Memory,
        };

        Ok(Self {
            host,
            port,
            table_name,
            backend,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_backend(value: &str) -> Result<StoreBackend, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "memory" => Ok(StoreBackend::Memory),
        #[cfg(feature = "dynamodb")]
        "dynamodb" => Ok(StoreBackend::DynamoDb),
        #[cfg(not(feature = "dynamodb"))]
        "dynamodb" => Err(ConfigError::BackendUnavailable(value.to_string())),
        _ => Err(ConfigError::Invalid {
            name: "STORE_BACKEND",
            value: value.to_string(),
        }),
    }
}
