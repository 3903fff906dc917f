use std::env;
use std::net::SocketAddr;

use employee_shared::store::dynamo::{EMAIL_TABLE_NAME, TABLE_NAME};
use http::HeaderValue;
use thiserror::Error;

pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Which EmployeeStore implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

/// Runtime configuration, read once from the environment at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub table_name: String,
    pub email_table_name: String,
    /// The single origin allowed to make cross-origin requests
    pub cors_allowed_origin: HeaderValue,
    /// Prefix the routes are nested under; empty for none
    pub base_path: String,
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::DynamoDb,
            table_name: TABLE_NAME.to_string(),
            email_table_name: EMAIL_TABLE_NAME.to_string(),
            cors_allowed_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            base_path: String::new(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let store_backend = match lookup("STORE_BACKEND").as_deref().map(str::to_lowercase) {
            None => defaults.store_backend,
            Some(backend) => match backend.as_str() {
                "dynamodb" | "dynamo" => StoreBackend::DynamoDb,
                "memory" => StoreBackend::Memory,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "STORE_BACKEND",
                        value: backend,
                    })
                }
            },
        };

        let cors_allowed_origin = match lookup("CORS_ALLOWED_ORIGIN") {
            None => defaults.cors_allowed_origin,
            Some(origin) => {
                HeaderValue::from_str(&origin).map_err(|_| ConfigError::InvalidValue {
                    name: "CORS_ALLOWED_ORIGIN",
                    value: origin.clone(),
                })?
            }
        };

        let base_path = lookup("API_BASE_PATH")
            .map(|path| path.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_path);
        if !base_path.is_empty() && !base_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                name: "API_BASE_PATH",
                value: base_path,
            });
        }

        let bind_addr = match lookup("BIND_ADDR") {
            None => defaults.bind_addr,
            Some(addr) => addr.parse().map_err(|_| ConfigError::InvalidValue {
                name: "BIND_ADDR",
                value: addr.clone(),
            })?,
        };

        Ok(Self {
            store_backend,
            table_name: lookup("DYNAMODB_TABLE").unwrap_or(defaults.table_name),
            email_table_name: lookup("DYNAMODB_EMAIL_TABLE").unwrap_or(defaults.email_table_name),
            cors_allowed_origin,
            base_path,
            bind_addr,
        })
    }
}
