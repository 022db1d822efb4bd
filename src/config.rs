//! Configuration management for the address book server.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file in the working directory is loaded first if present.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::net::SocketAddr;

/// Configuration for the address book server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Elasticsearch server (default: "http://localhost:9200")
    pub elastic_url: String,

    /// Elasticsearch server version (default: "6.8.6")
    /// 6.x servers need the legacy `contact` document type in document paths.
    pub elastic_version: String,

    /// Index holding one document per contact (default: "book")
    pub index: String,

    /// Address the HTTP server listens on (default: "127.0.0.1:25565")
    pub bind_address: SocketAddr,

    /// HTTP request timeout towards Elasticsearch in seconds (default: 10)
    pub request_timeout: u64,

    /// Wait for an index refresh after each write (default: false)
    pub refresh_on_write: bool,

    /// Log level (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `ELASTIC_URL`: Base URL of the Elasticsearch server
    /// - `ELASTIC_VERSION`: Elasticsearch server version
    /// - `CONTACT_INDEX`: Index name for contacts
    /// - `HTTP_BIND`: Listen address for the HTTP server
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds
    /// - `ELASTIC_REFRESH`: Wait for refresh after writes (true/false)
    /// - `LOG_LEVEL`: Logging level
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let defaults = Config::default();

        let elastic_url = env::var("ELASTIC_URL").unwrap_or(defaults.elastic_url);
        if !elastic_url.starts_with("http://") && !elastic_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "ELASTIC_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let elastic_version = env::var("ELASTIC_VERSION").unwrap_or(defaults.elastic_version);
        if !elastic_version
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::InvalidValue {
                var: "ELASTIC_VERSION".to_string(),
                reason: format!("Must be a version number, got: {}", elastic_version),
            });
        }

        let index = env::var("CONTACT_INDEX").unwrap_or(defaults.index);
        Self::validate_index(&index)?;

        let bind_address = match env::var("HTTP_BIND") {
            Ok(val) => val.parse::<SocketAddr>().map_err(|_| ConfigError::InvalidValue {
                var: "HTTP_BIND".to_string(),
                reason: format!("Must be a socket address like 127.0.0.1:25565, got: {}", val),
            })?,
            Err(_) => defaults.bind_address,
        };

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", defaults.request_timeout)?;
        if request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                var: "REQUEST_TIMEOUT".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let refresh_on_write = Self::parse_env_bool("ELASTIC_REFRESH", defaults.refresh_on_write)?;
        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Config {
            elastic_url,
            elastic_version,
            index,
            bind_address,
            request_timeout,
            refresh_on_write,
            log_level,
        })
    }

    /// Document type segment used in document paths.
    pub fn document_type(&self) -> &'static str {
        if self.elastic_version.starts_with('6') {
            "contact"
        } else {
            "_doc"
        }
    }

    /// Elasticsearch index names must be non-empty and lowercase.
    fn validate_index(index: &str) -> ConfigResult<()> {
        if index.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "CONTACT_INDEX".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }
        if index.chars().any(|c| c.is_uppercase() || c.is_whitespace() || c == '/') {
            return Err(ConfigError::InvalidValue {
                var: "CONTACT_INDEX".to_string(),
                reason: format!("Must be lowercase without spaces or '/', got: {}", index),
            });
        }
        Ok(())
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as bool with a default value.
    fn parse_env_bool(var_name: &str, default: bool) -> ConfigResult<bool> {
        match env::var(var_name) {
            Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be true or false, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            elastic_url: "http://localhost:9200".to_string(),
            elastic_version: "6.8.6".to_string(),
            index: "book".to_string(),
            bind_address: SocketAddr::from(([127, 0, 0, 1], 25565)),
            request_timeout: 10,
            refresh_on_write: false,
            log_level: "info".to_string(),
        }
    }
}
