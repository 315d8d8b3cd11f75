//! Configuration for the Ratchet Server
//!
//! This module contains the configuration types and loading functionality.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{ServerError, ServerResult};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host to bind to
    #[serde(default = "default_host")]
    pub bind_address: String,

    /// Log filter directive
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Creator name stamped onto catalog rows
    #[serde(default = "default_creator")]
    pub default_creator: String,
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_filter() -> String {
    "info,ratchet=debug".to_string()
}

fn default_creator() -> String {
    "system".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_host(),
            log_filter: default_log_filter(),
            default_creator: default_creator(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn load() -> ServerResult<Self> {
        let port = match env::var("RATCHET_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| {
                ServerError::Configuration(format!("invalid RATCHET_PORT {:?}: {}", raw, e))
            })?,
            Err(_) => default_port(),
        };

        Ok(Self {
            port,
            bind_address: env::var("RATCHET_BIND_ADDRESS").unwrap_or_else(|_| default_host()),
            log_filter: env::var("RATCHET_LOG_FILTER").unwrap_or_else(|_| default_log_filter()),
            default_creator: env::var("RATCHET_DEFAULT_CREATOR")
                .unwrap_or_else(|_| default_creator()),
        })
    }

    /// Socket address string the listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
