//! Service configuration
//!
//! Assembled once by the CLI from flags and environment variables, then
//! handed to each subsystem by reference.

use std::path::PathBuf;

use crate::http_server::HttpServerConfig;
use crate::notify::EmailConfig;
use crate::observability::LoggingConfig;

/// Default location of the registration record file
pub const DEFAULT_DATA_FILE: &str = "./registrations.jsonl";

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "hackathon-registration";

/// Record store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the append-only record file
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_name: String,
    pub http: HttpServerConfig,
    pub store: StoreConfig,
    pub email: EmailConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: SERVICE_NAME.to_string(),
            http: HttpServerConfig::default(),
            store: StoreConfig::default(),
            email: EmailConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.service_name, "hackathon-registration");
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.store.path, PathBuf::from("./registrations.jsonl"));
        assert!(config.email.enabled);
        assert_eq!(config.email.smtp_port, 587);
    }
}
