//! CLI argument definitions using clap
//!
//! Commands:
//! - teamreg init [--data-file <path>]
//! - teamreg serve [--port <port>] [--smtp-host <host>] ...
//! - teamreg lookup <HACKATHON_ID> [--data-file <path>]
//!
//! Every flag can also be set through its environment variable.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{AppConfig, StoreConfig, DEFAULT_DATA_FILE, SERVICE_NAME};
use crate::http_server::HttpServerConfig;
use crate::notify::EmailConfig;
use crate::observability::{LogFormat, LoggingConfig};

/// teamreg - hackathon team registration service
#[derive(Parser, Debug)]
#[command(name = "teamreg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub logging: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the registration record file if it does not exist
    Init {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Serve the registration HTTP API
    Serve(ServeArgs),

    /// Print a stored registration as JSON
    Lookup {
        /// Identifier, e.g. HACK-AB12CD34 (case-insensitive)
        hackathon_id: String,

        #[command(flatten)]
        store: StoreArgs,
    },
}

/// Logging flags, accepted before or after the subcommand
#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log filter directive (RUST_LOG overrides)
    #[arg(long, env = "TEAMREG_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "TEAMREG_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json, global = true)]
    pub log_format: LogFormat,
}

impl LogArgs {
    pub fn to_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format,
        }
    }
}

/// Record store flags
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Path of the registration record file
    #[arg(long, env = "TEAMREG_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,
}

impl StoreArgs {
    pub fn to_config(&self) -> StoreConfig {
        StoreConfig {
            path: self.data_file.clone(),
        }
    }
}

/// Flags for `serve`
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "TEAMREG_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "TEAMREG_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Allowed CORS origin; repeat or comma-separate. Empty allows any origin.
    #[arg(long = "cors-origin", env = "TEAMREG_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    #[command(flatten)]
    pub store: StoreArgs,

    /// SMTP server host
    #[arg(long, env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub smtp_host: String,

    /// SMTP server port (465 uses implicit TLS, others STARTTLS)
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// SMTP username
    #[arg(long, env = "SMTP_USER", default_value = "")]
    pub smtp_user: String,

    /// SMTP password
    #[arg(long, env = "SMTP_PASSWORD", default_value = "", hide_env_values = true)]
    pub smtp_password: String,

    /// Sender address; defaults to the SMTP username
    #[arg(long, env = "SMTP_FROM", default_value = "")]
    pub smtp_from: String,

    /// Send confirmation emails (true/false)
    #[arg(
        long,
        env = "EMAIL_ENABLED",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub email_enabled: bool,
}

impl ServeArgs {
    /// Build the full service configuration.
    pub fn to_config(&self, logging: &LogArgs) -> AppConfig {
        AppConfig {
            service_name: SERVICE_NAME.to_string(),
            http: HttpServerConfig {
                host: self.host.clone(),
                port: self.port,
                cors_origins: self
                    .cors_origins
                    .iter()
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect(),
            },
            store: self.store.to_config(),
            email: EmailConfig {
                enabled: self.email_enabled,
                smtp_host: self.smtp_host.clone(),
                smtp_port: self.smtp_port,
                smtp_user: self.smtp_user.clone(),
                smtp_password: self.smtp_password.clone(),
                from_email: self.smtp_from.clone(),
                ..EmailConfig::default()
            },
            logging: logging.to_config(),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
