//! CLI command implementations
//!
//! Each command builds only the subsystems it needs:
//! - init: record file
//! - serve: record file, notifier worker, HTTP server
//! - lookup: record file (must already exist)

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use super::args::{Cli, Command, LogArgs};
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::write_response;
use crate::config::{AppConfig, StoreConfig};
use crate::http_server::registration_routes::RegistrationResponse;
use crate::http_server::{AppState, HttpServer};
use crate::notify::Notifier;
use crate::observability::init_logging;
use crate::registration::{identifier, AdmissionPipeline, Registration};
use crate::store::{FileRecordStore, RecordStore};

/// How long in-flight confirmation emails may take after shutdown
const DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    if let Err(e) = init_logging(&cli.logging.to_config()) {
        eprintln!("{}", e);
    }
    run_command(cli.command, &cli.logging)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, logging: &LogArgs) -> CliResult<()> {
    match cmd {
        Command::Init { store } => init(&store.to_config()),
        Command::Serve(args) => serve(args.to_config(logging)),
        Command::Lookup {
            hackathon_id,
            store,
        } => lookup(&store.to_config(), &hackathon_id),
    }
}

/// Create the record file with its header row.
///
/// Running it again on an existing file only reports the record count and
/// never writes to it, so it is safe while `serve` is running.
pub fn init(store: &StoreConfig) -> CliResult<()> {
    let records = if store.path.exists() {
        FileRecordStore::read_records(&store.path)?.len()
    } else {
        FileRecordStore::open(&store.path)?.len()?
    };

    write_response(&json!({
        "initialized": true,
        "data_file": store.path.display().to_string(),
        "records": records,
    }))
}

/// Serve the registration API until Ctrl-C.
pub fn serve(config: AppConfig) -> CliResult<()> {
    let store = Arc::new(FileRecordStore::open(&config.store.path)?);
    let notifier = Notifier::from_config(&config.email)?;
    let email_enabled = notifier.is_enabled();

    if !email_enabled {
        warn!("email disabled; confirmations will only be logged");
    } else if !config.email.uses_authentication() {
        warn!(
            smtp_host = %config.email.smtp_host,
            "SMTP user not set; sending without authentication"
        );
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    let result = rt.block_on(async {
        let queue = notifier.start();
        let pipeline = AdmissionPipeline::new(store, queue);
        info!(
            registrations = pipeline.registration_count().unwrap_or_default(),
            "admission pipeline ready"
        );
        let state = Arc::new(AppState::new(
            pipeline,
            config.service_name.clone(),
            email_enabled,
        ));

        HttpServer::new(config.http.clone(), state)
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    });

    info!("waiting for in-flight confirmations");
    rt.shutdown_timeout(DRAIN_TIMEOUT);
    result
}

/// Print one registration as JSON.
pub fn lookup(store: &StoreConfig, hackathon_id: &str) -> CliResult<()> {
    let registration = find_registration(&store.path, hackathon_id)?;
    write_response(&RegistrationResponse::from(registration))
}

/// Find a registration in an existing record file.
///
/// Reads without opening the store for writing; a running server may own it.
pub fn find_registration(path: &Path, hackathon_id: &str) -> CliResult<Registration> {
    if !path.exists() {
        return Err(CliError::new(
            CliErrorCode::StoreFailed,
            format!(
                "Record file {} does not exist. Run 'teamreg init' first.",
                path.display()
            ),
        ));
    }

    let query = identifier::normalize(hackathon_id);
    FileRecordStore::read_records(path)?
        .into_iter()
        .find(|r| !query.is_empty() && r.identifier.eq_ignore_ascii_case(&query))
        .ok_or_else(|| CliError::not_found(&query))
}
