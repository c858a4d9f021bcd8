//! CLI module
//!
//! Provides command-line interface for:
//! - init: Create the registration record file
//! - serve: Run the HTTP API with background confirmation email
//! - lookup: Print one stored registration

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, LogArgs, ServeArgs, StoreArgs};
pub use commands::{find_registration, init, lookup, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_json, write_response};
