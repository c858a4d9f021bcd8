//! teamreg CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`, prints errors to
//! stderr, and exits non-zero on failure. All setup lives in the CLI module.

use teamreg::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
