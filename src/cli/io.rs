//! JSON output for CLI commands
//!
//! One pretty-printed JSON document per command on stdout. Logs go to
//! stderr and never mix with it.

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write `value` as JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write `value` as JSON to stdout.
pub fn write_response<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json(&mut lock, value)
}
