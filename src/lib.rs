//! teamreg - hackathon team registration intake
//!
//! Validates team submissions, assigns `HACK-XXXXXXXX` identifiers, keeps
//! an append-only record file, and emails a confirmation to the team lead
//! in the background.

pub mod cli;
pub mod config;
pub mod http_server;
pub mod notify;
pub mod observability;
pub mod registration;
pub mod store;
