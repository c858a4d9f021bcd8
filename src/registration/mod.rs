//! # Registration Admission
//!
//! The validation-and-admission core:
//!
//! - [`validator`] turns an untrusted JSON object into a normalized submission
//! - [`identifier`] mints `HACK-XXXXXXXX` public identifiers
//! - [`pipeline`] checks uniqueness, persists, and queues the confirmation

pub mod errors;
pub mod identifier;
pub mod model;
pub mod pipeline;
pub mod validator;

pub use errors::{AdmissionError, AdmissionResult, ValidationErrors};
pub use model::{
    format_timestamp, parse_timestamp, Member, NormalizedRegistration, Registration,
    TIMESTAMP_FORMAT,
};
pub use pipeline::AdmissionPipeline;
pub use validator::validate;
