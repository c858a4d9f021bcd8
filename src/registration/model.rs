//! Registration domain types

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Wire and on-disk rendering of `submitted_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Maximum number of members besides the lead.
pub const MAX_ADDITIONAL_MEMBERS: usize = 4;

/// Inclusive bounds for `team_size`.
pub const MIN_TEAM_SIZE: i64 = 1;
pub const MAX_TEAM_SIZE: i64 = 5;

/// An additional team member (the lead is not a member).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_name: String,
    pub member_email: Option<String>,
}

impl Member {
    pub fn new(member_name: impl Into<String>, member_email: Option<String>) -> Self {
        Self {
            member_name: member_name.into(),
            member_email,
        }
    }

    /// Email as reported to callers; absent renders as the empty string.
    pub fn email_or_empty(&self) -> &str {
        self.member_email.as_deref().unwrap_or("")
    }
}

/// Output of the validator: trimmed, lower-cased and type-converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRegistration {
    pub team_name: String,
    pub problem_track: String,
    pub team_size: u8,
    pub lead_name: String,
    pub lead_email: String,
    pub lead_phone: String,
    pub members: Vec<Member>,
}

/// A durable, admitted registration.
///
/// Constructed only by the admission pipeline (or decoded by a record store)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub identifier: String,
    pub submitted_at: DateTime<Utc>,
    pub team_name: String,
    pub problem_track: String,
    pub team_size: u8,
    pub lead_name: String,
    pub lead_email: String,
    pub lead_phone: String,
    pub additional_members: Vec<Member>,
}

impl Registration {
    /// Assemble a registration from validated input.
    ///
    /// `submitted_at` is truncated to whole seconds.
    pub fn admit(
        identifier: String,
        submitted_at: DateTime<Utc>,
        normalized: NormalizedRegistration,
    ) -> Self {
        Self {
            identifier,
            submitted_at: submitted_at.trunc_subsecs(0),
            team_name: normalized.team_name,
            problem_track: normalized.problem_track,
            team_size: normalized.team_size,
            lead_name: normalized.lead_name,
            lead_email: normalized.lead_email,
            lead_phone: normalized.lead_phone,
            additional_members: normalized.members,
        }
    }

    pub fn registered_at(&self) -> String {
        format_timestamp(&self.submitted_at)
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
