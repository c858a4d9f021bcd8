//! Flat on-disk record format
//!
//! Each registration is stored as one flat JSON object whose keys are exactly
//! [`COLUMNS`]. The member list is nested as a JSON-encoded string so every
//! column stays a scalar. This module is the only place that knows the flat
//! shape; everything else works with [`Registration`].

use serde::{Deserialize, Serialize};

use crate::registration::{parse_timestamp, Member, Registration};

/// Column names, in order. Written once as the header line of a store file.
pub const COLUMNS: [&str; 9] = [
    "hackathon_id",
    "registered_at",
    "team_name",
    "problem_track",
    "team_size",
    "lead_name",
    "lead_email",
    "lead_phone",
    "members",
];

/// One stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoredRecord {
    pub hackathon_id: String,
    pub registered_at: String,
    pub team_name: String,
    pub problem_track: String,
    pub team_size: u8,
    pub lead_name: String,
    pub lead_email: String,
    pub lead_phone: String,
    pub members: String,
}

/// Member as embedded in the `members` column; absent email is `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMember {
    pub member_name: String,
    #[serde(default)]
    pub member_email: String,
}

impl From<&Member> for StoredMember {
    fn from(member: &Member) -> Self {
        Self {
            member_name: member.member_name.clone(),
            member_email: member.email_or_empty().to_string(),
        }
    }
}

impl From<StoredMember> for Member {
    fn from(stored: StoredMember) -> Self {
        let email = stored.member_email.trim().to_string();
        Member {
            member_name: stored.member_name,
            member_email: if email.is_empty() { None } else { Some(email) },
        }
    }
}

impl StoredRecord {
    /// Flatten a registration.
    pub fn encode(registration: &Registration) -> serde_json::Result<Self> {
        let members: Vec<StoredMember> = registration
            .additional_members
            .iter()
            .map(StoredMember::from)
            .collect();

        Ok(Self {
            hackathon_id: registration.identifier.clone(),
            registered_at: registration.registered_at(),
            team_name: registration.team_name.clone(),
            problem_track: registration.problem_track.clone(),
            team_size: registration.team_size,
            lead_name: registration.lead_name.clone(),
            lead_email: registration.lead_email.clone(),
            lead_phone: registration.lead_phone.clone(),
            members: serde_json::to_string(&members)?,
        })
    }

    /// Rebuild the typed registration.
    pub fn decode(self) -> Result<Registration, String> {
        let submitted_at = parse_timestamp(&self.registered_at)
            .ok_or_else(|| format!("invalid registered_at '{}'", self.registered_at))?;

        let members: Vec<StoredMember> = if self.members.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&self.members)
                .map_err(|e| format!("invalid members column: {}", e))?
        };

        Ok(Registration {
            identifier: self.hackathon_id,
            submitted_at,
            team_name: self.team_name,
            problem_track: self.problem_track,
            team_size: self.team_size,
            lead_name: self.lead_name,
            lead_email: self.lead_email,
            lead_phone: self.lead_phone,
            additional_members: members.into_iter().map(Member::from).collect(),
        })
    }
}

/// Header line content.
pub fn header_line() -> String {
    // An array of string literals always serializes.
    serde_json::to_string(&COLUMNS).unwrap_or_default()
}
