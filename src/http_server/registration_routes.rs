//! Registration HTTP Routes
//!
//! Thin transport over the admission pipeline:
//!
//! - `POST /register` - admit a team
//! - `GET /registration/:id` - look up an admitted team

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

use super::state::AppState;
use crate::registration::{identifier, AdmissionError, AdmissionResult, Registration};

/// Registration routes with shared state
pub fn registration_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .route("/registration/:hackathon_id", get(lookup_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub hackathon_id: String,
    pub registered_at: String,
    pub team_name: String,
    pub email_sent_to: String,
}

impl From<&Registration> for RegisterResponse {
    fn from(registration: &Registration) -> Self {
        Self {
            success: true,
            message: "Registration successful! A confirmation email has been sent to the team lead."
                .to_string(),
            hackathon_id: registration.identifier.clone(),
            registered_at: registration.registered_at(),
            team_name: registration.team_name.clone(),
            email_sent_to: registration.lead_email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamView {
    pub team_name: String,
    pub problem_track: String,
    pub team_size: u8,
}

#[derive(Debug, Serialize)]
pub struct LeadView {
    pub lead_name: String,
    pub lead_email: String,
    pub lead_phone: String,
}

#[derive(Debug, Serialize)]
pub struct MemberView {
    pub member_name: String,
    pub member_email: String,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub success: bool,
    pub hackathon_id: String,
    pub registered_at: String,
    pub team: TeamView,
    pub lead: LeadView,
    pub members: Vec<MemberView>,
}

impl From<Registration> for RegistrationResponse {
    fn from(r: Registration) -> Self {
        let registered_at = r.registered_at();
        Self {
            success: true,
            hackathon_id: r.identifier,
            registered_at,
            team: TeamView {
                team_name: r.team_name,
                problem_track: r.problem_track,
                team_size: r.team_size,
            },
            lead: LeadView {
                lead_name: r.lead_name,
                lead_email: r.lead_email,
                lead_phone: r.lead_phone,
            },
            members: r
                .additional_members
                .into_iter()
                .map(|m| MemberView {
                    member_email: m.email_or_empty().to_string(),
                    member_name: m.member_name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    fn with_details(error: &str, details: Vec<String>) -> Self {
        Self {
            error: error.to_string(),
            details: Some(details),
            message: None,
        }
    }

    fn with_message(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            details: None,
            message: Some(message.into()),
        }
    }
}

impl From<AdmissionError> for ErrorResponse {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::Invalid(errors) => {
                Self::with_details("Validation failed.", errors.into_messages())
            }
            duplicate @ AdmissionError::Duplicate { .. } => {
                Self::with_message("Duplicate registration.", duplicate.to_string())
            }
            AdmissionError::Storage(_) => Self::with_message(
                "Internal server error.",
                "The registration store is unavailable. Please try again later.",
            ),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: AdmissionError) -> ApiError {
    if !err.is_client_error() {
        error!(error = %err, "request failed");
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err)))
}

fn malformed_body(reason: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::with_details(
            "Request body must be valid JSON.",
            vec![reason.into()],
        )),
    )
}

/// Run a pipeline call on the blocking pool; store calls fsync.
async fn run_blocking<T, F>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> AdmissionResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || f(&state)).await {
        Ok(result) => result.map_err(api_error),
        Err(join_err) => {
            error!(error = %join_err, "admission task failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message(
                    "Internal server error.",
                    "The request could not be completed.",
                )),
            ))
        }
    }
}

// ==================
// Handlers
// ==================

/// Registration handler
async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(body) = payload.map_err(|rejection| malformed_body(rejection.body_text()))?;

    let raw: Map<String, Value> = match body {
        Value::Object(map) if !map.is_empty() => map,
        _ => return Err(malformed_body("Expected a non-empty JSON object.")),
    };

    let registration = run_blocking(state, move |state| state.pipeline.admit(&raw)).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse::from(&registration))))
}

/// Lookup handler
async fn lookup_handler(
    State(state): State<Arc<AppState>>,
    Path(hackathon_id): Path<String>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let query = hackathon_id.clone();
    let found = run_blocking(state, move |state| state.pipeline.lookup(&query)).await?;

    match found {
        Some(registration) => Ok(Json(RegistrationResponse::from(registration))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::with_message(
                "Not found.",
                format!(
                    "No registration found for ID '{}'.",
                    identifier::normalize(&hackathon_id)
                ),
            )),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::Member;
    use chrono::{TimeZone, Utc};

    fn registration() -> Registration {
        Registration {
            identifier: "HACK-AB12CD34".to_string(),
            submitted_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            team_name: "Byte Busters".to_string(),
            problem_track: "FinTech".to_string(),
            team_size: 2,
            lead_name: "Asha".to_string(),
            lead_email: "asha@example.com".to_string(),
            lead_phone: "9876543210".to_string(),
            additional_members: vec![Member::new("Ravi", None)],
        }
    }

    #[test]
    fn test_lookup_response_shape() {
        let json = serde_json::to_value(RegistrationResponse::from(registration())).unwrap();
        assert_eq!(json["team"]["team_size"], 2);
        assert_eq!(json["lead"]["lead_email"], "asha@example.com");
        assert_eq!(json["registered_at"], "2025-03-14 09:26:53 UTC");
        assert_eq!(
            json["members"],
            serde_json::json!([{"member_name": "Ravi", "member_email": ""}])
        );
    }

    #[test]
    fn test_error_response_omits_empty_fields() {
        let json = serde_json::to_value(ErrorResponse::from(AdmissionError::Duplicate {
            lead_email: "asha@example.com".to_string(),
        }))
        .unwrap();
        assert_eq!(json["error"], "Duplicate registration.");
        assert!(json.get("details").is_none());
        assert_eq!(
            json["message"],
            "A team with lead email 'asha@example.com' is already registered."
        );
    }
}
