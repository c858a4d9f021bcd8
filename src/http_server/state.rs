//! Shared handler state

use crate::registration::AdmissionPipeline;

/// State shared by every route.
pub struct AppState {
    pub pipeline: AdmissionPipeline,
    /// Reported by the health check
    pub service_name: String,
    pub email_enabled: bool,
}

impl AppState {
    pub fn new(
        pipeline: AdmissionPipeline,
        service_name: impl Into<String>,
        email_enabled: bool,
    ) -> Self {
        Self {
            pipeline,
            service_name: service_name.into(),
            email_enabled,
        }
    }
}
