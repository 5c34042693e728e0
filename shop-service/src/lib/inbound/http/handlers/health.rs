use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn health(State(state): State<AppState>) -> ApiSuccess<HealthData> {
    ApiSuccess::new(
        StatusCode::OK,
        HealthData {
            status: "ok",
            service: env!("CARGO_PKG_NAME"),
            storage: state.storage_backend.as_str(),
            timestamp: Utc::now(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthData {
    pub status: &'static str,
    pub service: &'static str,
    pub storage: &'static str,
    pub timestamp: DateTime<Utc>,
}
