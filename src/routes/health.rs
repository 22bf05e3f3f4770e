use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthData {
    status: u16,
    version: &'static str,
}

/// Liveness only; the flag service and database are not probed.
pub async fn health() -> Json<HealthData> {
    Json(HealthData {
        status: StatusCode::OK.as_u16(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
