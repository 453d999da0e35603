use axum::Json;
use wayfinder_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("wayfinder-api", env!("CARGO_PKG_VERSION")))
}
