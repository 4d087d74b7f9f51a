//! Health endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Liveness payload; `database` reflects a live round-trip, not pool
/// state, so a dropped connection shows up here first.
#[derive(Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let reachable = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    Json(HealthResponse {
        service: "shooties-pos",
        version: env!("CARGO_PKG_VERSION"),
        database: DatabaseHealth { reachable },
    })
}
