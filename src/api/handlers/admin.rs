use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub edge_checks_revocation: bool,
    pub status: String,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        edge_checks_revocation: state.edge.checks_revocation(),
        status: "healthy".to_string(),
    })
}
