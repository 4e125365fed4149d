//! Axum route handlers for the Presets API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::presets::PresetSummary;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PresetListResponse {
    pub presets: Vec<PresetSummary>,
}

/// GET /api/v1/presets
///
/// Lists every template with its contexts and palette ids, sorted by id.
pub async fn handle_list_presets(State(state): State<AppState>) -> Json<PresetListResponse> {
    Json(PresetListResponse {
        presets: state.catalog.summaries(),
    })
}
