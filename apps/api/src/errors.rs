use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::menu::{CategoryId, ItemId};

/// Deterministic validation failures raised by the layout engine.
///
/// None of these are retryable: re-running with the same input reproduces the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Preset '{preset}' has no grid configuration for context '{context}'")]
    InvalidContext { preset: String, context: String },

    #[error("Menu has no items to lay out")]
    EmptyMenu,

    #[error("Tile '{item}' requests {requested} columns but context '{context}' has {columns}")]
    TileOverflow {
        item: String,
        requested: u16,
        columns: u16,
        context: String,
    },

    #[error("Section '{section}' cannot fit a header and one row of items in {rows_per_page} rows")]
    PageCapacity { section: String, rows_per_page: u32 },

    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    #[error("Tiles overlap at column {col}, row {row} in section '{scope}'")]
    TileOverlap { scope: String, col: u16, row: u32 },

    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    #[error("Unknown category: {0}")]
    UnknownCategory(CategoryId),
}

impl LayoutError {
    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            LayoutError::UnknownPreset(_) => "UNKNOWN_PRESET",
            LayoutError::InvalidContext { .. } => "INVALID_CONTEXT",
            LayoutError::EmptyMenu => "EMPTY_MENU",
            LayoutError::TileOverflow { .. } => "TILE_OVERFLOW",
            LayoutError::PageCapacity { .. } => "PAGE_CAPACITY",
            LayoutError::UnknownPalette(_) => "UNKNOWN_PALETTE",
            LayoutError::TileOverlap { .. } => "TILE_OVERLAP",
            LayoutError::UnknownItem(_) => "UNKNOWN_ITEM",
            LayoutError::UnknownCategory(_) => "UNKNOWN_CATEGORY",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            LayoutError::UnknownPreset(_) | LayoutError::UnknownPalette(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Layout(e) => {
                tracing::info!(code = e.code(), "Layout request rejected: {e}");
                (e.status(), e.code(), e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
