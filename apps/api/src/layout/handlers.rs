//! Axum route handlers for the Layout API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, LayoutError};
use crate::layout::page_size::{Orientation, PageConfig, PageSize};
use crate::layout::paginator::PaginationPolicy;
use crate::layout::pipeline::{export, preview, ExportOptions, PaginatedLayout};
use crate::layout::tile::LayoutInstance;
use crate::menu::{ItemId, MenuDocument, MenuSource};
use crate::presets::{PaletteFallback, StyledLayout};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub document: MenuSource,
    pub preset_id: String,
    pub context: String,
    pub palette_id: Option<String>,
    /// Items hidden by the menu owner. Ids are assigned in document order.
    #[serde(default)]
    pub excluded_items: Vec<ItemId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    /// Memo key component for callers that cache layouts.
    pub content_hash: String,
    #[serde(flatten)]
    pub layout: StyledLayout<LayoutInstance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub document: MenuSource,
    pub preset_id: String,
    pub orientation: Orientation,
    pub page_size: Option<PageSize>,
    pub context: Option<String>,
    pub palette_id: Option<String>,
    #[serde(default)]
    pub strict_palette: bool,
    #[serde(default)]
    pub excluded_items: Vec<ItemId>,
    pub keep_sections_whole: Option<bool>,
    pub repeat_header_on_continuation: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub content_hash: String,
    #[serde(flatten)]
    pub layout: StyledLayout<PaginatedLayout>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/layout/preview
///
/// Packs the menu for one screen context and attaches the resolved palette.
/// Unknown palette ids fall back to the template default.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    require_non_empty("presetId", &request.preset_id)?;
    require_non_empty("context", &request.context)?;

    let catalog = state.catalog;
    let response = tokio::task::spawn_blocking(move || -> Result<PreviewResponse, LayoutError> {
        let document = build_document(&request.document, &request.excluded_items)?;
        let layout = preview(
            &document,
            catalog,
            &request.preset_id,
            &request.context,
            request.palette_id.as_deref(),
            PaletteFallback::UseDefault,
        )?;
        Ok(PreviewResponse {
            content_hash: document.content_hash(),
            layout,
        })
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in preview: {e}")))??;

    Ok(Json(response))
}

/// POST /api/v1/layout/export
///
/// Packs the menu for a fixed-page context and paginates it. Page size defaults to
/// `DEFAULT_PAGE_SIZE`; margins come from `PAGE_MARGIN_PT`.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Json<ExportResponse>, AppError> {
    require_non_empty("presetId", &request.preset_id)?;
    if let Some(context) = &request.context {
        require_non_empty("context", context)?;
    }

    let defaults = PaginationPolicy::default();
    let options = ExportOptions {
        page: PageConfig {
            size: request.page_size.unwrap_or(state.config.default_page_size),
            orientation: request.orientation,
            margin_pt: state.config.page_margin_pt,
        },
        context: request.context.clone(),
        palette_id: request.palette_id.clone(),
        palette_fallback: if request.strict_palette {
            PaletteFallback::Strict
        } else {
            PaletteFallback::UseDefault
        },
        pagination: PaginationPolicy {
            keep_sections_whole: request
                .keep_sections_whole
                .unwrap_or(defaults.keep_sections_whole),
            repeat_header_on_continuation: request
                .repeat_header_on_continuation
                .unwrap_or(defaults.repeat_header_on_continuation),
        },
    };

    let catalog = state.catalog;
    let response = tokio::task::spawn_blocking(move || -> Result<ExportResponse, LayoutError> {
        let document = build_document(&request.document, &request.excluded_items)?;
        let layout = export(&document, catalog, &request.preset_id, &options)?;
        Ok(ExportResponse {
            content_hash: document.content_hash(),
            layout,
        })
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;

    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn build_document(source: &MenuSource, excluded: &[ItemId]) -> Result<MenuDocument, LayoutError> {
    let mut document = MenuDocument::from_source(source);
    for id in excluded {
        document.exclude_item(*id)?;
    }
    Ok(document)
}
