pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::layout::handlers;
use crate::presets::handlers as presets;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Preset catalog
        .route("/api/v1/presets", get(presets::handle_list_presets))
        // Layout engine
        .route("/api/v1/layout/preview", post(handlers::handle_preview))
        .route("/api/v1/layout/export", post(handlers::handle_export))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::presets::catalog;

    fn app() -> Router {
        build_router(AppState {
            config: Config::default(),
            catalog: catalog(),
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn menu(sizes: &[usize]) -> Value {
        let categories: Vec<Value> = sizes
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let items: Vec<Value> = (0..*n)
                    .map(|j| json!({ "name": format!("Dish {i}.{j}"), "price": 12.5 }))
                    .collect();
                json!({ "name": format!("Section {i}"), "items": items })
            })
            .collect();
        json!({ "categories": categories })
    }

    // ── health & presets ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health() {
        let (status, body) =
            send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "menu-layout");
    }

    #[tokio::test]
    async fn test_list_presets() {
        let (status, body) =
            send(Request::get("/api/v1/presets").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["presets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["bistro", "classic", "gallery"]);
    }

    // ── preview ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_preview_mains_scenario() {
        // bistro desktop has 4 columns.
        let items: Vec<Value> = (0..5)
            .map(|i| json!({ "name": format!("Main {i}"), "price": 18 }))
            .collect();
        let document = json!({ "categories": [{ "name": "MAINS", "items": items }] });
        let (status, body) = send(post_json(
            "/api/v1/layout/preview",
            json!({ "document": document, "presetId": "bistro", "context": "desktop" }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["context"], "desktop");
        assert_eq!(body["palette"]["id"], "chalkboard");
        assert_eq!(body["contentHash"].as_str().unwrap().len(), 64);

        let tiles = body["sections"][0]["tiles"].as_array().unwrap();
        assert_eq!(tiles.len(), 9);
        assert_eq!(tiles[0]["type"], "section_header");
        assert_eq!(tiles[0]["colSpan"], 4);
        let fillers = tiles.iter().filter(|t| t["type"] == "filler").count();
        assert_eq!(fillers, 3);
    }

    #[tokio::test]
    async fn test_preview_excluded_items() {
        let (status, body) = send(post_json(
            "/api/v1/layout/preview",
            json!({
                "document": menu(&[3]),
                "presetId": "classic",
                "context": "mobile",
                "excludedItems": [1]
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        let items = body["sections"][0]["tiles"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|t| t["type"] == "menu_item")
            .count();
        assert_eq!(items, 2);
    }

    #[tokio::test]
    async fn test_preview_unknown_preset_is_404() {
        let (status, body) = send(post_json(
            "/api/v1/layout/preview",
            json!({ "document": menu(&[2]), "presetId": "baroque", "context": "desktop" }),
        ))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "UNKNOWN_PRESET");
    }

    #[tokio::test]
    async fn test_preview_empty_menu_is_422() {
        let (status, body) = send(post_json(
            "/api/v1/layout/preview",
            json!({ "document": menu(&[0]), "presetId": "classic", "context": "desktop" }),
        ))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EMPTY_MENU");
    }

    #[tokio::test]
    async fn test_preview_unknown_excluded_item_is_422() {
        let (status, body) = send(post_json(
            "/api/v1/layout/preview",
            json!({
                "document": menu(&[1]),
                "presetId": "classic",
                "context": "desktop",
                "excludedItems": [42]
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNKNOWN_ITEM");
    }

    #[tokio::test]
    async fn test_preview_blank_preset_is_400() {
        let (status, body) = send(post_json(
            "/api/v1/layout/preview",
            json!({ "document": menu(&[1]), "presetId": " ", "context": "desktop" }),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    // ── export ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_export_paginates() {
        let (status, body) = send(post_json(
            "/api/v1/layout/export",
            json!({
                "document": menu(&[40, 12]),
                "presetId": "classic",
                "orientation": "landscape",
                "pageSize": "a4"
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["orientation"], "landscape");
        assert_eq!(body["context"], "print");

        let pages = body["pages"].as_array().unwrap();
        assert!(pages.len() > 1);
        assert_eq!(body["fill"].as_array().unwrap().len(), pages.len());

        let items: usize = pages
            .iter()
            .map(|p| {
                p["tiles"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .filter(|t| t["type"] == "menu_item")
                    .count()
            })
            .sum();
        assert_eq!(items, 52);
    }

    #[tokio::test]
    async fn test_export_strict_unknown_palette_is_404() {
        let (status, body) = send(post_json(
            "/api/v1/layout/export",
            json!({
                "document": menu(&[2]),
                "presetId": "classic",
                "orientation": "portrait",
                "paletteId": "neon",
                "strictPalette": true
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "UNKNOWN_PALETTE");
    }

    #[tokio::test]
    async fn test_export_lenient_unknown_palette_uses_default() {
        let (status, body) = send(post_json(
            "/api/v1/layout/export",
            json!({
                "document": menu(&[2]),
                "presetId": "gallery",
                "orientation": "portrait",
                "paletteId": "neon"
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["palette"]["id"], "gallery-white");
    }
}
