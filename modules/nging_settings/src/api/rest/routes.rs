//! Route registration and the OpenAPI document

use super::{dto::*, error::Problem, handlers};
use crate::domain::Service;
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// OpenAPI document for the settings endpoints
#[derive(OpenApi)]
#[openapi(
    info(title = "Nging settings API"),
    components(schemas(
        ConfigEntryDto,
        UpdateSettingRequest,
        ReloadResponse,
        DebugRequest,
        DebugResponse
    ))
)]
pub struct ApiDoc;

/// Register all REST routes
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route("/settings", get(get_all_handler))
        .route("/settings/values/{*path}", get(get_value_handler))
        .route("/settings/entries/{group}/{key}", put(update_setting_handler))
        .route("/settings/groups/{group}/reload", post(reload_group_handler))
        .route("/settings/debug", get(get_debug_handler).put(set_debug_handler))
        .route("/settings/openapi.json", get(openapi_handler))
        // Add service as extension for handlers
        .layer(Extension(service))
}

// ===== Handler wrappers that extract service from Extension =====

async fn get_all_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Json<serde_json::Value> {
    handlers::get_all(service).await
}

async fn get_value_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<serde_json::Value>, Problem> {
    handlers::get_value(service, path).await
}

async fn update_setting_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<(String, String)>,
    json: Json<UpdateSettingRequest>,
) -> Result<Json<ConfigEntryDto>, Problem> {
    handlers::update_setting(service, path, json).await
}

async fn reload_group_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<ReloadResponse>, Problem> {
    handlers::reload_group(service, path).await
}

async fn get_debug_handler(Extension(service): Extension<Arc<Service>>) -> Json<DebugResponse> {
    handlers::get_debug(service).await
}

async fn set_debug_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<DebugRequest>,
) -> (StatusCode, Json<DebugResponse>) {
    handlers::set_debug(service, json).await
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
