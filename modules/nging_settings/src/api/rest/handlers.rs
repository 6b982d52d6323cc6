//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::SettingsError;
use crate::domain::store::{lookup, redact_secrets};
use crate::domain::validation::validate_group_name;
use crate::domain::Service;
use axum::{extract::Path, http::StatusCode, Json};
use serde_json::Value;
use std::sync::Arc;

// ===== Store reads =====

/// Whole merged store, secrets redacted
pub async fn get_all(service: Arc<Service>) -> Json<Value> {
    let mut store = service.get_config();
    redact_secrets(&mut store);
    Json(Value::Object(store))
}

/// Value (map or leaf) at a slash-separated path
pub async fn get_value(service: Arc<Service>, Path(path): Path<String>) -> Result<Json<Value>, Problem> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut store = service.get_config();
    redact_secrets(&mut store);

    lookup(&store, &segments)
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            map_domain_error(SettingsError::NotFound {
                resource: "setting".to_string(),
                id: segments.join("."),
            })
            .with_instance(format!("/settings/values/{}", path))
        })
}

// ===== Writes =====

/// Persist one entry and refresh its group
pub async fn update_setting(
    service: Arc<Service>,
    Path((group, key)): Path<(String, String)>,
    Json(req): Json<UpdateSettingRequest>,
) -> Result<Json<ConfigEntryDto>, Problem> {
    let entry = service
        .update_setting(&group, &key, req.value)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(entry.into()))
}

/// Re-read one group from the database-backed store
pub async fn reload_group(
    service: Arc<Service>,
    Path(group): Path<String>,
) -> Result<Json<ReloadResponse>, Problem> {
    validate_group_name(&group).map_err(map_domain_error)?;

    let groups = service
        .set_configs(&[group.as_str()])
        .await
        .map_err(map_domain_error)?;

    if !groups.iter().any(|g| g == &group) {
        return Err(map_domain_error(SettingsError::UnknownGroup { group }));
    }

    Ok(Json(ReloadResponse { groups }))
}

// ===== Debug mode =====

pub async fn get_debug(service: Arc<Service>) -> Json<DebugResponse> {
    Json(DebugResponse {
        debug: service.settings().debug,
    })
}

pub async fn set_debug(
    service: Arc<Service>,
    Json(req): Json<DebugRequest>,
) -> (StatusCode, Json<DebugResponse>) {
    service.set_debug(req.on);
    (
        StatusCode::OK,
        Json(DebugResponse {
            debug: service.settings().debug,
        }),
    )
}
