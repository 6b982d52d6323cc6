//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ===== Config entry DTOs =====

/// A stored config entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntryDto {
    #[schema(example = "email")]
    pub group: String,

    #[schema(example = "sender")]
    pub key: String,

    pub label: String,

    /// Raw value; secrets are masked
    pub value: String,

    /// Decoding rule: text, url, html, json or list
    #[schema(example = "text")]
    pub kind: String,

    pub description: String,

    pub disabled: bool,

    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Entry update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSettingRequest {
    /// New raw value, validated against the entry's kind
    pub value: String,
}

// ===== Reload DTOs =====

/// Groups applied by a reload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReloadResponse {
    pub groups: Vec<String>,
}

// ===== Debug DTOs =====

/// Debug mode switch request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DebugRequest {
    pub on: bool,
}

/// Current debug mode
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DebugResponse {
    pub debug: bool,
}
