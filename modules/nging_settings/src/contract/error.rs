//! Contract error types for the settings registry
//!
//! These errors are transport-agnostic and used for in-process callers.

/// Settings registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Settings path or entry not found
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource kind (setting, entry)
        resource: String,
        /// Resource identifier
        id: String,
    },

    /// Group name is not valid for the requested operation
    #[error("Unknown settings group: {group}")]
    UnknownGroup { group: String },

    /// Invalid key or value
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// No database-backed store is attached or reachable
    #[error("Settings store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Internal error")]
    Internal,
}
