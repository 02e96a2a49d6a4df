//! Error taxonomy of the inventory core
//!
//! Malformed optional numeric filters and free-text lookups that resolve to
//! nothing are not errors here: they are carried by the compiled filter.

use thiserror::Error;

use crate::types::Capability;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// A referenced unit, lot or record does not exist
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    /// The caller lacks a capability; the call is refused, never degraded
    #[error("Permission denied: requires {0}")]
    PermissionDenied(Capability),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl InventoryError {
    pub fn invalid(field: &str, message: &str) -> Self {
        InventoryError::InvalidInput {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

pub type InventoryResult<T> = Result<T, InventoryError>;
