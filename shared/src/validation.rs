//! Validation and normalization helpers for request values

use crate::error::{InventoryError, InventoryResult};

// ============================================================================
// Text matching
// ============================================================================

/// Case-insensitive substring match
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Optional field variant of [`contains_ignore_case`]; absent never matches
pub fn field_contains(value: Option<&str>, needle: &str) -> bool {
    value.map_or(false, |v| contains_ignore_case(v, needle))
}

/// Customs declaration numbers are compared without spaces or hyphens
pub fn normalize_customs_declaration(value: &str) -> String {
    value.chars().filter(|c| *c != ' ' && *c != '-').collect()
}

/// Split a comma separated list of lot names, trimming and dropping blanks
pub fn split_serial_numbers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Record input
// ============================================================================

/// Trimmed, non-empty record name
pub fn validate_record_name(field: &str, name: &str) -> InventoryResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(InventoryError::invalid(field, "Name is required"));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional value; blank becomes absent
pub fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Photo names must be non-empty and the payload must be present
pub fn validate_photo_input(name: &str, data: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Photo name is required");
    }
    if data.trim().is_empty() {
        return Err("Photo data is required");
    }
    Ok(())
}
