//! Internal helpers for normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! trimming/casing applied to values right before they are committed.

use uuid::Uuid;

/// Trim an optional free-text field; blank becomes `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Cost-center code as committed: trimmed and upper-cased.
pub(crate) fn normalize_code(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Caller-supplied ID, or a fresh UUID when none was given.
pub(crate) fn resolve_id(value: Option<&str>) -> String {
    normalize_optional_text(value).unwrap_or_else(|| Uuid::new_v4().to_string())
}
