//! Shared utility functions for optional text and settings keys.
//!
//! ## Optional Text
//!
//! Every text field of the settings is optional, and an empty string is
//! treated exactly like an absent one. `non_empty` collapses both cases.
//!
//! ## Key Normalization
//!
//! Settings files may spell keys as `DescriptionPrefix`, `descriptionPrefix`,
//! `description-prefix` or `DESCRIPTION_PREFIX`; `normalize_key` maps all of
//! them to the snake_case field name.

// =============================================================================
// Optional Text
// =============================================================================

/// Return the text only when it is present and not empty.
#[inline]
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

// =============================================================================
// Key Normalization
// =============================================================================

/// Convert a settings key in any common casing to snake_case.
pub fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;

    for c in key.trim().chars() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev = Some('_');
            continue;
        }

        if c.is_uppercase() {
            let boundary = matches!(prev, Some(p) if p.is_lowercase() || p.is_ascii_digit());
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }

    out
}
