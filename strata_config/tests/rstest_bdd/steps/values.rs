//! Parsing helpers for step placeholders.

use anyhow::{Context, Result};
use serde_json::Value;

/// Strip one layer of matching double quotes, then surrounding whitespace.
pub(crate) fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed)
        .to_owned()
}

/// Parse a JSON literal written inline in a step.
pub(crate) fn json_literal(raw: &str) -> Result<Value> {
    serde_json::from_str(raw.trim()).with_context(|| format!("invalid JSON literal: {raw}"))
}

/// Split a quoted, comma-separated list of names.
pub(crate) fn name_list(raw: &str) -> Vec<String> {
    unquote(raw)
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}
