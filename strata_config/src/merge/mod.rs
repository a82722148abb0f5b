//! Deep merging of decoded configuration trees.
//!
//! Trees are folded left to right into an empty object, so later trees win.
//! Objects merge field by field, while arrays and scalars replace whatever
//! the accumulator held at the same path.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::result_ext::StrataContextExt;
use crate::tree::ConfigTree;
use crate::{StrataError, StrataResult};

/// Deepest object nesting the fold accepts, matching `serde_json`'s own
/// recursion limit.
pub const MAX_MERGE_DEPTH: usize = 128;

/// Cause attached to [`StrataError::MergeApplication`] when a tree nests
/// objects beyond [`MAX_MERGE_DEPTH`].
#[derive(Debug, Error)]
#[error("object nesting exceeds {limit} levels at `{path}`")]
pub struct DepthExceeded {
    /// Configured depth limit.
    pub limit: usize,
    /// Dotted path of the object that crossed the limit.
    pub path: String,
}

/// Merge `sources` into a single read-only tree.
///
/// `Null` entries and empty objects contribute nothing and are skipped. When
/// exactly one tree remains it is returned as is after the depth check;
/// otherwise the trees are folded with [`merge_value`].
///
/// # Errors
///
/// Returns [`StrataError::Conversion`] when a source is not an object and
/// [`StrataError::MergeApplication`] when a source nests objects deeper than
/// [`MAX_MERGE_DEPTH`].
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use strata_config::merge::merge;
///
/// let tree = merge([
///     json!({"db": {"host": "localhost", "port": 5432}, "tags": ["a", "b"]}),
///     json!({"db": {"host": "db.internal"}, "tags": ["c"]}),
/// ])?;
/// assert_eq!(
///     tree.as_value(),
///     &json!({"db": {"host": "db.internal", "port": 5432}, "tags": ["c"]})
/// );
/// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
/// ```
pub fn merge(sources: impl IntoIterator<Item = Value>) -> StrataResult<ConfigTree> {
    let mut documents = Vec::new();
    for (index, source) in sources.into_iter().enumerate() {
        match source {
            Value::Null => {}
            Value::Object(map) if map.is_empty() => {}
            Value::Object(map) => documents.push(map),
            other => return Err(non_object_root(index, &other)),
        }
    }

    if documents.len() == 1 {
        if let Some(only) = documents.pop() {
            check_depth(&only, &mut Vec::new())?;
            return Ok(ConfigTree::from(only));
        }
    }

    let mut acc = Value::Object(Map::new());
    for document in documents {
        merge_value(&mut acc, Value::Object(document))?;
    }
    Ok(ConfigTree::new(acc))
}

/// Serialize each item and merge the results with [`merge`].
///
/// # Errors
///
/// Returns [`StrataError::Conversion`] when an item cannot be serialized or
/// does not serialize to an object, and [`StrataError::MergeApplication`]
/// when the fold fails.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use strata_config::merge::merge_serialized;
///
/// #[derive(Serialize)]
/// struct Layer { name: &'static str, retries: Option<u8> }
///
/// let tree = merge_serialized(&[
///     Layer { name: "base", retries: Some(3) },
///     Layer { name: "override", retries: None },
/// ])?;
/// assert_eq!(tree.get::<String>("name")?, "override");
/// assert!(tree.get_value("retries").is_some_and(serde_json::Value::is_null));
/// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
/// ```
pub fn merge_serialized<T: Serialize>(sources: &[T]) -> StrataResult<ConfigTree> {
    let values = sources
        .iter()
        .enumerate()
        .map(|(index, source)| {
            serde_json::to_value(source)
                .conversion_context(&format!("failed to convert source {index} into a tree"))
        })
        .collect::<StrataResult<Vec<_>>>()?;
    merge(values)
}

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// - Objects merge recursively. When `target` is not an object it becomes a
///   copy of the layer.
/// - Arrays, scalars and `null` replace `target` wholesale.
///
/// # Errors
///
/// Returns [`StrataError::MergeApplication`] when `layer` nests objects
/// deeper than [`MAX_MERGE_DEPTH`]; `target` may then hold a partial merge.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use strata_config::merge::merge_value;
///
/// let mut acc = json!({"a": 1, "b": {"x": 1}});
/// merge_value(&mut acc, json!({"b": {"y": 2}, "c": 3}))?;
/// assert_eq!(acc, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
///
/// merge_value(&mut acc, json!({"b": [1, 2, 3]}))?;
/// assert_eq!(acc["b"], json!([1, 2, 3]));
/// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
/// ```
pub fn merge_value(target: &mut Value, layer: Value) -> StrataResult<()> {
    overlay(target, layer, &mut Vec::new())
}

fn overlay(target: &mut Value, layer: Value, path: &mut Vec<String>) -> StrataResult<()> {
    match layer {
        Value::Object(map) => overlay_object(target, map, path),
        other => {
            *target = other;
            Ok(())
        }
    }
}

fn overlay_object(
    target: &mut Value,
    map: Map<String, Value>,
    path: &mut Vec<String>,
) -> StrataResult<()> {
    if path.len() >= MAX_MERGE_DEPTH {
        return depth_exceeded(path);
    }

    let Some(target_map) = target.as_object_mut() else {
        check_depth(&map, path)?;
        *target = Value::Object(map);
        return Ok(());
    };

    for (key, value) in map {
        path.push(key.clone());
        let outcome = match target_map.get_mut(&key) {
            Some(existing) => overlay(existing, value, path),
            None => check_value_depth(&value, path).map(|()| {
                target_map.insert(key, value);
            }),
        };
        path.pop();
        outcome?;
    }
    Ok(())
}

/// Validate the depth of a subtree that is not walked by the overlay.
fn check_depth(map: &Map<String, Value>, path: &mut Vec<String>) -> StrataResult<()> {
    if path.len() >= MAX_MERGE_DEPTH {
        return depth_exceeded(path);
    }
    for (key, value) in map {
        path.push(key.clone());
        let outcome = check_value_depth(value, path);
        path.pop();
        outcome?;
    }
    Ok(())
}

fn check_value_depth(value: &Value, path: &mut Vec<String>) -> StrataResult<()> {
    match value {
        Value::Object(map) => check_depth(map, path),
        _ => Ok(()),
    }
}

fn depth_exceeded(path: &[String]) -> StrataResult<()> {
    Err(DepthExceeded {
        limit: MAX_MERGE_DEPTH,
        path: path.join("."),
    })
    .merge_context("failed to apply merge update")
}

fn non_object_root(index: usize, value: &Value) -> Arc<StrataError> {
    let kind = match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Null => "null",
        Value::Object(_) => "object",
    };
    Arc::new(StrataError::conversion(
        format!("failed to convert source {index} into a tree"),
        format!("expected an object at the root, found {kind}"),
    ))
}
