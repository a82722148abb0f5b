//! Interpolation of every string scalar in a value tree.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use super::{Interpolator, PropertySource, Resolution};
use crate::StrataResult;

/// Result of [`Interpolator::interpolate_tree`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeInterpolation {
    /// Tree with every fully resolvable string replaced.
    pub value: Value,
    /// Dotted paths of strings left verbatim, with the keys they were missing.
    pub unresolved: BTreeMap<String, BTreeSet<String>>,
}

impl TreeInterpolation {
    /// Returns `true` when every templated string resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

impl Interpolator {
    /// Resolve every string scalar in `tree`.
    ///
    /// Object keys are never rewritten. Each string follows the
    /// all-or-nothing contract independently: one that cannot be fully
    /// resolved is kept verbatim and recorded under its dotted path (array
    /// elements use their index as a segment).
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::CircularReference`] as soon as any string
    /// contains a circular reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use strata_config::placeholder::{Interpolator, MapSource};
    ///
    /// let vars = MapSource::new().with("host", "db.internal");
    /// let engine = Interpolator::default();
    /// let out = engine.interpolate_tree(
    ///     &json!({"db": {"url": "pg://${host}/app", "pool": 4}, "x": "${nope}"}),
    ///     &[&vars],
    /// )?;
    /// assert_eq!(out.value["db"]["url"], "pg://db.internal/app");
    /// assert_eq!(out.value["x"], "${nope}");
    /// assert!(out.unresolved.contains_key("x"));
    /// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
    /// ```
    pub fn interpolate_tree(
        &self,
        tree: &Value,
        sources: &[&dyn PropertySource],
    ) -> StrataResult<TreeInterpolation> {
        let mut unresolved = BTreeMap::new();
        let value = self.walk(tree, sources, &mut String::new(), &mut unresolved)?;
        Ok(TreeInterpolation { value, unresolved })
    }

    fn walk(
        &self,
        node: &Value,
        sources: &[&dyn PropertySource],
        path: &mut String,
        unresolved: &mut BTreeMap<String, BTreeSet<String>>,
    ) -> StrataResult<Value> {
        match node {
            Value::String(text) => match self.resolve_detailed(text, sources)? {
                Resolution::Complete(resolved) => Ok(Value::String(resolved)),
                Resolution::Incomplete { unresolved: keys } => {
                    unresolved.insert(path.clone(), keys);
                    Ok(node.clone())
                }
            },
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let mark = push_segment(path, &index.to_string());
                    out.push(self.walk(item, sources, path, unresolved)?);
                    path.truncate(mark);
                }
                Ok(Value::Array(out))
            }
            Value::Object(fields) => {
                let mut out = Map::with_capacity(fields.len());
                for (name, item) in fields {
                    let mark = push_segment(path, name);
                    out.insert(name.clone(), self.walk(item, sources, path, unresolved)?);
                    path.truncate(mark);
                }
                Ok(Value::Object(out))
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => Ok(node.clone()),
        }
    }
}

/// Append `segment` to the dotted `path`, returning the length to truncate
/// back to afterwards.
fn push_segment(path: &mut String, segment: &str) -> usize {
    let mark = path.len();
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(segment);
    mark
}
