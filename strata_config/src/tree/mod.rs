//! Read-only view over a merged configuration tree.

use std::borrow::Cow;
use std::sync::Arc;

use figment::Figment;
use figment::error::Kind;
use figment::providers::Serialized;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::StrataResult;
use crate::result_ext::StrataResultExt;

/// Key under which a subtree is staged for typed extraction.
const STAGING_KEY: &str = "value";

/// Merged configuration.
///
/// Cloning is cheap: clones share the same immutable tree.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use serde_json::json;
/// use strata_config::merge::merge;
///
/// #[derive(Deserialize)]
/// struct Db { host: String, port: u16 }
///
/// let tree = merge([json!({"db": {"host": "localhost", "port": 5432}, "hosts": ["a", "b"]})])?;
/// let db: Db = tree.get("db")?;
/// assert_eq!((db.host.as_str(), db.port), ("localhost", 5432));
/// assert_eq!(tree.get::<String>("hosts.1")?, "b");
/// assert!(!tree.contains("db.user"));
/// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigTree {
    root: Arc<Value>,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::from(Map::new())
    }
}

impl From<Map<String, Value>> for ConfigTree {
    fn from(map: Map<String, Value>) -> Self {
        Self::new(Value::Object(map))
    }
}

impl ConfigTree {
    pub(crate) fn new(root: Value) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// Borrow the whole tree.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Borrow the root object.
    ///
    /// Trees produced by this crate always have an object root.
    #[must_use]
    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        self.root.as_object()
    }

    /// Look up a value by dotted path.
    ///
    /// Segments select object fields. Array elements are addressed either
    /// with a bracketed index (`servers[1].name`) or a numeric segment
    /// (`servers.1.name`). The empty path selects the root.
    #[must_use]
    pub fn get_value(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(&self.root);
        }
        path_segments(path)?
            .into_iter()
            .try_fold(&*self.root, |node, segment| match node {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            })
    }

    /// Returns `true` when `path` selects a value, including `null`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get_value(path).is_some()
    }

    /// Deserialize the value at `path` into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::Extraction`] when `path` selects nothing
    /// or the value does not fit `T`.
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> StrataResult<T> {
        let Some(node) = self.get_value(path) else {
            let missing = figment::Error::from(Kind::MissingField(Cow::Owned(path.to_owned())));
            return Err(missing).into_strata();
        };
        Figment::from(Serialized::default(STAGING_KEY, node))
            .extract_inner(STAGING_KEY)
            .into_strata()
    }

    /// Deserialize the whole tree into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::Extraction`] when the tree does not fit
    /// `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> StrataResult<T> {
        Figment::from(Serialized::defaults(&*self.root))
            .extract()
            .into_strata()
    }

    /// Return an owned copy of the tree.
    #[must_use]
    pub fn into_value(self) -> Value {
        Arc::unwrap_or_clone(self.root)
    }
}

/// Split a lookup path into field and index segments.
///
/// Returns `None` when a bracketed index is not closed.
fn path_segments(path: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        let Some((field, indices)) = part.split_once('[') else {
            segments.push(part);
            continue;
        };
        if !field.is_empty() {
            segments.push(field);
        }
        segments.extend(indices.strip_suffix(']')?.split("]["));
    }
    Some(segments)
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]
mod tests {
    use anyhow::{Result, anyhow, ensure};
    use rstest::{fixture, rstest};
    use serde::Deserialize;
    use serde_json::json;

    use super::ConfigTree;
    use crate::StrataError;

    #[fixture]
    fn tree() -> ConfigTree {
        match json!({
            "name": "svc",
            "db": {"host": "localhost", "port": 5432, "password": null},
            "servers": [{"name": "a"}, {"name": "b", "weight": 2}],
        }) {
            serde_json::Value::Object(map) => ConfigTree::from(map),
            other => panic!("fixture root must be an object, got {other}"),
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Server {
        name: String,
        #[serde(default)]
        weight: u8,
    }

    #[derive(Debug, Deserialize)]
    struct Service {
        name: String,
        servers: Vec<Server>,
    }

    #[rstest]
    #[case("", true)]
    #[case("name", true)]
    #[case("db.port", true)]
    #[case("db.password", true)]
    #[case("db.user", false)]
    #[case("servers.1.weight", true)]
    #[case("servers[1].weight", true)]
    #[case("servers[0].name", true)]
    #[case("servers[0].weight", false)]
    #[case("servers[2]", false)]
    #[case("servers[1", false)]
    #[case("servers.2", false)]
    #[case("servers.x", false)]
    #[case("name.inner", false)]
    fn paths_select_nested_values(tree: ConfigTree, #[case] path: &str, #[case] present: bool) {
        assert_eq!(tree.contains(path), present, "path {path}");
    }

    #[rstest]
    fn typed_lookup_by_path(tree: ConfigTree) -> Result<()> {
        let port: u16 = tree.get("db.port").map_err(|err| anyhow!(err.to_string()))?;
        ensure!(port == 5432, "unexpected port {port}");
        let server: Server = tree
            .get("servers.1")
            .map_err(|err| anyhow!(err.to_string()))?;
        ensure!(
            server == Server {
                name: "b".to_owned(),
                weight: 2
            },
            "unexpected server {server:?}"
        );
        Ok(())
    }

    #[rstest]
    fn bracketed_and_dotted_indices_agree(tree: ConfigTree) -> Result<()> {
        let bracketed = tree
            .get_value("servers[1].name")
            .ok_or_else(|| anyhow!("bracketed index selected nothing"))?;
        ensure!(
            tree.get_value("servers.1.name") == Some(bracketed),
            "index forms disagree"
        );
        let name: String = tree
            .get("servers[1].name")
            .map_err(|err| anyhow!(err.to_string()))?;
        ensure!(name == "b", "unexpected name {name}");
        Ok(())
    }

    #[rstest]
    fn whole_tree_extraction(tree: ConfigTree) -> Result<()> {
        let service: Service = tree.extract().map_err(|err| anyhow!(err.to_string()))?;
        ensure!(service.name == "svc", "unexpected name");
        ensure!(service.servers.len() == 2, "unexpected servers");
        Ok(())
    }

    #[rstest]
    #[case("db.user")]
    #[case("name")]
    fn failed_extraction_is_reported(tree: ConfigTree, #[case] path: &str) {
        let err = tree.get::<u16>(path).expect_err("extraction must fail");
        assert!(matches!(err.as_ref(), StrataError::Extraction(_)));
    }

    #[rstest]
    fn clones_share_the_tree(tree: ConfigTree) {
        let copy = tree.clone();
        assert_eq!(copy, tree);
        assert_eq!(copy.into_value()["db"]["host"], "localhost");
        assert_eq!(ConfigTree::default().as_value(), &json!({}));
    }
}
