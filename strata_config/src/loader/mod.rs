//! End-to-end loading: locate, fetch, decode, merge and interpolate.
//!
//! A resource that cannot be read or decoded is logged and skipped; the
//! remaining layers still load. Circular placeholder references and merge
//! failures abort the load.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::StrataResult;
use crate::location::ResourceLocation;
use crate::merge::merge;
use crate::placeholder::{EnvSource, Interpolator};
use crate::provider::{DirectoryProvider, ResourceProvider};
use crate::tree::ConfigTree;

/// Documents gathered from the candidates, with bookkeeping for the summary.
#[derive(Debug, Default)]
struct Gathered {
    documents: Vec<Value>,
    failed: usize,
    total: usize,
}

/// Loads a [`ConfigTree`] from the resources named by a [`ResourceLocation`].
///
/// # Examples
///
/// ```rust
/// use strata_config::loader::ConfigLoader;
/// use strata_config::location::ResourceLocation;
/// use strata_config::provider::MemoryProvider;
///
/// let location = ResourceLocation::builder()
///     .resource_names(["base.toml", "app-${profile}.yaml"])
///     .profile("dev")
///     .variable("host", "db.internal")
///     .build();
/// let provider = MemoryProvider::new()
///     .with("base.toml", "[db]\nurl = \"pg://${host}:5432\"\npool = 4\n")
///     .with("app-dev.yaml", "db:\n  pool: 8\n");
///
/// let tree = ConfigLoader::new(location).with_provider(provider).load()?;
/// assert_eq!(tree.get::<String>("db.url")?, "pg://db.internal:5432");
/// assert_eq!(tree.get::<u32>("db.pool")?, 8);
/// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
/// ```
#[derive(Clone)]
pub struct ConfigLoader {
    location: ResourceLocation,
    provider: Arc<dyn ResourceProvider>,
    interpolator: Interpolator,
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("location", &self.location)
            .field("interpolator", &self.interpolator)
            .finish_non_exhaustive()
    }
}

impl ConfigLoader {
    /// Create a loader reading from the location's base directory.
    #[must_use]
    pub fn new(location: ResourceLocation) -> Self {
        let provider = Arc::new(DirectoryProvider::new(location.base_dir().to_path_buf()));
        let interpolator =
            Interpolator::new(location.syntax().clone()).with_default_sources(Vec::new());
        Self {
            location,
            provider,
            interpolator,
        }
    }

    /// Replace the provider documents are fetched from.
    #[must_use]
    pub fn with_provider(mut self, provider: impl ResourceProvider + 'static) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Location this loader walks.
    #[must_use]
    pub const fn location(&self) -> &ResourceLocation {
        &self.location
    }

    /// Fetch and decode every candidate, in order, skipping failures.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::CircularReference`] when a resource name
    /// references itself.
    pub fn load_documents(&self) -> StrataResult<Vec<Value>> {
        self.gather().map(|gathered| gathered.documents)
    }

    /// Load, merge and interpolate the configuration.
    ///
    /// String values are resolved against the environment and then the
    /// location's variables. Values that cannot be fully resolved are kept
    /// verbatim and logged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::CircularReference`] when a name or value
    /// references itself and [`crate::StrataError::MergeApplication`] when
    /// the documents cannot be merged.
    pub fn load(&self) -> StrataResult<ConfigTree> {
        let gathered = self.gather()?;
        let loaded = gathered.documents.len();
        let merged = merge(gathered.documents)?;

        let env = EnvSource;
        let outcome = self
            .interpolator
            .interpolate_tree(merged.as_value(), &[&env, self.location.variables()])?;
        for (path, keys) in &outcome.unresolved {
            tracing::warn!(
                path = %path,
                unresolved = ?keys,
                "configuration value has unresolved placeholders"
            );
        }

        tracing::info!(
            loaded,
            failed = gathered.failed,
            total = gathered.total,
            profile = %self.location.profile(),
            "configuration loaded"
        );
        Ok(ConfigTree::new(outcome.value))
    }

    fn gather(&self) -> StrataResult<Gathered> {
        let candidates = self.location.candidates(&self.interpolator)?;
        let mut gathered = Gathered {
            documents: Vec::with_capacity(candidates.len()),
            failed: 0,
            total: candidates.len(),
        };

        for name in &candidates {
            let resource = match self.provider.fetch(name) {
                Ok(Some(resource)) => resource,
                Ok(None) => {
                    tracing::debug!(resource = %name, "configuration resource not found");
                    continue;
                }
                Err(err) => {
                    tracing::warn!(resource = %name, error = %err, "skipping configuration resource");
                    gathered.failed += 1;
                    continue;
                }
            };

            match resource.decode() {
                Ok(document @ (Value::Object(_) | Value::Null)) => {
                    tracing::debug!(resource = %name, format = %resource.format, "loaded configuration resource");
                    gathered.documents.push(document);
                }
                Ok(_) => {
                    tracing::warn!(
                        resource = %name,
                        "skipping configuration resource whose root is not a mapping"
                    );
                    gathered.failed += 1;
                }
                Err(err) => {
                    tracing::warn!(resource = %name, error = %err, "skipping configuration resource");
                    gathered.failed += 1;
                }
            }
        }
        Ok(gathered)
    }
}
