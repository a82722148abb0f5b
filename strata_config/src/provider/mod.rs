//! Sources of raw configuration documents.
//!
//! A [`ResourceProvider`] turns a resolved resource name into text tagged
//! with its [`ConfigFormat`]. The loader treats `Ok(None)` as "not present"
//! and moves on to the next candidate.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::format::ConfigFormat;
use crate::{StrataError, StrataResult};

mod directory;

pub use directory::DirectoryProvider;

/// A fetched configuration document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    /// Name the resource was requested by.
    pub name: String,
    /// Format detected from the name.
    pub format: ConfigFormat,
    /// Raw document text.
    pub contents: String,
}

impl Resource {
    /// Decode the contents according to [`Resource::format`].
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigFormat::decode`] failures.
    pub fn decode(&self) -> StrataResult<Value> {
        self.format.decode(&self.contents)
    }
}

/// Fetches configuration documents by name.
pub trait ResourceProvider: Send + Sync {
    /// Fetch `name`, returning `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the name is unacceptable, its
    /// format cannot be detected or the document cannot be read.
    fn fetch(&self, name: &str) -> StrataResult<Option<Resource>>;
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for Arc<P> {
    fn fetch(&self, name: &str) -> StrataResult<Option<Resource>> {
        (**self).fetch(name)
    }
}

/// Provider serving documents held in memory, keyed by name.
///
/// # Examples
///
/// ```
/// use strata_config::provider::{MemoryProvider, ResourceProvider};
///
/// let provider = MemoryProvider::new().with("app.toml", "port = 8080");
/// let resource = provider.fetch("app.toml")?.expect("resource exists");
/// assert_eq!(resource.decode()?["port"], 8080);
/// assert!(provider.fetch("other.toml")?.is_none());
/// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryProvider {
    documents: HashMap<String, String>,
}

impl MemoryProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document, returning the updated provider.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.documents.insert(name.into(), contents.into());
        self
    }
}

impl ResourceProvider for MemoryProvider {
    fn fetch(&self, name: &str) -> StrataResult<Option<Resource>> {
        let Some(contents) = self.documents.get(name) else {
            return Ok(None);
        };
        Ok(Some(Resource {
            name: name.to_owned(),
            format: detect_format(name)?,
            contents: contents.clone(),
        }))
    }
}

/// Detect the format of `name` from its extension.
pub(crate) fn detect_format(name: &str) -> StrataResult<ConfigFormat> {
    let path = camino::Utf8Path::new(name);
    ConfigFormat::from_path(path).ok_or_else(|| {
        Arc::new(StrataError::UnsupportedFormat {
            name: path.extension().unwrap_or(name).to_owned(),
        })
    })
}
