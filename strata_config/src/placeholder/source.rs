//! Value sources queried while resolving placeholders.

use std::collections::HashMap;
use std::fmt;

/// Read-only provider of string values by key.
///
/// Sources are queried in order; the first one returning `Some` wins.
/// Implementations must be free of side effects and safe to share across
/// threads.
pub trait PropertySource: Send + Sync {
    /// Look up `key`, returning `None` when this source has no value for it.
    fn get(&self, key: &str) -> Option<String>;
}

/// Source backed by the process environment.
///
/// Variables that are unset or not valid Unicode are reported as absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvSource;

impl EnvSource {
    /// Create an environment-backed source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PropertySource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        std::env::var(key).ok()
    }
}

/// Source wrapping an owned key/value mapping.
///
/// # Examples
///
/// ```
/// use strata_config::placeholder::{MapSource, PropertySource};
///
/// let source = MapSource::from_iter([("port", 8080), ("workers", 4)]);
/// assert_eq!(source.get("port").as_deref(), Some("8080"));
/// assert_eq!(source.get("missing"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a value, returning the updated source.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.values.insert(key.into(), value.to_string());
    }

    /// Number of keys held by the source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the source holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MapSource
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.to_string()))
            .collect();
        Self { values }
    }
}

impl PropertySource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Source delegating to a closure, for custom resolvers.
///
/// # Examples
///
/// ```
/// use strata_config::placeholder::{FnSource, PropertySource};
///
/// let upper = FnSource::new(|key: &str| Some(key.to_ascii_uppercase()));
/// assert_eq!(upper.get("abc").as_deref(), Some("ABC"));
/// ```
pub struct FnSource<F> {
    lookup: F,
}

impl<F> FnSource<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    /// Wrap `lookup` as a property source.
    pub const fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<F> PropertySource for FnSource<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSource")
            .field("lookup", &"<closure>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serial_test::serial;
    use test_helpers::env;

    use super::{EnvSource, FnSource, MapSource, PropertySource};

    #[rstest]
    #[serial]
    fn env_source_reads_process_environment() {
        let _guard = env::set_var("STRATA_SOURCE_TEST", "from-env");
        assert_eq!(
            EnvSource.get("STRATA_SOURCE_TEST").as_deref(),
            Some("from-env")
        );
    }

    #[rstest]
    #[serial]
    fn env_source_reports_missing_variables() {
        let _guard = env::remove_var("STRATA_SOURCE_MISSING");
        assert_eq!(EnvSource.get("STRATA_SOURCE_MISSING"), None);
    }

    #[rstest]
    #[case("")]
    #[case("A=B")]
    fn env_source_ignores_invalid_names(#[case] key: &str) {
        assert_eq!(EnvSource.get(key), None);
    }

    #[rstest]
    fn map_source_stringifies_values() {
        let source = MapSource::new().with("enabled", true).with("ratio", 0.5);
        assert_eq!(source.get("enabled").as_deref(), Some("true"));
        assert_eq!(source.get("ratio").as_deref(), Some("0.5"));
        assert_eq!(source.len(), 2);
    }

    #[rstest]
    fn fn_source_delegates_to_closure() {
        let source = FnSource::new(|key: &str| (key == "answer").then(|| "42".to_owned()));
        assert_eq!(source.get("answer").as_deref(), Some("42"));
        assert_eq!(source.get("question"), None);
    }
}
