//! Builder for [`ResourceLocation`].
//!
//! The builder lets applications choose the base directory, the resource
//! names, the active profile and the variables available to templated names
//! before producing the location the loader walks.

use camino::Utf8PathBuf;

use super::{DEFAULT_PROFILE, PROFILE_ENV_VAR, ResourceLocation};
use crate::placeholder::{MapSource, PlaceholderSyntax};

/// Builder for [`ResourceLocation`].
///
/// # Examples
///
/// ```rust
/// use strata_config::location::ResourceLocation;
///
/// let location = ResourceLocation::builder()
///     .base_dir("config")
///     .add_resource_name("base.yaml")
///     .add_resource_name("${region}/overrides.toml")
///     .add_resource_name("base.yaml")
///     .variable("region", "eu")
///     .profile("staging")
///     .build();
/// assert_eq!(location.resource_names(), ["base.yaml", "${region}/overrides.toml"]);
/// assert_eq!(location.profile(), "staging");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceLocationBuilder {
    base_dir: Option<Utf8PathBuf>,
    resource_names: Vec<String>,
    profile: Option<String>,
    variables: MapSource,
    syntax: PlaceholderSyntax,
}

impl ResourceLocationBuilder {
    /// Creates a builder with no resource names, the ambient profile and the
    /// default placeholder syntax.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory resource names are relative to. Defaults to `.`.
    #[must_use]
    pub fn base_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Replaces the resource names. Names may contain placeholders.
    #[must_use]
    pub fn resource_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a resource name. Later names take precedence when merged.
    #[must_use]
    pub fn add_resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_names.push(name.into());
        self
    }

    /// Sets the active profile, overriding the environment.
    #[must_use]
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Replaces the variables available to templated names and values.
    #[must_use]
    pub fn variables(mut self, variables: MapSource) -> Self {
        self.variables = variables;
        self
    }

    /// Adds a single variable.
    #[must_use]
    pub fn variable(mut self, key: impl Into<String>, value: impl std::fmt::Display) -> Self {
        self.variables.insert(key, value);
        self
    }

    /// Sets the placeholder grammar used for names and values.
    #[must_use]
    pub fn syntax(mut self, syntax: PlaceholderSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Finalises the builder.
    ///
    /// Blank and repeated names are dropped, keeping the first occurrence.
    /// Without an explicit profile, `STRATA_PROFILE` is read; a blank or
    /// absent value selects `default`.
    #[must_use]
    pub fn build(self) -> ResourceLocation {
        let mut resource_names: Vec<String> = Vec::with_capacity(self.resource_names.len());
        for name in self.resource_names {
            let trimmed = name.trim();
            if trimmed.is_empty() || resource_names.iter().any(|seen| seen == trimmed) {
                continue;
            }
            resource_names.push(trimmed.to_owned());
        }

        let profile = self
            .profile
            .or_else(|| std::env::var(PROFILE_ENV_VAR).ok())
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_PROFILE.to_owned());

        ResourceLocation {
            base_dir: self.base_dir.unwrap_or_else(|| Utf8PathBuf::from(".")),
            resource_names,
            profile,
            variables: self.variables,
            syntax: self.syntax,
        }
    }
}
