//! Where configuration resources live and which ones to load.
//!
//! A [`ResourceLocation`] names a base directory and an ordered list of
//! resource names. Names may contain placeholders, resolved against the
//! environment, the location's variables and the active profile. Without any
//! configured names the location falls back to `application.<ext>` followed
//! by `application-<profile>.<ext>` for every compiled-in format.

use camino::{Utf8Path, Utf8PathBuf};

use crate::StrataResult;
use crate::format::ConfigFormat;
use crate::placeholder::{EnvSource, Interpolator, MapSource, PlaceholderSyntax, Resolution};

mod builder;

pub use builder::ResourceLocationBuilder;

/// Environment variable naming the active profile.
pub const PROFILE_ENV_VAR: &str = "STRATA_PROFILE";
/// Profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "default";
/// Stem of the resource names used when none are configured.
pub const DEFAULT_RESOURCE_STEM: &str = "application";
/// Placeholder key that always resolves to the active profile.
pub const PROFILE_KEY: &str = "profile";

/// Base directory, resource names, profile and variables for one load.
#[derive(Debug, Clone)]
pub struct ResourceLocation {
    base_dir: Utf8PathBuf,
    resource_names: Vec<String>,
    profile: String,
    variables: MapSource,
    syntax: PlaceholderSyntax,
}

impl Default for ResourceLocation {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ResourceLocation {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ResourceLocationBuilder {
        ResourceLocationBuilder::new()
    }

    /// Directory resource names are relative to.
    #[must_use]
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Configured resource names, unresolved, in load order.
    #[must_use]
    pub fn resource_names(&self) -> &[String] {
        &self.resource_names
    }

    /// Active profile.
    #[must_use]
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Variables available to templated names and values.
    #[must_use]
    pub const fn variables(&self) -> &MapSource {
        &self.variables
    }

    /// Placeholder grammar for names and values.
    #[must_use]
    pub const fn syntax(&self) -> &PlaceholderSyntax {
        &self.syntax
    }

    /// Resolve the resource names to load, in order.
    ///
    /// Names that still contain unresolved placeholders are dropped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::CircularReference`] when a name's
    /// placeholders reference themselves.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strata_config::location::ResourceLocation;
    /// use strata_config::placeholder::Interpolator;
    ///
    /// let location = ResourceLocation::builder()
    ///     .add_resource_name("service-${profile}.toml")
    ///     .add_resource_name("${undefined_strata_key}.yaml")
    ///     .profile("dev")
    ///     .build();
    /// let interpolator = Interpolator::default().with_default_sources(Vec::new());
    /// let names = location.candidates(&interpolator)?;
    /// assert_eq!(names, ["service-dev.toml"]);
    /// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
    /// ```
    pub fn candidates(&self, interpolator: &Interpolator) -> StrataResult<Vec<String>> {
        if self.resource_names.is_empty() {
            return Ok(self.default_candidates());
        }

        let env = EnvSource;
        let profile = MapSource::new().with(PROFILE_KEY, &self.profile);
        let mut names = Vec::with_capacity(self.resource_names.len());
        for template in &self.resource_names {
            match interpolator.resolve_detailed(template, &[&env, &self.variables, &profile])? {
                Resolution::Complete(name) if !names.contains(&name) => names.push(name),
                Resolution::Complete(name) => {
                    tracing::debug!(name = %name, "skipping duplicate resource name");
                }
                Resolution::Incomplete { unresolved } => {
                    tracing::warn!(
                        name = %template,
                        unresolved = ?unresolved,
                        "dropping resource name with unresolved placeholders"
                    );
                }
            }
        }
        Ok(names)
    }

    fn default_candidates(&self) -> Vec<String> {
        ConfigFormat::enabled()
            .flat_map(ConfigFormat::extensions)
            .flat_map(|ext| {
                [
                    format!("{DEFAULT_RESOURCE_STEM}.{ext}"),
                    format!("{DEFAULT_RESOURCE_STEM}-{}.{ext}", self.profile),
                ]
            })
            .collect()
    }
}
