//! Layered configuration resolution.
//!
//! `strata_config` loads configuration documents written in JSON, JSON5,
//! YAML or TOML, deep-merges them in order and then expands `${key:default}`
//! placeholders in every string value.
//!
//! The two engines can also be used on their own:
//!
//! - [`placeholder::Interpolator`] resolves templates against an ordered list
//!   of [`placeholder::PropertySource`]s, all-or-nothing, with cycle
//!   detection.
//! - [`merge::merge`] folds decoded trees into one: objects merge field by
//!   field, arrays and scalars from later trees replace earlier ones.
//!
//! [`loader::ConfigLoader`] combines them with a [`location::ResourceLocation`]
//! and a [`provider::ResourceProvider`].
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use strata_config::{ConfigLoader, ResourceLocation};
//!
//! #[derive(Deserialize)]
//! struct Settings {
//!     listen: String,
//!     workers: u16,
//! }
//!
//! let location = ResourceLocation::builder()
//!     .base_dir("config")
//!     .variable("port", 8080)
//!     .build();
//! let settings: Settings = ConfigLoader::new(location).load()?.extract()?;
//! println!("{} with {} workers", settings.listen, settings.workers);
//! # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
//! ```

use std::sync::Arc;

mod error;
pub mod format;
pub mod loader;
pub mod location;
pub mod merge;
pub mod placeholder;
pub mod provider;
mod result_ext;
pub mod tree;

pub use error::{BoxedCause, StrataError};
pub use format::ConfigFormat;
pub use loader::ConfigLoader;
pub use location::ResourceLocation;
pub use placeholder::{Interpolator, PlaceholderSyntax, PropertySource};
pub use result_ext::{StrataContextExt, StrataResultExt};
pub use serde_json;
pub use tree::ConfigTree;

/// Result type used throughout the crate.
///
/// Errors are shared behind an [`Arc`] so they can be cloned into logs and
/// reports cheaply.
pub type StrataResult<T> = Result<T, Arc<StrataError>>;
