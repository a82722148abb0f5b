//! Placeholder interpolation.
//!
//! Templates contain tokens such as `${key}` or `${key:fallback}`. An
//! [`Interpolator`] replaces each token with the first value found for `key`
//! across an ordered list of [`PropertySource`]s, recursively resolving
//! values that contain further tokens. Resolution is all-or-nothing: when any
//! key has neither a value nor a fallback the caller receives `None` rather
//! than a partially expanded string. Re-entering a key while it is still
//! being resolved is a circular reference and aborts the call with
//! [`crate::StrataError::CircularReference`].
//!
//! Placing the escape character before the prefix (`\${key}`) keeps the
//! prefix literal.
//!
//! # Example
//!
//! ```rust
//! use strata_config::placeholder::{Interpolator, MapSource};
//!
//! let engine = Interpolator::default();
//! let vars = MapSource::new()
//!     .with("region", "eu-west-1")
//!     .with("bucket", "assets-${region}");
//! assert_eq!(
//!     engine.resolve("s3://${bucket}/${prefix:static}", &[&vars])?,
//!     Some("s3://assets-eu-west-1/static".to_owned())
//! );
//! assert_eq!(engine.resolve(r"cost: \${amount}", &[&vars])?,
//!     Some("cost: ${amount}".to_owned()));
//! # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
//! ```

mod parser;
mod resolver;
mod source;
mod syntax;
mod walk;

pub use resolver::{Interpolator, Resolution};
pub use source::{EnvSource, FnSource, MapSource, PropertySource};
pub use syntax::{
    DEFAULT_DELIMITER, DEFAULT_ESCAPE, DEFAULT_PREFIX, DEFAULT_SUFFIX, PlaceholderSyntax,
    PlaceholderSyntaxBuilder,
};
pub use walk::TreeInterpolation;

#[cfg(test)]
mod tests;
