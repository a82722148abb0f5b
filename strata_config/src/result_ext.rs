//! Extensions for mapping errors to `StrataResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(StrataError::…(e)))`
//! patterns when converting external error types into the crate's
//! `StrataResult<T>` alias (`Result<T, Arc<StrataError>>`).
//!
//! - Use [`StrataResultExt::into_strata`] for error types that implement
//!   `Into<StrataError>` (e.g., `serde_json::Error`).
//! - Use [`StrataContextExt::conversion_context`] and
//!   [`StrataContextExt::merge_context`] to attach a step description to an
//!   arbitrary cause.
//!
//! # Examples
//!
//! ```
//! use strata_config::{StrataResult, StrataResultExt};
//!
//! fn serialize() -> StrataResult<serde_json::Value> {
//!     // serde_json::Error implements Into<StrataError>
//!     serde_json::to_value(&42).into_strata()
//! }
//! # assert!(serialize().is_ok());
//! ```

use std::sync::Arc;

use crate::{BoxedCause, StrataError, StrataResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<StrataError>`
/// into a `StrataResult<T>`.
pub trait StrataResultExt<T, E> {
    /// Convert `Result<T, E>` into `StrataResult<T>` using `Into<StrataError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<StrataError>`.
    fn into_strata(self) -> StrataResult<T>;
}

impl<T, E> StrataResultExt<T, E> for Result<T, E>
where
    E: Into<StrataError>,
{
    fn into_strata(self) -> StrataResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}

/// Extension attaching a step description to arbitrary failures.
pub trait StrataContextExt<T> {
    /// Map the error into [`StrataError::Conversion`] described by `message`.
    ///
    /// # Errors
    ///
    /// Returns the wrapped conversion failure when the input is `Err`.
    fn conversion_context(self, message: &str) -> StrataResult<T>;

    /// Map the error into [`StrataError::MergeApplication`] described by
    /// `message`.
    ///
    /// # Errors
    ///
    /// Returns the wrapped merge failure when the input is `Err`.
    fn merge_context(self, message: &str) -> StrataResult<T>;
}

impl<T, E> StrataContextExt<T> for Result<T, E>
where
    E: Into<BoxedCause>,
{
    fn conversion_context(self, message: &str) -> StrataResult<T> {
        self.map_err(|e| Arc::new(StrataError::conversion(message, e)))
    }

    fn merge_context(self, message: &str) -> StrataResult<T> {
        self.map_err(|e| Arc::new(StrataError::merge_application(message, e)))
    }
}
