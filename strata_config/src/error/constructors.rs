//! Constructors for `StrataError` variants that wrap an underlying cause.

use std::sync::Arc;

use camino::Utf8Path;

use super::{BoxedCause, StrataError};

impl StrataError {
    /// Construct a circular-reference failure for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::StrataError;
    /// let e = StrataError::circular_reference("db.url");
    /// assert_eq!(e.to_string(), "circular reference detected for key: db.url");
    /// ```
    #[must_use]
    pub fn circular_reference(key: impl Into<String>) -> Self {
        Self::CircularReference { key: key.into() }
    }

    /// Construct a conversion failure, keeping `source` as the cause.
    #[must_use]
    pub fn conversion(message: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Self::Conversion {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Construct a merge-application failure, keeping `source` as the cause.
    #[must_use]
    pub fn merge_application(message: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Self::MergeApplication {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Construct an invalid-syntax failure for the named component.
    #[must_use]
    pub fn invalid_syntax(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            field,
            message: message.into(),
        }
    }

    /// Returns the offending key when this is a circular-reference failure.
    #[must_use]
    pub const fn circular_key(&self) -> Option<&str> {
        match self {
            Self::CircularReference { key } => Some(key.as_str()),
            _ => None,
        }
    }
}

/// Construct a [`StrataError::File`] for a resource path.
pub(crate) fn file_error(path: &Utf8Path, err: impl Into<BoxedCause>) -> Arc<StrataError> {
    Arc::new(StrataError::File {
        path: path.to_path_buf(),
        source: err.into(),
    })
}

/// Construct a [`StrataError::InvalidResourceName`].
pub(crate) fn invalid_resource_name(
    name: &str,
    reason: impl Into<String>,
) -> Arc<StrataError> {
    Arc::new(StrataError::InvalidResourceName {
        name: name.to_owned(),
        reason: reason.into(),
    })
}
