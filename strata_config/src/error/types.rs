//! Primary error enum for configuration resolution flows.

use camino::Utf8PathBuf;
use figment::Error as FigmentError;
use thiserror::Error;

use crate::format::ConfigFormat;

/// Boxed cause attached to conversion, merge and I/O failures.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// A placeholder key resolved back to itself while still in flight.
    #[error("circular reference detected for key: {key}")]
    CircularReference {
        /// Key that was re-entered during its own resolution.
        key: String,
    },

    /// A source document could not be converted into (or out of) a value tree.
    #[error("{message}: {source}")]
    Conversion {
        /// Description of the conversion step that failed.
        message: String,
        /// Underlying conversion failure.
        #[source]
        source: BoxedCause,
    },

    /// Applying a merge step to the accumulated tree failed.
    #[error("{message}: {source}")]
    MergeApplication {
        /// Description of the update step that failed.
        message: String,
        /// Underlying failure reported by the update step.
        #[source]
        source: BoxedCause,
    },

    /// The placeholder grammar was configured with an unusable token.
    #[error("invalid placeholder syntax: {field} {message}")]
    InvalidSyntax {
        /// Name of the offending syntax component.
        field: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// A document could not be parsed in its declared format.
    #[error("failed to decode {format} document: {source}")]
    Decode {
        /// Format the document was decoded as.
        format: ConfigFormat,
        /// Parser error.
        #[source]
        source: BoxedCause,
    },

    /// No decoder is available for the requested format or extension.
    #[error("unsupported configuration format '{name}'")]
    UnsupportedFormat {
        /// Extension or format name that could not be decoded.
        name: String,
    },

    /// Error originating from a configuration resource on disk.
    #[error("configuration resource error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: BoxedCause,
    },

    /// A resource name is not acceptable to the provider.
    #[error("invalid resource name '{name}': {reason}")]
    InvalidResourceName {
        /// Rejected resource name.
        name: String,
        /// Why the provider refused it.
        reason: String,
    },

    /// Typed extraction from a resolved tree failed.
    #[error("failed to extract configuration: {0}")]
    Extraction(#[from] Box<FigmentError>),
}
