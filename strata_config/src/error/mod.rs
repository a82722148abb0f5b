//! Error types produced while resolving configuration.

mod constructors;
mod conversions;
mod types;

pub use types::{BoxedCause, StrataError};

pub(crate) use constructors::{file_error, invalid_resource_name};
