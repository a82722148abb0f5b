//! Trait-based conversions between external error types and `StrataError`.

use figment::Error as FigmentError;

use super::StrataError;

/// JSON encoding or decoding failures surface as tree conversion failures.
impl From<serde_json::Error> for StrataError {
    fn from(e: serde_json::Error) -> Self {
        let message = if e.line() == 0 {
            "failed to convert value tree".to_owned()
        } else {
            format!(
                "failed to convert value tree at line {}, column {}",
                e.line(),
                e.column()
            )
        };
        Self::conversion(message, e)
    }
}

impl From<FigmentError> for StrataError {
    fn from(e: FigmentError) -> Self {
        Self::Extraction(Box::new(e))
    }
}
