//! Placeholder grammar configuration.

use std::sync::Arc;

use crate::{StrataError, StrataResult};

/// Default placeholder opening token.
pub const DEFAULT_PREFIX: &str = "${";
/// Default placeholder closing token.
pub const DEFAULT_SUFFIX: &str = "}";
/// Default separator between a key and its fallback.
pub const DEFAULT_DELIMITER: &str = ":";
/// Default character that suppresses placeholder recognition.
pub const DEFAULT_ESCAPE: char = '\\';

/// Immutable `(prefix, suffix, delimiter, escape)` tuple describing how
/// placeholders are written.
///
/// # Examples
///
/// ```
/// use strata_config::placeholder::PlaceholderSyntax;
///
/// let syntax = PlaceholderSyntax::builder()
///     .prefix("{{")
///     .suffix("}}")
///     .delimiter("|")
///     .build()?;
/// assert_eq!(syntax.prefix(), "{{");
/// assert_eq!(syntax.escape(), '\\');
/// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderSyntax {
    prefix: String,
    suffix: String,
    delimiter: String,
    escape: char,
}

impl PlaceholderSyntax {
    /// Construct a syntax from its four components.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidSyntax`] when `prefix`, `suffix` or
    /// `delimiter` is blank.
    pub fn new(
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        delimiter: impl Into<String>,
        escape: char,
    ) -> StrataResult<Self> {
        Ok(Self {
            prefix: require_non_blank("prefix", prefix.into())?,
            suffix: require_non_blank("suffix", suffix.into())?,
            delimiter: require_non_blank("delimiter", delimiter.into())?,
            escape,
        })
    }

    /// Start a builder seeded with the default `${key:fallback}` grammar.
    #[must_use]
    pub fn builder() -> PlaceholderSyntaxBuilder {
        PlaceholderSyntaxBuilder::default()
    }

    /// Token that opens a placeholder.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Token that closes a placeholder.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Separator between the key and its fallback.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Character that, placed before the prefix, keeps it literal.
    #[must_use]
    pub const fn escape(&self) -> char {
        self.escape
    }

    /// Render `key` as an unresolved placeholder, `prefix + key + suffix`.
    pub(crate) fn wrap(&self, key: &str) -> String {
        let mut out = String::with_capacity(self.prefix.len() + key.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(key);
        out.push_str(&self.suffix);
        out
    }
}

impl Default for PlaceholderSyntax {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            suffix: DEFAULT_SUFFIX.to_owned(),
            delimiter: DEFAULT_DELIMITER.to_owned(),
            escape: DEFAULT_ESCAPE,
        }
    }
}

/// Builder for [`PlaceholderSyntax`]. Validation happens in
/// [`PlaceholderSyntaxBuilder::build`].
#[derive(Clone, Debug)]
#[must_use]
pub struct PlaceholderSyntaxBuilder {
    prefix: String,
    suffix: String,
    delimiter: String,
    escape: char,
}

impl Default for PlaceholderSyntaxBuilder {
    fn default() -> Self {
        let PlaceholderSyntax {
            prefix,
            suffix,
            delimiter,
            escape,
        } = PlaceholderSyntax::default();
        Self {
            prefix,
            suffix,
            delimiter,
            escape,
        }
    }
}

impl PlaceholderSyntaxBuilder {
    /// Set the opening token.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the closing token.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set the key/fallback separator.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Set the escape character.
    pub const fn escape(mut self, escape: char) -> Self {
        self.escape = escape;
        self
    }

    /// Validate the components and build the syntax.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::InvalidSyntax`] when any token is blank.
    pub fn build(self) -> StrataResult<PlaceholderSyntax> {
        PlaceholderSyntax::new(self.prefix, self.suffix, self.delimiter, self.escape)
    }
}

fn require_non_blank(field: &'static str, value: String) -> StrataResult<String> {
    if value.trim().is_empty() {
        return Err(Arc::new(StrataError::invalid_syntax(
            field,
            "must not be blank",
        )));
    }
    Ok(value)
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]
mod tests {
    use rstest::rstest;

    use super::PlaceholderSyntax;
    use crate::StrataError;

    #[rstest]
    fn default_grammar_matches_dollar_brace() {
        let syntax = PlaceholderSyntax::default();
        assert_eq!(
            (syntax.prefix(), syntax.suffix(), syntax.delimiter(), syntax.escape()),
            ("${", "}", ":", '\\')
        );
        assert_eq!(syntax.wrap("key"), "${key}");
    }

    #[rstest]
    #[case("", "}", ":", "prefix")]
    #[case("${", "  ", ":", "suffix")]
    #[case("${", "}", "\t", "delimiter")]
    fn blank_tokens_are_rejected(
        #[case] prefix: &str,
        #[case] suffix: &str,
        #[case] delimiter: &str,
        #[case] expected_field: &str,
    ) {
        let err = PlaceholderSyntax::new(prefix, suffix, delimiter, '\\')
            .expect_err("blank token must be rejected");
        match err.as_ref() {
            StrataError::InvalidSyntax { field, .. } => assert_eq!(*field, expected_field),
            other => panic!("expected InvalidSyntax, got {other:?}"),
        }
    }

    #[rstest]
    fn builder_overrides_individual_tokens() {
        let syntax = PlaceholderSyntax::builder()
            .prefix("%{")
            .escape('!')
            .build()
            .expect("valid syntax");
        assert_eq!(syntax.prefix(), "%{");
        assert_eq!(syntax.suffix(), "}");
        assert_eq!(syntax.escape(), '!');
    }
}
