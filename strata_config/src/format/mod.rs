//! Document formats and their decoders.
//!
//! Every decoder produces a [`serde_json::Value`] so that documents written in
//! different formats merge through the same fold. JSON is always available;
//! JSON5, YAML and TOML are gated behind the `json5`, `yaml` and `toml`
//! features respectively.

use std::fmt;
use std::sync::Arc;

use camino::Utf8Path;
use serde_json::Value;

use crate::{BoxedCause, StrataError, StrataResult};

/// Serialization format of a configuration document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// Strict JSON.
    Json,
    /// JSON5 (comments, trailing commas, unquoted keys).
    Json5,
    /// YAML 1.2 with strict booleans.
    Yaml,
    /// TOML.
    Toml,
}

const ALL: [ConfigFormat; 4] = [
    ConfigFormat::Json,
    ConfigFormat::Json5,
    ConfigFormat::Yaml,
    ConfigFormat::Toml,
];

const ALL_EXTENSIONS: [&str; 5] = ["json", "json5", "yaml", "yml", "toml"];

impl ConfigFormat {
    /// File extensions recognised for this format, preferred first.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Json => &["json"],
            Self::Json5 => &["json5"],
            Self::Yaml => &["yaml", "yml"],
            Self::Toml => &["toml"],
        }
    }

    /// Every recognised extension in declaration order, whether or not its
    /// decoder is compiled in.
    #[must_use]
    pub const fn all_extensions() -> &'static [&'static str] {
        &ALL_EXTENSIONS
    }

    /// Formats whose decoder is compiled into this build, in declaration
    /// order.
    pub fn enabled() -> impl Iterator<Item = Self> {
        ALL.into_iter().filter(|format| format.is_enabled())
    }

    /// Returns `true` when the decoder for this format is compiled in.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        match self {
            Self::Json => true,
            Self::Json5 => cfg!(feature = "json5"),
            Self::Yaml => cfg!(feature = "yaml"),
            Self::Toml => cfg!(feature = "toml"),
        }
    }

    /// Look up a format by extension, ignoring ASCII case and a leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::format::ConfigFormat;
    ///
    /// assert_eq!(ConfigFormat::from_extension("YML"), Some(ConfigFormat::Yaml));
    /// assert_eq!(ConfigFormat::from_extension(".toml"), Some(ConfigFormat::Toml));
    /// assert_eq!(ConfigFormat::from_extension("ini"), None);
    /// ```
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        let wanted = extension.strip_prefix('.').unwrap_or(extension);
        ALL.into_iter().find(|format| {
            format
                .extensions()
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(wanted))
        })
    }

    /// Detect the format of `path` from its extension.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        path.extension().and_then(Self::from_extension)
    }

    /// Decode `text` into a value tree.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::UnsupportedFormat`] when the decoder's feature
    /// is disabled and [`StrataError::Decode`] when `text` is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::format::ConfigFormat;
    ///
    /// let value = ConfigFormat::Json.decode(r#"{"port": 8080}"#)?;
    /// assert_eq!(value["port"], 8080);
    /// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
    /// ```
    pub fn decode(self, text: &str) -> StrataResult<Value> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(|err| self.decode_error(err)),
            Self::Json5 => self.decode_json5(text),
            Self::Yaml => self.decode_yaml(text),
            Self::Toml => self.decode_toml(text),
        }
    }

    #[cfg(feature = "json5")]
    fn decode_json5(self, text: &str) -> StrataResult<Value> {
        json5::from_str(text).map_err(|err| self.decode_error(err))
    }

    #[cfg(not(feature = "json5"))]
    fn decode_json5(self, _text: &str) -> StrataResult<Value> {
        Err(self.unsupported())
    }

    #[cfg(feature = "yaml")]
    fn decode_yaml(self, text: &str) -> StrataResult<Value> {
        serde_saphyr::from_str_with_options(
            text,
            serde_saphyr::Options {
                strict_booleans: true,
                ..serde_saphyr::Options::default()
            },
        )
        .map_err(|err| self.decode_error(err))
    }

    #[cfg(not(feature = "yaml"))]
    fn decode_yaml(self, _text: &str) -> StrataResult<Value> {
        Err(self.unsupported())
    }

    #[cfg(feature = "toml")]
    fn decode_toml(self, text: &str) -> StrataResult<Value> {
        toml::from_str(text).map_err(|err| self.decode_error(err))
    }

    #[cfg(not(feature = "toml"))]
    fn decode_toml(self, _text: &str) -> StrataResult<Value> {
        Err(self.unsupported())
    }

    fn decode_error(self, err: impl Into<BoxedCause>) -> Arc<StrataError> {
        Arc::new(StrataError::Decode {
            format: self,
            source: err.into(),
        })
    }

    #[cfg_attr(
        all(feature = "json5", feature = "yaml", feature = "toml"),
        expect(dead_code, reason = "every decoder is compiled in")
    )]
    fn unsupported(self) -> Arc<StrataError> {
        Arc::new(StrataError::UnsupportedFormat {
            name: self.to_string(),
        })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Json5 => "json5",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::ConfigFormat;
    use crate::StrataError;

    #[rstest]
    #[case("json", Some(ConfigFormat::Json))]
    #[case("JSON5", Some(ConfigFormat::Json5))]
    #[case("yaml", Some(ConfigFormat::Yaml))]
    #[case("Yml", Some(ConfigFormat::Yaml))]
    #[case(".toml", Some(ConfigFormat::Toml))]
    #[case("properties", None)]
    #[case("", None)]
    fn detects_extensions(#[case] extension: &str, #[case] expected: Option<ConfigFormat>) {
        assert_eq!(ConfigFormat::from_extension(extension), expected);
    }

    #[rstest]
    #[case("application.yaml", Some(ConfigFormat::Yaml))]
    #[case("conf/application-dev.TOML", Some(ConfigFormat::Toml))]
    #[case("application", None)]
    fn detects_paths(#[case] path: &str, #[case] expected: Option<ConfigFormat>) {
        assert_eq!(ConfigFormat::from_path(camino::Utf8Path::new(path)), expected);
    }

    #[rstest]
    fn extensions_follow_declaration_order() {
        assert_eq!(
            ConfigFormat::all_extensions(),
            ["json", "json5", "yaml", "yml", "toml"]
        );
        assert!(ConfigFormat::enabled().any(|format| format == ConfigFormat::Json));
    }

    #[rstest]
    fn json_decodes_in_document_order() {
        let value = ConfigFormat::Json
            .decode(r#"{"b": 1, "a": [true, null]}"#)
            .expect("valid json");
        assert_eq!(value, json!({"b": 1, "a": [true, null]}));
        let keys: Vec<_> = value
            .as_object()
            .expect("object root")
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[rstest]
    fn malformed_json_is_a_decode_error() {
        let err = ConfigFormat::Json.decode("{").expect_err("invalid json");
        assert!(matches!(
            err.as_ref(),
            StrataError::Decode {
                format: ConfigFormat::Json,
                ..
            }
        ));
        assert!(err.to_string().starts_with("failed to decode json document"));
    }

    #[cfg(feature = "yaml")]
    #[rstest]
    fn yaml_uses_strict_booleans() {
        let value = ConfigFormat::Yaml
            .decode("enabled: true\nanswer: yes\nnested:\n  list: [1, 2]\n")
            .expect("valid yaml");
        assert_eq!(
            value,
            json!({"enabled": true, "answer": "yes", "nested": {"list": [1, 2]}})
        );
    }

    #[cfg(feature = "toml")]
    #[rstest]
    fn toml_tables_become_objects() {
        let value = ConfigFormat::Toml
            .decode("name = \"svc\"\n[db]\nport = 5432\n")
            .expect("valid toml");
        assert_eq!(value, json!({"name": "svc", "db": {"port": 5432}}));
    }

    #[cfg(feature = "toml")]
    #[rstest]
    fn malformed_toml_is_a_decode_error() {
        let err = ConfigFormat::Toml.decode("= broken").expect_err("invalid toml");
        assert!(matches!(
            err.as_ref(),
            StrataError::Decode {
                format: ConfigFormat::Toml,
                ..
            }
        ));
    }

    #[cfg(feature = "json5")]
    #[rstest]
    fn json5_accepts_comments_and_trailing_commas() {
        let value = ConfigFormat::Json5
            .decode("{ // comment\n  port: 1, }")
            .expect("valid json5");
        assert_eq!(value, json!({"port": 1}));
    }

    #[cfg(not(feature = "json5"))]
    #[rstest]
    fn disabled_decoders_report_unsupported_format() {
        let err = ConfigFormat::Json5.decode("{}").expect_err("json5 disabled");
        assert!(matches!(
            err.as_ref(),
            StrataError::UnsupportedFormat { name } if name == "json5"
        ));
    }
}
