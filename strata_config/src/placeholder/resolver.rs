//! Placeholder resolution over an ordered list of property sources.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use super::parser::{Segment, parse};
use super::{EnvSource, PlaceholderSyntax, PropertySource};
use crate::{StrataError, StrataResult};

/// Outcome of resolving one template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Every placeholder resolved; the fully expanded text.
    Complete(String),
    /// At least one key had neither a source value nor a fallback.
    Incomplete {
        /// Keys that could not be resolved, sorted.
        unresolved: BTreeSet<String>,
    },
}

impl Resolution {
    /// Convert into the all-or-nothing form: the text only when complete.
    #[must_use]
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Complete(text) => Some(text),
            Self::Incomplete { .. } => None,
        }
    }

    /// Returns `true` when every placeholder resolved.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Per-call bookkeeping threaded through the recursive resolution.
#[derive(Debug, Default)]
struct Session {
    in_flight: HashSet<String>,
    unresolved: BTreeSet<String>,
}

/// Placeholder engine.
///
/// An interpolator carries a [`PlaceholderSyntax`] and a list of default
/// sources (the process environment unless replaced) that are consulted
/// before the sources passed to each call. It holds no per-call state, so a
/// single instance can serve concurrent calls.
///
/// # Examples
///
/// ```
/// use strata_config::placeholder::{Interpolator, MapSource};
///
/// let vars = MapSource::new().with("profile", "dev");
/// let engine = Interpolator::default();
/// assert_eq!(
///     engine.resolve("app-${profile}", &[&vars])?.as_deref(),
///     Some("app-dev")
/// );
/// assert_eq!(
///     engine.resolve("app-${tier:default}", &[])?.as_deref(),
///     Some("app-default")
/// );
/// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
/// ```
#[derive(Clone)]
pub struct Interpolator {
    syntax: PlaceholderSyntax,
    defaults: Vec<Arc<dyn PropertySource>>,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new(PlaceholderSyntax::default())
    }
}

impl fmt::Debug for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpolator")
            .field("syntax", &self.syntax)
            .field("default_sources", &self.defaults.len())
            .finish()
    }
}

impl Interpolator {
    /// Create an engine for `syntax` whose default source is the process
    /// environment.
    #[must_use]
    pub fn new(syntax: PlaceholderSyntax) -> Self {
        Self {
            syntax,
            defaults: vec![Arc::new(EnvSource)],
        }
    }

    /// Replace the default sources consulted before per-call sources.
    ///
    /// Passing an empty list makes each call rely solely on its own sources.
    #[must_use]
    pub fn with_default_sources(mut self, defaults: Vec<Arc<dyn PropertySource>>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Grammar used by this engine.
    #[must_use]
    pub const fn syntax(&self) -> &PlaceholderSyntax {
        &self.syntax
    }

    /// Resolve every placeholder in `template`, or nothing at all.
    ///
    /// Returns `Ok(Some(text))` when every placeholder resolved and
    /// `Ok(None)` when at least one key had no value and no fallback.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::CircularReference`] when a key is re-entered
    /// while it is still being resolved.
    pub fn resolve(
        &self,
        template: &str,
        sources: &[&dyn PropertySource],
    ) -> StrataResult<Option<String>> {
        self.resolve_detailed(template, sources)
            .map(Resolution::into_option)
    }

    /// Resolve `template`, reporting which keys were missing on failure.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::CircularReference`] when a key is re-entered
    /// while it is still being resolved.
    pub fn resolve_detailed(
        &self,
        template: &str,
        sources: &[&dyn PropertySource],
    ) -> StrataResult<Resolution> {
        if template.trim().is_empty() || !template.contains(self.syntax.prefix()) {
            return Ok(Resolution::Complete(template.to_owned()));
        }

        let mut chain: Vec<&dyn PropertySource> =
            Vec::with_capacity(self.defaults.len() + sources.len());
        for source in &self.defaults {
            chain.push(&**source);
        }
        chain.extend_from_slice(sources);
        if chain.is_empty() {
            return Ok(Resolution::Incomplete {
                unresolved: BTreeSet::new(),
            });
        }

        let mut session = Session::default();
        let text = self.scan(template, &chain, &mut session)?;
        if session.unresolved.is_empty() {
            Ok(Resolution::Complete(text))
        } else {
            Ok(Resolution::Incomplete {
                unresolved: session.unresolved,
            })
        }
    }

    fn scan(
        &self,
        template: &str,
        sources: &[&dyn PropertySource],
        session: &mut Session,
    ) -> StrataResult<String> {
        let segments = parse(template, &self.syntax);
        self.render(&segments, sources, session)
    }

    fn render(
        &self,
        segments: &[Segment],
        sources: &[&dyn PropertySource],
        session: &mut Session,
    ) -> StrataResult<String> {
        let mut out = String::new();
        for segment in segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(children) => {
                    let raw = self.render(children, sources, session)?;
                    out.push_str(&self.resolve_placeholder(&raw, sources, session)?);
                }
            }
        }
        Ok(out)
    }

    fn resolve_placeholder(
        &self,
        raw: &str,
        sources: &[&dyn PropertySource],
        session: &mut Session,
    ) -> StrataResult<String> {
        let (key, fallback) = match raw.split_once(self.syntax.delimiter()) {
            Some((key, fallback)) => (key, Some(fallback)),
            None => (raw, None),
        };

        if !session.in_flight.insert(key.to_owned()) {
            return Err(Arc::new(StrataError::circular_reference(key)));
        }
        let resolved = self.resolve_key(key, fallback, sources, session);
        session.in_flight.remove(key);
        resolved
    }

    fn resolve_key(
        &self,
        key: &str,
        fallback: Option<&str>,
        sources: &[&dyn PropertySource],
        session: &mut Session,
    ) -> StrataResult<String> {
        if let Some(value) = lookup(key, sources) {
            return self.scan(&value, sources, session);
        }
        if let Some(text) = fallback {
            return self.scan(text, sources, session);
        }
        session.unresolved.insert(key.to_owned());
        Ok(self.syntax.wrap(key))
    }
}

fn lookup(key: &str, sources: &[&dyn PropertySource]) -> Option<String> {
    if key.trim().is_empty() {
        return None;
    }
    sources.iter().find_map(|source| source.get(key))
}
