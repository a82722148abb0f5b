//! Behavioural coverage for the placeholder engine.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]

use std::collections::BTreeSet;
use std::sync::Arc;

use rstest::{fixture, rstest};
use serial_test::serial;
use test_helpers::env;

use super::{Interpolator, MapSource, PlaceholderSyntax, PropertySource, Resolution};
use crate::StrataError;

/// Engine that consults only the sources handed to each call.
#[fixture]
fn isolated() -> Interpolator {
    Interpolator::default().with_default_sources(Vec::new())
}

#[fixture]
fn vars() -> MapSource {
    MapSource::new()
        .with("profile", "dev")
        .with("host", "localhost")
        .with("port", 5432)
        .with("url", "${host}:${port}")
        .with("empty", "")
}

fn keys(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("plain text")]
#[case("dollar $ and {braces}")]
#[case("closing } only")]
fn templates_without_prefix_are_returned_unchanged(isolated: Interpolator, #[case] template: &str) {
    let empty: [&dyn PropertySource; 0] = [];
    assert_eq!(
        isolated.resolve(template, &empty).expect("no cycle"),
        Some(template.to_owned())
    );
    let map = MapSource::new().with("x", "y");
    assert_eq!(
        isolated.resolve(template, &[&map]).expect("no cycle"),
        Some(template.to_owned())
    );
}

#[rstest]
fn nothing_is_resolvable_without_sources(isolated: Interpolator) {
    assert_eq!(isolated.resolve("${a:fallback}", &[]).expect("no cycle"), None);
}

#[rstest]
fn first_source_wins(isolated: Interpolator) {
    let first = MapSource::new().with("k", "first");
    let second = MapSource::new().with("k", "second").with("only", "second-only");
    assert_eq!(
        isolated
            .resolve("${k}/${only}", &[&first, &second])
            .expect("no cycle"),
        Some("first/second-only".to_owned())
    );
}

#[rstest]
fn values_are_resolved_recursively(isolated: Interpolator, vars: MapSource) {
    assert_eq!(
        isolated.resolve("jdbc://${url}/db", &[&vars]).expect("no cycle"),
        Some("jdbc://localhost:5432/db".to_owned())
    );
}

#[rstest]
#[case("${missing:default}", "default")]
#[case("x${missing:}y", "xy")]
#[case("${missing:a:b}", "a:b")]
#[case("${missing:${host}}", "localhost")]
#[case("${profile:ignored}", "dev")]
#[case("${empty:ignored}", "")]
fn fallbacks_apply_only_when_no_source_has_the_key(
    isolated: Interpolator,
    vars: MapSource,
    #[case] template: &str,
    #[case] expected: &str,
) {
    assert_eq!(
        isolated.resolve(template, &[&vars]).expect("no cycle"),
        Some(expected.to_owned())
    );
}

#[rstest]
fn nested_placeholders_resolve_innermost_first(isolated: Interpolator) {
    let sources = MapSource::new().with("b", "x").with("a-x", "chosen");
    assert_eq!(
        isolated.resolve("${a-${b}}!", &[&sources]).expect("no cycle"),
        Some("chosen!".to_owned())
    );
}

#[rstest]
fn inner_placeholders_must_resolve_even_when_outer_key_exists(isolated: Interpolator) {
    let sources = MapSource::new().with("a", "present");
    let outcome = isolated
        .resolve_detailed("${a:${missing}}", &[&sources])
        .expect("no cycle");
    assert_eq!(
        outcome,
        Resolution::Incomplete {
            unresolved: keys(&["missing"])
        }
    );
}

#[rstest]
fn any_unresolved_key_fails_the_whole_template(isolated: Interpolator, vars: MapSource) {
    let outcome = isolated
        .resolve_detailed("${host}-${nope}-${port}-${also_nope}", &[&vars])
        .expect("no cycle");
    assert!(!outcome.is_complete());
    assert_eq!(
        outcome,
        Resolution::Incomplete {
            unresolved: keys(&["also_nope", "nope"])
        }
    );
    assert_eq!(
        isolated.resolve("${host}-${nope}", &[&vars]).expect("no cycle"),
        None
    );
}

#[rstest]
#[case("${}")]
#[case("${   }")]
#[case("${:}")]
fn blank_keys_are_never_looked_up(#[case] template: &str) {
    let everything = super::FnSource::new(|_key: &str| Some("value".to_owned()));
    let engine = Interpolator::default().with_default_sources(Vec::new());
    let outcome = engine
        .resolve(template, &[&everything])
        .expect("no cycle");
    if template == "${:}" {
        // A blank key with an empty fallback resolves to the fallback.
        assert_eq!(outcome, Some(String::new()));
    } else {
        assert_eq!(outcome, None);
    }
}

#[rstest]
fn unmatched_suffix_is_copied(isolated: Interpolator, vars: MapSource) {
    assert_eq!(
        isolated.resolve("}${profile}}", &[&vars]).expect("no cycle"),
        Some("}dev}".to_owned())
    );
}

#[rstest]
fn unterminated_placeholder_stays_literal(isolated: Interpolator, vars: MapSource) {
    assert_eq!(
        isolated.resolve("${profile", &[&vars]).expect("no cycle"),
        Some("${profile".to_owned())
    );
}

#[rstest]
fn escaped_prefix_is_not_a_placeholder() {
    let engine = Interpolator::default();
    assert_eq!(
        engine.resolve(r"a-\${x}", &[]).expect("no cycle"),
        Some("a-${x}".to_owned())
    );
}

#[rstest]
fn double_escape_keeps_one_escape_character(isolated: Interpolator, vars: MapSource) {
    assert_eq!(
        isolated.resolve(r"\\${profile}", &[&vars]).expect("no cycle"),
        Some(r"\${profile}".to_owned())
    );
}

#[rstest]
#[serial]
fn concrete_profile_scenarios() {
    let _profile = env::remove_var("profile");
    let engine = Interpolator::default();
    let env_source = super::EnvSource;
    let map = MapSource::new().with("profile", "dev");
    assert_eq!(
        engine
            .resolve("app-${profile}", &[&env_source, &map])
            .expect("no cycle"),
        Some("app-dev".to_owned())
    );
    assert_eq!(
        engine.resolve("app-${profile:default}", &[]).expect("no cycle"),
        Some("app-default".to_owned())
    );
}

#[rstest]
#[serial]
fn environment_is_consulted_before_call_sources() {
    let _guard = env::set_var("STRATA_PLACEHOLDER_TIER", "from-env");
    let map = MapSource::new().with("STRATA_PLACEHOLDER_TIER", "from-map");
    assert_eq!(
        Interpolator::default()
            .resolve("${STRATA_PLACEHOLDER_TIER}", &[&map])
            .expect("no cycle"),
        Some("from-env".to_owned())
    );
}

#[rstest]
#[case(&[("a", "${b}"), ("b", "${a}")], "${a}", "a")]
#[case(&[("a", "${a}")], "x-${a}", "a")]
#[case(&[("a", "${b}"), ("b", "${c:${a}}")], "${a}", "a")]
fn circular_references_are_fatal(
    isolated: Interpolator,
    #[case] entries: &[(&str, &str)],
    #[case] template: &str,
    #[case] expected_key: &str,
) {
    let sources: MapSource = entries.iter().copied().collect();
    let err = isolated
        .resolve(template, &[&sources])
        .expect_err("cycle must abort resolution");
    match err.as_ref() {
        StrataError::CircularReference { key } => assert_eq!(key, expected_key),
        other => panic!("expected CircularReference, got {other:?}"),
    }
}

#[rstest]
fn repeated_keys_are_not_cycles(isolated: Interpolator) {
    let sources = MapSource::new().with("a", "${b}${b}").with("b", "z");
    assert_eq!(
        isolated.resolve("${a}-${a}-${b}", &[&sources]).expect("no cycle"),
        Some("zz-zz-z".to_owned())
    );
}

#[rstest]
fn custom_syntax_is_honoured() {
    let syntax = PlaceholderSyntax::builder()
        .prefix("{{")
        .suffix("}}")
        .delimiter("|")
        .escape('!')
        .build()
        .expect("valid syntax");
    let engine = Interpolator::new(syntax).with_default_sources(Vec::new());
    let sources = MapSource::new().with("name", "world");
    assert_eq!(
        engine
            .resolve("hello {{name}} {{title|sir}} !{{raw}} ${kept}", &[&sources])
            .expect("no cycle"),
        Some("hello world sir {{raw}} ${kept}".to_owned())
    );
}

#[rstest]
fn default_sources_precede_call_sources() {
    let defaults: Vec<Arc<dyn PropertySource>> =
        vec![Arc::new(MapSource::new().with("k", "default"))];
    let engine = Interpolator::default().with_default_sources(defaults);
    let call = MapSource::new().with("k", "call").with("other", "call");
    assert_eq!(
        engine.resolve("${k}/${other}", &[&call]).expect("no cycle"),
        Some("default/call".to_owned())
    );
}

#[rstest]
fn engine_is_shareable_across_threads(isolated: Interpolator, vars: MapSource) {
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| isolated.resolve("${url}", &[&vars]).expect("no cycle"))
            })
            .collect();
        for handle in handles {
            let outcome = handle.join().expect("worker panicked");
            assert_eq!(outcome.as_deref(), Some("localhost:5432"));
        }
    });
}
