//! Steps exercising the placeholder engine.

use anyhow::{Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};
use strata_config::StrataError;
use strata_config::placeholder::{Interpolator, MapSource};

use super::values::unquote;
use crate::fixtures::PlaceholderContext;

#[given("a variable {key} set to {value}")]
fn add_variable(placeholder_context: &PlaceholderContext, key: String, value: String) -> Result<()> {
    let variables = placeholder_context
        .variables
        .take()
        .unwrap_or_default()
        .with(unquote(&key), unquote(&value));
    placeholder_context.variables.set(variables);
    Ok(())
}

#[when("the template {template} is resolved")]
fn resolve_template(placeholder_context: &PlaceholderContext, template: String) -> Result<()> {
    let variables = placeholder_context
        .variables
        .take()
        .unwrap_or_else(MapSource::new);
    let engine = Interpolator::default().with_default_sources(Vec::new());
    let outcome = engine.resolve(&unquote(&template), &[&variables]);
    placeholder_context.outcome.set(outcome);
    Ok(())
}

#[then("the resolved text is {expected}")]
fn assert_resolved(placeholder_context: &PlaceholderContext, expected: String) -> Result<()> {
    let outcome = placeholder_context
        .outcome
        .take()
        .ok_or_else(|| anyhow!("no template was resolved"))?
        .map_err(|err| anyhow!(err.to_string()))?;
    let want = unquote(&expected);
    ensure!(
        outcome.as_deref() == Some(want.as_str()),
        "resolved {outcome:?}; expected {want:?}"
    );
    Ok(())
}

#[then("the template is unresolved")]
fn assert_unresolved(placeholder_context: &PlaceholderContext) -> Result<()> {
    let outcome = placeholder_context
        .outcome
        .take()
        .ok_or_else(|| anyhow!("no template was resolved"))?
        .map_err(|err| anyhow!(err.to_string()))?;
    ensure!(outcome.is_none(), "template unexpectedly resolved to {outcome:?}");
    Ok(())
}

#[then("a circular reference is reported")]
fn assert_cycle(placeholder_context: &PlaceholderContext) -> Result<()> {
    let err = placeholder_context
        .outcome
        .take()
        .ok_or_else(|| anyhow!("no template was resolved"))?
        .err()
        .ok_or_else(|| anyhow!("resolution unexpectedly succeeded"))?;
    ensure!(
        matches!(err.as_ref(), StrataError::CircularReference { .. }),
        "unexpected error {err:?}"
    );
    Ok(())
}
