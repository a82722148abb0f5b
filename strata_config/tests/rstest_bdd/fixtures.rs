//! Shared fixtures for the behavioural scenarios.

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::Value;
use strata_config::placeholder::MapSource;
use strata_config::{ConfigTree, StrataResult};
use test_helpers::fs::ConfigDir;

/// State shared by placeholder resolution steps.
#[derive(Debug, Default, ScenarioState)]
pub struct PlaceholderContext {
    pub variables: Slot<MapSource>,
    pub outcome: Slot<StrataResult<Option<String>>>,
}

/// State shared by deep-merge steps.
#[derive(Debug, Default, ScenarioState)]
pub struct MergeContext {
    pub documents: Slot<Vec<Value>>,
    pub outcome: Slot<StrataResult<ConfigTree>>,
}

/// State shared by loader steps.
#[derive(Debug, Default, ScenarioState)]
pub struct LoaderContext {
    pub dir: Slot<ConfigDir>,
    pub profile: Slot<String>,
    pub resource_names: Slot<Vec<String>>,
    pub outcome: Slot<StrataResult<ConfigTree>>,
}

#[fixture]
pub fn placeholder_context() -> PlaceholderContext {
    PlaceholderContext::default()
}

#[fixture]
pub fn merge_context() -> MergeContext {
    MergeContext::default()
}

#[fixture]
pub fn loader_context() -> LoaderContext {
    LoaderContext::default()
}
