//! Behavioural properties of deep merge and typed extraction.

use std::sync::Arc;

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use serde::Deserialize;
use serde_json::{Value, json};
use strata_config::merge::{merge, merge_value};
use strata_config::{ConfigTree, StrataError};

fn plain(err: &Arc<StrataError>) -> anyhow::Error {
    anyhow!(err.to_string())
}

fn merged(sources: Vec<Value>) -> Result<ConfigTree> {
    merge(sources).map_err(|e| plain(&e))
}

#[derive(Debug, Deserialize, PartialEq)]
struct Database {
    host: String,
    port: u16,
    #[serde(default)]
    replicas: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Settings {
    name: String,
    database: Database,
}

#[rstest]
fn merging_one_document_is_identity() -> Result<()> {
    let doc = json!({"a": {"b": [1, 2]}, "c": null});
    let tree = merged(vec![doc.clone()])?;
    ensure!(tree.as_value() == &doc, "got {}", tree.as_value());
    Ok(())
}

#[rstest]
fn merging_is_associative_for_objects() -> Result<()> {
    let a = json!({"x": {"p": 1, "q": 2}, "list": [1]});
    let b = json!({"x": {"q": 3}, "y": true});
    let c = json!({"x": {"r": 4}, "list": [2, 3]});

    let left = merged(vec![merged(vec![a.clone(), b.clone()])?.into_value(), c.clone()])?;
    let right = merged(vec![a, merged(vec![b, c])?.into_value()])?;
    ensure!(left == right, "{} != {}", left.as_value(), right.as_value());
    Ok(())
}

#[rstest]
fn keys_absent_from_later_documents_survive() -> Result<()> {
    let tree = merged(vec![
        json!({"keep": "me", "nested": {"keep": 1, "swap": 1}}),
        json!({"nested": {"swap": 2}}),
    ])?;
    ensure!(
        tree.as_value() == &json!({"keep": "me", "nested": {"keep": 1, "swap": 2}}),
        "got {}",
        tree.as_value()
    );
    Ok(())
}

#[rstest]
#[case(json!({"v": {"deep": 1}}), json!({"v": [1]}), json!({"v": [1]}))]
#[case(json!({"v": [1, 2]}), json!({"v": {"deep": 1}}), json!({"v": {"deep": 1}}))]
#[case(json!({"v": "text"}), json!({"v": {"deep": 1}}), json!({"v": {"deep": 1}}))]
fn type_changes_replace_wholesale(
    #[case] base: Value,
    #[case] overlay: Value,
    #[case] expected: Value,
) -> Result<()> {
    let tree = merged(vec![base, overlay])?;
    ensure!(tree.as_value() == &expected, "got {}", tree.as_value());
    Ok(())
}

#[rstest]
fn merge_value_mutates_in_place() -> Result<()> {
    let mut target = json!({"a": {"b": 1}});
    merge_value(&mut target, json!({"a": {"c": 2}})).map_err(|e| plain(&e))?;
    ensure!(target == json!({"a": {"b": 1, "c": 2}}), "got {target}");
    Ok(())
}

#[rstest]
fn merged_tree_extracts_into_typed_settings() -> Result<()> {
    let tree = merged(vec![
        json!({"name": "svc", "database": {"host": "localhost", "port": 5432, "replicas": ["r1"]}}),
        json!({"database": {"port": 6543, "replicas": []}}),
    ])?;
    let settings: Settings = tree.extract().map_err(|e| plain(&e))?;
    ensure!(
        settings
            == Settings {
                name: "svc".to_owned(),
                database: Database {
                    host: "localhost".to_owned(),
                    port: 6543,
                    replicas: Vec::new(),
                },
            },
        "got {settings:?}"
    );
    let port: u16 = tree.get("database.port").map_err(|e| plain(&e))?;
    ensure!(port == 6543, "got {port}");
    Ok(())
}

#[rstest]
fn extraction_reports_missing_paths() -> Result<()> {
    let tree = merged(vec![json!({"a": 1})])?;
    let err = tree
        .get::<u8>("b.c")
        .err()
        .ok_or_else(|| anyhow!("missing path extracted"))?;
    ensure!(
        matches!(err.as_ref(), StrataError::Extraction(..)),
        "unexpected error {err:?}"
    );
    Ok(())
}
