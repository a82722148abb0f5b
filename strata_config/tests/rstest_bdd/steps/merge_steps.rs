//! Steps exercising the deep-merge engine.

use anyhow::{Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};
use strata_config::StrataError;
use strata_config::merge::merge;

use super::values::json_literal;
use crate::fixtures::MergeContext;

#[given("a document {document}")]
fn add_document(merge_context: &MergeContext, document: String) -> Result<()> {
    let mut documents = merge_context.documents.take().unwrap_or_default();
    documents.push(json_literal(&document)?);
    merge_context.documents.set(documents);
    Ok(())
}

#[when("the documents are merged")]
fn merge_documents(merge_context: &MergeContext) -> Result<()> {
    let documents = merge_context.documents.take().unwrap_or_default();
    merge_context.outcome.set(merge(documents));
    Ok(())
}

#[then("the merged tree is {expected}")]
fn assert_tree(merge_context: &MergeContext, expected: String) -> Result<()> {
    let tree = merge_context
        .outcome
        .take()
        .ok_or_else(|| anyhow!("documents were not merged"))?
        .map_err(|err| anyhow!(err.to_string()))?;
    let want = json_literal(&expected)?;
    ensure!(
        tree.as_value() == &want,
        "merged {}; expected {want}",
        tree.as_value()
    );
    Ok(())
}

#[then("a conversion error is reported")]
fn assert_conversion_error(merge_context: &MergeContext) -> Result<()> {
    let err = merge_context
        .outcome
        .take()
        .ok_or_else(|| anyhow!("documents were not merged"))?
        .err()
        .ok_or_else(|| anyhow!("merge unexpectedly succeeded"))?;
    ensure!(
        matches!(err.as_ref(), StrataError::Conversion { .. }),
        "unexpected error {err:?}"
    );
    Ok(())
}
