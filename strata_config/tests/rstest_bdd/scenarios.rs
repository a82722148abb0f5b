//! Binds the feature files to the step registry.

use rstest_bdd_macros::scenarios;

use crate::fixtures::{
    LoaderContext, MergeContext, PlaceholderContext, loader_context, merge_context,
    placeholder_context,
};

scenarios!(
    "tests/features/placeholder_resolution.feature",
    fixtures = [placeholder_context: PlaceholderContext]
);
scenarios!(
    "tests/features/deep_merge.feature",
    fixtures = [merge_context: MergeContext]
);
scenarios!(
    "tests/features/layered_loading.feature",
    fixtures = [loader_context: LoaderContext]
);
