//! `rstest-bdd` behavioural suite for `strata_config`.
//!
//! Fixtures hold per-scenario state, the step modules drive the public API
//! and `scenarios` binds the `.feature` files under `tests/features`.

mod fixtures;
mod scenarios;
mod steps;
