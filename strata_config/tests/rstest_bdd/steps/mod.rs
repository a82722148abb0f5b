//! Step definitions registered with `rstest-bdd`.

mod loader_steps;
mod merge_steps;
mod placeholder_steps;
mod values;
