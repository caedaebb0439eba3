//! Shared machinery for the skyhaul CLI: the dataset catalog, the
//! sequential pull orchestrator, and console UI helpers.

pub mod catalog;
pub mod run;
pub mod task_pool;
pub mod ui;
