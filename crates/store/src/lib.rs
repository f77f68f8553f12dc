//! Versioned storage of planning periods.
//!
//! A store keeps every revision of every period, grouped by team. Saving a
//! period never overwrites history: the incoming revision is merged with the
//! stored latest revision (see [`planner_merge`]) relative to their common
//! ancestor (see [`planner_dag`]), and the merge result becomes the new latest.

#![cfg_attr(
    test,
    allow(
        clippy::default_numeric_fallback,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::indexing_slicing,
        clippy::missing_assert_message,
        clippy::panic,
        clippy::unwrap_used,
        reason = "Not useful in unit tests"
    )
)]

pub mod config;
pub mod db;
pub mod errors;

#[cfg(any(test, feature = "testing"))]
pub mod conformance;
#[cfg(any(test, feature = "testing"))]
pub mod fixtures;

pub use config::{DisjointHistoryPolicy, StoreConfig, TeamSeed};
pub use db::{InMemoryStore, PeriodStore};
pub use errors::StoreError;
