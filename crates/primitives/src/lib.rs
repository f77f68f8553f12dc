//! Shared types for the planner workspace: the period document that is
//! versioned and merged, its nested planning entities, and teams.

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

pub mod period;
pub mod team;
pub mod version;

#[cfg(test)]
mod tests {
    mod period;
    mod version;
}
