//! Version ancestry for periods
//!
//! Every saved revision of a period names the revision(s) it was derived from,
//! which makes the history of one period a DAG keyed by [`VersionId`]. This
//! crate finds the merge base of two revisions in that DAG. It is independent
//! of any storage backend: history is read through the [`VersionLookup`]
//! capability supplied by the caller.
//!
//! ## First-parent walk
//!
//! When a revision has more than one parent, the first entry is always the
//! revision that was latest in the store when it was produced. The resolver
//! therefore only ever follows `parent_versions[0]`, which turns the search
//! into a walk down two singly linked chains. This is not a general
//! lowest-common-ancestor search and must not become one: doing so would
//! change which base is picked for revisions with several parents.

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

use std::collections::{BTreeMap, HashMap, HashSet};

use planner_primitives::period::Period;
use planner_primitives::version::VersionId;
use thiserror::Error;
use tracing::{debug, warn};

/// A revision that knows its own id and the ids it was derived from.
pub trait Versioned {
    fn version(&self) -> &VersionId;

    /// Parent revisions, primary parent first. Empty for a root revision.
    fn parent_versions(&self) -> &[VersionId];
}

impl Versioned for Period {
    fn version(&self) -> &VersionId {
        &self.version
    }

    fn parent_versions(&self) -> &[VersionId] {
        &self.parent_versions
    }
}

impl<T: Versioned + ?Sized> Versioned for &T {
    fn version(&self) -> &VersionId {
        (**self).version()
    }

    fn parent_versions(&self) -> &[VersionId] {
        (**self).parent_versions()
    }
}

/// Read access to the stored revisions of a single period.
///
/// Implementations must return a consistent view for the duration of one
/// [`find_common_ancestor`] call; the resolver performs no caching of its own.
pub trait VersionLookup {
    type Revision<'a>: Versioned
    where
        Self: 'a;

    fn lookup(&self, version: &VersionId) -> Option<Self::Revision<'_>>;
}

impl<R: Versioned> VersionLookup for HashMap<VersionId, R> {
    type Revision<'a>
        = &'a R
    where
        Self: 'a;

    fn lookup(&self, version: &VersionId) -> Option<&R> {
        self.get(version)
    }
}

impl<R: Versioned> VersionLookup for BTreeMap<VersionId, R> {
    type Revision<'a>
        = &'a R
    where
        Self: 'a;

    fn lookup(&self, version: &VersionId) -> Option<&R> {
        self.get(version)
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum AncestryError {
    #[error("version does not exist: {0}")]
    VersionNotFound(VersionId),

    /// Recorded history loops back on itself.
    #[error("version is its own ancestor: {0}")]
    CycleDetected(VersionId),

    /// Both walks reached a root without meeting.
    #[error("no common ancestor, terminated search at {left}, {right}")]
    NoCommonAncestor { left: VersionId, right: VersionId },
}

/// One side of the walk.
#[derive(Debug)]
struct Cursor {
    current: VersionId,
    seen: HashSet<VersionId>,
}

impl Cursor {
    fn new(start: &VersionId) -> Self {
        Self {
            current: start.clone(),
            seen: HashSet::from([start.clone()]),
        }
    }

    /// Moves to the primary parent of the current revision.
    ///
    /// Returns `Ok(None)` when the current revision is a root.
    fn step<L: VersionLookup + ?Sized>(
        &mut self,
        lookup: &L,
    ) -> Result<Option<VersionId>, AncestryError> {
        let revision = lookup
            .lookup(&self.current)
            .ok_or_else(|| AncestryError::VersionNotFound(self.current.clone()))?;

        let Some(parent) = revision.parent_versions().first() else {
            return Ok(None);
        };

        if !self.seen.insert(parent.clone()) {
            warn!(version = %parent, "Detected cycle in recorded version history");
            return Err(AncestryError::CycleDetected(parent.clone()));
        }

        self.current = parent.clone();

        Ok(Some(self.current.clone()))
    }

    fn has_seen(&self, version: &VersionId) -> bool {
        self.seen.contains(version)
    }
}

fn fetch<'l, L: VersionLookup + ?Sized>(
    lookup: &'l L,
    version: &VersionId,
) -> Result<L::Revision<'l>, AncestryError> {
    lookup
        .lookup(version)
        .ok_or_else(|| AncestryError::VersionNotFound(version.clone()))
}

/// Finds the nearest common ancestor of `v1` and `v2`.
///
/// Both sides advance one primary parent at a time, left then right, and the
/// other side's visited set is checked after every single step, so the first
/// intersection found is the nearest one. When `v1 == v2` the revision itself
/// is returned without inspecting its ancestry.
///
/// # Errors
///
/// * [`AncestryError::VersionNotFound`] if a starting revision, or any revision
///   reached during the walk, is missing from `lookup`.
/// * [`AncestryError::CycleDetected`] if either chain revisits a revision.
/// * [`AncestryError::NoCommonAncestor`] if both chains end at roots without
///   meeting.
pub fn find_common_ancestor<'l, L: VersionLookup + ?Sized>(
    lookup: &'l L,
    v1: &VersionId,
    v2: &VersionId,
) -> Result<L::Revision<'l>, AncestryError> {
    if v1 == v2 {
        return fetch(lookup, v1);
    }

    let mut left = Cursor::new(v1);
    let mut right = Cursor::new(v2);

    loop {
        let mut moved = false;

        if let Some(next) = left.step(lookup)? {
            moved = true;

            if right.has_seen(&next) {
                debug!(%v1, %v2, ancestor = %next, "Resolved common ancestor");
                return fetch(lookup, &next);
            }
        }

        if let Some(next) = right.step(lookup)? {
            moved = true;

            if left.has_seen(&next) {
                debug!(%v1, %v2, ancestor = %next, "Resolved common ancestor");
                return fetch(lookup, &next);
            }
        }

        if !moved {
            warn!(
                %v1,
                %v2,
                left = %left.current,
                right = %right.current,
                "Versions share no common ancestor"
            );

            return Err(AncestryError::NoCommonAncestor {
                left: left.current,
                right: right.current,
            });
        }
    }
}
