//! Three-way merge of period revisions
//!
//! Given the common ancestor (`base`), the revision currently stored as latest
//! and the revision a caller wants to commit (`incoming`), [`merge_periods`]
//! reconciles the two lines of edits field by field. Scalars are compared by
//! value. Collections (`buckets`, `people`, `secondary_units`) are compared as
//! whole values: any concurrent edit to a collection that the caller also
//! edited differently is a conflict for the entire collection, even when the
//! two edits touched different elements.
//!
//! Merging never fails outright. The outcome always carries a period, and the
//! caller decides whether to commit it by inspecting
//! [`MergeOutcome::conflicts`].

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

use core::fmt;

use planner_primitives::period::Period;
use planner_primitives::version::VersionId;
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// A field that identifies the document differs between revisions.
    IdentityMismatch,
    /// Both sides changed a field, to different values.
    ConflictingUpdates,
}

/// One field that could not be reconciled, with the three competing values.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Conflict {
    pub path: &'static str,
    pub kind: ConflictKind,
    pub base: String,
    pub latest: String,
    pub incoming: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.kind {
            ConflictKind::IdentityMismatch => "identical values required",
            ConflictKind::ConflictingUpdates => "conflicting updates",
        };

        write!(
            f,
            "{}: {reason}: base={}, latest={}, incoming={}",
            self.path, self.base, self.latest, self.incoming
        )
    }
}

#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct MergeOutcome {
    /// Best-effort result. Conflicting fields hold the incoming value.
    pub merged: Period,
    pub conflicts: Vec<Conflict>,
}

impl MergeOutcome {
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Whether the revisions disagree on which document they belong to.
    #[must_use]
    pub fn has_identity_mismatch(&self) -> bool {
        self.conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::IdentityMismatch)
    }

    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        self.conflicts.iter().map(ToString::to_string).collect()
    }

    /// All conflict descriptions, one per line.
    #[must_use]
    pub fn summary(&self) -> String {
        self.descriptions().join("\n")
    }
}

/// A mergeable field value that can be shown in a conflict report.
trait FieldValue: Clone + PartialEq {
    fn render(&self) -> String;
}

impl FieldValue for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl FieldValue for f64 {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl<T: Clone + PartialEq + Serialize> FieldValue for Vec<T> {
    fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| format!("<unrenderable: {err}>"))
    }
}

#[derive(Debug, Default)]
struct PeriodMerger {
    conflicts: Vec<Conflict>,
}

impl PeriodMerger {
    fn record<T: FieldValue>(
        &mut self,
        path: &'static str,
        kind: ConflictKind,
        base: &T,
        latest: &T,
        incoming: &T,
    ) {
        let conflict = Conflict {
            path,
            kind,
            base: base.render(),
            latest: latest.render(),
            incoming: incoming.render(),
        };

        debug!(%conflict, "Recorded merge conflict");

        self.conflicts.push(conflict);
    }

    fn require_identical<T: FieldValue>(
        &mut self,
        path: &'static str,
        base: &T,
        latest: &T,
        incoming: &T,
    ) -> T {
        if base != latest || base != incoming {
            self.record(path, ConflictKind::IdentityMismatch, base, latest, incoming);
        }

        incoming.clone()
    }

    fn merge_field<T: FieldValue>(
        &mut self,
        path: &'static str,
        base: &T,
        latest: &T,
        incoming: &T,
    ) -> T {
        // No concurrent change, or both sides made the same change.
        if base == latest || latest == incoming {
            return incoming.clone();
        }

        // Only the concurrent writer touched this field.
        if base == incoming {
            return latest.clone();
        }

        self.record(path, ConflictKind::ConflictingUpdates, base, latest, incoming);

        incoming.clone()
    }

    fn merge(mut self, base: &Period, latest: &Period, incoming: &Period) -> MergeOutcome {
        if base.version == latest.version {
            let _ignored = self.require_identical("ID", &base.id, &latest.id, &incoming.id);

            let merged = incoming
                .clone()
                .with_version(VersionId::new_random())
                .with_parents(vec![latest.version.clone()]);

            return self.finish(merged);
        }

        let merged = Period {
            id: self.require_identical("ID", &base.id, &latest.id, &incoming.id),
            display_name: self.merge_field(
                "DisplayName",
                &base.display_name,
                &latest.display_name,
                &incoming.display_name,
            ),
            unit: self.merge_field("Unit", &base.unit, &latest.unit, &incoming.unit),
            unit_abbrev: self.merge_field(
                "UnitAbbrev",
                &base.unit_abbrev,
                &latest.unit_abbrev,
                &incoming.unit_abbrev,
            ),
            notes_url: self.merge_field(
                "NotesURL",
                &base.notes_url,
                &latest.notes_url,
                &incoming.notes_url,
            ),
            max_committed_percentage: self.merge_field(
                "MaxCommittedPercentage",
                &base.max_committed_percentage,
                &latest.max_committed_percentage,
                &incoming.max_committed_percentage,
            ),
            secondary_units: self.merge_field(
                "SecondaryUnits",
                &base.secondary_units,
                &latest.secondary_units,
                &incoming.secondary_units,
            ),
            buckets: self.merge_field("Buckets", &base.buckets, &latest.buckets, &incoming.buckets),
            people: self.merge_field("People", &base.people, &latest.people, &incoming.people),
            version: VersionId::new_random(),
            parent_versions: merge_parents(&base.version, &latest.version),
        };

        self.finish(merged)
    }

    fn finish(self, merged: Period) -> MergeOutcome {
        MergeOutcome {
            merged,
            conflicts: self.conflicts,
        }
    }
}

/// Parents of a merge result: the ancestor first, then the revision that was
/// latest when the merge happened.
fn merge_parents(base: &VersionId, latest: &VersionId) -> Vec<VersionId> {
    if base == latest {
        return vec![latest.clone()];
    }

    vec![base.clone(), latest.clone()]
}

/// Merges `incoming` into `latest`, using `base` as their common ancestor.
///
/// When `base` and `latest` are the same revision nothing happened
/// concurrently, and the result is `incoming` restamped with a fresh version
/// whose only parent is `latest`. Otherwise every field is reconciled on its
/// own and the result gets a fresh version with parents `[base, latest]`.
#[must_use]
pub fn merge_periods(base: &Period, latest: &Period, incoming: &Period) -> MergeOutcome {
    PeriodMerger::default().merge(base, latest, incoming)
}
