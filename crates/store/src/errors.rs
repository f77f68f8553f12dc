use planner_dag::AncestryError;
use planner_primitives::version::VersionId;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("team already exists: {0}")]
    TeamAlreadyExists(String),

    #[error("Period not found: {0}")]
    PeriodNotFound(String),

    #[error("period {period_id} has no version {version}")]
    VersionNotFound {
        period_id: String,
        version: VersionId,
    },

    #[error("period has no version")]
    MissingVersion,

    #[error("period already exists with version '{0}'")]
    DuplicateVersion(VersionId),

    #[error("period should have exactly one parent version, found {0}")]
    InvalidParentCount(usize),

    #[error("parent version '{0}' does not exist")]
    UnknownParent(VersionId),

    #[error("unexpected parent versions on new period: {}", join(.0))]
    UnexpectedParents(Vec<VersionId>),

    /// Stored history is broken: a revision is missing, loops, or the two
    /// lines of history never meet.
    #[error("unable to find common parent for versions {parent}, {latest}: {source}")]
    Ancestry {
        parent: VersionId,
        latest: VersionId,
        source: AncestryError,
    },

    /// The revisions being merged belong to different periods.
    #[error("period revisions disagree on identity: {0}")]
    IdentityMismatch(String),

    /// Concurrent edits could not be reconciled. `reasons` lists every
    /// conflicting field.
    #[error(
        "Concurrent modification error: unable to merge period into latest {latest}: {}",
        .reasons.join("\n")
    )]
    ConcurrentModification {
        latest: VersionId,
        reasons: Vec<String>,
    },
}

fn join(versions: &[VersionId]) -> String {
    versions
        .iter()
        .map(VersionId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
