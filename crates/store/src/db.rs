use planner_primitives::period::{Period, PeriodList};
use planner_primitives::team::Team;
use planner_primitives::version::VersionId;

use crate::errors::StoreError;

mod memory;

pub use memory::InMemoryStore;

/// Versioned storage of teams and their periods.
///
/// Every save of a period produces a new immutable revision. Implementations
/// must run [`PeriodStore::upsert_period_latest_version`] with isolation
/// strong enough that two concurrent upserts of the same period never both
/// observe the same latest revision.
pub trait PeriodStore: Send + Sync {
    /// All teams, ordered by id.
    fn all_teams(&self) -> Result<Vec<Team>, StoreError>;

    fn team(&self, team_id: &str) -> Result<Team, StoreError>;

    fn create_team(&self, team: Team) -> Result<(), StoreError>;

    /// Replaces the team with the same id, keeping its periods.
    fn update_team(&self, team: Team) -> Result<(), StoreError>;

    /// The latest revision of every period of a team, ordered by period id.
    fn all_periods(&self, team_id: &str) -> Result<PeriodList, StoreError>;

    fn period_latest_version(&self, team_id: &str, period_id: &str) -> Result<Period, StoreError>;

    /// Any stored revision of a period, not just the latest one.
    fn period_version(
        &self,
        team_id: &str,
        period_id: &str,
        version: &VersionId,
    ) -> Result<Period, StoreError>;

    /// Saves `period` as the new latest revision of its period.
    ///
    /// A period that does not exist yet is stored as given and must not
    /// declare any parent. Otherwise `period` must carry a version that was
    /// never stored and exactly one parent: the revision it was derived from.
    /// The common ancestor of that parent and the stored latest revision is
    /// used to merge `period` with whatever was saved concurrently, and the
    /// merged revision, under a fresh version, becomes the new latest and is
    /// returned.
    fn upsert_period_latest_version(
        &self,
        team_id: &str,
        period: Period,
    ) -> Result<Period, StoreError>;
}
