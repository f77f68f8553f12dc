use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use planner_dag::{find_common_ancestor, AncestryError};
use planner_merge::merge_periods;
use planner_primitives::period::{Period, PeriodList, PeriodListItem};
use planner_primitives::team::Team;
use planner_primitives::version::VersionId;
use tracing::{info, warn};

use crate::config::{DisjointHistoryPolicy, StoreConfig};
use crate::db::PeriodStore;
use crate::errors::StoreError;

/// Every stored revision of one period, plus which one is latest.
#[derive(Debug)]
struct PeriodHistory {
    latest: VersionId,
    versions: HashMap<VersionId, Period>,
}

impl PeriodHistory {
    fn new(period: Period) -> Self {
        Self {
            latest: period.version.clone(),
            versions: HashMap::from([(period.version.clone(), period)]),
        }
    }

    fn version(&self, period_id: &str, version: &VersionId) -> Result<&Period, StoreError> {
        self.versions
            .get(version)
            .ok_or_else(|| StoreError::VersionNotFound {
                period_id: period_id.to_owned(),
                version: version.clone(),
            })
    }

    fn latest(&self, period_id: &str) -> Result<&Period, StoreError> {
        self.version(period_id, &self.latest)
    }

    /// Merges `incoming` with the stored history and records the result as
    /// the new latest revision.
    fn commit(
        &mut self,
        incoming: &Period,
        policy: DisjointHistoryPolicy,
    ) -> Result<Period, StoreError> {
        if self.versions.contains_key(&incoming.version) {
            return Err(StoreError::DuplicateVersion(incoming.version.clone()));
        }

        let [parent] = incoming.parent_versions.as_slice() else {
            return Err(StoreError::InvalidParentCount(
                incoming.parent_versions.len(),
            ));
        };

        if !self.versions.contains_key(parent) {
            return Err(StoreError::UnknownParent(parent.clone()));
        }

        let latest = self.latest(&incoming.id)?;

        let base = match find_common_ancestor(&self.versions, parent, &latest.version) {
            Ok(base) => base,
            Err(err @ AncestryError::NoCommonAncestor { .. })
                if policy == DisjointHistoryPolicy::Conflict =>
            {
                warn!(
                    period_id = %incoming.id,
                    %parent,
                    latest = %latest.version,
                    %err,
                    "Rejected update with disjoint history"
                );

                return Err(StoreError::ConcurrentModification {
                    latest: latest.version.clone(),
                    reasons: vec![err.to_string()],
                });
            }
            Err(source) => {
                return Err(StoreError::Ancestry {
                    parent: parent.clone(),
                    latest: latest.version.clone(),
                    source,
                })
            }
        };

        let fast_forward = base.version == latest.version;
        let outcome = merge_periods(base, latest, incoming);

        if outcome.has_identity_mismatch() {
            return Err(StoreError::IdentityMismatch(outcome.summary()));
        }

        if !outcome.is_successful() {
            warn!(
                period_id = %incoming.id,
                latest = %latest.version,
                base = %base.version,
                conflicts = outcome.conflicts.len(),
                "Rejected concurrent modification"
            );

            return Err(StoreError::ConcurrentModification {
                latest: latest.version.clone(),
                reasons: outcome.descriptions(),
            });
        }

        let merged = outcome.merged;

        info!(
            period_id = %merged.id,
            version = %merged.version,
            parents = ?merged.parent_versions,
            fast_forward,
            "Saved period revision"
        );

        self.latest = merged.version.clone();
        let _ignored = self.versions.insert(merged.version.clone(), merged.clone());

        Ok(merged)
    }
}

#[derive(Debug)]
struct TeamRecord {
    team: Team,
    periods: BTreeMap<String, PeriodHistory>,
}

impl TeamRecord {
    const fn new(team: Team) -> Self {
        Self {
            team,
            periods: BTreeMap::new(),
        }
    }

    fn period(&self, period_id: &str) -> Result<&PeriodHistory, StoreError> {
        self.periods
            .get(period_id)
            .ok_or_else(|| StoreError::PeriodNotFound(period_id.to_owned()))
    }
}

/// A [`PeriodStore`] that keeps everything in memory.
///
/// All operations take one lock over the whole store, which serializes
/// upserts and rules out lost updates. Data is lost when the store is dropped.
#[derive(Debug)]
pub struct InMemoryStore {
    disjoint_history: DisjointHistoryPolicy,
    teams: RwLock<BTreeMap<String, TeamRecord>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        let teams = config
            .teams
            .into_iter()
            .map(|seed| {
                let team = Team::from(seed);
                (team.id.clone(), TeamRecord::new(team))
            })
            .collect();

        Self {
            disjoint_history: config.disjoint_history,
            teams: RwLock::new(teams),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

fn team_not_found(team_id: &str) -> StoreError {
    StoreError::TeamNotFound(team_id.to_owned())
}

impl PeriodStore for InMemoryStore {
    fn all_teams(&self) -> Result<Vec<Team>, StoreError> {
        Ok(self
            .teams
            .read()
            .values()
            .map(|record| record.team.clone())
            .collect())
    }

    fn team(&self, team_id: &str) -> Result<Team, StoreError> {
        self.teams
            .read()
            .get(team_id)
            .map(|record| record.team.clone())
            .ok_or_else(|| team_not_found(team_id))
    }

    fn create_team(&self, team: Team) -> Result<(), StoreError> {
        let mut teams = self.teams.write();

        let Entry::Vacant(slot) = teams.entry(team.id.clone()) else {
            return Err(StoreError::TeamAlreadyExists(team.id));
        };

        info!(team_id = %team.id, "Added new team");

        let _ignored = slot.insert(TeamRecord::new(team));

        Ok(())
    }

    fn update_team(&self, team: Team) -> Result<(), StoreError> {
        let mut teams = self.teams.write();

        let record = teams
            .get_mut(&team.id)
            .ok_or_else(|| team_not_found(&team.id))?;

        info!(team_id = %team.id, "Updated team");

        record.team = team;

        Ok(())
    }

    fn all_periods(&self, team_id: &str) -> Result<PeriodList, StoreError> {
        let teams = self.teams.read();

        let record = teams.get(team_id).ok_or_else(|| team_not_found(team_id))?;

        let periods = record
            .periods
            .iter()
            .map(|(period_id, history)| {
                Ok(PeriodListItem {
                    name: history.latest(period_id)?.display_name.clone(),
                    id: period_id.clone(),
                })
            })
            .collect::<Result<_, StoreError>>()?;

        Ok(PeriodList { periods })
    }

    fn period_latest_version(&self, team_id: &str, period_id: &str) -> Result<Period, StoreError> {
        let teams = self.teams.read();

        let record = teams.get(team_id).ok_or_else(|| team_not_found(team_id))?;

        record.period(period_id)?.latest(period_id).cloned()
    }

    fn period_version(
        &self,
        team_id: &str,
        period_id: &str,
        version: &VersionId,
    ) -> Result<Period, StoreError> {
        let teams = self.teams.read();

        let record = teams.get(team_id).ok_or_else(|| team_not_found(team_id))?;

        record.period(period_id)?.version(period_id, version).cloned()
    }

    fn upsert_period_latest_version(
        &self,
        team_id: &str,
        period: Period,
    ) -> Result<Period, StoreError> {
        let mut teams = self.teams.write();

        let record = teams
            .get_mut(team_id)
            .ok_or_else(|| team_not_found(team_id))?;

        if period.version.is_empty() {
            return Err(StoreError::MissingVersion);
        }

        match record.periods.entry(period.id.clone()) {
            Entry::Occupied(mut slot) => slot.get_mut().commit(&period, self.disjoint_history),
            Entry::Vacant(slot) => {
                if !period.is_root() {
                    return Err(StoreError::UnexpectedParents(period.parent_versions));
                }

                info!(%team_id, period_id = %period.id, version = %period.version, "Created period");

                let _ignored = slot.insert(PeriodHistory::new(period.clone()));

                Ok(period)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use claims::{assert_err, assert_matches, assert_ok};

    use super::*;

    fn v(id: &str) -> VersionId {
        VersionId::from(id)
    }

    fn revision(version: &str, parents: &[&str]) -> Period {
        let mut period =
            Period::new("pd1", v(version)).with_parents(parents.iter().map(|p| v(p)).collect());
        period.display_name = "My period".to_owned();
        period
    }

    /// History whose latest revision is `latest`, holding `revisions`.
    fn history(latest: &str, revisions: Vec<Period>) -> PeriodHistory {
        PeriodHistory {
            latest: v(latest),
            versions: revisions
                .into_iter()
                .map(|period| (period.version.clone(), period))
                .collect(),
        }
    }

    /// Two roots: the incoming parent `a1` and the stored latest `b1` never meet.
    fn disjoint() -> PeriodHistory {
        history(
            "b1",
            vec![
                revision("a0", &[]),
                revision("a1", &["a0"]),
                revision("b0", &[]),
                revision("b1", &["b0"]),
            ],
        )
    }

    #[test]
    fn test_disjoint_history_rejected() {
        let mut history = disjoint();

        let err = assert_err!(history.commit(
            &revision("new", &["a1"]),
            DisjointHistoryPolicy::Reject
        ));

        assert_matches!(
            err,
            StoreError::Ancestry {
                source: AncestryError::NoCommonAncestor { .. },
                ..
            }
        );
        assert_eq!(history.latest, v("b1"));
    }

    #[test]
    fn test_disjoint_history_reported_as_conflict() {
        let mut history = disjoint();

        let err = assert_err!(history.commit(
            &revision("new", &["a1"]),
            DisjointHistoryPolicy::Conflict
        ));

        let StoreError::ConcurrentModification { latest, reasons } = &err else {
            panic!("expected a concurrent modification, found {err}");
        };
        assert_eq!(*latest, v("b1"));
        assert!(reasons[0].contains("no common ancestor"), "{reasons:?}");
        assert!(!history.versions.contains_key(&v("new")), "rejected revision was stored");
    }

    #[test]
    fn test_cycle_is_structural_under_either_policy() {
        for policy in [DisjointHistoryPolicy::Reject, DisjointHistoryPolicy::Conflict] {
            let mut history = history(
                "b1",
                vec![
                    revision("a1", &["a2"]),
                    revision("a2", &["a1"]),
                    revision("b1", &[]),
                ],
            );

            let err = assert_err!(history.commit(&revision("new", &["a1"]), policy));

            assert_matches!(
                err,
                StoreError::Ancestry {
                    source: AncestryError::CycleDetected(_),
                    ..
                }
            );
        }
    }

    #[test]
    fn test_missing_ancestor_is_structural() {
        let mut history = history(
            "b1",
            vec![revision("a1", &["gone"]), revision("b1", &["gone"])],
        );

        let err = assert_err!(history.commit(
            &revision("new", &["a1"]),
            DisjointHistoryPolicy::Conflict
        ));

        assert_matches!(
            err,
            StoreError::Ancestry {
                source: AncestryError::VersionNotFound(ref missing),
                ..
            } if *missing == v("gone")
        );
    }

    #[test]
    fn test_identity_mismatch_is_not_a_conflict() {
        let mut stored = revision("b1", &["a0"]);
        stored.id = "other".to_owned();
        let mut history = history("b1", vec![revision("a0", &[]), stored]);

        let err = assert_err!(history.commit(
            &revision("new", &["a0"]),
            DisjointHistoryPolicy::Reject
        ));

        assert_matches!(&err, StoreError::IdentityMismatch(_));
        assert!(err.to_string().contains("ID: identical values required"), "{err}");
    }

    #[test]
    fn test_commit_moves_latest() {
        let mut history = history("a0", vec![revision("a0", &[])]);

        let merged = assert_ok!(history.commit(
            &revision("a1", &["a0"]),
            DisjointHistoryPolicy::Reject
        ));

        assert_eq!(history.latest, merged.version);
        assert_eq!(history.versions.len(), 2);
        assert!(!history.versions.contains_key(&v("a1")), "incoming version stored as-is");
    }
}
