use planner_primitives::team::Team;
use serde::{Deserialize, Serialize};

/// What an upsert does when the declared parent and the stored latest
/// revision share no ancestor at all.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum DisjointHistoryPolicy {
    /// Treat it as corrupted history and abort the upsert.
    #[default]
    Reject,
    /// Report it to the caller as a concurrent modification.
    Conflict,
}

/// A team created, without periods, when the store is constructed.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[non_exhaustive]
pub struct TeamSeed {
    pub id: String,
    pub display_name: String,
}

impl TeamSeed {
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

impl From<TeamSeed> for Team {
    fn from(seed: TeamSeed) -> Self {
        Self::new(seed.id, seed.display_name)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[non_exhaustive]
pub struct StoreConfig {
    #[serde(default)]
    pub disjoint_history: DisjointHistoryPolicy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<TeamSeed>,
}

impl StoreConfig {
    #[must_use]
    pub const fn new(disjoint_history: DisjointHistoryPolicy) -> Self {
        Self {
            disjoint_history,
            teams: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_team(mut self, team: TeamSeed) -> Self {
        self.teams.push(team);
        self
    }
}
