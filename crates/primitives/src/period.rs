//! The period document and the planning entities nested inside it.
//!
//! A [`Period`] is the unit of optimistic concurrency control: every save
//! produces a new immutable revision identified by [`Period::version`], with
//! [`Period::parent_versions`] pointing at the revision(s) it was derived from.
//! When a revision has several parents, the first one is always the revision
//! that was stored as latest when it was produced.

use serde::{Deserialize, Serialize};

use crate::version::VersionId;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Period {
    pub id: String,
    pub display_name: String,
    pub unit: String,
    pub unit_abbrev: String,
    #[serde(rename = "notesURL")]
    pub notes_url: String,
    pub max_committed_percentage: f64,
    pub buckets: Vec<Bucket>,
    pub people: Vec<Person>,
    pub secondary_units: Vec<SecondaryUnit>,
    pub version: VersionId,
    // Singular on the wire for compatibility with existing clients.
    #[serde(rename = "parentVersion")]
    pub parent_versions: Vec<VersionId>,
}

impl Period {
    #[must_use]
    pub fn new(id: impl Into<String>, version: VersionId) -> Self {
        Self {
            id: id.into(),
            version,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: VersionId) -> Self {
        self.version = version;
        self
    }

    /// Sets the parents of this revision, primary parent first.
    #[must_use]
    pub fn with_parents(mut self, parents: Vec<VersionId>) -> Self {
        self.parent_versions = parents;
        self
    }

    /// A root revision is the first ever save of a period.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_versions.is_empty()
    }

    #[must_use]
    pub fn primary_parent(&self) -> Option<&VersionId> {
        self.parent_versions.first()
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationType {
    #[default]
    Percentage,
    Absolute,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bucket {
    pub display_name: String,
    pub allocation_type: AllocationType,
    pub allocation_percentage: f64,
    pub allocation_absolute: f64,
    pub objectives: Vec<Objective>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CommitmentType {
    Aspirational,
    Committed,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Objective {
    pub name: String,
    pub resource_estimate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment_type: Option<CommitmentType>,
    pub notes: String,
    pub groups: Vec<ObjectiveGroup>,
    pub tags: Vec<ObjectiveTag>,
    pub assignments: Vec<Assignment>,
    /// Objectives sharing a block id are displayed together.
    #[serde(rename = "blockID", skip_serializing_if = "String::is_empty")]
    pub block_id: String,
    pub display_options: DisplayOptions,
}

impl Objective {
    /// Total commitment of everyone assigned to this objective.
    #[must_use]
    pub fn resources_allocated(&self) -> f64 {
        self.assignments.iter().map(|a| a.commitment).sum()
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayOptions {
    pub enable_markdown: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveGroup {
    pub group_type: String,
    pub group_name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ObjectiveTag {
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub person_id: String,
    pub commitment: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    pub id: String,
    pub display_name: String,
    pub location: String,
    pub availability: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryUnit {
    pub name: String,
    pub conversion_factor: f64,
}

/// Summary entry for listing the periods of a team.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PeriodListItem {
    pub name: String,
    pub id: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PeriodList {
    pub periods: Vec<PeriodListItem>,
}
