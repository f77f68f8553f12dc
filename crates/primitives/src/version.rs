//! Revision identifiers for versioned periods.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Opaque identifier of one immutable revision of a period.
///
/// Identifiers created by [`VersionId::new_random`] are UUID v4 strings, but
/// any non-empty string is accepted so that ids minted elsewhere survive a
/// round trip unchanged.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct VersionId(String);

#[derive(Clone, Copy, Debug, Error)]
#[error("Invalid version id: {0}")]
pub struct InvalidVersionId(&'static str);

impl VersionId {
    #[must_use]
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty id marks a period that has not been stamped with a version yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for VersionId {
    type Err = InvalidVersionId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(InvalidVersionId("version id must not be empty"));
        }

        Ok(Self(s.to_owned()))
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<&str> for VersionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for VersionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<VersionId> for String {
    fn from(id: VersionId) -> Self {
        id.0
    }
}

impl AsRef<str> for VersionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
