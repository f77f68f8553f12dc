//! On-disk configuration of a planner deployment.

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

use std::fs::{read_to_string, write};

use camino::Utf8Path;
use eyre::{Result as EyreResult, WrapErr};
use planner_store::StoreConfig;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[non_exhaustive]
pub struct ConfigFile {
    #[serde(default)]
    pub store: StoreConfig,
}

impl ConfigFile {
    #[must_use]
    pub const fn new(store: StoreConfig) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn exists(dir: &Utf8Path) -> bool {
        dir.join(CONFIG_FILE).is_file()
    }

    pub fn load(dir: &Utf8Path) -> EyreResult<Self> {
        let path = dir.join(CONFIG_FILE);
        let content = read_to_string(&path)
            .wrap_err_with(|| format!("failed to read configuration from {path:?}"))?;

        toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse configuration from {path:?}"))
    }

    pub fn save(&self, dir: &Utf8Path) -> EyreResult<()> {
        let path = dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)?;

        write(&path, content)
            .wrap_err_with(|| format!("failed to write configuration to {path:?}"))?;

        Ok(())
    }

    /// Only writes the file when its content would change.
    pub fn save_if_changed(&self, dir: &Utf8Path) -> EyreResult<bool> {
        let path = dir.join(CONFIG_FILE);
        let new_content = toml::to_string_pretty(self)?;

        let changed = read_to_string(&path).map_or(true, |existing| existing != new_content);

        if changed {
            write(&path, new_content)
                .wrap_err_with(|| format!("failed to write configuration to {path:?}"))?;
        }

        Ok(changed)
    }
}
