//! # Configuration
//!
//! Settings are managed by [`clapfig`], which handles layered loading from
//! TOML files and environment variables, with defaults declared through
//! [`confique`].
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `PROPMODEL__TREAT_DEPRECATION_WARNINGS_AS_ERRORS`
//! 2. **Config files**: `propmodel.toml` in each directory passed to
//!    [`PropConfig::load`], later directories overriding earlier ones.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `treat_deprecation_warnings_as_errors` | `false` | Fail instead of warn when a deprecated accessor form is used |
//!
//! The loaded value is handed to each [`Resource`](crate::Resource) explicitly;
//! there is no process-wide instance.

use std::path::PathBuf;

use clapfig::{Clapfig, SearchMode, SearchPath};
use confique::Config;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const CONFIG_FILE_NAME: &str = "propmodel.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PropConfig {
    /// Turn deprecation warnings into `DeprecatedFeature` errors.
    #[config(default = false)]
    pub treat_deprecation_warnings_as_errors: bool,
}

impl Default for PropConfig {
    fn default() -> Self {
        Self {
            treat_deprecation_warnings_as_errors: false,
        }
    }
}

impl PropConfig {
    /// Load from `propmodel.toml` in `dirs` (merged, last wins) plus the
    /// environment. Falls back to defaults if loading fails.
    pub fn load(dirs: &[PathBuf]) -> Self {
        let search_paths = dirs.iter().cloned().map(SearchPath::Path).collect::<Vec<_>>();

        match Clapfig::builder()
            .app_name("propmodel")
            .file_name(CONFIG_FILE_NAME)
            .search_paths(search_paths)
            .search_mode(SearchMode::Merge)
            .load()
        {
            Ok(config) => config,
            Err(e) => {
                warn!(?dirs, error = %e, "Could not load configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Copy with the deprecation switch set.
    pub fn with_deprecations_as_errors(mut self, enabled: bool) -> Self {
        self.treat_deprecation_warnings_as_errors = enabled;
        self
    }
}
