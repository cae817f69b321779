//! Loader and compiler options.
//!
//! The host passes loader options as the JSON query of the loader request. The same struct is
//! serialized back into the query of every loader-chained import we generate, so the fields
//! must round-trip.

use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, Result};
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Build,
    Watch,
}

/// How usages of one imported name are deduplicated when some come from a component library
/// and some do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum MixedUsagePolicy {
    /// At most one library record and at most one plain record per name.
    #[default]
    Independent,
    /// The first record emitted for a name suppresses later usages of the other kind.
    FirstWins,
}

impl MixedUsagePolicy {
    fn is_default(&self) -> bool {
        *self == MixedUsagePolicy::Independent
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderOptions {
    pub platform: Platform,
    pub entry_path: String,
    #[serde(default)]
    pub constant_dir: Vec<String>,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub disable_copy_npm: bool,
    #[serde(default)]
    pub turn_off_source_map: bool,
    #[serde(default, skip_serializing_if = "MixedUsagePolicy::is_default")]
    pub mixed_usage_policy: MixedUsagePolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    /// Set only on script-loader requests for a component library export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_component: Option<String>,
}

impl LoaderOptions {
    pub fn new(platform: Platform, entry_path: impl Into<String>) -> Self {
        LoaderOptions {
            platform,
            entry_path: entry_path.into(),
            constant_dir: Vec::new(),
            mode: Mode::default(),
            disable_copy_npm: false,
            turn_off_source_map: false,
            mixed_usage_policy: MixedUsagePolicy::default(),
            cache_dir: None,
            imported_component: None,
        }
    }

    /// Parse a loader query: `?{"platform":"ali",...}` or the bare JSON object.
    pub fn from_query(query: &str) -> Result<Self> {
        let json = query.trim().trim_start_matches('?');
        if json.is_empty() {
            return Err(LoaderError::InvalidOptions(
                "loader query is empty, expected a JSON object".to_string(),
            ));
        }
        serde_json::from_str(json).map_err(|e| LoaderError::InvalidOptions(e.to_string()))
    }

    /// Options for a script-loader request selecting one export of a component library.
    pub fn with_imported_component(&self, local: &str) -> Self {
        LoaderOptions {
            imported_component: Some(local.to_string()),
            ..self.clone()
        }
    }
}

/// Options handed to the external component compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    pub resource_path: String,
    pub output_path: String,
    pub source_path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub platform: Platform,
    pub source_file_name: String,
    pub disable_copy_npm: bool,
    pub turn_off_source_map: bool,
}
