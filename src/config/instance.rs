//! Settings of the monitored Unbound instance.
//!
//! Field names are snake_case in TOML; the camelCase spellings used by older
//! integration configs are accepted as aliases. Apart from `timeout_secs`
//! nothing here is validated: an empty entity name is passed through as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Entity type reported when the config does not name one.
pub const DEFAULT_ENTITY_TYPE: &str = "APPLICATION";

/// Subprocess deadline used when the config does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A single `key`/`value` metadata pair (nested list form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

/// Entity metadata in either of the two accepted shapes.
///
/// ```toml
/// metadata = [ { key = "env", value = "prod" } ]
/// ```
///
/// or
///
/// ```toml
/// [instances.metadata]
/// env = "prod"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metadata {
    List(Vec<MetadataEntry>),
    Table(BTreeMap<String, String>),
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata::List(Vec::new())
    }
}

impl Metadata {
    /// Flattens the metadata into a sorted map. Later list entries win on duplicate keys.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        match self {
            Metadata::List(entries) => entries
                .iter()
                .map(|e| (e.key.clone(), e.value.clone()))
                .collect(),
            Metadata::Table(table) => table.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Metadata::List(entries) => entries.is_empty(),
            Metadata::Table(table) => table.is_empty(),
        }
    }
}

/// Everything needed to run `unbound-control` and describe the resulting entity.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InstanceConfig {
    /// Prefix prepended verbatim to the control binary name (usually a directory with trailing `/`).
    #[serde(alias = "controlPath")]
    pub control_path: String,

    /// Passed to `unbound-control` as `-c <cfgfile>` when non-empty.
    #[serde(alias = "cfgFile")]
    pub cfgfile: String,

    /// Passed to `unbound-control` as `-s <server>` when non-empty.
    pub server: String,

    #[serde(alias = "entityName")]
    pub entity_name: String,

    #[serde(alias = "entityType")]
    pub entity_type: String,

    #[serde(alias = "displayName")]
    pub display_name: String,

    /// Emit indented JSON instead of a single line.
    pub debug: bool,

    /// `Some(false)` collects with `stats_noreset`; unset or `true` uses `stats`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset: Option<bool>,

    /// Run `unbound-control-mock` instead of the real binary.
    pub mock: bool,

    /// Seconds to wait for `unbound-control` before killing it.
    #[serde(alias = "timeoutSecs")]
    #[validate(range(min = 1, max = 3600, message = "timeout_secs must be between 1 and 3600"))]
    pub timeout_secs: u64,

    pub metadata: Metadata,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            control_path: String::new(),
            cfgfile: String::new(),
            server: String::new(),
            entity_name: String::new(),
            entity_type: DEFAULT_ENTITY_TYPE.to_string(),
            display_name: String::new(),
            debug: false,
            reset: None,
            mock: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            metadata: Metadata::default(),
        }
    }
}

impl InstanceConfig {
    /// Whether collection should clear Unbound's counters.
    pub fn resets_counters(&self) -> bool {
        self.reset.unwrap_or(true)
    }
}
