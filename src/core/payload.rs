//! Integration payload (protocol version 4).
//!
//! ```json
//! {
//!   "protocol_version": "4",
//!   "integration": { "name": "nri-unbound", "version": "1.1.0" },
//!   "data": [
//!     {
//!       "entity": { "name": "...", "type": "APPLICATION", "displayName": "...", "metadata": {} },
//!       "metrics": [ { "name": "total.num.queries", "type": "cumulative-count", "value": 42.0, "attributes": {} } ]
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::instance::InstanceConfig;

pub const PROTOCOL_VERSION: &str = "4";
pub const INTEGRATION_NAME: &str = "nri-unbound";
pub const INTEGRATION_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const METRIC_TYPE_CUMULATIVE_COUNT: &str = "cumulative-count";

/// A single named measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    #[serde(rename = "type")]
    pub metric_type: String,
    pub value: f64,
    /// Always empty; serialized as `{}`.
    pub attributes: BTreeMap<String, String>,
}

impl Metric {
    pub fn cumulative_count(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            metric_type: METRIC_TYPE_CUMULATIVE_COUNT.to_string(),
            value,
            attributes: BTreeMap::new(),
        }
    }
}

/// The monitored resolver instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub metadata: BTreeMap<String, String>,
}

impl Entity {
    /// Copies the identity fields 1:1; nothing is validated.
    pub fn from_config(cfg: &InstanceConfig) -> Self {
        Self {
            name: cfg.entity_name.clone(),
            entity_type: cfg.entity_type.clone(),
            display_name: cfg.display_name.clone(),
            metadata: cfg.metadata.to_map(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub entity: Entity,
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    pub name: String,
    pub version: String,
}

impl Default for Integration {
    fn default() -> Self {
        Self {
            name: INTEGRATION_NAME.to_string(),
            version: INTEGRATION_VERSION.to_string(),
        }
    }
}

/// Top-level envelope. Built with exactly one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub protocol_version: String,
    pub integration: Integration,
    pub data: Vec<EntityData>,
}

impl Payload {
    /// Builds the envelope for one instance, with no metrics yet.
    pub fn for_instance(cfg: &InstanceConfig) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            integration: Integration::default(),
            data: vec![EntityData {
                entity: Entity::from_config(cfg),
                metrics: Vec::new(),
            }],
        }
    }

    /// Appends metrics to the instance entity.
    pub fn extend_metrics(&mut self, metrics: impl IntoIterator<Item = Metric>) {
        if let Some(entity) = self.data.first_mut() {
            entity.metrics.extend(metrics);
        }
    }

    /// Metrics of the instance entity.
    pub fn metrics(&self) -> &[Metric] {
        self.data
            .first()
            .map(|e| e.metrics.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::instance::{Metadata, MetadataEntry};

    fn instance() -> InstanceConfig {
        InstanceConfig {
            entity_name: "resolver-1".into(),
            display_name: "Resolver 1".into(),
            metadata: Metadata::List(vec![
                MetadataEntry {
                    key: "env".into(),
                    value: "dev".into(),
                },
                MetadataEntry {
                    key: "env".into(),
                    value: "prod".into(),
                },
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn envelope_has_one_entity_and_fixed_protocol() {
        let payload = Payload::for_instance(&instance());

        assert_eq!(payload.protocol_version, "4");
        assert_eq!(payload.integration.name, "nri-unbound");
        assert_eq!(payload.integration.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(payload.data.len(), 1);
        assert!(payload.metrics().is_empty());
    }

    #[test]
    fn entity_copies_config_fields() {
        let entity = Entity::from_config(&instance());

        assert_eq!(entity.name, "resolver-1");
        assert_eq!(entity.entity_type, "APPLICATION");
        assert_eq!(entity.display_name, "Resolver 1");
        assert_eq!(entity.metadata.len(), 1);
        assert_eq!(entity.metadata["env"], "prod");
    }

    #[test]
    fn empty_entity_name_is_passed_through() {
        let payload = Payload::for_instance(&InstanceConfig::default());
        assert_eq!(payload.data[0].entity.name, "");
    }

    #[test]
    fn serialized_field_names_match_ingestion_schema() {
        let mut payload = Payload::for_instance(&instance());
        payload.extend_metrics([Metric::cumulative_count("total.num.queries", 42.0)]);

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["protocol_version"], "4");
        assert_eq!(json["integration"]["name"], "nri-unbound");
        let entity = &json["data"][0]["entity"];
        assert_eq!(entity["type"], "APPLICATION");
        assert_eq!(entity["displayName"], "Resolver 1");
        assert_eq!(entity["metadata"]["env"], "prod");
        let metric = &json["data"][0]["metrics"][0];
        assert_eq!(metric["name"], "total.num.queries");
        assert_eq!(metric["type"], "cumulative-count");
        assert_eq!(metric["value"], 42.0);
        assert_eq!(metric["attributes"], serde_json::json!({}));
    }
}
