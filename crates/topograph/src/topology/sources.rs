//! Domain source records
//!
//! Already-decoded collections as a backend hands them over. Each collection
//! is fetched independently, so names referenced by one collection may be
//! missing from another; the builder tolerates that.

use serde::{Deserialize, Serialize};

use crate::core::TopologyError;

/// A device tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// A named MQTT topic filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicFilter {
    pub topic_filter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TopicFilter {
    pub fn new(topic_filter: impl Into<String>) -> Self {
        Self {
            topic_filter: topic_filter.into(),
            description: None,
        }
    }
}

/// Publishes a tag's value to a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NorthboundMapping {
    pub tag_name: String,
    pub topic: String,
}

impl NorthboundMapping {
    pub fn new(tag_name: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            topic: topic.into(),
        }
    }
}

/// Writes messages matching a topic filter back to a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SouthboundMapping {
    pub topic_filter: String,
    pub tag_name: String,
}

impl SouthboundMapping {
    pub fn new(topic_filter: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            topic_filter: topic_filter.into(),
            tag_name: tag_name.into(),
        }
    }
}

/// A bridge subscription forwarding topic filters into a destination topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeSubscription {
    pub bridge_id: String,
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

impl BridgeSubscription {
    pub fn new(
        bridge_id: impl Into<String>,
        filters: Vec<String>,
        destination: Option<String>,
    ) -> Self {
        Self {
            bridge_id: bridge_id.into(),
            filters,
            destination,
        }
    }

    /// The destination topic, if one is set and non-empty
    pub fn destination_topic(&self) -> Option<&str> {
        self.destination.as_deref().filter(|t| !t.is_empty())
    }
}

/// Inputs of one combining mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombiningSources {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub topic_filters: Vec<String>,
}

/// Output of one combining mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombiningDestination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// One mapping of a combiner or asset mapper: many sources into one topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCombining {
    pub id: String,
    #[serde(default)]
    pub sources: CombiningSources,
    #[serde(default)]
    pub destination: CombiningDestination,
}

impl DataCombining {
    pub fn new(
        id: impl Into<String>,
        tags: Vec<String>,
        topic_filters: Vec<String>,
        topic: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sources: CombiningSources {
                tags,
                topic_filters,
            },
            destination: CombiningDestination { topic },
        }
    }

    /// The destination topic, if one is set and non-empty
    ///
    /// Mappings still being edited have no destination yet.
    pub fn destination_topic(&self) -> Option<&str> {
        self.destination.topic.as_deref().filter(|t| !t.is_empty())
    }
}

/// A data combiner or asset mapper configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combiner {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mappings: Vec<DataCombining>,
}

impl Combiner {
    pub fn new(id: impl Into<String>, name: impl Into<String>, mappings: Vec<DataCombining>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mappings,
        }
    }
}

/// All domain collections a topology graph is built from
///
/// Every collection defaults to empty so partial documents decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopologySources {
    pub tags: Vec<Tag>,
    pub topic_filters: Vec<TopicFilter>,
    pub northbound_mappings: Vec<NorthboundMapping>,
    pub southbound_mappings: Vec<SouthboundMapping>,
    pub bridge_subscriptions: Vec<BridgeSubscription>,
    pub combiners: Vec<Combiner>,
    pub asset_mappers: Vec<Combiner>,
}

impl TopologySources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON document of domain collections
    pub fn from_json(input: &str) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Returns true if every collection is empty
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
            && self.topic_filters.is_empty()
            && self.northbound_mappings.is_empty()
            && self.southbound_mappings.is_empty()
            && self.bridge_subscriptions.is_empty()
            && self.combiners.is_empty()
            && self.asset_mappers.is_empty()
    }
}
