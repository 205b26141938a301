//! Hierarchy definitions
//!
//! A [`KpiHierarchy`] describes *how* a score is computed: which strategy
//! each node uses and how much weight each child contributes. It is pure
//! data and is never mutated by a calculation run.

use crate::error::ModelError;
use crate::kpi_type::KpiType;
use crate::strategy::KpiStrategy;
use serde::{Deserialize, Serialize};

/// Schema version written when none is given
pub const DEFAULT_SCHEMA_VERSION: &str = "1.0.0";

fn default_schema_version() -> String {
    DEFAULT_SCHEMA_VERSION.to_string()
}

/// Root of a hierarchy definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiHierarchy {
    /// Definition format version
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Root node
    pub root: KpiNode,
}

impl KpiHierarchy {
    /// Create hierarchy with the default schema version
    #[inline]
    #[must_use]
    pub fn new(root: KpiNode) -> Self {
        Self {
            schema_version: default_schema_version(),
            root,
        }
    }

    /// Parse hierarchy from JSON
    ///
    /// # Errors
    /// [`ModelError::Serialization`] if `json` is not a hierarchy definition.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize hierarchy to pretty JSON
    ///
    /// # Errors
    /// [`ModelError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of definition nodes, counting shared type ids once per position
    #[must_use]
    pub fn node_count(&self) -> usize {
        fn count(node: &KpiNode) -> usize {
            1 + node.edges.iter().map(|e| count(&e.target)).sum::<usize>()
        }
        count(&self.root)
    }
}

/// One scoring concept in a hierarchy definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiNode {
    /// KPI concept; matches raw values and may repeat across the tree
    pub type_id: String,

    /// Aggregation strategy
    pub strategy: KpiStrategy,

    /// Weighted child edges, empty for raw value leaves
    #[serde(default)]
    pub edges: Vec<KpiEdge>,

    /// Named thresholds used by the raw value transformer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thresholds: Vec<Threshold>,
}

impl KpiNode {
    /// Create node without edges or thresholds
    #[inline]
    #[must_use]
    pub fn new(type_id: impl Into<String>, strategy: KpiStrategy) -> Self {
        Self {
            type_id: type_id.into(),
            strategy,
            edges: Vec::new(),
            thresholds: Vec::new(),
        }
    }

    /// Create raw value leaf
    #[inline]
    #[must_use]
    pub fn raw(type_id: impl Into<String>) -> Self {
        Self::new(type_id, KpiStrategy::RawValue)
    }

    /// Create node for a well-known KPI type
    #[inline]
    #[must_use]
    pub fn of_type(kpi_type: KpiType, strategy: KpiStrategy) -> Self {
        Self::new(kpi_type.as_str(), strategy)
    }

    /// Add weighted child edge
    #[inline]
    #[must_use]
    pub fn with_edge(mut self, target: KpiNode, weight: f64) -> Self {
        self.edges.push(KpiEdge::new(target, weight));
        self
    }

    /// Add named threshold
    #[inline]
    #[must_use]
    pub fn with_threshold(mut self, name: impl Into<String>, value: f64) -> Self {
        self.thresholds.push(Threshold::new(name, value));
        self
    }

    /// Check if node is a leaf
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Weighted edge to a child definition node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiEdge {
    /// Child node
    pub target: KpiNode,

    /// Contribution of the child to its parent
    pub weight: f64,
}

impl KpiEdge {
    /// Create new edge
    #[inline]
    #[must_use]
    pub fn new(target: KpiNode, weight: f64) -> Self {
        Self { target, weight }
    }
}

/// Named numeric threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Threshold name
    pub name: String,

    /// Threshold value
    pub value: f64,
}

impl Threshold {
    /// Create new threshold
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> KpiHierarchy {
        KpiHierarchy::new(
            KpiNode::of_type(KpiType::Root, KpiStrategy::WeightedAverage)
                .with_edge(KpiNode::raw("SECRETS"), 0.4)
                .with_edge(
                    KpiNode::new("TECHNICAL_LAG_DEV", KpiStrategy::Minimum).with_edge(
                        KpiNode::raw("TECHNICAL_LAG_DEV_DIRECT_COMPONENT")
                            .with_threshold("warning", 50.0),
                        1.0,
                    ),
                    0.6,
                ),
        )
    }

    #[test]
    fn json_roundtrip_is_lossless() {
        let hierarchy = sample();
        let json = hierarchy.to_json().unwrap();
        let back = KpiHierarchy::from_json(&json).unwrap();
        assert_eq!(back, hierarchy);
    }

    #[test]
    fn missing_schema_version_and_edges_use_defaults() {
        let json = r#"{ "root": { "typeId": "ROOT", "strategy": "RAW_VALUE" } }"#;
        let hierarchy = KpiHierarchy::from_json(json).unwrap();
        assert_eq!(hierarchy.schema_version, DEFAULT_SCHEMA_VERSION);
        assert!(hierarchy.root.is_leaf());
        assert!(hierarchy.root.thresholds.is_empty());
    }

    #[test]
    fn node_count_counts_every_position() {
        assert_eq!(sample().node_count(), 4);
    }

    #[test]
    fn unknown_strategy_fails_to_parse() {
        let json = r#"{ "root": { "typeId": "ROOT", "strategy": "MEDIAN" } }"#;
        assert!(matches!(
            KpiHierarchy::from_json(json),
            Err(ModelError::Serialization(_))
        ));
    }
}
