//! Result hierarchy
//!
//! Immutable, serializable snapshot of an evaluated runtime hierarchy. Each
//! node carries its typed result and, per edge, the weight planned at bind
//! time next to the weight the strategy actually used.

use crate::error::ModelError;
use crate::result::KpiCalculationResult;
use crate::runtime::NodeId;
use crate::strategy::KpiStrategy;
use serde::{Deserialize, Serialize};

/// Evaluated hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultHierarchy {
    /// Schema version of the definition
    pub schema_version: String,

    /// Root node
    pub root: ResultNode,
}

impl ResultHierarchy {
    /// Result of the root node
    #[inline]
    #[must_use]
    pub fn result(&self) -> &KpiCalculationResult {
        &self.root.result
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// [`ModelError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    ///
    /// # Errors
    /// [`ModelError::Serialization`] if `json` is not a result hierarchy.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// All nodes with the given type id, in depth-first pre-order
    #[must_use]
    pub fn find_by_type(&self, type_id: &str) -> Vec<&ResultNode> {
        let mut found = Vec::new();
        self.root.collect_by_type(type_id, &mut found);
        found
    }

    /// Compare two hierarchies, ignoring node ids and origins
    #[must_use]
    pub fn eq_ignoring_ids(&self, other: &Self) -> bool {
        self.schema_version == other.schema_version && self.root.eq_ignoring_ids(&other.root)
    }
}

/// Evaluated node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultNode {
    /// Node identity
    pub id: NodeId,

    /// Origin of the bound raw value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,

    /// KPI type
    pub type_id: String,

    /// Strategy used
    pub strategy: KpiStrategy,

    /// Typed result
    pub result: KpiCalculationResult,

    /// Child edges
    #[serde(default)]
    pub edges: Vec<ResultEdge>,
}

impl ResultNode {
    fn collect_by_type<'a>(&'a self, type_id: &str, found: &mut Vec<&'a ResultNode>) {
        if self.type_id == type_id {
            found.push(self);
        }
        for edge in &self.edges {
            edge.target.collect_by_type(type_id, found);
        }
    }

    /// Compare two nodes recursively, ignoring ids and origins
    #[must_use]
    pub fn eq_ignoring_ids(&self, other: &Self) -> bool {
        self.type_id == other.type_id
            && self.strategy == other.strategy
            && self.result == other.result
            && self.edges.len() == other.edges.len()
            && self.edges.iter().zip(&other.edges).all(|(a, b)| {
                a.planned_weight == b.planned_weight
                    && a.actual_weight == b.actual_weight
                    && a.target.eq_ignoring_ids(&b.target)
            })
    }
}

/// Evaluated edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEdge {
    /// Child node
    pub target: ResultNode,

    /// Weight assigned at bind time
    pub planned_weight: f64,

    /// Weight the parent strategy used, `0.0` for excluded children
    pub actual_weight: f64,
}
