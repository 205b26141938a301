//! Runtime hierarchy arena
//!
//! The binder merges a definition with raw values into a [`RuntimeHierarchy`].
//! Nodes live in a flat arena and reference their children by [`NodeIndex`].
//! Nodes can only be added as fresh children of an existing node, so the
//! arena is always a tree rooted at [`RuntimeHierarchy::root`].
//!
//! Nodes carry no mutable result slot. Raw value leaves hold their
//! bound result from construction, everything else is computed by the
//! evaluator into a separate table keyed by [`NodeIndex`].

use crate::hierarchy::Threshold;
use crate::raw_value::RawValueKpi;
use crate::result::KpiCalculationResult;
use crate::strategy::KpiStrategy;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

/// Identity of a runtime node
///
/// Freshly generated for aggregation nodes, taken from the raw value for
/// bound leaves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Generate a new random id
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of a node in the runtime arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Raw arena position
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Edge from a runtime node to one of its children
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeEdge {
    /// Child node
    pub target: NodeIndex,

    /// Weight assigned at bind time, already split across fan-out siblings
    pub planned_weight: f64,
}

/// Node of a runtime hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeNode {
    id: NodeId,
    origin_id: Option<String>,
    type_id: String,
    strategy: KpiStrategy,
    thresholds: Vec<Threshold>,
    edges: Vec<RuntimeEdge>,
    bound_result: Option<KpiCalculationResult>,
}

impl RuntimeNode {
    /// Create an unbound node with a fresh id
    #[must_use]
    pub fn new(
        type_id: impl Into<String>,
        strategy: KpiStrategy,
        thresholds: Vec<Threshold>,
    ) -> Self {
        Self {
            id: NodeId::generate(),
            origin_id: None,
            type_id: type_id.into(),
            strategy,
            thresholds,
            edges: Vec::new(),
            bound_result: None,
        }
    }

    /// Create a raw value leaf
    ///
    /// The strategy is always [`KpiStrategy::RawValue`] and the result is
    /// preset to the value's score. Identity comes from the raw value.
    #[must_use]
    pub fn from_raw_value(value: &RawValueKpi, thresholds: Vec<Threshold>) -> Self {
        Self {
            id: NodeId(value.id().to_string()),
            origin_id: value.origin_id().map(ToString::to_string),
            type_id: value.type_id().to_string(),
            strategy: KpiStrategy::RawValue,
            thresholds,
            edges: Vec::new(),
            bound_result: Some(KpiCalculationResult::success(i32::from(value.score()))),
        }
    }

    /// Node identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Origin of the bound raw value, if any
    #[inline]
    #[must_use]
    pub fn origin_id(&self) -> Option<&str> {
        self.origin_id.as_deref()
    }

    /// KPI type
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Aggregation strategy
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> KpiStrategy {
        self.strategy
    }

    /// Thresholds copied from the definition
    #[inline]
    #[must_use]
    pub fn thresholds(&self) -> &[Threshold] {
        &self.thresholds
    }

    /// Outgoing edges
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[RuntimeEdge] {
        &self.edges
    }

    /// Result set by the binder, if this node was bound to a raw value
    #[inline]
    #[must_use]
    pub fn bound_result(&self) -> Option<&KpiCalculationResult> {
        self.bound_result.as_ref()
    }

    /// Check if node was bound to a raw value
    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound_result.is_some()
    }
}

/// Tree produced by binding raw values onto a hierarchy definition
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeHierarchy {
    schema_version: String,
    nodes: Vec<RuntimeNode>,
}

impl RuntimeHierarchy {
    /// Create hierarchy consisting of a root node
    #[must_use]
    pub fn with_root(schema_version: impl Into<String>, root: RuntimeNode) -> Self {
        Self {
            schema_version: schema_version.into(),
            nodes: vec![root],
        }
    }

    /// Add `child` below `parent`, returning the child's index
    ///
    /// # Panics
    /// Panics if `parent` does not belong to this hierarchy.
    pub fn push_child(&mut self, parent: NodeIndex, child: RuntimeNode, weight: f64) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(child);
        self.nodes[parent.0].edges.push(RuntimeEdge {
            target: index,
            planned_weight: weight,
        });
        index
    }

    /// Root index
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    /// Schema version of the definition this was bound from
    #[inline]
    #[must_use]
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Node at `index`
    ///
    /// # Panics
    /// Panics if `index` does not belong to this hierarchy.
    #[inline]
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &RuntimeNode {
        &self.nodes[index.0]
    }

    /// Node at `index`, if it exists
    #[inline]
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&RuntimeNode> {
        self.nodes.get(index.0)
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false, a hierarchy has at least a root
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes with their indices, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &RuntimeNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIndex(i), n))
    }
}
