//! Hierarchy binder
//!
//! Merges a hierarchy definition with a raw value set into a
//! [`RuntimeHierarchy`]. Wherever a child's type id has observations, the
//! child is replaced by one raw value leaf per observation and the edge
//! weight is split evenly among them. Otherwise the definition sub-tree is
//! copied and bound recursively.

use kpi_model::{KpiHierarchy, KpiNode, NodeIndex, RawValueKpi, RuntimeHierarchy, RuntimeNode};
use std::collections::HashMap;

/// Binds raw values onto hierarchy definitions
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyBinder;

impl HierarchyBinder {
    /// Create new binder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Bind `raw_values` onto `definition`
    ///
    /// The definition is only read. Type ids that never receive a value
    /// are kept as unbound nodes and evaluate to `Empty`.
    #[must_use]
    pub fn bind(&self, definition: &KpiHierarchy, raw_values: &[RawValueKpi]) -> RuntimeHierarchy {
        let mut by_type: HashMap<&str, Vec<&RawValueKpi>> = HashMap::new();
        for value in raw_values {
            by_type.entry(value.type_id()).or_default().push(value);
        }

        let root_def = &definition.root;
        let mut hierarchy = RuntimeHierarchy::with_root(
            definition.schema_version.clone(),
            RuntimeNode::new(
                root_def.type_id.clone(),
                root_def.strategy,
                root_def.thresholds.clone(),
            ),
        );

        let mut matched = HashMap::new();
        let root = hierarchy.root();
        bind_children(&mut hierarchy, root, root_def, &by_type, &mut matched);

        let unmatched: Vec<&str> = by_type
            .keys()
            .copied()
            .filter(|t| !matched.contains_key(*t))
            .collect();
        if !unmatched.is_empty() {
            tracing::debug!(
                ?unmatched,
                "raw values without a matching hierarchy node were ignored"
            );
        }

        tracing::debug!(
            nodes = hierarchy.len(),
            raw_values = raw_values.len(),
            "bound hierarchy"
        );
        hierarchy
    }
}

#[allow(clippy::cast_precision_loss)]
fn bind_children<'a>(
    hierarchy: &mut RuntimeHierarchy,
    parent: NodeIndex,
    definition: &KpiNode,
    by_type: &HashMap<&'a str, Vec<&RawValueKpi>>,
    matched: &mut HashMap<&'a str, usize>,
) {
    for edge in &definition.edges {
        let child = &edge.target;

        if let Some((type_id, values)) = by_type.get_key_value(child.type_id.as_str()) {
            let weight = edge.weight / values.len() as f64;
            for value in values {
                let leaf = RuntimeNode::from_raw_value(value, child.thresholds.clone());
                hierarchy.push_child(parent, leaf, weight);
            }
            *matched.entry(*type_id).or_default() += values.len();
            continue;
        }

        let node = RuntimeNode::new(
            child.type_id.clone(),
            child.strategy,
            child.thresholds.clone(),
        );
        let index = hierarchy.push_child(parent, node, edge.weight);
        bind_children(hierarchy, index, child, by_type, matched);
    }
}
