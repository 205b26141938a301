//! Hierarchy evaluator
//!
//! Single post-order pass over a [`RuntimeHierarchy`]. Bound leaves go
//! through the raw value transformer, every other node through the strategy
//! registered for it. Results are collected into an [`Evaluation`] table
//! keyed by [`NodeIndex`]; the runtime hierarchy itself is never mutated.

use crate::strategy::{EdgeInput, StrategyOptions, StrategyOutcome, StrategyRegistry};
use crate::transformer::RawValueTransformer;
use kpi_model::{
    KpiCalculationResult, NodeIndex, ResultEdge, ResultHierarchy, ResultNode, RuntimeHierarchy,
};
use std::collections::HashSet;

/// Result and actual edge weights of one node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEvaluation {
    /// Node result
    pub result: KpiCalculationResult,

    /// Actual weight per outgoing edge, in edge order
    pub actual_weights: Vec<f64>,
}

impl From<StrategyOutcome> for NodeEvaluation {
    fn from(outcome: StrategyOutcome) -> Self {
        Self {
            result: outcome.result,
            actual_weights: outcome.actual_weights,
        }
    }
}

/// Evaluation table, parallel to the runtime arena
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    nodes: Vec<Option<NodeEvaluation>>,
}

impl Evaluation {
    /// Evaluation of a node, `None` if it was never reached
    #[inline]
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&NodeEvaluation> {
        self.nodes.get(index.index()).and_then(Option::as_ref)
    }

    /// Result of a node, `Empty` if it was never reached
    #[must_use]
    pub fn result(&self, index: NodeIndex) -> KpiCalculationResult {
        self.get(index)
            .map_or_else(KpiCalculationResult::empty, |e| e.result.clone())
    }

    /// Build the serializable result tree for `hierarchy`
    #[must_use]
    pub fn to_result_hierarchy(&self, hierarchy: &RuntimeHierarchy) -> ResultHierarchy {
        ResultHierarchy {
            schema_version: hierarchy.schema_version().to_string(),
            root: self.result_node(hierarchy, hierarchy.root()),
        }
    }

    fn result_node(&self, hierarchy: &RuntimeHierarchy, index: NodeIndex) -> ResultNode {
        let node = hierarchy.node(index);
        let evaluation = self.get(index);

        let edges = node
            .edges()
            .iter()
            .enumerate()
            .map(|(i, edge)| ResultEdge {
                target: self.result_node(hierarchy, edge.target),
                planned_weight: edge.planned_weight,
                actual_weight: evaluation
                    .and_then(|e| e.actual_weights.get(i).copied())
                    .unwrap_or(0.0),
            })
            .collect();

        ResultNode {
            id: node.id().clone(),
            origin_id: node.origin_id().map(ToString::to_string),
            type_id: node.type_id().to_string(),
            strategy: node.strategy(),
            result: self.result(index),
            edges,
        }
    }
}

/// Bottom-up evaluator
#[derive(Debug, Clone, Copy)]
pub struct HierarchyEvaluator<'a> {
    registry: &'a StrategyRegistry,
    transformer: &'a dyn RawValueTransformer,
    options: StrategyOptions,
}

impl<'a> HierarchyEvaluator<'a> {
    /// Create evaluator
    #[must_use]
    pub fn new(
        registry: &'a StrategyRegistry,
        transformer: &'a dyn RawValueTransformer,
        options: StrategyOptions,
    ) -> Self {
        Self {
            registry,
            transformer,
            options,
        }
    }

    /// Evaluate every node reachable from the root
    #[must_use]
    pub fn evaluate(&self, hierarchy: &RuntimeHierarchy) -> Evaluation {
        let mut evaluation = Evaluation {
            nodes: vec![None; hierarchy.len()],
        };
        let mut seen = HashSet::with_capacity(hierarchy.len());
        self.visit(hierarchy, hierarchy.root(), &mut seen, &mut evaluation);

        tracing::debug!(
            nodes = hierarchy.len(),
            strict = self.options.strict,
            root = %evaluation.result(hierarchy.root()),
            "evaluated hierarchy"
        );
        evaluation
    }

    /// Evaluate and convert to a result tree
    #[must_use]
    pub fn evaluate_to_result(&self, hierarchy: &RuntimeHierarchy) -> ResultHierarchy {
        self.evaluate(hierarchy).to_result_hierarchy(hierarchy)
    }

    fn visit(
        &self,
        hierarchy: &RuntimeHierarchy,
        index: NodeIndex,
        seen: &mut HashSet<NodeIndex>,
        evaluation: &mut Evaluation,
    ) {
        if !seen.insert(index) {
            tracing::warn!(node = index.index(), "node reached twice, skipping");
            return;
        }

        let node = hierarchy.node(index);
        for edge in node.edges() {
            self.visit(hierarchy, edge.target, seen, evaluation);
        }

        let node_evaluation = if let Some(bound) = node.bound_result() {
            NodeEvaluation {
                result: self.transformer.transform(node, bound),
                actual_weights: vec![0.0; node.edges().len()],
            }
        } else if let Some(strategy) = self.registry.get(node.strategy()) {
            let results: Vec<KpiCalculationResult> =
                node.edges().iter().map(|e| evaluation.result(e.target)).collect();
            let inputs: Vec<EdgeInput<'_>> = node
                .edges()
                .iter()
                .zip(&results)
                .map(|(edge, result)| {
                    let type_id = hierarchy.node(edge.target).type_id();
                    EdgeInput::new(type_id, result, edge.planned_weight)
                })
                .collect();
            strategy.calculate(&inputs, self.options).into()
        } else {
            NodeEvaluation {
                result: KpiCalculationResult::error(format!(
                    "No calculation strategy registered for {}",
                    node.strategy()
                )),
                actual_weights: vec![0.0; node.edges().len()],
            }
        };

        tracing::trace!(
            type_id = node.type_id(),
            strategy = %node.strategy(),
            result = %node_evaluation.result,
            "node evaluated"
        );
        evaluation.nodes[index.index()] = Some(node_evaluation);
    }
}
