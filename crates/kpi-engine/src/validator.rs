//! Hierarchy validator
//!
//! Pre-flight structural check of a runtime hierarchy. Advisory only: the
//! evaluator never consults it, callers decide whether a failing report
//! should stop them.

use crate::binder::HierarchyBinder;
use crate::strategy::StrategyRegistry;
use kpi_model::{KpiHierarchy, KpiStrategy, NodeIndex, RuntimeHierarchy};
use std::fmt::{self, Display, Formatter};

/// Kind of structural problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Root has no edges (strict only)
    EmptyHierarchy,

    /// Aggregating node below the root without children (strict only)
    EmptyAggregation,

    /// Raw value node with children
    RawValueWithEdges {
        /// Number of children found
        found: usize,
    },

    /// Wrong number of children for the strategy (strict only)
    EdgeCount {
        /// Required number of children
        expected: usize,
        /// Number of children found
        found: usize,
    },

    /// Edge weight that is zero, negative or not finite (strict only)
    NonPositiveWeight {
        /// Position of the edge
        edge: usize,
    },

    /// No strategy registered for the node
    MissingStrategy,
}

impl Display for ViolationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHierarchy => write!(f, "hierarchy has no edges"),
            Self::EmptyAggregation => write!(f, "aggregating node has no child nodes"),
            Self::RawValueWithEdges { found } => {
                write!(f, "raw value node has {found} child nodes")
            }
            Self::EdgeCount { expected, found } => {
                write!(f, "expected {expected} child nodes, found {found}")
            }
            Self::NonPositiveWeight { edge } => write!(f, "edge {edge} has a non-positive weight"),
            Self::MissingStrategy => write!(f, "no calculation strategy registered"),
        }
    }
}

/// One offending node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Type ids from the root down to the node
    pub path: Vec<String>,

    /// Strategy of the node
    pub strategy: KpiStrategy,

    /// What is wrong
    pub kind: ViolationKind,
}

impl Violation {
    /// Type id of the offending node
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.path.join("/"), self.strategy, self.kind)
    }
}

/// Validation outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Mode the report was produced in
    pub strict: bool,

    /// Offending nodes, in depth-first pre-order
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Check if no violations were found
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mode = if self.strict { "strict" } else { "relaxed" };
        if self.is_valid() {
            return write!(f, "hierarchy is valid ({mode})");
        }
        writeln!(f, "hierarchy is invalid ({mode}):")?;
        for violation in &self.violations {
            writeln!(f, "  - {violation}")?;
        }
        Ok(())
    }
}

/// Structural validator
#[derive(Debug, Clone, Copy)]
pub struct HierarchyValidator<'a> {
    registry: &'a StrategyRegistry,
}

impl<'a> HierarchyValidator<'a> {
    /// Create validator using the structural rules of `registry`
    #[inline]
    #[must_use]
    pub fn new(registry: &'a StrategyRegistry) -> Self {
        Self { registry }
    }

    /// Check if `hierarchy` is valid
    #[inline]
    #[must_use]
    pub fn is_valid(&self, hierarchy: &RuntimeHierarchy, strict: bool) -> bool {
        self.validate(hierarchy, strict).is_valid()
    }

    /// Validate `hierarchy`, collecting every violation
    #[must_use]
    pub fn validate(&self, hierarchy: &RuntimeHierarchy, strict: bool) -> ValidationReport {
        let mut violations = Vec::new();

        let root = hierarchy.node(hierarchy.root());
        if strict && root.edges().is_empty() {
            violations.push(Violation {
                path: vec![root.type_id().to_string()],
                strategy: root.strategy(),
                kind: ViolationKind::EmptyHierarchy,
            });
        }

        let mut path = Vec::new();
        self.check_node(hierarchy, hierarchy.root(), strict, &mut path, &mut violations);

        for violation in &violations {
            tracing::warn!(strict, %violation, "hierarchy violation");
        }

        ValidationReport { strict, violations }
    }

    /// Validate a definition by binding it against an empty raw value set
    #[must_use]
    pub fn validate_definition(&self, definition: &KpiHierarchy, strict: bool) -> ValidationReport {
        let runtime = HierarchyBinder::new().bind(definition, &[]);
        self.validate(&runtime, strict)
    }

    fn check_node(
        &self,
        hierarchy: &RuntimeHierarchy,
        index: NodeIndex,
        strict: bool,
        path: &mut Vec<String>,
        violations: &mut Vec<Violation>,
    ) {
        let node = hierarchy.node(index);
        path.push(node.type_id().to_string());

        let edge_count = node.edges().len();
        let mut report = |kind| {
            violations.push(Violation {
                path: path.clone(),
                strategy: node.strategy(),
                kind,
            });
        };

        match self.registry.get(node.strategy()) {
            None => report(ViolationKind::MissingStrategy),
            Some(strategy) if !strategy.is_valid(edge_count, strict) => {
                if node.strategy() == KpiStrategy::RawValue {
                    report(ViolationKind::RawValueWithEdges { found: edge_count });
                } else {
                    report(ViolationKind::EdgeCount {
                        expected: node.strategy().required_edge_count().unwrap_or(edge_count),
                        found: edge_count,
                    });
                }
            }
            Some(_) => {}
        }

        let is_root = index == hierarchy.root();
        if strict && !is_root && edge_count == 0 && node.strategy() != KpiStrategy::RawValue {
            report(ViolationKind::EmptyAggregation);
        }

        if strict {
            for (i, edge) in node.edges().iter().enumerate() {
                if !(edge.planned_weight.is_finite() && edge.planned_weight > 0.0) {
                    report(ViolationKind::NonPositiveWeight { edge: i });
                }
            }
        }

        for edge in node.edges() {
            self.check_node(hierarchy, edge.target, strict, path, violations);
        }
        path.pop();
    }
}
