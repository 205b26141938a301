//! Calculation strategy trait and shared partial-result handling
//!
//! Provides the [`CalculationStrategy`] trait. Every implementation is a
//! stateless function from the already computed results of a node's children
//! to one typed result, plus the weight each child actually contributed.

mod boolean;
mod extremum;
mod ratio;
mod raw_value;
mod registry;
mod weighted_average;

pub use boolean::{AndStrategy, OrStrategy, XorStrategy};
pub use extremum::{MaximumStrategy, MinimumStrategy};
pub use ratio::WeightedRatioStrategy;
pub use raw_value::RawValueStrategy;
pub use registry::StrategyRegistry;
pub use weighted_average::WeightedAverageStrategy;

use kpi_model::{KpiCalculationResult, KpiStrategy};
use std::fmt::Write as _;

/// Aggregation over the results of a node's children
///
/// # Contract
/// - An empty edge list yields [`KpiCalculationResult::Empty`]
/// - `actual_weights` has one entry per input edge, in order
/// - Scores in `Success`/`Incomplete` results are within `[0, 100]`
pub trait CalculationStrategy: Send + Sync + std::fmt::Debug {
    /// Strategy this implementation serves
    fn kind(&self) -> KpiStrategy;

    /// Compute the node result from its children
    fn calculate(&self, edges: &[EdgeInput<'_>], options: StrategyOptions) -> StrategyOutcome;

    /// Check whether a node with `edge_count` children is structurally sound
    fn is_valid(&self, edge_count: usize, strict: bool) -> bool {
        let _ = (edge_count, strict);
        true
    }

    /// Strategy name (for logs and diagnostics)
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Child result as seen by the parent strategy
#[derive(Debug, Clone, Copy)]
pub struct EdgeInput<'a> {
    /// KPI type of the child, used in reasons
    pub type_id: &'a str,

    /// Finalized result of the child
    pub result: &'a KpiCalculationResult,

    /// Weight assigned at bind time
    pub planned_weight: f64,
}

impl<'a> EdgeInput<'a> {
    /// Create edge input
    #[inline]
    #[must_use]
    pub fn new(type_id: &'a str, result: &'a KpiCalculationResult, planned_weight: f64) -> Self {
        Self {
            type_id,
            result,
            planned_weight,
        }
    }
}

/// Flags that change strategy behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrategyOptions {
    /// Enforce structural edge counts at evaluation time
    pub strict: bool,

    /// Spread the weight of excluded children over contributing ones
    pub redistribute_weights: bool,
}

impl StrategyOptions {
    /// Strict mode without weight redistribution
    #[inline]
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict: true,
            redistribute_weights: false,
        }
    }

    /// Relaxed mode without weight redistribution
    #[inline]
    #[must_use]
    pub fn relaxed() -> Self {
        Self::default()
    }

    /// Set weight redistribution
    #[inline]
    #[must_use]
    pub fn with_redistribution(mut self, enabled: bool) -> Self {
        self.redistribute_weights = enabled;
        self
    }
}

/// Result of a strategy plus the weight every edge actually carried
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    /// Node result
    pub result: KpiCalculationResult,

    /// One entry per input edge, `0.0` for excluded children
    pub actual_weights: Vec<f64>,
}

impl StrategyOutcome {
    /// Outcome where no edge contributed
    #[must_use]
    pub fn excluded(result: KpiCalculationResult, edge_count: usize) -> Self {
        Self {
            result,
            actual_weights: vec![0.0; edge_count],
        }
    }
}

/// Contributing child handed to a scoring function
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Contribution {
    pub(crate) score: i32,
    pub(crate) weight: f64,
}

/// Shared skeleton for strategies that tolerate missing children
///
/// Children without a value are excluded and get an actual weight of zero.
/// No contributors yields `Empty`, some yields `Incomplete`, all yields
/// `Success`. The score is clamped into `[0, 100]`.
pub(crate) fn calculate_partial(
    edges: &[EdgeInput<'_>],
    options: StrategyOptions,
    score: impl FnOnce(&[Contribution]) -> i32,
) -> StrategyOutcome {
    if edges.is_empty() {
        return StrategyOutcome::excluded(KpiCalculationResult::empty(), 0);
    }

    let actual_weights = actual_weights(edges, options.redistribute_weights);
    let contributions: Vec<Contribution> = edges
        .iter()
        .zip(&actual_weights)
        .filter_map(|(edge, weight)| {
            edge.result.score().map(|score| Contribution {
                score,
                weight: *weight,
            })
        })
        .collect();

    if contributions.is_empty() {
        return StrategyOutcome::excluded(
            KpiCalculationResult::empty_with(format!(
                "None of the {} child nodes yielded a value",
                edges.len()
            )),
            edges.len(),
        );
    }

    let value = score(&contributions);
    let result = if contributions.len() == edges.len() {
        KpiCalculationResult::success(value)
    } else {
        KpiCalculationResult::incomplete(value, exclusion_reason(edges))
    };

    StrategyOutcome {
        result: result.into_valid_range(),
        actual_weights,
    }
}

/// Actual weight of every edge
///
/// Excluded edges get zero. Contributing edges keep their planned weight,
/// plus an even share of the excluded weight when redistribution is on.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn actual_weights(edges: &[EdgeInput<'_>], redistribute: bool) -> Vec<f64> {
    let contributing = edges.iter().filter(|e| e.result.has_value()).count();
    let excluded_weight: f64 = edges
        .iter()
        .filter(|e| !e.result.has_value())
        .map(|e| e.planned_weight)
        .sum();

    let bonus = if redistribute && contributing > 0 {
        excluded_weight / contributing as f64
    } else {
        0.0
    };

    edges
        .iter()
        .map(|e| {
            if e.result.has_value() {
                e.planned_weight + bonus
            } else {
                0.0
            }
        })
        .collect()
}

/// Human readable list of excluded children
pub(crate) fn exclusion_reason(edges: &[EdgeInput<'_>]) -> String {
    let excluded: Vec<&EdgeInput<'_>> = edges.iter().filter(|e| !e.result.has_value()).collect();
    let mut reason = format!(
        "{} of {} child nodes could not be used:",
        excluded.len(),
        edges.len()
    );
    for (i, edge) in excluded.iter().enumerate() {
        let sep = if i == 0 { " " } else { ", " };
        let _ = write!(reason, "{sep}{} ({})", edge.type_id, edge.result.kind());
    }
    reason
}

/// Convert a computed score to an integer, truncating toward zero
///
/// Values within 1e-9 of the next integer are snapped first so that
/// products like `0.7 * 100.0` do not lose a point to float noise.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn truncate_score(value: f64) -> i32 {
    let snapped = (value * 1e9).round() / 1e9;
    // `as` saturates at the i32 bounds; clamping happens afterwards
    snapped.trunc() as i32
}
