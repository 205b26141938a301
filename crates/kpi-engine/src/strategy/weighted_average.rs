//! Weighted average strategy
//!
//! Sums `score * weight` over the contributing children. Weights are not
//! renormalized to one, so a missing child lowers the total instead of
//! shifting its share onto its siblings. Redistribution is opt-in via
//! [`StrategyOptions::redistribute_weights`].

use super::{
    calculate_partial, truncate_score, CalculationStrategy, EdgeInput, StrategyOptions,
    StrategyOutcome,
};
use kpi_model::KpiStrategy;

/// Weighted sum of child scores
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedAverageStrategy;

impl WeightedAverageStrategy {
    /// Create new weighted average strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CalculationStrategy for WeightedAverageStrategy {
    fn kind(&self) -> KpiStrategy {
        KpiStrategy::WeightedAverage
    }

    fn calculate(&self, edges: &[EdgeInput<'_>], options: StrategyOptions) -> StrategyOutcome {
        calculate_partial(edges, options, |contributions| {
            let sum: f64 = contributions
                .iter()
                .map(|c| f64::from(c.score) * c.weight)
                .sum();
            truncate_score(sum)
        })
    }
}
