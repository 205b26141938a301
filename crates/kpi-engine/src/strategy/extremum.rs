//! Minimum and maximum strategies
//!
//! Weights are documentation only here; the actual weight of a contributing
//! child is its planned weight.

use super::{calculate_partial, CalculationStrategy, EdgeInput, StrategyOptions, StrategyOutcome};
use kpi_model::KpiStrategy;

/// Smallest contributing child score
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimumStrategy;

impl MinimumStrategy {
    /// Create new minimum strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CalculationStrategy for MinimumStrategy {
    fn kind(&self) -> KpiStrategy {
        KpiStrategy::Minimum
    }

    fn calculate(&self, edges: &[EdgeInput<'_>], options: StrategyOptions) -> StrategyOutcome {
        calculate_partial(edges, options, |contributions| {
            contributions.iter().map(|c| c.score).min().unwrap_or(0)
        })
    }
}

/// Largest contributing child score
#[derive(Debug, Clone, Copy, Default)]
pub struct MaximumStrategy;

impl MaximumStrategy {
    /// Create new maximum strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CalculationStrategy for MaximumStrategy {
    fn kind(&self) -> KpiStrategy {
        KpiStrategy::Maximum
    }

    fn calculate(&self, edges: &[EdgeInput<'_>], options: StrategyOptions) -> StrategyOutcome {
        calculate_partial(edges, options, |contributions| {
            contributions.iter().map(|c| c.score).max().unwrap_or(0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpi_model::KpiCalculationResult;

    fn scores() -> Vec<KpiCalculationResult> {
        vec![
            KpiCalculationResult::success(82),
            KpiCalculationResult::success(90),
            KpiCalculationResult::success(65),
        ]
    }

    fn edges(results: &[KpiCalculationResult]) -> Vec<EdgeInput<'_>> {
        results
            .iter()
            .map(|r| EdgeInput::new("CODE_VULNERABILITY_SCORE", r, 1.0 / 3.0))
            .collect()
    }

    #[test]
    fn maximum_picks_largest() {
        let results = scores();
        let outcome = MaximumStrategy::new().calculate(&edges(&results), StrategyOptions::strict());
        assert_eq!(outcome.result, KpiCalculationResult::success(90));
        assert!(outcome.actual_weights.iter().all(|w| (*w - 1.0 / 3.0).abs() < f64::EPSILON));
    }

    #[test]
    fn minimum_picks_smallest() {
        let results = scores();
        let outcome = MinimumStrategy::new().calculate(&edges(&results), StrategyOptions::strict());
        assert_eq!(outcome.result, KpiCalculationResult::success(65));
    }

    #[test]
    fn excluded_child_does_not_count_as_zero() {
        let results = vec![
            KpiCalculationResult::success(70),
            KpiCalculationResult::error("scanner failed"),
        ];
        let outcome = MinimumStrategy::new().calculate(&edges(&results), StrategyOptions::strict());
        assert_eq!(outcome.result.score(), Some(70));
        assert!(outcome.result.is_incomplete());
        assert_eq!(outcome.actual_weights[1], 0.0);
    }
}
