//! Weighted ratio strategy
//!
//! First child divided by second child, in percent. Unlike the other
//! strategies there is no partial result: a ratio with a missing operand
//! is an error. Only when both operands are `Empty` does the ratio stay
//! `Empty`.

use super::{truncate_score, CalculationStrategy, EdgeInput, StrategyOptions, StrategyOutcome};
use kpi_model::{KpiCalculationResult, KpiStrategy};

/// Reason reported when an operand has no value
pub const MISSING_OPERAND_REASON: &str = "Ratio calculation strategy has elements without result";

/// Numerator over denominator, times 100
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatioStrategy;

impl WeightedRatioStrategy {
    /// Create new ratio strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CalculationStrategy for WeightedRatioStrategy {
    fn kind(&self) -> KpiStrategy {
        KpiStrategy::WeightedRatio
    }

    fn calculate(&self, edges: &[EdgeInput<'_>], _options: StrategyOptions) -> StrategyOutcome {
        if edges.is_empty() {
            return StrategyOutcome::excluded(KpiCalculationResult::empty(), 0);
        }

        if edges.len() != 2 {
            return StrategyOutcome::excluded(
                KpiCalculationResult::error(format!(
                    "Ratio calculation strategy requires exactly 2 child nodes, found {}",
                    edges.len()
                )),
                edges.len(),
            );
        }

        if edges.iter().all(|e| e.result.is_empty()) {
            return StrategyOutcome::excluded(
                KpiCalculationResult::empty_with("Neither ratio operand yielded a value"),
                edges.len(),
            );
        }

        let operands = (edges[0].result.score(), edges[1].result.score());
        let (Some(numerator), Some(denominator)) = operands else {
            return StrategyOutcome::excluded(
                KpiCalculationResult::error(MISSING_OPERAND_REASON),
                edges.len(),
            );
        };

        if denominator == 0 {
            return StrategyOutcome::excluded(
                KpiCalculationResult::error(format!(
                    "Ratio calculation strategy cannot divide {numerator} by zero"
                )),
                edges.len(),
            );
        }

        let score = truncate_score(f64::from(numerator) / f64::from(denominator) * 100.0);
        StrategyOutcome {
            result: KpiCalculationResult::success(score).into_valid_range(),
            actual_weights: edges.iter().map(|e| e.planned_weight).collect(),
        }
    }

    fn is_valid(&self, edge_count: usize, strict: bool) -> bool {
        !strict || edge_count == 2
    }
}
