//! Raw value strategy
//!
//! Bound leaves never reach a strategy, their result comes from the raw
//! value. This strategy only sees raw value positions that received no
//! observation.

use super::{CalculationStrategy, EdgeInput, StrategyOptions, StrategyOutcome};
use kpi_model::{KpiCalculationResult, KpiStrategy};

/// Fallback for raw value nodes without a bound value
#[derive(Debug, Clone, Copy, Default)]
pub struct RawValueStrategy;

impl RawValueStrategy {
    /// Create new raw value strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CalculationStrategy for RawValueStrategy {
    fn kind(&self) -> KpiStrategy {
        KpiStrategy::RawValue
    }

    fn calculate(&self, edges: &[EdgeInput<'_>], _options: StrategyOptions) -> StrategyOutcome {
        if edges.is_empty() {
            return StrategyOutcome::excluded(
                KpiCalculationResult::empty_with("No raw value was provided for this KPI"),
                0,
            );
        }

        StrategyOutcome::excluded(
            KpiCalculationResult::error(format!(
                "Raw value node must not have child nodes, found {}",
                edges.len()
            )),
            edges.len(),
        )
    }

    fn is_valid(&self, edge_count: usize, _strict: bool) -> bool {
        edge_count == 0
    }
}
