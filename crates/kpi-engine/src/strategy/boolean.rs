//! Boolean strategies
//!
//! AND and OR treat a non-zero score as `true`. XOR compares the two
//! scores directly. Results are either 0 or 100.

use super::{calculate_partial, CalculationStrategy, EdgeInput, StrategyOptions, StrategyOutcome};
use kpi_model::{KpiCalculationResult, KpiStrategy};

const TRUE_SCORE: i32 = 100;
const FALSE_SCORE: i32 = 0;

fn to_score(value: bool) -> i32 {
    if value {
        TRUE_SCORE
    } else {
        FALSE_SCORE
    }
}

/// 100 when every contributing child is non-zero
#[derive(Debug, Clone, Copy, Default)]
pub struct AndStrategy;

impl AndStrategy {
    /// Create new AND strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CalculationStrategy for AndStrategy {
    fn kind(&self) -> KpiStrategy {
        KpiStrategy::And
    }

    fn calculate(&self, edges: &[EdgeInput<'_>], options: StrategyOptions) -> StrategyOutcome {
        calculate_partial(edges, options, |contributions| {
            to_score(contributions.iter().all(|c| c.score != 0))
        })
    }
}

/// 100 when any contributing child is non-zero
#[derive(Debug, Clone, Copy, Default)]
pub struct OrStrategy;

impl OrStrategy {
    /// Create new OR strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CalculationStrategy for OrStrategy {
    fn kind(&self) -> KpiStrategy {
        KpiStrategy::Or
    }

    fn calculate(&self, edges: &[EdgeInput<'_>], options: StrategyOptions) -> StrategyOutcome {
        calculate_partial(edges, options, |contributions| {
            to_score(contributions.iter().any(|c| c.score != 0))
        })
    }
}

/// 100 when the two children disagree
///
/// Scores are compared as-is, so `(100, 20)` disagree and `(100, 100)` do
/// not. A lone contributor is compared against 0. More than two children is
/// an error in every mode; strict mode also rejects a single child.
#[derive(Debug, Clone, Copy, Default)]
pub struct XorStrategy;

impl XorStrategy {
    /// Create new XOR strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CalculationStrategy for XorStrategy {
    fn kind(&self) -> KpiStrategy {
        KpiStrategy::Xor
    }

    fn calculate(&self, edges: &[EdgeInput<'_>], options: StrategyOptions) -> StrategyOutcome {
        let too_many = edges.len() > 2;
        let too_few = options.strict && edges.len() == 1;
        if too_many || too_few {
            return StrategyOutcome::excluded(
                KpiCalculationResult::error(format!(
                    "XOR calculation strategy requires exactly 2 child nodes, found {}",
                    edges.len()
                )),
                edges.len(),
            );
        }

        calculate_partial(edges, options, |contributions| {
            let first = contributions.first().map_or(0, |c| c.score);
            let second = contributions.get(1).map_or(0, |c| c.score);
            to_score(first != second)
        })
    }

    fn is_valid(&self, edge_count: usize, strict: bool) -> bool {
        !strict || edge_count == 2
    }
}
