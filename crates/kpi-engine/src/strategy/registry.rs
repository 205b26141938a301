//! Strategy registry
//!
//! Provides [`StrategyRegistry`], the lookup table from [`KpiStrategy`] to
//! its implementation.

use super::{
    AndStrategy, CalculationStrategy, MaximumStrategy, MinimumStrategy, OrStrategy,
    RawValueStrategy, WeightedAverageStrategy, WeightedRatioStrategy, XorStrategy,
};
use kpi_model::KpiStrategy;
use std::collections::HashMap;

/// Lookup table of calculation strategies
#[derive(Debug, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<KpiStrategy, Box<dyn CalculationStrategy>>,
}

impl StrategyRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Create registry with every built-in strategy
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(RawValueStrategy::new());
        registry.register(WeightedAverageStrategy::new());
        registry.register(MinimumStrategy::new());
        registry.register(MaximumStrategy::new());
        registry.register(WeightedRatioStrategy::new());
        registry.register(AndStrategy::new());
        registry.register(OrStrategy::new());
        registry.register(XorStrategy::new());
        registry
    }

    /// Register a strategy, replacing any previous one of the same kind
    pub fn register(&mut self, strategy: impl CalculationStrategy + 'static) {
        self.strategies.insert(strategy.kind(), Box::new(strategy));
    }

    /// Look up strategy
    #[inline]
    #[must_use]
    pub fn get(&self, kind: KpiStrategy) -> Option<&dyn CalculationStrategy> {
        self.strategies.get(&kind).map(|s| &**s)
    }

    /// Check if a strategy is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: KpiStrategy) -> bool {
        self.strategies.contains_key(&kind)
    }

    /// Remove strategy
    #[inline]
    pub fn remove(&mut self, kind: KpiStrategy) -> bool {
        self.strategies.remove(&kind).is_some()
    }

    /// Get number of registered strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{EdgeInput, StrategyOptions, StrategyOutcome};
    use kpi_model::KpiCalculationResult;

    #[derive(Debug)]
    struct ConstantMaximum;

    impl CalculationStrategy for ConstantMaximum {
        fn kind(&self) -> KpiStrategy {
            KpiStrategy::Maximum
        }

        fn calculate(&self, edges: &[EdgeInput<'_>], _options: StrategyOptions) -> StrategyOutcome {
            StrategyOutcome {
                result: KpiCalculationResult::success(42),
                actual_weights: edges.iter().map(|e| e.planned_weight).collect(),
            }
        }
    }

    #[test]
    fn registry_new_empty() {
        let registry = StrategyRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(KpiStrategy::Minimum).is_none());
    }

    #[test]
    fn registry_with_defaults_covers_every_strategy() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(registry.len(), KpiStrategy::ALL.len());
        for kind in KpiStrategy::ALL {
            let strategy = registry.get(kind).unwrap();
            assert_eq!(strategy.kind(), kind);
            assert_eq!(strategy.name(), kind.as_str());
        }
    }

    #[test]
    fn registry_register_replaces() {
        let mut registry = StrategyRegistry::with_defaults();
        registry.register(ConstantMaximum);
        assert_eq!(registry.len(), KpiStrategy::ALL.len());

        let outcome = registry
            .get(KpiStrategy::Maximum)
            .unwrap()
            .calculate(&[], StrategyOptions::strict());
        assert_eq!(outcome.result, KpiCalculationResult::success(42));
    }

    #[test]
    fn registry_remove() {
        let mut registry = StrategyRegistry::with_defaults();
        assert!(registry.remove(KpiStrategy::Xor));
        assert!(!registry.contains(KpiStrategy::Xor));
        assert!(!registry.remove(KpiStrategy::Xor));
    }
}
