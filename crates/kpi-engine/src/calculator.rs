//! Calculator facade
//!
//! Wires binder, validator, transformer and evaluator according to a
//! [`CalculationConfig`].

use crate::binder::HierarchyBinder;
use crate::config::CalculationConfig;
use crate::evaluator::HierarchyEvaluator;
use crate::strategy::{StrategyOptions, StrategyRegistry};
use crate::transformer::TechnicalLagTransformer;
use crate::validator::{HierarchyValidator, ValidationReport};
use kpi_model::{KpiHierarchy, RawValueKpi, ResultHierarchy, RuntimeHierarchy};

/// Result of a full calculation run
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationOutcome {
    /// Evaluated hierarchy
    pub result: ResultHierarchy,

    /// Pre-flight validation, if enabled
    pub validation: Option<ValidationReport>,
}

/// End-to-end KPI calculation
///
/// Holds no per-run state; independent runs may share one calculator.
#[derive(Debug)]
pub struct KpiCalculator {
    config: CalculationConfig,
    registry: StrategyRegistry,
    transformer: TechnicalLagTransformer,
}

impl KpiCalculator {
    /// Create calculator with the built-in strategies
    #[must_use]
    pub fn new(config: CalculationConfig) -> Self {
        Self::with_registry(config, StrategyRegistry::with_defaults())
    }

    /// Create calculator with a custom strategy registry
    #[must_use]
    pub fn with_registry(config: CalculationConfig, registry: StrategyRegistry) -> Self {
        let transformer = TechnicalLagTransformer::for_types(config.technical_lag_types.clone());
        Self {
            config,
            registry,
            transformer,
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CalculationConfig {
        &self.config
    }

    /// Bind raw values onto a definition
    #[must_use]
    pub fn bind(&self, definition: &KpiHierarchy, raw_values: &[RawValueKpi]) -> RuntimeHierarchy {
        HierarchyBinder::new().bind(definition, raw_values)
    }

    /// Validate a bound hierarchy in the configured mode
    #[must_use]
    pub fn validate(&self, hierarchy: &RuntimeHierarchy) -> ValidationReport {
        HierarchyValidator::new(&self.registry).validate(hierarchy, self.config.strict)
    }

    /// Evaluate a bound hierarchy
    #[must_use]
    pub fn evaluate(&self, hierarchy: &RuntimeHierarchy) -> ResultHierarchy {
        let options = StrategyOptions {
            strict: self.config.strict,
            redistribute_weights: self.config.weight_redistribution,
        };
        HierarchyEvaluator::new(&self.registry, &self.transformer, options)
            .evaluate_to_result(hierarchy)
    }

    /// Bind, optionally validate, and evaluate
    ///
    /// A failing validation is reported in the outcome but does not stop
    /// the evaluation.
    #[must_use]
    pub fn calculate(
        &self,
        definition: &KpiHierarchy,
        raw_values: &[RawValueKpi],
    ) -> CalculationOutcome {
        let runtime = self.bind(definition, raw_values);

        let validation = self.config.validate.then(|| self.validate(&runtime));
        if let Some(report) = validation.as_ref().filter(|r| !r.is_valid()) {
            tracing::info!(
                violations = report.violations.len(),
                "evaluating hierarchy that failed validation"
            );
        }

        let result = self.evaluate(&runtime);
        tracing::info!(root = %result.result(), "kpi calculation finished");

        CalculationOutcome { result, validation }
    }
}

impl Default for KpiCalculator {
    fn default() -> Self {
        Self::new(CalculationConfig::default())
    }
}
