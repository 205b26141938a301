//! KPI Hierarchy Engine
//!
//! Folds raw KPI values bottom-up through a weighted, typed hierarchy into a
//! single root score.
//!
//! # Core Concepts
//!
//! - [`HierarchyBinder`]: Merges a definition with raw values into a runtime tree
//! - [`CalculationStrategy`]: Pure aggregation over a node's child results
//! - [`StrategyRegistry`]: Lookup table from strategy kind to implementation
//! - [`TechnicalLagTransformer`]: Threshold remapping of lag magnitudes
//! - [`HierarchyEvaluator`]: Single post-order evaluation pass
//! - [`HierarchyValidator`]: Advisory structural pre-flight check
//! - [`KpiCalculator`]: Facade running all of the above from a [`CalculationConfig`]
//!
//! # Example
//!
//! ```rust,ignore
//! use kpi_engine::{CalculationConfig, KpiCalculator};
//!
//! let calculator = KpiCalculator::new(CalculationConfig::default());
//! let outcome = calculator.calculate(&definition, &raw_values);
//! println!("{}", outcome.result.result());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod binder;
mod calculator;
mod config;
mod evaluator;
mod strategy;
mod transformer;
mod validator;

// Re-exports
pub use binder::HierarchyBinder;
pub use calculator::{CalculationOutcome, KpiCalculator};
pub use config::{CalculationConfig, ConfigError};
pub use evaluator::{Evaluation, HierarchyEvaluator, NodeEvaluation};
pub use strategy::{
    AndStrategy, CalculationStrategy, EdgeInput, MaximumStrategy, MinimumStrategy, OrStrategy,
    RawValueStrategy, StrategyOptions, StrategyOutcome, StrategyRegistry, WeightedAverageStrategy,
    WeightedRatioStrategy, XorStrategy,
};
pub use transformer::{RawValueTransformer, TechnicalLagTransformer};
pub use validator::{HierarchyValidator, ValidationReport, Violation, ViolationKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
