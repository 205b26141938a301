//! Raw value transformation
//!
//! Some raw values are magnitudes rather than scores. Technical lag, for
//! instance, grows with dependency staleness. A [`RawValueTransformer`]
//! maps the bound value of such leaves into the `[0, 100]` score space
//! before the parent strategies see it.

use kpi_model::{KpiCalculationResult, KpiType, RuntimeNode};
use std::collections::HashSet;

/// Post-processing of bound raw value leaves
pub trait RawValueTransformer: Send + Sync + std::fmt::Debug {
    /// Check if this transformer rewrites values of `type_id`
    fn applies_to(&self, type_id: &str) -> bool;

    /// Transform the current result of `node`
    ///
    /// Nodes this transformer does not apply to pass through unchanged.
    fn transform(
        &self,
        node: &RuntimeNode,
        current: &KpiCalculationResult,
    ) -> KpiCalculationResult;
}

/// Threshold based remapping of technical lag components
///
/// With `t` the largest threshold of the node, a lag up to `t` scores 100,
/// a lag of `2t` or more scores 0, and in between the score falls linearly.
#[derive(Debug, Clone)]
pub struct TechnicalLagTransformer {
    type_ids: HashSet<String>,
}

impl TechnicalLagTransformer {
    /// Create transformer for the built-in technical lag component types
    #[must_use]
    pub fn new() -> Self {
        Self::for_types(
            KpiType::TECHNICAL_LAG_COMPONENTS
                .iter()
                .map(|t| t.as_str().to_string()),
        )
    }

    /// Create transformer for custom type ids
    #[must_use]
    pub fn for_types(type_ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            type_ids: type_ids.into_iter().collect(),
        }
    }

    /// Remap a lag magnitude using the node's thresholds
    #[must_use]
    pub fn remap(type_id: &str, score: i32, thresholds: &[f64]) -> KpiCalculationResult {
        if score < 0 {
            return KpiCalculationResult::error(format!(
                "Score {score} of node '{type_id}' is negative"
            ));
        }

        let Some(threshold) = thresholds.iter().copied().reduce(f64::max) else {
            return KpiCalculationResult::error(format!(
                "Thresholds for node '{type_id}' are empty"
            ));
        };

        if !threshold.is_finite() || threshold <= 0.0 {
            return KpiCalculationResult::error(format!(
                "Thresholds for node '{type_id}' must be positive, largest is {threshold}"
            ));
        }

        let lag = f64::from(score);
        let value = if lag <= threshold {
            100
        } else if lag >= 2.0 * threshold {
            0
        } else {
            round_score((1.0 - (lag - threshold) / threshold) * 100.0)
        };

        KpiCalculationResult::success(value)
    }
}

impl Default for TechnicalLagTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl RawValueTransformer for TechnicalLagTransformer {
    fn applies_to(&self, type_id: &str) -> bool {
        self.type_ids.contains(type_id)
    }

    fn transform(
        &self,
        node: &RuntimeNode,
        current: &KpiCalculationResult,
    ) -> KpiCalculationResult {
        if !self.applies_to(node.type_id()) || current.is_error() {
            return current.clone();
        }

        let score = current.score().unwrap_or(0);
        let thresholds: Vec<f64> = node.thresholds().iter().map(|t| t.value).collect();
        let result = Self::remap(node.type_id(), score, &thresholds);

        tracing::trace!(
            type_id = node.type_id(),
            input = score,
            result = %result,
            "technical lag transformed"
        );
        result
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_score(value: f64) -> i32 {
    // Only called with values in (0, 100)
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpi_model::{KpiStrategy, RawValueKpi, Threshold};

    const LAG: &str = "TECHNICAL_LAG_PROD_DIRECT_COMPONENT";

    fn remap(score: i32) -> KpiCalculationResult {
        TechnicalLagTransformer::remap(LAG, score, &[50.0])
    }

    #[test]
    fn below_and_at_threshold_is_full_score() {
        assert_eq!(remap(30), KpiCalculationResult::success(100));
        assert_eq!(remap(50), KpiCalculationResult::success(100));
    }

    #[test]
    fn linear_decay_between_threshold_and_double() {
        assert_eq!(remap(75), KpiCalculationResult::success(50));
        assert_eq!(remap(60), KpiCalculationResult::success(80));
        assert_eq!(remap(99), KpiCalculationResult::success(2));
    }

    #[test]
    fn at_and_beyond_double_threshold_is_zero() {
        assert_eq!(remap(100), KpiCalculationResult::success(0));
        assert_eq!(remap(150), KpiCalculationResult::success(0));
    }

    #[test]
    fn largest_threshold_wins() {
        let result = TechnicalLagTransformer::remap(LAG, 75, &[10.0, 50.0, 20.0]);
        assert_eq!(result, KpiCalculationResult::success(50));
    }

    #[test]
    fn empty_thresholds_is_error() {
        let result = TechnicalLagTransformer::remap(LAG, 75, &[]);
        assert!(result.reason().unwrap().contains("Thresholds for node"));
    }

    #[test]
    fn negative_score_is_error() {
        let result = remap(-1);
        assert!(result.is_error());
        assert!(result.reason().unwrap().contains("is negative"));
    }

    #[test]
    fn non_positive_threshold_is_error() {
        assert!(TechnicalLagTransformer::remap(LAG, 10, &[0.0]).is_error());
    }

    #[test]
    fn transform_uses_node_thresholds() {
        let value = RawValueKpi::new(LAG, 75, "lag-1").unwrap();
        let node = RuntimeNode::from_raw_value(&value, vec![Threshold::new("limit", 50.0)]);
        let transformer = TechnicalLagTransformer::new();

        let result = transformer.transform(&node, node.bound_result().unwrap());
        assert_eq!(result, KpiCalculationResult::success(50));
    }

    #[test]
    fn incomplete_and_empty_inputs_become_success() {
        let thresholds = vec![Threshold::new("limit", 50.0)];
        let node = RuntimeNode::new(LAG, KpiStrategy::RawValue, thresholds);
        let transformer = TechnicalLagTransformer::new();

        let from_incomplete =
            transformer.transform(&node, &KpiCalculationResult::incomplete(75, "partial"));
        assert_eq!(from_incomplete, KpiCalculationResult::success(50));

        let from_empty = transformer.transform(&node, &KpiCalculationResult::empty());
        assert_eq!(from_empty, KpiCalculationResult::success(100));
    }

    #[test]
    fn other_types_pass_through() {
        let value = RawValueKpi::new("SECRETS", 75, "s-1").unwrap();
        let node = RuntimeNode::from_raw_value(&value, Vec::new());
        let transformer = TechnicalLagTransformer::new();

        assert!(!transformer.applies_to("SECRETS"));
        let result = transformer.transform(&node, node.bound_result().unwrap());
        assert_eq!(result, KpiCalculationResult::success(75));
    }

    #[test]
    fn custom_types() {
        let transformer = TechnicalLagTransformer::for_types(["LIBYEARS".to_string()]);
        assert!(transformer.applies_to("LIBYEARS"));
        assert!(!transformer.applies_to(LAG));
    }
}
