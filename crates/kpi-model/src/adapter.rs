//! Adapter contract
//!
//! Tool-specific adapters turn decoded tool output into raw KPI values. An
//! observation that cannot be scored becomes an [`AdapterOutcome::Invalid`]
//! diagnostic instead of aborting the whole input. Hard parse failures are
//! the caller's business and never reach this layer.

use crate::error::ModelError;
use crate::raw_value::RawValueKpi;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Observation that could not be turned into a raw value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    /// KPI type the observation was meant for, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,

    /// Identifier of the observation, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Why it was rejected
    pub reason: String,
}

impl ValidationFailure {
    /// Create failure with a reason only
    #[inline]
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            type_id: None,
            id: None,
            reason: reason.into(),
        }
    }

    /// Attach KPI type
    #[inline]
    #[must_use]
    pub fn with_type(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
    }

    /// Attach observation id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.type_id, &self.id) {
            (Some(t), Some(id)) => write!(f, "{t} ({id}): {}", self.reason),
            (Some(t), None) => write!(f, "{t}: {}", self.reason),
            (None, Some(id)) => write!(f, "({id}): {}", self.reason),
            (None, None) => f.write_str(&self.reason),
        }
    }
}

/// Per-observation adapter output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterOutcome {
    /// Scored observation
    Value(RawValueKpi),

    /// Observation that could not be scored
    Invalid(ValidationFailure),
}

impl From<Result<RawValueKpi, ModelError>> for AdapterOutcome {
    fn from(result: Result<RawValueKpi, ModelError>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(ModelError::ScoreOutOfRange { type_id, score }) => Self::Invalid(
                ValidationFailure::new(format!("score {score} is outside of [0, 100]"))
                    .with_type(type_id),
            ),
            Err(ModelError::EmptyTypeId { id }) => {
                Self::Invalid(ValidationFailure::new("missing KPI type id").with_id(id))
            }
            Err(other) => Self::Invalid(ValidationFailure::new(other.to_string())),
        }
    }
}

/// Converts decoded tool output into raw KPI values
pub trait KpiAdapter {
    /// Decoded tool output
    type Input: ?Sized;

    /// Adapter name, used in diagnostics
    fn name(&self) -> &'static str;

    /// Map every observation in `input` to a value or a diagnostic
    fn adapt(&self, input: &Self::Input) -> Vec<AdapterOutcome>;
}

/// Split adapter outcomes into values and diagnostics, preserving order
#[must_use]
pub fn partition_outcomes(
    outcomes: impl IntoIterator<Item = AdapterOutcome>,
) -> (Vec<RawValueKpi>, Vec<ValidationFailure>) {
    let mut values = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            AdapterOutcome::Value(v) => values.push(v),
            AdapterOutcome::Invalid(f) => failures.push(f),
        }
    }
    (values, failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SecretCountAdapter;

    impl KpiAdapter for SecretCountAdapter {
        type Input = [(String, Option<u32>)];

        fn name(&self) -> &'static str {
            "secret-count"
        }

        fn adapt(&self, input: &Self::Input) -> Vec<AdapterOutcome> {
            input
                .iter()
                .map(|(id, count)| match count {
                    Some(0) => RawValueKpi::new("SECRETS", 100, id.as_str()).into(),
                    Some(_) => RawValueKpi::new("SECRETS", 0, id.as_str()).into(),
                    None => AdapterOutcome::Invalid(
                        ValidationFailure::new("missing finding count")
                            .with_type("SECRETS")
                            .with_id(id.as_str()),
                    ),
                })
                .collect()
        }
    }

    #[test]
    fn adapter_reports_unscorable_observations() {
        let input = vec![
            ("repo-a".to_string(), Some(0)),
            ("repo-b".to_string(), None),
            ("repo-c".to_string(), Some(3)),
        ];
        let adapter = SecretCountAdapter;
        let (values, failures) = partition_outcomes(adapter.adapt(&input));

        assert_eq!(adapter.name(), "secret-count");
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].score(), 100);
        assert_eq!(values[1].score(), 0);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].to_string(), "SECRETS (repo-b): missing finding count");
    }

    #[test]
    fn out_of_range_construction_becomes_invalid() {
        let outcome = AdapterOutcome::from(RawValueKpi::new("SECRETS", 250, "x"));
        match outcome {
            AdapterOutcome::Invalid(failure) => {
                assert_eq!(failure.type_id.as_deref(), Some("SECRETS"));
                assert!(failure.reason.contains("250"));
            }
            AdapterOutcome::Value(_) => panic!("expected invalid outcome"),
        }
    }
}
