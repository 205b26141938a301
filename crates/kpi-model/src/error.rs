//! Error types for the KPI model
//!
//! Only construction and (de)serialization can fail. Calculation failures are
//! represented as data in [`crate::KpiCalculationResult`].

/// Main model error type
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Raw value score outside of `[0, 100]`
    #[error("score {score} for KPI '{type_id}' is outside of the valid range [0, 100]")]
    ScoreOutOfRange {
        /// KPI type the value was reported for
        type_id: String,
        /// Rejected score
        score: i64,
    },

    /// Raw value without a KPI type
    #[error("raw value '{id}' has an empty KPI type id")]
    EmptyTypeId {
        /// Identifier of the rejected raw value
        id: String,
    },

    /// Unknown KPI type name
    #[error("unknown KPI type: {0}")]
    UnknownKpiType(String),

    /// JSON (de)serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModelError {
    /// Check if error stems from an invalid raw observation rather than malformed input
    #[inline]
    #[must_use]
    pub fn is_invalid_observation(&self) -> bool {
        matches!(self, Self::ScoreOutOfRange { .. } | Self::EmptyTypeId { .. })
    }
}
