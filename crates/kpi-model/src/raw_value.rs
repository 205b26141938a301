//! Raw KPI values
//!
//! Provides [`RawValueKpi`], a single observation already mapped into the
//! `[0, 100]` score space by a tool adapter.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Lowest valid score
pub const MIN_SCORE: i64 = 0;

/// Highest valid score
pub const MAX_SCORE: i64 = 100;

/// Observed KPI measurement
///
/// The score is checked at construction, so every value reaching the
/// calculation engine lies in `[0, 100]`. Deserialization goes through the
/// same check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawValueRecord", into = "RawValueRecord")]
pub struct RawValueKpi {
    type_id: String,
    score: u8,
    id: String,
    origin_id: Option<String>,
}

impl RawValueKpi {
    /// Create raw value
    ///
    /// # Errors
    /// - [`ModelError::ScoreOutOfRange`] if `score` is not in `[0, 100]`
    /// - [`ModelError::EmptyTypeId`] if `type_id` is empty
    pub fn new(
        type_id: impl Into<String>,
        score: i64,
        id: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let type_id = type_id.into();
        let id = id.into();

        if type_id.is_empty() {
            return Err(ModelError::EmptyTypeId { id });
        }
        let checked = u8::try_from(score)
            .ok()
            .filter(|s| (MIN_SCORE..=MAX_SCORE).contains(&i64::from(*s)));
        let Some(score) = checked else {
            return Err(ModelError::ScoreOutOfRange { type_id, score });
        };

        Ok(Self {
            type_id,
            score,
            id,
            origin_id: None,
        })
    }

    /// Attach origin identifier
    #[inline]
    #[must_use]
    pub fn with_origin(mut self, origin_id: impl Into<String>) -> Self {
        self.origin_id = Some(origin_id.into());
        self
    }

    /// KPI type this value feeds
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Score in `[0, 100]`
    #[inline]
    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    /// Identifier of this observation
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifier of the source record, if known
    #[inline]
    #[must_use]
    pub fn origin_id(&self) -> Option<&str> {
        self.origin_id.as_deref()
    }
}

/// Wire representation of [`RawValueKpi`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawValueRecord {
    pub(crate) type_id: String,
    pub(crate) score: i64,
    pub(crate) id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) origin_id: Option<String>,
}

impl TryFrom<RawValueRecord> for RawValueKpi {
    type Error = ModelError;

    fn try_from(record: RawValueRecord) -> Result<Self, Self::Error> {
        let value = Self::new(record.type_id, record.score, record.id)?;
        Ok(match record.origin_id {
            Some(origin) => value.with_origin(origin),
            None => value,
        })
    }
}

impl From<RawValueKpi> for RawValueRecord {
    fn from(value: RawValueKpi) -> Self {
        Self {
            type_id: value.type_id,
            score: i64::from(value.score),
            id: value.id,
            origin_id: value.origin_id,
        }
    }
}
