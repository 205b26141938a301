//! Per-node calculation results

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::raw_value::{MAX_SCORE, MIN_SCORE};

/// Reason attached to [`KpiCalculationResult::Empty`] when none is given
pub(crate) const DEFAULT_EMPTY_REASON: &str = "No value available for this node";

/// Typed outcome of a hierarchy node
///
/// Scores are `i32` so that strategies can produce an out-of-range value
/// which is then brought back into `[0, 100]` by [`Self::into_valid_range`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum KpiCalculationResult {
    /// Node fully resolved
    Success {
        /// Score in `[0, 100]`
        score: i32,
    },

    /// Node resolved from a subset of its children
    Incomplete {
        /// Score computed from the contributing children
        score: i32,
        /// Why some children did not contribute
        reason: String,
    },

    /// Node could not be resolved
    Error {
        /// What went wrong
        reason: String,
    },

    /// No child contributed anything
    Empty {
        /// Why the node is empty
        reason: String,
    },
}

impl KpiCalculationResult {
    /// Create success result
    #[inline]
    #[must_use]
    pub fn success(score: i32) -> Self {
        Self::Success { score }
    }

    /// Create incomplete result
    #[inline]
    #[must_use]
    pub fn incomplete(score: i32, reason: impl Into<String>) -> Self {
        Self::Incomplete {
            score,
            reason: reason.into(),
        }
    }

    /// Create error result
    #[inline]
    #[must_use]
    pub fn error(reason: impl Into<String>) -> Self {
        Self::Error {
            reason: reason.into(),
        }
    }

    /// Create empty result with the default reason
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::empty_with(DEFAULT_EMPTY_REASON)
    }

    /// Create empty result with a reason
    #[inline]
    #[must_use]
    pub fn empty_with(reason: impl Into<String>) -> Self {
        Self::Empty {
            reason: reason.into(),
        }
    }

    /// Score, if the node resolved
    #[inline]
    #[must_use]
    pub fn score(&self) -> Option<i32> {
        match self {
            Self::Success { score } | Self::Incomplete { score, .. } => Some(*score),
            Self::Error { .. } | Self::Empty { .. } => None,
        }
    }

    /// Reason, if any
    #[inline]
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Incomplete { reason, .. } | Self::Error { reason } | Self::Empty { reason } => {
                Some(reason)
            }
        }
    }

    /// Check if the result carries a score
    #[inline]
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.score().is_some()
    }

    /// Check for [`Self::Success`]
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Check for [`Self::Incomplete`]
    #[inline]
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete { .. })
    }

    /// Check for [`Self::Error`]
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Check for [`Self::Empty`]
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Clamp the score into `[0, 100]`
    ///
    /// Error and empty results pass through unchanged.
    #[must_use]
    pub fn into_valid_range(self) -> Self {
        match self {
            Self::Success { score } => Self::Success {
                score: clamp_score(score),
            },
            Self::Incomplete { score, reason } => Self::Incomplete {
                score: clamp_score(score),
                reason,
            },
            other => other,
        }
    }

    /// Short kind name, as serialized
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "Success",
            Self::Incomplete { .. } => "Incomplete",
            Self::Error { .. } => "Error",
            Self::Empty { .. } => "Empty",
        }
    }
}

impl Default for KpiCalculationResult {
    fn default() -> Self {
        Self::empty()
    }
}

impl Display for KpiCalculationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { score } => write!(f, "Success({score})"),
            Self::Incomplete { score, reason } => write!(f, "Incomplete({score}): {reason}"),
            Self::Error { reason } => write!(f, "Error: {reason}"),
            Self::Empty { reason } => write!(f, "Empty: {reason}"),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn clamp_score(score: i32) -> i32 {
    // Bounds are 0 and 100, both fit into i32
    score.clamp(MIN_SCORE as i32, MAX_SCORE as i32)
}
