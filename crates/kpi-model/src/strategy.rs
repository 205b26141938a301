//! Aggregation strategy identifiers

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Aggregation strategy of a hierarchy node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiStrategy {
    /// Leaf carrying an observed raw value
    RawValue,
    /// Sum of child scores multiplied by their edge weights
    WeightedAverage,
    /// Smallest child score
    Minimum,
    /// Largest child score
    Maximum,
    /// First child divided by second child, in percent
    WeightedRatio,
    /// 100 when every child is non-zero
    And,
    /// 100 when any child is non-zero
    Or,
    /// 100 when exactly one of two children is non-zero
    Xor,
}

impl KpiStrategy {
    /// All strategies
    pub const ALL: [KpiStrategy; 8] = [
        Self::RawValue,
        Self::WeightedAverage,
        Self::Minimum,
        Self::Maximum,
        Self::WeightedRatio,
        Self::And,
        Self::Or,
        Self::Xor,
    ];

    /// Wire name of this strategy
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RawValue => "RAW_VALUE",
            Self::WeightedAverage => "WEIGHTED_AVERAGE",
            Self::Minimum => "MINIMUM",
            Self::Maximum => "MAXIMUM",
            Self::WeightedRatio => "WEIGHTED_RATIO",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
        }
    }

    /// Number of edges the strategy requires, if it is fixed
    #[inline]
    #[must_use]
    pub fn required_edge_count(self) -> Option<usize> {
        match self {
            Self::RawValue => Some(0),
            Self::WeightedRatio | Self::Xor => Some(2),
            _ => None,
        }
    }
}

impl Display for KpiStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
