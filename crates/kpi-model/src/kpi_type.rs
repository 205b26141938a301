//! Catalogue of well-known KPI type identifiers
//!
//! Hierarchy nodes and raw values reference KPIs by plain string ids, so
//! user-defined ids keep working. [`KpiType`] names the ids the adapters
//! and the default hierarchy agree on.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Well-known KPI type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiType {
    /// Overall project score
    Root,
    /// Aggregated security score
    Security,
    /// Aggregated process transparency score
    ProcessTransparency,
    /// Aggregated process compliance score
    ProcessCompliance,
    /// Aggregated internal quality score
    InternalQuality,
    /// Aggregated external quality score
    ExternalQuality,

    /// Binaries committed to the repository
    CheckedInBinaries,
    /// Number of commits
    NumberOfCommits,
    /// Number of signed commits
    NumberOfSignedCommits,
    /// Ratio of signed to total commits
    SignedCommitsRatio,
    /// Whether the default branch is protected
    IsDefaultBranchProtected,
    /// Secret scanner findings
    Secrets,
    /// Static analysis tooling in use
    SastUsage,
    /// Comment density in source code
    CommentsInCode,
    /// Presence of documentation infrastructure
    DocumentationInfrastructure,

    /// Vulnerability score of a code dependency
    CodeVulnerabilityScore,
    /// Vulnerability score of a container image
    ContainerVulnerabilityScore,
    /// Worst vulnerability over all findings
    MaximalVulnerability,
    /// Aggregated supply chain security score
    SupplyChainSecurity,

    /// Aggregated technical lag score
    TechnicalLag,
    /// Technical lag of production dependencies
    TechnicalLagProd,
    /// Technical lag of development dependencies
    TechnicalLagDev,
    /// Lag of direct production dependencies
    TechnicalLagProdDirectComponent,
    /// Lag of transitive production dependencies
    TechnicalLagProdTransitiveComponent,
    /// Lag of direct development dependencies
    TechnicalLagDevDirectComponent,
    /// Lag of transitive development dependencies
    TechnicalLagDevTransitiveComponent,
}

impl KpiType {
    /// All known KPI types
    pub const ALL: [KpiType; 26] = [
        Self::Root,
        Self::Security,
        Self::ProcessTransparency,
        Self::ProcessCompliance,
        Self::InternalQuality,
        Self::ExternalQuality,
        Self::CheckedInBinaries,
        Self::NumberOfCommits,
        Self::NumberOfSignedCommits,
        Self::SignedCommitsRatio,
        Self::IsDefaultBranchProtected,
        Self::Secrets,
        Self::SastUsage,
        Self::CommentsInCode,
        Self::DocumentationInfrastructure,
        Self::CodeVulnerabilityScore,
        Self::ContainerVulnerabilityScore,
        Self::MaximalVulnerability,
        Self::SupplyChainSecurity,
        Self::TechnicalLag,
        Self::TechnicalLagProd,
        Self::TechnicalLagDev,
        Self::TechnicalLagProdDirectComponent,
        Self::TechnicalLagProdTransitiveComponent,
        Self::TechnicalLagDevDirectComponent,
        Self::TechnicalLagDevTransitiveComponent,
    ];

    /// Technical lag components, the raw values that need threshold remapping
    pub const TECHNICAL_LAG_COMPONENTS: [KpiType; 4] = [
        Self::TechnicalLagProdDirectComponent,
        Self::TechnicalLagProdTransitiveComponent,
        Self::TechnicalLagDevDirectComponent,
        Self::TechnicalLagDevTransitiveComponent,
    ];

    /// Wire identifier of this type
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "ROOT",
            Self::Security => "SECURITY",
            Self::ProcessTransparency => "PROCESS_TRANSPARENCY",
            Self::ProcessCompliance => "PROCESS_COMPLIANCE",
            Self::InternalQuality => "INTERNAL_QUALITY",
            Self::ExternalQuality => "EXTERNAL_QUALITY",
            Self::CheckedInBinaries => "CHECKED_IN_BINARIES",
            Self::NumberOfCommits => "NUMBER_OF_COMMITS",
            Self::NumberOfSignedCommits => "NUMBER_OF_SIGNED_COMMITS",
            Self::SignedCommitsRatio => "SIGNED_COMMITS_RATIO",
            Self::IsDefaultBranchProtected => "IS_DEFAULT_BRANCH_PROTECTED",
            Self::Secrets => "SECRETS",
            Self::SastUsage => "SAST_USAGE",
            Self::CommentsInCode => "COMMENTS_IN_CODE",
            Self::DocumentationInfrastructure => "DOCUMENTATION_INFRASTRUCTURE",
            Self::CodeVulnerabilityScore => "CODE_VULNERABILITY_SCORE",
            Self::ContainerVulnerabilityScore => "CONTAINER_VULNERABILITY_SCORE",
            Self::MaximalVulnerability => "MAXIMAL_VULNERABILITY",
            Self::SupplyChainSecurity => "SUPPLY_CHAIN_SECURITY",
            Self::TechnicalLag => "TECHNICAL_LAG",
            Self::TechnicalLagProd => "TECHNICAL_LAG_PROD",
            Self::TechnicalLagDev => "TECHNICAL_LAG_DEV",
            Self::TechnicalLagProdDirectComponent => "TECHNICAL_LAG_PROD_DIRECT_COMPONENT",
            Self::TechnicalLagProdTransitiveComponent => "TECHNICAL_LAG_PROD_TRANSITIVE_COMPONENT",
            Self::TechnicalLagDevDirectComponent => "TECHNICAL_LAG_DEV_DIRECT_COMPONENT",
            Self::TechnicalLagDevTransitiveComponent => "TECHNICAL_LAG_DEV_TRANSITIVE_COMPONENT",
        }
    }

    /// Check if this type is a technical lag component
    #[inline]
    #[must_use]
    pub fn is_technical_lag_component(self) -> bool {
        Self::TECHNICAL_LAG_COMPONENTS.contains(&self)
    }
}

impl Display for KpiType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KpiType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownKpiType(s.to_string()))
    }
}

impl From<KpiType> for String {
    fn from(value: KpiType) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_roundtrips_every_type() {
        for t in KpiType::ALL {
            assert_eq!(KpiType::from_str(t.as_str()).unwrap(), t);
        }
    }

    #[test]
    fn serde_name_matches_as_str() {
        for t in KpiType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = KpiType::from_str("NOT_A_KPI").unwrap_err();
        assert!(matches!(err, ModelError::UnknownKpiType(name) if name == "NOT_A_KPI"));
    }

    #[test]
    fn technical_lag_components() {
        assert!(KpiType::TechnicalLagDevDirectComponent.is_technical_lag_component());
        assert!(!KpiType::TechnicalLagDev.is_technical_lag_component());
        assert!(!KpiType::Secrets.is_technical_lag_component());

        let names: Vec<_> = KpiType::ALL
            .into_iter()
            .filter(|t| t.is_technical_lag_component())
            .map(KpiType::as_str)
            .collect();
        assert_eq!(names.len(), 4);
        assert!(names.iter().all(|n| n.ends_with("_COMPONENT")));
    }
}
