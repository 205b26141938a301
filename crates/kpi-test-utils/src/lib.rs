//! Testing utilities for the KPI hierarchy workspace
//!
//! Shared fixtures, hierarchy builders and proptest generators.

#![allow(missing_docs)]

use kpi_model::{KpiCalculationResult, KpiHierarchy, KpiNode, KpiStrategy, KpiType, RawValueKpi};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Leaf types used by generated hierarchies
pub const LEAF_TYPES: [&str; 5] = [
    "SECRETS",
    "CHECKED_IN_BINARIES",
    "CODE_VULNERABILITY_SCORE",
    "SAST_USAGE",
    "COMMENTS_IN_CODE",
];

/// Aggregating strategies used by generated hierarchies
pub const AGGREGATORS: [KpiStrategy; 7] = [
    KpiStrategy::WeightedAverage,
    KpiStrategy::Minimum,
    KpiStrategy::Maximum,
    KpiStrategy::WeightedRatio,
    KpiStrategy::And,
    KpiStrategy::Or,
    KpiStrategy::Xor,
];

pub fn raw_value(type_id: &str, score: i64) -> RawValueKpi {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    RawValueKpi::new(type_id, score, format!("raw-{id}")).unwrap()
}

pub fn raw_values(type_id: &str, scores: &[i64]) -> Vec<RawValueKpi> {
    scores.iter().map(|s| raw_value(type_id, *s)).collect()
}

pub fn success(score: i32) -> KpiCalculationResult {
    KpiCalculationResult::success(score)
}

/// Root of `strategy` with one raw leaf of `type_id` at weight 1.0
pub fn single_leaf_hierarchy(strategy: KpiStrategy, type_id: &str) -> KpiHierarchy {
    KpiHierarchy::new(KpiNode::new("ROOT", strategy).with_edge(KpiNode::raw(type_id), 1.0))
}

/// Root of `strategy` with one raw leaf per `(type_id, weight)`
pub fn flat_hierarchy(strategy: KpiStrategy, leaves: &[(&str, f64)]) -> KpiHierarchy {
    let root = leaves
        .iter()
        .fold(KpiNode::new("ROOT", strategy), |node, (type_id, weight)| {
            node.with_edge(KpiNode::raw(*type_id), *weight)
        });
    KpiHierarchy::new(root)
}

fn lag_component(kpi_type: KpiType, threshold: f64) -> KpiNode {
    KpiNode::of_type(kpi_type, KpiStrategy::RawValue).with_threshold("maxLag", threshold)
}

/// Realistic project health hierarchy
///
/// Security, transparency and compliance branches with a vulnerability
/// minimum, a technical lag subtree and a signed commits ratio.
pub fn project_health_hierarchy() -> KpiHierarchy {
    let vulnerability = KpiNode::of_type(KpiType::MaximalVulnerability, KpiStrategy::Minimum)
        .with_edge(KpiNode::of_type(KpiType::CodeVulnerabilityScore, KpiStrategy::RawValue), 0.5)
        .with_edge(
            KpiNode::of_type(KpiType::ContainerVulnerabilityScore, KpiStrategy::RawValue),
            0.5,
        );

    let lag_prod = KpiNode::of_type(KpiType::TechnicalLagProd, KpiStrategy::Minimum)
        .with_edge(lag_component(KpiType::TechnicalLagProdDirectComponent, 50.0), 0.5)
        .with_edge(lag_component(KpiType::TechnicalLagProdTransitiveComponent, 100.0), 0.5);
    let lag_dev = KpiNode::of_type(KpiType::TechnicalLagDev, KpiStrategy::Minimum)
        .with_edge(lag_component(KpiType::TechnicalLagDevDirectComponent, 100.0), 0.5)
        .with_edge(lag_component(KpiType::TechnicalLagDevTransitiveComponent, 200.0), 0.5);
    let lag = KpiNode::of_type(KpiType::TechnicalLag, KpiStrategy::WeightedAverage)
        .with_edge(lag_prod, 0.5)
        .with_edge(lag_dev, 0.5);

    let security = KpiNode::of_type(KpiType::Security, KpiStrategy::WeightedAverage)
        .with_edge(KpiNode::of_type(KpiType::Secrets, KpiStrategy::RawValue), 0.2)
        .with_edge(KpiNode::of_type(KpiType::CheckedInBinaries, KpiStrategy::RawValue), 0.2)
        .with_edge(vulnerability, 0.3)
        .with_edge(KpiNode::of_type(KpiType::SastUsage, KpiStrategy::RawValue), 0.1)
        .with_edge(lag, 0.2);

    let transparency = KpiNode::of_type(KpiType::ProcessTransparency, KpiStrategy::WeightedAverage)
        .with_edge(
            KpiNode::of_type(KpiType::DocumentationInfrastructure, KpiStrategy::RawValue),
            0.5,
        )
        .with_edge(KpiNode::of_type(KpiType::CommentsInCode, KpiStrategy::RawValue), 0.5);

    let signed_ratio = KpiNode::of_type(KpiType::SignedCommitsRatio, KpiStrategy::WeightedRatio)
        .with_edge(KpiNode::of_type(KpiType::NumberOfSignedCommits, KpiStrategy::RawValue), 1.0)
        .with_edge(KpiNode::of_type(KpiType::NumberOfCommits, KpiStrategy::RawValue), 1.0);
    let compliance = KpiNode::of_type(KpiType::ProcessCompliance, KpiStrategy::WeightedAverage)
        .with_edge(
            KpiNode::of_type(KpiType::IsDefaultBranchProtected, KpiStrategy::RawValue),
            0.5,
        )
        .with_edge(signed_ratio, 0.5);

    KpiHierarchy::new(
        KpiNode::of_type(KpiType::Root, KpiStrategy::WeightedAverage)
            .with_edge(security, 0.5)
            .with_edge(transparency, 0.25)
            .with_edge(compliance, 0.25),
    )
}

/// One value for every leaf of [`project_health_hierarchy`]
pub fn project_health_values() -> Vec<RawValueKpi> {
    [
        (KpiType::Secrets, 100),
        (KpiType::CheckedInBinaries, 100),
        (KpiType::CodeVulnerabilityScore, 60),
        (KpiType::ContainerVulnerabilityScore, 80),
        (KpiType::SastUsage, 0),
        (KpiType::TechnicalLagProdDirectComponent, 75),
        (KpiType::TechnicalLagProdTransitiveComponent, 50),
        (KpiType::TechnicalLagDevDirectComponent, 100),
        (KpiType::TechnicalLagDevTransitiveComponent, 100),
        (KpiType::DocumentationInfrastructure, 100),
        (KpiType::CommentsInCode, 40),
        (KpiType::IsDefaultBranchProtected, 100),
        (KpiType::NumberOfSignedCommits, 15),
        (KpiType::NumberOfCommits, 20),
    ]
    .into_iter()
    .map(|(kpi_type, score)| raw_value(kpi_type.as_str(), score))
    .collect()
}

pub fn arb_score() -> impl Strategy<Value = i64> {
    0i64..=100
}

/// Any result, including scores outside `[0, 100]`
pub fn arb_result() -> impl Strategy<Value = KpiCalculationResult> {
    prop_oneof![
        (-200i32..=300).prop_map(KpiCalculationResult::success),
        (-200i32..=300).prop_map(|s| KpiCalculationResult::incomplete(s, "partial")),
        Just(KpiCalculationResult::error("failed")),
        Just(KpiCalculationResult::empty()),
    ]
}

fn arb_node() -> impl Strategy<Value = KpiNode> {
    let leaf = prop::sample::select(LEAF_TYPES.to_vec()).prop_map(KpiNode::raw);
    leaf.prop_recursive(3, 32, 4, |inner| {
        (
            prop::sample::select(AGGREGATORS.to_vec()),
            prop::collection::vec((inner, 0.05f64..1.0), 1..4),
        )
            .prop_map(|(strategy, children)| {
                children
                    .into_iter()
                    .fold(KpiNode::new(strategy.as_str(), strategy), |node, (child, w)| {
                        node.with_edge(child, w)
                    })
            })
    })
}

/// Random definition under a weighted average root
pub fn arb_hierarchy() -> impl Strategy<Value = KpiHierarchy> {
    prop::collection::vec((arb_node(), 0.05f64..1.0), 1..4).prop_map(|children| {
        let root = children
            .into_iter()
            .fold(KpiNode::new("ROOT", KpiStrategy::WeightedAverage), |node, (child, w)| {
                node.with_edge(child, w)
            });
        KpiHierarchy::new(root)
    })
}

/// Random raw values for [`LEAF_TYPES`]
pub fn arb_raw_values() -> impl Strategy<Value = Vec<RawValueKpi>> {
    prop::collection::vec((prop::sample::select(LEAF_TYPES.to_vec()), arb_score()), 0..8).prop_map(
        |entries| {
            entries
                .into_iter()
                .map(|(type_id, score)| raw_value(type_id, score))
                .collect()
        },
    )
}
