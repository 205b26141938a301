use kpi_engine::{CalculationConfig, KpiCalculator, ViolationKind};
use kpi_model::{
    KpiCalculationResult, KpiHierarchy, KpiNode, KpiStrategy, ResultHierarchy, ResultNode,
};
use kpi_test_utils::{
    flat_hierarchy, project_health_hierarchy, project_health_values, raw_value, raw_values,
    single_leaf_hierarchy, success,
};
use pretty_assertions::assert_eq;

fn calculate(definition: &KpiHierarchy, values: &[kpi_model::RawValueKpi]) -> ResultHierarchy {
    KpiCalculator::default().calculate(definition, values).result
}

fn relaxed() -> KpiCalculator {
    KpiCalculator::new(CalculationConfig::new().with_strict(false))
}

fn all_nodes(node: &ResultNode) -> Vec<&ResultNode> {
    let mut nodes = vec![node];
    for edge in &node.edges {
        nodes.extend(all_nodes(&edge.target));
    }
    nodes
}

#[test]
fn test_split_values_are_averaged() {
    let definition =
        single_leaf_hierarchy(KpiStrategy::WeightedAverage, "CODE_VULNERABILITY_SCORE");
    let values = raw_values("CODE_VULNERABILITY_SCORE", &[80, 90]);

    let result = calculate(&definition, &values);
    assert_eq!(result.result(), &success(85));
    assert_eq!(result.root.edges.len(), 2);
    assert!(result.root.edges.iter().all(|e| e.planned_weight == 0.5));
}

#[test]
fn test_maximum_and_minimum() {
    let values = raw_values("CODE_VULNERABILITY_SCORE", &[82, 90, 65]);

    let max = single_leaf_hierarchy(KpiStrategy::Maximum, "CODE_VULNERABILITY_SCORE");
    assert_eq!(calculate(&max, &values).result(), &success(90));

    let min = single_leaf_hierarchy(KpiStrategy::Minimum, "CODE_VULNERABILITY_SCORE");
    assert_eq!(calculate(&min, &values).result(), &success(65));
}

#[test]
fn test_missing_child_yields_incomplete_with_zero_weight() {
    let definition = flat_hierarchy(
        KpiStrategy::WeightedAverage,
        &[("SECRETS", 0.5), ("CHECKED_IN_BINARIES", 0.5)],
    );
    let values = vec![raw_value("SECRETS", 80)];

    let result = calculate(&definition, &values);
    assert!(result.result().is_incomplete());
    assert_eq!(result.result().score(), Some(40));
    assert!(result
        .result()
        .reason()
        .is_some_and(|r| r.contains("CHECKED_IN_BINARIES (Empty)")));

    let missing = &result.root.edges[1];
    assert_eq!(missing.target.type_id, "CHECKED_IN_BINARIES");
    assert!(missing.target.result.is_empty());
    assert_eq!(missing.planned_weight, 0.5);
    assert_eq!(missing.actual_weight, 0.0);
    assert_eq!(result.root.edges[0].actual_weight, 0.5);
}

#[test]
fn test_redistribution_keeps_full_scale() {
    let definition = flat_hierarchy(
        KpiStrategy::WeightedAverage,
        &[("SECRETS", 0.5), ("CHECKED_IN_BINARIES", 0.5)],
    );
    let values = vec![raw_value("SECRETS", 80)];
    let calculator =
        KpiCalculator::new(CalculationConfig::new().with_weight_redistribution(true));

    let result = calculator.calculate(&definition, &values).result;
    assert_eq!(result.result().score(), Some(80));
    assert!(result.result().is_incomplete());
    assert_eq!(result.root.edges[0].actual_weight, 1.0);
    assert_eq!(result.root.edges[1].actual_weight, 0.0);
}

#[test]
fn test_ratio() {
    let definition = flat_hierarchy(
        KpiStrategy::WeightedRatio,
        &[("NUMBER_OF_SIGNED_COMMITS", 1.0), ("NUMBER_OF_COMMITS", 1.0)],
    );
    let values = vec![
        raw_value("NUMBER_OF_SIGNED_COMMITS", 15),
        raw_value("NUMBER_OF_COMMITS", 20),
    ];
    assert_eq!(calculate(&definition, &values).result(), &success(75));

    let only_numerator = vec![raw_value("NUMBER_OF_SIGNED_COMMITS", 15)];
    assert!(calculate(&definition, &only_numerator).result().is_error());
}

#[test]
fn test_xor() {
    let definition = flat_hierarchy(KpiStrategy::Xor, &[("A", 1.0), ("B", 1.0)]);
    for (a, b, expected) in [(100, 20, 100), (100, 100, 0), (0, 0, 0)] {
        let values = vec![raw_value("A", a), raw_value("B", b)];
        assert_eq!(
            calculate(&definition, &values).result(),
            &success(expected),
            "xor({a}, {b})"
        );
    }

    let three = flat_hierarchy(KpiStrategy::Xor, &[("A", 1.0), ("B", 1.0), ("C", 1.0)]);
    let values = vec![raw_value("A", 100), raw_value("B", 0), raw_value("C", 0)];
    assert!(calculate(&three, &values).result().is_error());
    assert!(relaxed().calculate(&three, &values).result.result().is_error());
}

#[test]
fn test_technical_lag_is_remapped() {
    let definition = KpiHierarchy::new(
        KpiNode::new("TECHNICAL_LAG_PROD", KpiStrategy::Minimum).with_edge(
            KpiNode::raw("TECHNICAL_LAG_PROD_DIRECT_COMPONENT").with_threshold("maxLag", 50.0),
            1.0,
        ),
    );
    for (score, expected) in [(30, 100), (50, 100), (75, 50), (100, 0)] {
        let values = vec![raw_value("TECHNICAL_LAG_PROD_DIRECT_COMPONENT", score)];
        assert_eq!(calculate(&definition, &values).result(), &success(expected));
    }

    let no_thresholds =
        single_leaf_hierarchy(KpiStrategy::Minimum, "TECHNICAL_LAG_DEV_DIRECT_COMPONENT");
    let values = vec![raw_value("TECHNICAL_LAG_DEV_DIRECT_COMPONENT", 10)];
    let result = calculate(&no_thresholds, &values);
    assert!(result.root.edges[0]
        .target
        .result
        .reason()
        .is_some_and(|r| r.contains("Thresholds for node")));
    assert!(result.result().is_empty());
}

#[test]
fn test_no_values_propagate_empty() {
    let result = calculate(&project_health_hierarchy(), &[]);
    for node in all_nodes(&result.root) {
        assert!(node.result.is_empty(), "{} is {}", node.type_id, node.result);
    }
}

#[test]
fn test_project_health_end_to_end() {
    let outcome =
        KpiCalculator::default().calculate(&project_health_hierarchy(), &project_health_values());
    assert!(outcome.validation.as_ref().is_some_and(|r| r.is_valid()));

    let result = outcome.result;
    let score_of = |type_id: &str| result.find_by_type(type_id)[0].result.clone();
    assert_eq!(score_of("MAXIMAL_VULNERABILITY"), success(60));
    assert_eq!(score_of("TECHNICAL_LAG_PROD"), success(50));
    assert_eq!(score_of("TECHNICAL_LAG"), success(75));
    assert_eq!(score_of("SECURITY"), success(73));
    assert_eq!(score_of("SIGNED_COMMITS_RATIO"), success(75));
    assert_eq!(score_of("PROCESS_COMPLIANCE"), success(87));
    assert_eq!(result.result(), &success(75));
}

#[test]
fn test_rerun_is_equal_up_to_ids() {
    let definition = project_health_hierarchy();
    let values = project_health_values();
    let calculator = KpiCalculator::default();

    let first = calculator.calculate(&definition, &values).result;
    let second = calculator.calculate(&definition, &values).result;
    assert!(first.eq_ignoring_ids(&second));
}

#[test]
fn test_result_json_roundtrip() {
    let result = calculate(&project_health_hierarchy(), &project_health_values());
    let json = result.to_json().unwrap();
    assert!(json.contains("\"schemaVersion\""));
    assert!(json.contains("\"actualWeight\""));
    assert_eq!(ResultHierarchy::from_json(&json).unwrap(), result);
}

#[test]
fn test_validation_modes() {
    let empty = KpiHierarchy::new(KpiNode::new("ROOT", KpiStrategy::WeightedAverage));
    let strict = KpiCalculator::default().calculate(&empty, &[]);
    assert!(!strict.validation.unwrap().is_valid());
    assert_eq!(strict.result.result(), &KpiCalculationResult::empty());
    assert!(relaxed().calculate(&empty, &[]).validation.unwrap().is_valid());

    let leaf_with_children = KpiHierarchy::new(
        KpiNode::new("ROOT", KpiStrategy::Maximum).with_edge(
            KpiNode::raw("SECRETS").with_edge(KpiNode::raw("SAST_USAGE"), 1.0),
            1.0,
        ),
    );
    for calculator in [KpiCalculator::default(), relaxed()] {
        let report = calculator.calculate(&leaf_with_children, &[]).validation.unwrap();
        assert_eq!(
            report.violations[0].kind,
            ViolationKind::RawValueWithEdges { found: 1 }
        );
    }
}

#[test]
fn test_empty_inner_aggregation_is_strict_violation() {
    let definition = KpiHierarchy::new(
        KpiNode::new("ROOT", KpiStrategy::WeightedAverage)
            .with_edge(KpiNode::raw("SECRETS"), 0.5)
            .with_edge(KpiNode::new("SECURITY", KpiStrategy::Minimum), 0.5),
    );
    let values = vec![raw_value("SECRETS", 80)];

    let strict = KpiCalculator::default().calculate(&definition, &values);
    let report = strict.validation.unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::EmptyAggregation);
    assert!(strict.result.result().is_incomplete());
    assert_eq!(strict.result.result().score(), Some(40));

    let lenient = relaxed().calculate(&definition, &values);
    assert!(lenient.validation.unwrap().is_valid());
}
