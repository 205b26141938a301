use kpi_model::{KpiCalculationResult, ModelError, RawValueKpi};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_raw_value_accepts_exactly_valid_range(score in -1000i64..1000) {
        let result = RawValueKpi::new("CODE_VULNERABILITY_SCORE", score, "v");
        if (0..=100).contains(&score) {
            let value = result.unwrap();
            prop_assert_eq!(i64::from(value.score()), score);
        } else {
            let is_range_error = matches!(result, Err(ModelError::ScoreOutOfRange { .. }));
            prop_assert!(is_range_error);
        }
    }

    #[test]
    fn prop_clamped_scores_stay_in_range(score in any::<i32>()) {
        let clamped = KpiCalculationResult::success(score).into_valid_range();
        let s = clamped.score().unwrap();
        prop_assert!((0..=100).contains(&s));
        if score < 0 {
            prop_assert_eq!(s, 0);
        } else if score > 100 {
            prop_assert_eq!(s, 100);
        } else {
            prop_assert_eq!(s, score);
        }
    }

    #[test]
    fn prop_raw_value_json_roundtrip(score in 0i64..=100, id in "[a-z0-9-]{1,12}") {
        let value = RawValueKpi::new("SECRETS", score, id).unwrap().with_origin("origin");
        let json = serde_json::to_string(&value).unwrap();
        let back: RawValueKpi = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, value);
    }
}

#[test]
fn out_of_range_json_is_rejected_with_range_message() {
    let err = serde_json::from_str::<RawValueKpi>(r#"{"typeId":"SECRETS","score":-3,"id":"x"}"#)
        .unwrap_err();
    assert!(err.to_string().contains("outside of the valid range"));
}
