//! JSON raw value adapter
//!
//! Reads raw values already scored by an upstream tool:
//!
//! ```json
//! [
//!   { "typeId": "SECRETS", "score": 100, "id": "gitleaks-1" },
//!   { "typeId": "CODE_VULNERABILITY_SCORE", "score": 82, "originId": "CVE-2024-0001" }
//! ]
//! ```
//!
//! Malformed JSON is a hard error. A well-formed entry with a bad score or
//! an empty type id only becomes a diagnostic.

use kpi_model::{AdapterOutcome, KpiAdapter, RawValueKpi};
use serde::{Deserialize, Serialize};

/// One entry of a raw value file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawValueEntry {
    /// KPI type the value feeds
    pub type_id: String,

    /// Score, expected in `[0, 100]`
    pub score: i64,

    /// Observation id, derived from position when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Source record id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,
}

/// Parse a raw value file
///
/// # Errors
/// Fails if `json` is not an array of raw value entries.
pub fn parse_raw_values(json: &str) -> Result<Vec<RawValueEntry>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Adapter over parsed [`RawValueEntry`] lists
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRawValueAdapter;

impl JsonRawValueAdapter {
    /// Create new adapter
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl KpiAdapter for JsonRawValueAdapter {
    type Input = [RawValueEntry];

    fn name(&self) -> &'static str {
        "json"
    }

    fn adapt(&self, input: &Self::Input) -> Vec<AdapterOutcome> {
        input
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                let id = entry
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("{}-{position}", entry.type_id));

                let value = RawValueKpi::new(entry.type_id.as_str(), entry.score, id.as_str())
                    .map(|v| match &entry.origin_id {
                        Some(origin) => v.with_origin(origin.as_str()),
                        None => v,
                    });

                match AdapterOutcome::from(value) {
                    AdapterOutcome::Invalid(failure) if failure.id.is_none() => {
                        AdapterOutcome::Invalid(failure.with_id(id))
                    }
                    outcome => outcome,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpi_model::partition_outcomes;

    #[test]
    fn parses_camel_case_entries() {
        let entries = parse_raw_values(
            r#"[{"typeId":"SECRETS","score":100,"id":"s-1","originId":"gitleaks"}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].type_id, "SECRETS");
        assert_eq!(entries[0].origin_id.as_deref(), Some("gitleaks"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_raw_values(r#"{"typeId":"SECRETS"}"#).is_err());
        assert!(parse_raw_values("[{").is_err());
    }

    #[test]
    fn out_of_range_scores_become_diagnostics() {
        let entries = parse_raw_values(
            r#"[
                {"typeId":"SECRETS","score":100},
                {"typeId":"SAST_USAGE","score":140},
                {"typeId":"","score":10,"id":"blank"}
            ]"#,
        )
        .unwrap();

        let (values, failures) = partition_outcomes(JsonRawValueAdapter::new().adapt(&entries));
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].id(), "SECRETS-0");

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].type_id.as_deref(), Some("SAST_USAGE"));
        assert_eq!(failures[0].id.as_deref(), Some("SAST_USAGE-1"));
        assert_eq!(failures[1].id.as_deref(), Some("blank"));
    }

    #[test]
    fn origin_is_carried_over() {
        let entries = vec![RawValueEntry {
            type_id: "CODE_VULNERABILITY_SCORE".to_string(),
            score: 82,
            id: Some("v".to_string()),
            origin_id: Some("CVE-2024-0001".to_string()),
        }];
        let outcomes = JsonRawValueAdapter::new().adapt(&entries);
        let AdapterOutcome::Value(value) = &outcomes[0] else {
            panic!("expected a value");
        };
        assert_eq!(value.origin_id(), Some("CVE-2024-0001"));
        assert_eq!(value.score(), 82);
    }
}
