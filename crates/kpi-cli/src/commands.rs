//! Subcommand implementations

use crate::adapter::{parse_raw_values, JsonRawValueAdapter};
use anyhow::Context;
use kpi_engine::{
    CalculationConfig, CalculationOutcome, HierarchyValidator, KpiCalculator, StrategyRegistry,
    ValidationReport,
};
use kpi_model::{
    partition_outcomes, KpiAdapter, KpiHierarchy, KpiType, RawValueKpi, ValidationFailure,
};
use std::path::{Path, PathBuf};

/// Inputs of `kpi-calc calculate`
#[derive(Debug, Clone, Default)]
pub struct CalculateOptions {
    /// Hierarchy definition (JSON)
    pub hierarchy: PathBuf,

    /// Raw values (JSON array), none means an empty value set
    pub values: Option<PathBuf>,

    /// Calculation config (TOML)
    pub config: Option<PathBuf>,

    /// Force relaxed mode
    pub relaxed: bool,

    /// Force weight redistribution on
    pub redistribute: bool,

    /// Skip pre-flight validation
    pub skip_validation: bool,
}

/// Raw values accepted by the adapter plus rejected observations
#[derive(Debug, Clone, Default)]
pub struct LoadedValues {
    /// Values handed to the engine
    pub values: Vec<RawValueKpi>,

    /// Observations that could not be scored
    pub rejected: Vec<ValidationFailure>,
}

/// Load a hierarchy definition from a JSON file
///
/// # Errors
/// Fails if the file cannot be read or is not a hierarchy definition.
pub fn load_hierarchy(path: &Path) -> anyhow::Result<KpiHierarchy> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read hierarchy {}", path.display()))?;
    KpiHierarchy::from_json(&json)
        .with_context(|| format!("invalid hierarchy definition in {}", path.display()))
}

/// Load raw values from a JSON file through [`JsonRawValueAdapter`]
///
/// # Errors
/// Fails if the file cannot be read or is not valid JSON. Individual bad
/// entries are returned in [`LoadedValues::rejected`].
pub fn load_raw_values(path: &Path) -> anyhow::Result<LoadedValues> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read raw values {}", path.display()))?;
    let entries = parse_raw_values(&json)
        .with_context(|| format!("invalid raw value file {}", path.display()))?;

    let adapter = JsonRawValueAdapter::new();
    let (values, rejected) = partition_outcomes(adapter.adapt(&entries));
    for failure in &rejected {
        tracing::warn!(adapter = adapter.name(), %failure, "skipping raw value");
    }
    tracing::debug!(
        accepted = values.len(),
        rejected = rejected.len(),
        "loaded raw values"
    );

    Ok(LoadedValues { values, rejected })
}

/// Resolve the effective configuration
///
/// # Errors
/// Fails if the config file cannot be loaded.
pub fn load_config(options: &CalculateOptions) -> anyhow::Result<CalculationConfig> {
    let mut config = match &options.config {
        Some(path) => CalculationConfig::from_toml_file(path)?,
        None => CalculationConfig::default(),
    };
    if options.relaxed {
        config.strict = false;
    }
    if options.redistribute {
        config.weight_redistribution = true;
    }
    if options.skip_validation {
        config.validate = false;
    }
    Ok(config)
}

/// Run a full calculation
///
/// # Errors
/// Fails only on unreadable or malformed input files.
pub fn calculate(
    options: &CalculateOptions,
) -> anyhow::Result<(CalculationOutcome, LoadedValues)> {
    let config = load_config(options)?;
    let definition = load_hierarchy(&options.hierarchy)?;
    let loaded = match &options.values {
        Some(path) => load_raw_values(path)?,
        None => LoadedValues::default(),
    };

    tracing::info!(
        hierarchy = %options.hierarchy.display(),
        values = loaded.values.len(),
        strict = config.strict,
        "calculating"
    );
    let outcome = KpiCalculator::new(config).calculate(&definition, &loaded.values);
    if let Some(report) = outcome.validation.as_ref().filter(|r| !r.is_valid()) {
        tracing::warn!("{report}");
    }

    Ok((outcome, loaded))
}

/// Validate a hierarchy definition file
///
/// # Errors
/// Fails if the file cannot be read or parsed.
pub fn validate(path: &Path, strict: bool) -> anyhow::Result<ValidationReport> {
    let definition = load_hierarchy(path)?;
    let registry = StrategyRegistry::with_defaults();
    Ok(HierarchyValidator::new(&registry).validate_definition(&definition, strict))
}

/// Known KPI types, one per line
#[must_use]
pub fn list_types() -> String {
    KpiType::ALL
        .iter()
        .map(|t| {
            if t.is_technical_lag_component() {
                format!("{t} (technical lag)")
            } else {
                t.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
