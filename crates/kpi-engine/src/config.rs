//! Calculation configuration
//!
//! [`CalculationConfig`] controls strictness, pre-flight validation, weight
//! redistribution and which KPI types the technical lag transformer
//! rewrites. Loadable from TOML; every field has a default.

use kpi_model::KpiType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A technical lag type id is empty
    #[error("technical lag type ids must not be empty")]
    EmptyTypeId,
}

fn default_technical_lag_types() -> Vec<String> {
    KpiType::TECHNICAL_LAG_COMPONENTS
        .iter()
        .map(|t| t.as_str().to_string())
        .collect()
}

/// Calculation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculationConfig {
    /// Enforce structural edge counts during validation and evaluation
    pub strict: bool,

    /// Validate the bound hierarchy before evaluating it
    pub validate: bool,

    /// Spread the weight of excluded children over contributing ones
    pub weight_redistribution: bool,

    /// Type ids the technical lag transformer applies to
    pub technical_lag_types: Vec<String>,
}

impl CalculationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With strictness
    #[inline]
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// With pre-flight validation
    #[inline]
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// With weight redistribution
    #[inline]
    #[must_use]
    pub fn with_weight_redistribution(mut self, enabled: bool) -> Self {
        self.weight_redistribution = enabled;
        self
    }

    /// With technical lag type ids
    #[must_use]
    pub fn with_technical_lag_types(mut self, types: impl IntoIterator<Item = String>) -> Self {
        self.technical_lag_types = types.into_iter().collect();
        self
    }

    /// Parse configuration from TOML
    ///
    /// # Errors
    /// - [`ConfigError::Parse`] on invalid TOML or unknown keys
    /// - [`ConfigError::EmptyTypeId`] if a technical lag type id is empty
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`CalculationConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.technical_lag_types.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyTypeId);
        }
        Ok(())
    }
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            strict: true,
            validate: true,
            weight_redistribution: false,
            technical_lag_types: default_technical_lag_types(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = CalculationConfig::new();
        assert!(config.strict);
        assert!(config.validate);
        assert!(!config.weight_redistribution);
        assert_eq!(config.technical_lag_types.len(), 4);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            CalculationConfig::from_toml_str("").unwrap(),
            CalculationConfig::default()
        );
    }

    #[test]
    fn partial_toml_overrides() {
        let config = CalculationConfig::from_toml_str(
            "strict = false\nweight_redistribution = true\ntechnical_lag_types = [\"LIBYEARS\"]\n",
        )
        .unwrap();
        assert!(!config.strict);
        assert!(config.validate);
        assert!(config.weight_redistribution);
        assert_eq!(config.technical_lag_types, vec!["LIBYEARS".to_string()]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            CalculationConfig::from_toml_str("strictness = true"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn empty_type_id_is_rejected() {
        assert!(matches!(
            CalculationConfig::from_toml_str("technical_lag_types = [\"\"]"),
            Err(ConfigError::EmptyTypeId)
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "validate = false").unwrap();
        let config = CalculationConfig::from_toml_file(file.path()).unwrap();
        assert!(!config.validate);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CalculationConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn builder() {
        let config = CalculationConfig::new()
            .with_strict(false)
            .with_validation(false)
            .with_weight_redistribution(true)
            .with_technical_lag_types(vec!["X".to_string()]);
        assert!(!config.strict);
        assert!(!config.validate);
        assert!(config.weight_redistribution);
        assert_eq!(config.technical_lag_types, vec!["X".to_string()]);
    }
}
