//! Solver configuration

use crate::error::{Error, Result};

/// Largest meaningful number of significant digits for an f64
pub const MAX_PRECISION: u32 = 17;

/// Options for solving a math block
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SolverOptions {
    /// Significant digits plain numeric results are rounded to (None = unrounded)
    pub precision: Option<u32>,
    /// Shield `"..."` and `{...}` segments from free-text stripping
    pub passthrough: bool,
    /// Symbols the free-text stripper keeps. Currency arithmetic itself is
    /// not implemented; these only survive into the expression.
    pub currencies: Vec<String>,
}

impl SolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_passthrough(mut self, enabled: bool) -> Self {
        self.passthrough = enabled;
        self
    }

    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currencies.push(symbol.into());
        self
    }

    /// Check the options for values the solver cannot honour
    pub fn validate(&self) -> Result<()> {
        if let Some(precision) = self.precision {
            if precision == 0 || precision > MAX_PRECISION {
                return Err(Error::InvalidPrecision(precision));
            }
        }
        for symbol in &self.currencies {
            if symbol.trim().is_empty() || symbol.chars().any(char::is_whitespace) {
                return Err(Error::InvalidCurrency(symbol.clone()));
            }
        }
        Ok(())
    }

    /// Parse options from JSON and validate them
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: SolverOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Read options from a JSON file and validate them
    #[cfg(feature = "serde")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        let options = SolverOptions::default();
        assert_eq!(options.precision, None);
        assert!(!options.passthrough);
        assert!(options.currencies.is_empty());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = SolverOptions::new()
            .with_precision(10)
            .with_passthrough(true)
            .with_currency("USD");
        assert_eq!(options.precision, Some(10));
        assert!(options.passthrough);
        assert_eq!(options.currencies, vec!["USD".to_string()]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            SolverOptions::new().with_precision(0).validate(),
            Err(Error::InvalidPrecision(0))
        ));
        assert!(matches!(
            SolverOptions::new().with_precision(18).validate(),
            Err(Error::InvalidPrecision(18))
        ));
        assert!(matches!(
            SolverOptions::new().with_currency("U S D").validate(),
            Err(Error::InvalidCurrency(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let options = SolverOptions::from_json_str(r#"{"precision": 12, "currencies": ["EUR"]}"#)
            .unwrap();
        assert_eq!(options.precision, Some(12));
        assert!(!options.passthrough);
        assert_eq!(options.currencies, vec!["EUR".to_string()]);

        assert!(matches!(
            SolverOptions::from_json_str(r#"{"precision": 0}"#),
            Err(Error::InvalidPrecision(0))
        ));
        assert!(matches!(
            SolverOptions::from_json_str(r#"{"unknown": true}"#),
            Err(Error::Config(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.json");
        std::fs::write(&path, r#"{"passthrough": true}"#).unwrap();
        let options = SolverOptions::from_path(&path).unwrap();
        assert!(options.passthrough);

        assert!(matches!(
            SolverOptions::from_path(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }
}
