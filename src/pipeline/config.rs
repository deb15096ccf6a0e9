//! Cleaning configuration.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::schema::{self, Schema};
use crate::error::{Error, Result};

fn default_cap_percentile() -> f64 {
    0.99
}

/// Which fields each cleaning step touches.
///
/// Deserializes from JSON; absent keys take their defaults:
///
/// ```json
/// {
///   "required_fields": ["Arrival Delay in Minutes"],
///   "cap_percentile": 0.99,
///   "fields_to_cap": ["Departure Delay in Minutes", "Arrival Delay in Minutes"],
///   "categorical_fields": ["satisfaction", "Gender"],
///   "integer_fields": ["Arrival Delay in Minutes"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Rows with a null in any of these are dropped.
    pub required_fields: BTreeSet<String>,
    /// Upper capping percentile in (0, 1].
    #[serde(default = "default_cap_percentile")]
    pub cap_percentile: f64,
    pub fields_to_cap: BTreeSet<String>,
    /// Coerced to `Value::Category`.
    pub categorical_fields: BTreeSet<String>,
    /// Coerced to `Value::Integer` by truncation toward zero.
    pub integer_fields: BTreeSet<String>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            required_fields: BTreeSet::new(),
            cap_percentile: default_cap_percentile(),
            fields_to_cap: BTreeSet::new(),
            categorical_fields: BTreeSet::new(),
            integer_fields: BTreeSet::new(),
        }
    }
}

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl CleanConfig {
    /// The cleaning the airline survey exploration applies.
    pub fn airline() -> Self {
        Self {
            required_fields: names(&[schema::ARRIVAL_DELAY]),
            cap_percentile: default_cap_percentile(),
            fields_to_cap: names(&[schema::DEPARTURE_DELAY, schema::ARRIVAL_DELAY]),
            categorical_fields: names(&schema::CATEGORICAL_FIELDS),
            integer_fields: names(&[schema::ARRIVAL_DELAY]),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Check the configuration against a schema before any row is touched.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        if !(self.cap_percentile > 0.0 && self.cap_percentile <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "cap_percentile {} must be in (0, 1]",
                self.cap_percentile
            )));
        }
        for name in self.required_fields.iter().chain(&self.categorical_fields) {
            schema.position(name)?;
        }
        for name in self.fields_to_cap.iter().chain(&self.integer_fields) {
            schema.numeric_position(name)?;
        }
        if let Some(name) = self.integer_fields.intersection(&self.categorical_fields).next() {
            return Err(Error::InvalidConfig(format!(
                "'{name}' cannot be both categorical and integer"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let cfg: CleanConfig = serde_json::from_str(r#"{"fields_to_cap": ["Age"]}"#).unwrap();
        assert_eq!(cfg.cap_percentile, 0.99);
        assert!(cfg.required_fields.is_empty());
        assert!(cfg.fields_to_cap.contains("Age"));
    }

    #[test]
    fn airline_config_validates_against_airline_schema() {
        CleanConfig::airline().validate(&Schema::airline()).unwrap();
    }

    #[test]
    fn validate_rejects_bad_percentile_and_unknown_fields() {
        let schema = Schema::airline();

        let cfg = CleanConfig {
            cap_percentile: 0.0,
            ..CleanConfig::default()
        };
        assert!(matches!(cfg.validate(&schema), Err(Error::InvalidConfig(_))));

        let cfg = CleanConfig {
            required_fields: names(&["Arrival Delay"]),
            ..CleanConfig::default()
        };
        assert!(matches!(cfg.validate(&schema), Err(Error::FieldNotFound(_))));

        let cfg = CleanConfig {
            fields_to_cap: names(&[schema::CLASS]),
            ..CleanConfig::default()
        };
        assert!(matches!(cfg.validate(&schema), Err(Error::NonNumericField(_))));
    }
}
