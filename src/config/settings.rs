use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;
use crate::enrich::{LookupTable, MappingSpec};
use crate::legs::GapThreshold;
use crate::pipeline::{parse_timezone, PipelineConfig, DEFAULT_TIMEZONE};

/// Settings file, e.g.
///
/// ```yaml
/// time_gap_threshold: 15m
/// filter_ground: true
/// local_timezone: US/Pacific
/// mapping:
///   table: lapd_aircraft.json
///   key_column: icao
///   value_column: owner
///   destination_column: owner
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_threshold")]
    pub time_gap_threshold: String,
    #[serde(default = "default_filter_ground")]
    pub filter_ground: bool,
    #[serde(default = "default_timezone")]
    pub local_timezone: String,
    #[serde(default)]
    pub mapping: Option<MappingSettings>,
}

/// Column names are optional here so a partial block reports which one is
/// missing instead of failing as a YAML error.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingSettings {
    pub table: PathBuf,
    pub key_column: Option<String>,
    pub value_column: Option<String>,
    pub destination_column: Option<String>,
}

fn default_threshold() -> String {
    "15m".to_string()
}

fn default_filter_ground() -> bool {
    true
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_gap_threshold: default_threshold(),
            filter_ground: default_filter_ground(),
            local_timezone: default_timezone(),
            mapping: None,
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut settings = Self::from_str(&content)?;
        // Lookup tables are resolved next to the settings file
        if let (Some(mapping), Some(dir)) = (settings.mapping.as_mut(), path.parent()) {
            if mapping.table.is_relative() {
                mapping.table = dir.join(&mapping.table);
            }
        }
        Ok(settings)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate every value and load the lookup table, failing before any
    /// trace is touched.
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        let threshold = GapThreshold::parse(&self.time_gap_threshold)?;
        let timezone = parse_timezone(&self.local_timezone)?;
        let mapping = self.mapping.as_ref().map(load_mapping).transpose()?;

        Ok(PipelineConfig {
            threshold,
            filter_ground: self.filter_ground,
            timezone,
            mapping,
        })
    }
}

fn load_mapping(settings: &MappingSettings) -> Result<MappingSpec, ConfigError> {
    let key = settings
        .key_column
        .as_deref()
        .ok_or(ConfigError::IncompleteMapping("key_column"))?;
    let value = settings
        .value_column
        .as_deref()
        .ok_or(ConfigError::IncompleteMapping("value_column"))?;
    let destination = settings
        .destination_column
        .as_deref()
        .ok_or(ConfigError::IncompleteMapping("destination_column"))?;

    // Check the column names before reading the table
    MappingSpec::new(LookupTable::default(), key, value, destination)?;
    let table = LookupTable::from_file(&settings.table)?;
    log::info!(
        "Loaded {} lookup rows from {}",
        table.len(),
        settings.table.display()
    );
    MappingSpec::new(table, key, value, destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings = Settings::from_str("{}").unwrap();
        let config = settings.pipeline_config().unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_str(
            "time_gap_threshold: 20m\nfilter_ground: false\nlocal_timezone: America/New_York\n",
        )
        .unwrap();
        let config = settings.pipeline_config().unwrap();
        assert_eq!(config.threshold.duration(), Duration::minutes(20));
        assert!(!config.filter_ground);
        assert_eq!(config.timezone, chrono_tz::America::New_York);
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        let zero = Settings::from_str("time_gap_threshold: 0s").unwrap();
        assert!(matches!(
            zero.pipeline_config(),
            Err(ConfigError::NonPositiveThreshold(_))
        ));

        let tz = Settings::from_str("local_timezone: Pacific Time").unwrap();
        assert!(matches!(
            tz.pipeline_config(),
            Err(ConfigError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn test_incomplete_mapping_fails_before_reading_table() {
        let settings = Settings::from_str(
            "mapping:\n  table: /nonexistent/lookup.json\n  key_column: icao\n  value_column: owner\n",
        )
        .unwrap();
        assert!(matches!(
            settings.pipeline_config(),
            Err(ConfigError::IncompleteMapping("destination_column"))
        ));
    }

    #[test]
    fn test_unknown_key_column_fails_before_reading_table() {
        let settings = Settings::from_str(
            "mapping:\n  table: /nonexistent/lookup.json\n  key_column: tail\n  value_column: owner\n  destination_column: owner\n",
        )
        .unwrap();
        assert!(matches!(
            settings.pipeline_config(),
            Err(ConfigError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_missing_table_file() {
        let settings = Settings::from_str(
            "mapping:\n  table: /nonexistent/lookup.json\n  key_column: icao\n  value_column: owner\n  destination_column: owner\n",
        )
        .unwrap();
        assert!(matches!(settings.pipeline_config(), Err(ConfigError::Io(_))));
    }
}
