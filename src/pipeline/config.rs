use std::str::FromStr;

use chrono_tz::Tz;

use crate::config::ConfigError;
use crate::enrich::MappingSpec;
use crate::legs::GapThreshold;

pub const DEFAULT_TIMEZONE: &str = "US/Pacific";

/// Everything one pipeline run needs. Passed into each run; never global.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub threshold: GapThreshold,
    pub filter_ground: bool,
    pub timezone: Tz,
    pub mapping: Option<MappingSpec>,
}

impl PipelineConfig {
    pub fn new(
        threshold: chrono::Duration,
        filter_ground: bool,
        timezone: &str,
        mapping: Option<MappingSpec>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            threshold: threshold.try_into()?,
            filter_ground,
            timezone: parse_timezone(timezone)?,
            mapping,
        })
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: GapThreshold::default(),
            filter_ground: true,
            timezone: chrono_tz::US::Pacific,
            mapping: None,
        }
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    Tz::from_str(name.trim()).map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
}
