use chrono::Duration;

use crate::config::ConfigError;

const DEFAULT_GAP: Duration = Duration::minutes(15);

/// Largest gap allowed between two pings of the same leg. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapThreshold(Duration);

impl GapThreshold {
    pub fn new(gap: Duration) -> Result<Self, ConfigError> {
        if gap <= Duration::zero() {
            return Err(ConfigError::NonPositiveThreshold(gap.to_string()));
        }
        Ok(Self(gap))
    }

    /// Parse a human duration such as `15m` or `900s`.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let parsed = humantime::parse_duration(s.trim())
            .map_err(|e| ConfigError::InvalidThreshold(format!("{}: {}", s, e)))?;
        let gap = Duration::from_std(parsed)
            .map_err(|e| ConfigError::InvalidThreshold(format!("{}: {}", s, e)))?;
        Self::new(gap)
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    /// Strictly longer gaps split a leg; a gap equal to the threshold does not.
    pub fn is_exceeded_by(&self, gap: Duration) -> bool {
        gap > self.0
    }
}

impl Default for GapThreshold {
    fn default() -> Self {
        Self(DEFAULT_GAP)
    }
}

impl TryFrom<Duration> for GapThreshold {
    type Error = ConfigError;

    fn try_from(gap: Duration) -> Result<Self, Self::Error> {
        Self::new(gap)
    }
}
