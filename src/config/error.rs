use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("lookup table parse error: {0}")]
    LookupTable(#[from] serde_json::Error),
    #[error("time gap threshold must be positive, got {0}")]
    NonPositiveThreshold(String),
    #[error("invalid time gap threshold: {0}")]
    InvalidThreshold(String),
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("incomplete mapping: missing {0}")]
    IncompleteMapping(&'static str),
    #[error("unknown join column: {0}")]
    UnknownColumn(String),
    #[error("destination column {0} would overwrite a trace column")]
    ReservedColumn(String),
}
