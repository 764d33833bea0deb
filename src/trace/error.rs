use thiserror::Error;

/// Why a single trace row was dropped during normalization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("trace row is not an array")]
    NotARow,
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid time offset: {0}")]
    InvalidOffset(String),
    #[error("invalid {field}: {value}")]
    InvalidCoordinate { field: &'static str, value: String },
    #[error("invalid altitude: {0}")]
    InvalidAltitude(String),
}
