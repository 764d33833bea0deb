use std::str::FromStr;

use strum_macros::{AsRefStr, EnumString};

use crate::config::ConfigError;
use crate::enrich::table::LookupTable;
use crate::legs::TraceRow;

/// Trace columns that can be joined on. The lookup table must carry a
/// column of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum JoinColumn {
    Icao,
    CallSign,
    FlightLeg,
    Registration,
    TypeCode,
    LocalDate,
    SourceDate,
}

impl JoinColumn {
    pub fn value(&self, row: &TraceRow) -> Option<String> {
        let record = &row.record;
        let value = match self {
            JoinColumn::Icao => Some(record.icao.clone()),
            JoinColumn::CallSign => record.call_sign.clone(),
            JoinColumn::FlightLeg => Some(row.flight_leg.clone()),
            JoinColumn::Registration => record.registration.clone(),
            JoinColumn::TypeCode => record.type_code.clone(),
            JoinColumn::LocalDate => Some(row.local_date.to_string()),
            JoinColumn::SourceDate => Some(record.source_date.to_string()),
        };
        value.map(|v| self.normalize_key(&v))
    }

    /// Identifiers are matched case-insensitively, everything else exactly.
    pub fn normalize_key(&self, key: &str) -> String {
        match self {
            JoinColumn::Icao => key.trim().to_lowercase(),
            _ => key.trim().to_string(),
        }
    }
}

// Serialized trace columns a destination may not shadow.
const RESERVED_COLUMNS: &[&str] = &[
    "icao",
    "call_sign",
    "timestamp_utc",
    "lat",
    "lon",
    "altitude",
    "ground_speed",
    "heading",
    "on_ground",
    "source_date",
    "registration",
    "type_code",
    "description",
    "local_date",
    "local_time",
    "leg_id",
    "flight_leg",
];

/// Which lookup value to copy onto each trace row, and where.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSpec {
    pub table: LookupTable,
    pub key_column: JoinColumn,
    pub value_column: String,
    pub destination_column: String,
}

impl MappingSpec {
    pub fn new(
        table: LookupTable,
        key_column: &str,
        value_column: &str,
        destination_column: &str,
    ) -> Result<Self, ConfigError> {
        let key_column = required(key_column, "key_column")?;
        let value_column = required(value_column, "value_column")?;
        let destination_column = required(destination_column, "destination_column")?;

        let key_column = JoinColumn::from_str(key_column)
            .map_err(|_| ConfigError::UnknownColumn(key_column.to_string()))?;
        if RESERVED_COLUMNS.contains(&destination_column) {
            return Err(ConfigError::ReservedColumn(destination_column.to_string()));
        }

        Ok(Self {
            table,
            key_column,
            value_column: value_column.to_string(),
            destination_column: destination_column.to_string(),
        })
    }
}

fn required<'a>(name: &'a str, field: &'static str) -> Result<&'a str, ConfigError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::IncompleteMapping(field));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_column_names() {
        let spec = MappingSpec::new(LookupTable::default(), "call_sign", "owner", "owner").unwrap();
        assert_eq!(spec.key_column, JoinColumn::CallSign);
        assert_eq!(spec.key_column.as_ref(), "call_sign");
    }

    #[test]
    fn test_incomplete_mapping() {
        assert!(matches!(
            MappingSpec::new(LookupTable::default(), "icao", " ", "owner"),
            Err(ConfigError::IncompleteMapping("value_column"))
        ));
        assert!(matches!(
            MappingSpec::new(LookupTable::default(), "", "owner", "owner"),
            Err(ConfigError::IncompleteMapping("key_column"))
        ));
    }

    #[test]
    fn test_unknown_and_reserved_columns() {
        assert!(matches!(
            MappingSpec::new(LookupTable::default(), "tail", "owner", "owner"),
            Err(ConfigError::UnknownColumn(_))
        ));
        assert!(matches!(
            MappingSpec::new(LookupTable::default(), "icao", "owner", "leg_id"),
            Err(ConfigError::ReservedColumn(_))
        ));
    }

    #[test]
    fn test_icao_keys_ignore_case() {
        assert_eq!(JoinColumn::Icao.normalize_key(" A1B2C3"), "a1b2c3");
        assert_eq!(JoinColumn::CallSign.normalize_key("Aal1 "), "Aal1");
    }
}
