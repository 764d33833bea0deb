use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde_json::Value;

use crate::trace::error::RecordError;
use crate::trace::types::{
    AircraftInfo, DayPing, DayTrace, NormalizeReport, RawPayload, SkippedRecord,
};

// Column positions inside an ADS-B Exchange trace row.
const COL_OFFSET: usize = 0;
const COL_LAT: usize = 1;
const COL_LON: usize = 2;
const COL_ALTITUDE: usize = 3;
const COL_GROUND_SPEED: usize = 4;
const COL_HEADING: usize = 5;
const COL_DETAILS: usize = 8;

const GROUND_ALTITUDE: &str = "ground";

// Largest offset magnitude accepted, in milliseconds (about 10,000 years).
const MAX_OFFSET_MILLIS: f64 = 3.2e14;

pub struct Normalized {
    pub trace: DayTrace,
    pub skipped: Vec<SkippedRecord>,
}

/// Lower-cased, trimmed aircraft identifier.
pub fn normalize_icao(icao: &str) -> String {
    icao.trim().to_lowercase()
}

/// Turn one fetched day into pings relative to that day's base instant.
///
/// Rows that fail to parse are dropped and reported; they never fail the
/// payload. An absent payload yields an empty day.
pub fn normalize_payload(raw: &RawPayload) -> Normalized {
    let mut icao = normalize_icao(&raw.icao);
    let midnight = raw.date.and_time(NaiveTime::MIN).and_utc();

    let Some(file) = raw.payload.as_ref() else {
        return Normalized {
            trace: DayTrace {
                icao,
                source_date: raw.date,
                base: midnight,
                aircraft: AircraftInfo::default(),
                pings: Vec::new(),
            },
            skipped: Vec::new(),
        };
    };

    if icao.is_empty() {
        icao = file.icao.as_deref().map(normalize_icao).unwrap_or_default();
    }

    let base = file.timestamp.and_then(epoch_to_utc).unwrap_or(midnight);
    let mut pings = Vec::with_capacity(file.trace.len());
    let mut skipped = Vec::new();

    for (index, row) in file.trace.iter().enumerate() {
        match parse_row(row, base) {
            Ok(ping) => pings.push(ping),
            Err(reason) => {
                log::debug!("Dropping {} row {} on {}: {}", icao, index, raw.date, reason);
                skipped.push(SkippedRecord {
                    icao: icao.clone(),
                    source_date: raw.date,
                    index,
                    reason,
                });
            }
        }
    }

    if !skipped.is_empty() {
        log::warn!(
            "Dropped {} of {} trace rows for {} on {}",
            skipped.len(),
            file.trace.len(),
            icao,
            raw.date
        );
    }

    Normalized {
        trace: DayTrace {
            icao,
            source_date: raw.date,
            base,
            aircraft: AircraftInfo {
                registration: clean_text(file.registration.as_deref()),
                type_code: clean_text(file.type_code.as_deref()),
                description: clean_text(file.desc.as_deref()),
            },
            pings,
        },
        skipped,
    }
}

/// Normalize every payload, collecting all dropped rows in one report.
pub fn normalize_all(payloads: &[RawPayload]) -> (Vec<DayTrace>, NormalizeReport) {
    let mut days = Vec::with_capacity(payloads.len());
    let mut report = NormalizeReport::default();

    for raw in payloads {
        let normalized = normalize_payload(raw);
        report.skipped.extend(normalized.skipped);
        days.push(normalized.trace);
    }

    (days, report)
}

fn parse_row(row: &Value, base: DateTime<Utc>) -> Result<DayPing, RecordError> {
    let cols = row.as_array().ok_or(RecordError::NotARow)?;

    let offset = parse_offset(cols.get(COL_OFFSET), base)?;
    let lat = parse_coordinate(cols.get(COL_LAT), "lat", 90.0)?;
    let lon = parse_coordinate(cols.get(COL_LON), "lon", 180.0)?;

    let (altitude, on_ground) = match cols.get(COL_ALTITUDE) {
        None | Some(Value::Null) => (None, false),
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case(GROUND_ALTITUDE) => (None, true),
        Some(v) => match v.as_f64() {
            Some(alt) if alt.is_finite() => (Some(alt), false),
            _ => return Err(RecordError::InvalidAltitude(v.to_string())),
        },
    };

    Ok(DayPing {
        offset,
        call_sign: cols.get(COL_DETAILS).and_then(call_sign_from_details),
        lat,
        lon,
        altitude,
        ground_speed: optional_number(cols.get(COL_GROUND_SPEED)),
        heading: optional_number(cols.get(COL_HEADING)),
        on_ground,
    })
}

// The offset must land on a representable instant once added to the base.
fn parse_offset(value: Option<&Value>, base: DateTime<Utc>) -> Result<Duration, RecordError> {
    let value = value.ok_or(RecordError::MissingField("time"))?;
    let invalid = || RecordError::InvalidOffset(value.to_string());

    let millis = value
        .as_f64()
        .map(|s| (s * 1000.0).round())
        .filter(|ms| ms.is_finite() && ms.abs() <= MAX_OFFSET_MILLIS)
        .ok_or_else(invalid)?;
    let offset = Duration::try_milliseconds(millis as i64).ok_or_else(invalid)?;
    base.checked_add_signed(offset).ok_or_else(invalid)?;
    Ok(offset)
}

fn parse_coordinate(
    value: Option<&Value>,
    field: &'static str,
    limit: f64,
) -> Result<f64, RecordError> {
    let value = value.ok_or(RecordError::MissingField(field))?;
    match value.as_f64() {
        Some(deg) if deg.is_finite() && deg.abs() <= limit => Ok(deg),
        _ => Err(RecordError::InvalidCoordinate {
            field,
            value: value.to_string(),
        }),
    }
}

fn optional_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn call_sign_from_details(details: &Value) -> Option<String> {
    clean_text(details.get("flight")?.as_str())
}

fn clean_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

fn epoch_to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::types::TraceFile;
    use chrono::NaiveDate;
    use serde_json::json;

    fn day(trace: Vec<Value>) -> RawPayload {
        RawPayload {
            icao: " ADFDF8 ".into(),
            date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            payload: Some(TraceFile {
                timestamp: Some(1_609_459_200.0),
                registration: Some("82-8000".into()),
                trace,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_parses_full_row() {
        let raw = day(vec![json!([
            12.5, 34.0522, -118.2437, 10000, 250.0, 180.0, 0, null,
            {"flight": "AF1     "}, "adsb_icao", 10200
        ])]);
        let out = normalize_payload(&raw);
        assert!(out.skipped.is_empty());
        assert_eq!(out.trace.icao, "adfdf8");
        assert_eq!(
            out.trace.base,
            NaiveDate::from_ymd_opt(2021, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc()
        );
        assert_eq!(out.trace.aircraft.registration.as_deref(), Some("82-8000"));

        let ping = &out.trace.pings[0];
        assert_eq!(ping.offset, Duration::milliseconds(12_500));
        assert_eq!(ping.call_sign.as_deref(), Some("AF1"));
        assert_eq!(ping.altitude, Some(10000.0));
        assert_eq!(ping.ground_speed, Some(250.0));
        assert!(!ping.on_ground);
    }

    #[test]
    fn test_ground_altitude_sets_flag() {
        let raw = day(vec![json!([0, 34.0, -118.0, "ground", 3.0, 90.0])]);
        let ping = &normalize_payload(&raw).trace.pings[0];
        assert!(ping.on_ground);
        assert_eq!(ping.altitude, None);
        assert_eq!(ping.call_sign, None);
    }

    #[test]
    fn test_malformed_rows_dropped_individually() {
        let raw = day(vec![
            json!([0, 34.0, -118.0, 1000]),
            json!(["soon", 34.0, -118.0, 1000]),
            json!([5, "north", -118.0, 1000]),
            json!([10, 34.0, 200.0, 1000]),
            json!([15, 34.0]),
            json!({"time": 20}),
            json!([25, 34.1, -118.1, 1200]),
        ]);
        let out = normalize_payload(&raw);
        assert_eq!(out.trace.pings.len(), 2);

        let indices: Vec<usize> = out.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        assert_eq!(out.skipped[3].reason, RecordError::MissingField("lon"));
        assert_eq!(out.skipped[4].reason, RecordError::NotARow);
    }

    #[test]
    fn test_out_of_range_offsets_are_dropped() {
        let raw = day(vec![
            json!([1.0e15, 34.0, -118.0, 1000]),
            json!([-1.0e300, 34.0, -118.0, 1000]),
            json!([1.0e300, 34.0, -118.0, 1000]),
            json!([60, 34.0, -118.0, 1000]),
        ]);
        let out = normalize_payload(&raw);
        assert_eq!(out.trace.pings.len(), 1);
        assert_eq!(out.trace.pings[0].offset, Duration::seconds(60));

        let indices: Vec<usize> = out.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(out
            .skipped
            .iter()
            .all(|s| matches!(s.reason, RecordError::InvalidOffset(_))));
    }

    #[test]
    fn test_offset_past_last_instant_is_dropped() {
        let mut raw = day(vec![json!([86_400, 34.0, -118.0, 1000])]);
        if let Some(file) = raw.payload.as_mut() {
            file.timestamp = Some(DateTime::<Utc>::MAX_UTC.timestamp() as f64);
        }
        let out = normalize_payload(&raw);
        assert!(out.trace.pings.is_empty());
        assert!(matches!(
            out.skipped[0].reason,
            RecordError::InvalidOffset(_)
        ));
    }

    #[test]
    fn test_blank_call_sign_is_missing() {
        let raw = day(vec![json!([0, 34.0, -118.0, 500, null, null, 0, null, {"flight": "   "}])]);
        assert_eq!(normalize_payload(&raw).trace.pings[0].call_sign, None);
    }

    #[test]
    fn test_absent_payload_is_empty() {
        let raw = RawPayload {
            icao: "a1b2c3".into(),
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            payload: None,
        };
        let out = normalize_payload(&raw);
        assert!(out.trace.pings.is_empty());
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn test_missing_timestamp_falls_back_to_midnight() {
        let mut raw = day(vec![json!([60, 34.0, -118.0, 1000])]);
        if let Some(file) = raw.payload.as_mut() {
            file.timestamp = None;
        }
        let out = normalize_payload(&raw);
        assert_eq!(out.trace.base, raw.date.and_time(NaiveTime::MIN).and_utc());
    }

    #[test]
    fn test_normalize_all_collects_report() {
        let good = day(vec![json!([0, 34.0, -118.0, 1000])]);
        let bad = day(vec![json!([null, 34.0, -118.0, 1000])]);
        let (days, report) = normalize_all(&[good, bad]);
        assert_eq!(days.len(), 2);
        assert_eq!(report.count(), 1);
    }
}
