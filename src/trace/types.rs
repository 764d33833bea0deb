use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::RecordError;

/// One fetched day of trace data for an aircraft, as handed over by the
/// fetch client. `payload` is `None` when the day had no data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawPayload {
    pub icao: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub payload: Option<TraceFile>,
}

/// Body of an ADS-B Exchange `trace_full_<icao>.json` file.
///
/// Trace rows stay as raw JSON values so a single bad row can be dropped
/// without rejecting the rest of the day.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TraceFile {
    #[serde(default)]
    pub icao: Option<String>,
    #[serde(default, rename = "r")]
    pub registration: Option<String>,
    #[serde(default, rename = "t")]
    pub type_code: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    /// Epoch seconds the row offsets are relative to.
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub trace: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AircraftInfo {
    pub registration: Option<String>,
    pub type_code: Option<String>,
    pub description: Option<String>,
}

/// A ping whose time is still an offset from its day's base instant.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPing {
    pub offset: Duration,
    pub call_sign: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub altitude: Option<f64>,
    pub ground_speed: Option<f64>,
    pub heading: Option<f64>,
    pub on_ground: bool,
}

/// Normalized pings of one fetched day, in payload order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTrace {
    pub icao: String,
    pub source_date: NaiveDate,
    pub base: DateTime<Utc>,
    pub aircraft: AircraftInfo,
    pub pings: Vec<DayPing>,
}

/// One position report with an absolute timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingRecord {
    pub icao: String,
    pub call_sign: Option<String>,
    pub timestamp_utc: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub altitude: Option<f64>,
    pub ground_speed: Option<f64>,
    pub heading: Option<f64>,
    pub on_ground: bool,
    pub source_date: NaiveDate,
    pub registration: Option<String>,
    pub type_code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub icao: String,
    pub source_date: NaiveDate,
    pub index: usize,
    pub reason: RecordError,
}

/// Rows dropped while normalizing a batch of payloads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    pub skipped: Vec<SkippedRecord>,
}

impl NormalizeReport {
    pub fn count(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }
}
