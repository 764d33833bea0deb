use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::trace::PingRecord;

/// A ping annotated with its leg. Enrichment columns land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRow {
    #[serde(flatten)]
    pub record: PingRecord,
    pub local_date: NaiveDate,
    pub local_time: String,
    pub leg_id: u32,
    /// Call sign the leg is labelled with, empty when none was reported.
    #[serde(skip)]
    pub leg_call_sign: String,
    pub flight_leg: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Extent of one leg, for grouping points into tracks downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegSummary {
    pub flight_leg: String,
    pub icao: String,
    pub call_sign: String,
    pub leg_id: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub points: usize,
    pub duration_seconds: i64,
}
