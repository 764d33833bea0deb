use std::collections::{BTreeMap, HashMap};

use chrono_tz::Tz;

use crate::legs::threshold::GapThreshold;
use crate::legs::types::TraceRow;
use crate::trace::PingRecord;

const LOCAL_TIME_FORMAT: &str = "%H:%M:%S";

/// Assigns `leg_id` and `flight_leg` to one aircraft's time-ordered pings.
///
/// Leg numbers are counted per call sign within a single call to
/// [`LegSegmenter::segment`], so every aircraft starts from leg 1 and its
/// labels do not depend on what else is in the batch.
#[derive(Debug, Clone, Copy)]
pub struct LegSegmenter {
    threshold: GapThreshold,
    timezone: Tz,
}

struct LegSpan {
    start: usize,
    len: usize,
    call_sign: Option<String>,
}

impl LegSegmenter {
    pub fn new(threshold: GapThreshold, timezone: Tz) -> Self {
        Self {
            threshold,
            timezone,
        }
    }

    /// Segment one aircraft's pings, which must be ascending by time.
    pub fn segment(&self, records: Vec<PingRecord>) -> Vec<TraceRow> {
        let spans = split_legs(&records, self.threshold);

        let mut issued: HashMap<&str, u32> = HashMap::new();
        let mut labels = Vec::with_capacity(spans.len());
        for span in &spans {
            let call_sign = span.call_sign.as_deref().unwrap_or_default();
            let leg_id = {
                let last = issued.entry(call_sign).or_insert(0);
                *last += 1;
                *last
            };
            let leg_date = records[span.start]
                .timestamp_utc
                .with_timezone(&self.timezone)
                .date_naive();
            labels.push((
                span.len,
                leg_id,
                call_sign,
                format!("{}_{}_leg{}", call_sign, leg_date, leg_id),
            ));
        }

        let mut rows = Vec::with_capacity(records.len());
        let mut records = records.into_iter();
        for (len, leg_id, call_sign, flight_leg) in labels {
            for record in records.by_ref().take(len) {
                let local = record.timestamp_utc.with_timezone(&self.timezone);
                rows.push(TraceRow {
                    local_date: local.date_naive(),
                    local_time: local.format(LOCAL_TIME_FORMAT).to_string(),
                    leg_id,
                    leg_call_sign: call_sign.to_string(),
                    flight_leg: flight_leg.clone(),
                    extra: BTreeMap::new(),
                    record,
                });
            }
        }

        log::debug!("Segmented {} pings into {} legs", rows.len(), spans.len());
        rows
    }
}

/// Segment a single aircraft's pings.
pub fn segment_legs(
    records: Vec<PingRecord>,
    threshold: GapThreshold,
    timezone: Tz,
) -> Vec<TraceRow> {
    LegSegmenter::new(threshold, timezone).segment(records)
}

// A leg ends when the gap to the previous ping exceeds the threshold or the
// call sign changes to a different known value. Pings without a call sign
// stay in the current call sign's scope.
fn split_legs(records: &[PingRecord], threshold: GapThreshold) -> Vec<LegSpan> {
    let mut spans: Vec<LegSpan> = Vec::new();
    let mut scope: Option<&str> = None;

    for (i, record) in records.iter().enumerate() {
        let call_sign = record.call_sign.as_deref();

        let starts_leg = match i.checked_sub(1) {
            None => true,
            Some(prev) => {
                let gap = record.timestamp_utc - records[prev].timestamp_utc;
                let renamed = matches!((scope, call_sign), (Some(a), Some(b)) if a != b);
                threshold.is_exceeded_by(gap) || renamed
            }
        };

        if starts_leg {
            spans.push(LegSpan {
                start: i,
                len: 0,
                call_sign: call_sign.or(scope).map(String::from),
            });
        }

        if let Some(span) = spans.last_mut() {
            span.len += 1;
            if span.call_sign.is_none() {
                span.call_sign = call_sign.map(String::from);
            }
        }

        if call_sign.is_some() {
            scope = call_sign;
        }
    }

    spans
}
