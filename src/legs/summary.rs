use std::collections::HashMap;

use crate::legs::types::{LegSummary, TraceRow};

/// One summary per `flight_leg`, in order of first appearance.
pub fn summarize(rows: &[TraceRow]) -> Vec<LegSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<LegSummary> = Vec::new();

    for row in rows {
        let ts = row.record.timestamp_utc;
        match index.get(row.flight_leg.as_str()) {
            Some(&i) => {
                let summary = &mut summaries[i];
                summary.start = summary.start.min(ts);
                summary.end = summary.end.max(ts);
                summary.points += 1;
            }
            None => {
                index.insert(row.flight_leg.as_str(), summaries.len());
                summaries.push(LegSummary {
                    flight_leg: row.flight_leg.clone(),
                    icao: row.record.icao.clone(),
                    call_sign: row.leg_call_sign.clone(),
                    leg_id: row.leg_id,
                    start: ts,
                    end: ts,
                    points: 1,
                    duration_seconds: 0,
                });
            }
        }
    }

    for summary in &mut summaries {
        summary.duration_seconds = (summary.end - summary.start).num_seconds();
    }
    summaries
}
