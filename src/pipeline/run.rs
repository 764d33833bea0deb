use crate::enrich::{enrich, JoinStats};
use crate::legs::{LegSegmenter, TraceRow};
use crate::pipeline::config::PipelineConfig;
use crate::trace::{
    filter_ground, normalize_all, resolve, NormalizeReport, PingRecord, RawPayload,
};

#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Final table, ordered by aircraft then time.
    pub rows: Vec<TraceRow>,
    pub skipped: NormalizeReport,
    pub join: JoinStats,
}

/// Normalize, merge, filter, segment and enrich a batch of fetched days.
///
/// Aircraft are segmented independently, in `icao` order, each with its own
/// leg numbering. `flight_leg` is unique within an aircraft.
pub fn run(payloads: &[RawPayload], config: &PipelineConfig) -> PipelineOutput {
    let (days, skipped) = normalize_all(payloads);
    let records = resolve(days);
    let resolved = records.len();
    let records = filter_ground(records, config.filter_ground);

    let segmenter = LegSegmenter::new(config.threshold, config.timezone);
    let mut rows = Vec::with_capacity(records.len());
    for aircraft in split_by_aircraft(records) {
        rows.extend(segmenter.segment(aircraft));
    }

    let (rows, join) = enrich(rows, config.mapping.as_ref());

    log::info!(
        "Processed {} payloads: {} pings kept of {} resolved, {} rows dropped as malformed",
        payloads.len(),
        rows.len(),
        resolved,
        skipped.count()
    );

    PipelineOutput {
        rows,
        skipped,
        join,
    }
}

// Records arrive sorted by icao, so each aircraft is one contiguous run.
fn split_by_aircraft(records: Vec<PingRecord>) -> Vec<Vec<PingRecord>> {
    let mut groups: Vec<Vec<PingRecord>> = Vec::new();
    for record in records {
        match groups.last_mut() {
            Some(group) if group[0].icao == record.icao => group.push(record),
            _ => groups.push(vec![record]),
        }
    }
    groups
}
