use crate::trace::types::PingRecord;

/// Drop on-ground pings when `enabled`. Survivors keep their order.
///
/// Run this before leg segmentation so taxi and parked time is not measured
/// as a gap between airborne points.
pub fn filter_ground(mut records: Vec<PingRecord>, enabled: bool) -> Vec<PingRecord> {
    if enabled {
        let before = records.len();
        records.retain(|r| !r.on_ground);
        log::debug!("Ground filter removed {} pings", before - records.len());
    }
    records
}
