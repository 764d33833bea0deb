use crate::trace::types::{DayTrace, PingRecord};

/// Merge fetched days into one timeline ordered by `(icao, timestamp_utc)`.
///
/// Each ping's absolute time is its day's base plus its offset, so a flight
/// crossing midnight UTC needs no special handling. Days may arrive in any
/// order. Equal timestamps keep fetch order and only the first survives.
pub fn resolve(days: Vec<DayTrace>) -> Vec<PingRecord> {
    let total: usize = days.iter().map(|d| d.pings.len()).sum();
    let mut records = Vec::with_capacity(total);

    for day in days {
        let DayTrace {
            icao,
            source_date,
            base,
            aircraft,
            pings,
        } = day;

        for ping in pings {
            let Some(timestamp_utc) = base.checked_add_signed(ping.offset) else {
                log::warn!(
                    "Dropping {} ping on {}: offset {} is out of range",
                    icao,
                    source_date,
                    ping.offset
                );
                continue;
            };
            records.push(PingRecord {
                icao: icao.clone(),
                call_sign: ping.call_sign,
                timestamp_utc,
                lat: ping.lat,
                lon: ping.lon,
                altitude: ping.altitude,
                ground_speed: ping.ground_speed,
                heading: ping.heading,
                on_ground: ping.on_ground,
                source_date,
                registration: aircraft.registration.clone(),
                type_code: aircraft.type_code.clone(),
                description: aircraft.description.clone(),
            });
        }
    }

    // sort_by is stable: ties keep the order they were fetched in
    records.sort_by(|a, b| {
        a.icao
            .cmp(&b.icao)
            .then(a.timestamp_utc.cmp(&b.timestamp_utc))
    });

    let before = records.len();
    records.dedup_by(|later, earlier| {
        later.icao == earlier.icao && later.timestamp_utc == earlier.timestamp_utc
    });
    if records.len() < before {
        log::debug!("Removed {} duplicate pings", before - records.len());
    }

    records
}
