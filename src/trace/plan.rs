use chrono::{Datelike, NaiveDate};

use crate::trace::normalize::normalize_icao;

const HISTORY_BASE_URL: &str = "https://globe.adsbexchange.com/globe_history/";

/// Every calendar day from `start` to `end`, both inclusive.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// URL of the full-day trace file for one aircraft.
pub fn trace_url(icao: &str, date: NaiveDate) -> String {
    let icao = normalize_icao(icao);
    let split = icao.char_indices().rev().nth(1).map_or(0, |(i, _)| i);
    let suffix = &icao[split..];
    format!(
        "{}{:04}/{:02}/{:02}/traces/{}/trace_full_{}.json",
        HISTORY_BASE_URL,
        date.year(),
        date.month(),
        date.day(),
        suffix,
        icao
    )
}

/// `(url, icao, date)` for every aircraft and day in the range, in the order
/// a fetch client should request them.
pub fn fetch_plan(
    aircraft: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<(String, String, NaiveDate)> {
    aircraft
        .iter()
        .map(|icao| normalize_icao(icao))
        .flat_map(|icao| {
            days_inclusive(start, end).map(move |date| (trace_url(&icao, date), icao.clone(), date))
        })
        .collect()
}
