mod continuity;
mod error;
mod ground;
mod normalize;
mod plan;
mod types;

pub use continuity::resolve;
pub use error::RecordError;
pub use ground::filter_ground;
pub use normalize::{normalize_all, normalize_icao, normalize_payload, Normalized};
pub use plan::{days_inclusive, fetch_plan, trace_url};
pub use types::{
    AircraftInfo, DayPing, DayTrace, NormalizeReport, PingRecord, RawPayload, SkippedRecord,
    TraceFile,
};
