//! Turns per-day ADS-B trace payloads into a continuous, per-aircraft table
//! of pings annotated with flight legs.
//!
//! Stages run in order: [`trace::normalize_all`], [`trace::resolve`],
//! [`trace::filter_ground`], [`legs::LegSegmenter`] and [`enrich::enrich`].
//! [`pipeline::run`] chains them for a batch.

pub mod config;
pub mod enrich;
pub mod legs;
pub mod pipeline;
pub mod trace;
