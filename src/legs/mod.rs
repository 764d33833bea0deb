mod segmenter;
mod summary;
mod threshold;
mod types;

pub use segmenter::{segment_legs, LegSegmenter};
pub use summary::summarize;
pub use threshold::GapThreshold;
pub use types::{LegSummary, TraceRow};
