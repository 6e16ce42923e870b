pub mod tracer;

pub type Time = f64;

/// Appended to the output directory prefix, so every run writes to a fresh directory.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
