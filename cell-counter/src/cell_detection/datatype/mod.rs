pub(crate) mod reading;
pub(crate) mod stats;
pub(crate) mod value;

pub(crate) use reading::{Reading, Series};
pub(crate) use stats::Stats;
pub(crate) use value::Value;

/// A derived column: one entry per row of the sample series, in row order.
pub(crate) type Column = Vec<Value>;
