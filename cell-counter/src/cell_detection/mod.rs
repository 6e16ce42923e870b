//! This module turns a sample and a blank intensity series into discrete
//! cell events and the summary statistics of a run.
//!
//! Every stage consumes the previous stage's column and produces a new one
//! covering every sample row, so intermediate stages can be audited.
//! Typical usage looks like:
//! ```ignore
//! let baseline = estimate_baseline(&blank)?;                    // mean blank intensity
//! let ion_intensity = classify_series(&sample, &policy, baseline);
//! let signal_average = average_signal(&ion_intensity);          // noise floor
//! let subtracted = subtract_background_series(&sample, threshold, signal_average);
//! let mass = convert_series_to_mass(&subtracted, &calibration);
//! let cells = segment_cells(&mass);                             // runs of present masses
//! let result = aggregate(&cells, baseline, signal_average, &calibration);
//! ```

pub(crate) mod aggregate;
pub(crate) mod baseline;
pub(crate) mod classifier;
pub(crate) mod datatype;
pub(crate) mod detectors;
pub(crate) mod histogram;
pub(crate) mod iterators;
pub(crate) mod mass;
pub(crate) mod subtraction;
pub(crate) mod threshold;

pub(crate) use aggregate::{PipelineResult, aggregate};
pub(crate) use baseline::{average_signal, estimate_baseline};
pub(crate) use classifier::{ClassifierPolicy, classify_series};
pub(crate) use datatype::{Column, Reading, Series, Value};
pub(crate) use detectors::{Cell, Detector, segment_cells};
pub(crate) use histogram::{Histogram, MassHistograms};
pub(crate) use mass::convert_series_to_mass;
pub(crate) use subtraction::subtract_background_series;

pub(crate) type Real = f64;
