use super::{
    Column, Real, Series, Value,
    threshold::{LowerThreshold, ThresholdClass, UpperThreshold},
};
use rayon::prelude::*;
use serde::Serialize;

/// Decides, per sample reading, whether it is saturated (missing), background
/// (zero) or above-baseline ion signal (kept as is).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "policy")]
pub(crate) enum ClassifierPolicy {
    /// Anything above `ion_threshold` is saturated.
    SingleThreshold { ion_threshold: Real },
    /// Anything above `cell_threshold` is saturated, and only readings strictly
    /// between the baseline and `ion_threshold` count as signal.
    DualThreshold {
        cell_threshold: Real,
        ion_threshold: Real,
    },
}

impl ClassifierPolicy {
    /// The threshold background subtraction uses unless it is overridden.
    pub(crate) fn default_subtraction_threshold(&self) -> Real {
        match *self {
            Self::SingleThreshold { ion_threshold } => ion_threshold,
            Self::DualThreshold { cell_threshold, .. } => cell_threshold,
        }
    }

    pub(crate) fn classify(&self, intensity: Value, baseline: Real) -> Value {
        let Some(intensity) = intensity.get() else {
            return Value::MISSING;
        };
        match *self {
            Self::SingleThreshold { ion_threshold } => {
                if UpperThreshold::test(intensity, ion_threshold) {
                    Value::MISSING
                } else if UpperThreshold::test(intensity, baseline) {
                    Value::new(intensity)
                } else {
                    Value::new(0.0)
                }
            }
            Self::DualThreshold {
                cell_threshold,
                ion_threshold,
            } => {
                if UpperThreshold::test(intensity, cell_threshold) {
                    Value::MISSING
                } else if UpperThreshold::test(intensity, baseline)
                    && LowerThreshold::test(intensity, ion_threshold)
                {
                    Value::new(intensity)
                } else {
                    Value::new(0.0)
                }
            }
        }
    }
}

/// Produces the ion intensity column. Rows are independent, so this runs in
/// parallel; the output keeps the row order of `sample`.
#[tracing::instrument(skip_all, fields(num_rows = sample.len(), num_signal, num_missing))]
pub(crate) fn classify_series(sample: &Series, policy: &ClassifierPolicy, baseline: Real) -> Column {
    let column: Column = sample
        .par_iter()
        .map(|reading| policy.classify(reading.intensity, baseline))
        .collect();

    let num_missing = column.iter().filter(|v| !v.is_present()).count();
    let num_signal = column
        .iter()
        .filter(|v| v.get().is_some_and(|v| v > 0.0))
        .count();
    tracing::Span::current().record("num_signal", num_signal);
    tracing::Span::current().record("num_missing", num_missing);
    column
}
