use super::{
    Column, Real, Series, Value,
    threshold::{ThresholdClass, UpperThreshold},
};
use rayon::prelude::*;

/// Removes the noise floor from a reading above `threshold`.
/// Readings at or below the threshold, missing readings, and every reading
/// when the noise floor is undefined, become missing.
pub(crate) fn subtract_background(
    intensity: Value,
    threshold: Real,
    signal_average: Option<Real>,
) -> Value {
    match (intensity.get(), signal_average) {
        (Some(intensity), Some(average)) if UpperThreshold::test(intensity, threshold) => {
            Value::new(intensity - average)
        }
        _ => Value::MISSING,
    }
}

/// Produces the background subtracted column from the raw sample intensities.
/// `threshold` is independent of the classifier policy.
#[tracing::instrument(skip_all, fields(num_rows = sample.len(), threshold, num_present))]
pub(crate) fn subtract_background_series(
    sample: &Series,
    threshold: Real,
    signal_average: Option<Real>,
) -> Column {
    let column: Column = sample
        .par_iter()
        .map(|reading| subtract_background(reading.intensity, threshold, signal_average))
        .collect();
    tracing::Span::current().record("threshold", threshold);
    tracing::Span::current().record(
        "num_present",
        column.iter().filter(|v| v.is_present()).count(),
    );
    column
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn above_threshold_is_subtracted() {
        assert_eq!(
            subtract_background(Value::new(150.0), 100.0, Some(20.0)),
            Value::new(130.0)
        );
    }

    #[test]
    fn at_or_below_threshold_is_missing() {
        assert_eq!(
            subtract_background(Value::new(100.0), 100.0, Some(20.0)),
            Value::MISSING
        );
        assert_eq!(
            subtract_background(Value::new(50.0), 100.0, Some(20.0)),
            Value::MISSING
        );
    }

    #[test]
    fn missing_propagates() {
        assert_eq!(
            subtract_background(Value::MISSING, 100.0, Some(20.0)),
            Value::MISSING
        );
        assert_eq!(
            subtract_background(Value::new(150.0), 100.0, None),
            Value::MISSING
        );
    }
}
