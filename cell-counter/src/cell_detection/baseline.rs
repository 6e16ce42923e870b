use super::{Real, Series, Value, datatype::Stats};
use crate::error::ConfigurationError;
use tracing::debug;

/// Mean intensity of the blank channel, the reference level for signal detection.
/// Missing blank readings are skipped.
#[tracing::instrument(skip_all, fields(num_readings = blank.len(), baseline))]
pub(crate) fn estimate_baseline(blank: &Series) -> Result<Real, ConfigurationError> {
    if blank.is_empty() {
        return Err(ConfigurationError::EmptyBlank);
    }
    let stats =
        Stats::from_values(blank.intensities()).ok_or(ConfigurationError::NoBlankIntensity)?;
    tracing::Span::current().record("baseline", stats.mean);
    debug!("Baseline from {} blank readings: {}", stats.count, stats.mean);
    Ok(stats.mean)
}

/// Mean of the classified ion intensities, background zeros included and
/// missing rows excluded. This is the noise floor removed by background
/// subtraction, and is `None` if every row was classified as missing.
#[tracing::instrument(skip_all, fields(num_rows = ion_intensity.len(), signal_average))]
pub(crate) fn average_signal(ion_intensity: &[Value]) -> Option<Real> {
    let average = Stats::from_values(ion_intensity.iter().copied()).map(|stats| stats.mean);
    if let Some(average) = average {
        tracing::Span::current().record("signal_average", average);
    }
    average
}
