use crate::{
    cell_detection::{
        Cell, MassHistograms, PipelineResult, Real, Series, Value, aggregate, average_signal,
        classify_series, convert_series_to_mass, estimate_baseline, segment_cells,
        subtract_background_series,
    },
    error::ConfigurationError,
    parameters::PipelineSettings,
};
use itertools::izip;
use spcell_common::Time;
use tracing::debug;

/// One row of the processed sample table.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub(crate) struct DerivedRow {
    pub(crate) time: Time,
    pub(crate) intensity: Value,
    pub(crate) ion_intensity: Value,
    pub(crate) background_subtracted: Value,
    pub(crate) element_mass: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PipelineOutput {
    /// One row per sample reading, in sample order.
    pub(crate) derived_rows: Vec<DerivedRow>,
    pub(crate) cells: Vec<Cell>,
    pub(crate) result: PipelineResult,
    /// Only computed when requested, and only if some mass is present.
    pub(crate) histograms: Option<MassHistograms>,
}

/// Runs the full pipeline on one sample and blank series.
/// Fails only on invalid settings or an undefined baseline; missing readings
/// propagate through the columns instead.
#[tracing::instrument(skip_all, fields(num_sample_rows = sample.len(), num_blank_rows = blank.len()))]
pub(crate) fn process(
    sample: &Series,
    blank: &Series,
    settings: &PipelineSettings,
) -> Result<PipelineOutput, ConfigurationError> {
    settings.validate()?;
    let baseline: Real = estimate_baseline(blank)?;

    let ion_intensity = classify_series(sample, &settings.policy, baseline);
    let signal_average = average_signal(&ion_intensity);
    let background_subtracted =
        subtract_background_series(sample, settings.subtraction_threshold, signal_average);
    let element_mass = convert_series_to_mass(&background_subtracted, &settings.calibration);

    let cells = segment_cells(&element_mass);
    let result = aggregate(&cells, baseline, signal_average, &settings.calibration);

    let histograms = if settings.histograms {
        MassHistograms::new(&element_mass)
    } else {
        None
    };
    if settings.histograms && histograms.is_none() {
        debug!("No mass values present, histograms skipped");
    }

    let derived_rows = izip!(sample, ion_intensity, background_subtracted, element_mass)
        .map(
            |(reading, ion_intensity, background_subtracted, element_mass)| DerivedRow {
                time: reading.time,
                intensity: reading.intensity,
                ion_intensity,
                background_subtracted,
                element_mass,
            },
        )
        .collect();

    Ok(PipelineOutput {
        derived_rows,
        cells,
        result,
        histograms,
    })
}
