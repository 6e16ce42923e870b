use super::{Cell, Real, Value, datatype::Stats};
use crate::parameters::Calibration;
use serde::Serialize;
use std::fmt::Formatter;
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{info, warn};

/// The summary of one run.
///
/// Mass statistics are `None` when no cell was detected, and the ionic
/// concentration is `None` when every sample row was classified as missing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct PipelineResult {
    pub(crate) ion_blank_threshold: Real,
    pub(crate) detected_cells: usize,
    pub(crate) mass_mean: Option<Real>,
    pub(crate) mass_std: Option<Real>,
    pub(crate) ionic_concentration: Option<Real>,
}

#[derive(Clone, Copy, Debug, PartialEq, Display, EnumIter)]
pub(crate) enum ResultKey {
    #[strum(to_string = "Ion Blank Threshold")]
    IonBlankThreshold,
    #[strum(to_string = "Detected Cells")]
    DetectedCells,
    #[strum(to_string = "Mass Mean")]
    MassMean,
    #[strum(to_string = "Mass Std")]
    MassStd,
    #[strum(to_string = "Ionic Concentration")]
    IonicConcentration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ResultField {
    Count(usize),
    Number(Real),
    Undefined,
}

impl From<Option<Real>> for ResultField {
    fn from(value: Option<Real>) -> Self {
        value.map_or(Self::Undefined, Self::Number)
    }
}

impl std::fmt::Display for ResultField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

impl PipelineResult {
    pub(crate) fn field(&self, key: ResultKey) -> ResultField {
        match key {
            ResultKey::IonBlankThreshold => ResultField::Number(self.ion_blank_threshold),
            ResultKey::DetectedCells => ResultField::Count(self.detected_cells),
            ResultKey::MassMean => self.mass_mean.into(),
            ResultKey::MassStd => self.mass_std.into(),
            ResultKey::IonicConcentration => self.ionic_concentration.into(),
        }
    }

    /// The result as key/value pairs, in report order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (ResultKey, ResultField)> + '_ {
        ResultKey::iter().map(|key| (key, self.field(key)))
    }
}

impl std::fmt::Display for PipelineResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let entries = self
            .entries()
            .map(|(key, field)| format!("{key}: {field}"))
            .collect::<Vec<_>>();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

#[tracing::instrument(skip_all, fields(num_cells = cells.len()))]
pub(crate) fn aggregate(
    cells: &[Cell],
    ion_blank_threshold: Real,
    signal_average: Option<Real>,
    calibration: &Calibration,
) -> PipelineResult {
    let stats = Stats::from_values(cells.iter().map(|cell| Value::new(cell.total_mass)));
    if cells.is_empty() {
        warn!("No cells detected, mass mean and standard deviation are undefined");
    }
    let num_excluded = cells.len() - stats.as_ref().map_or(0, |stats| stats.count);
    if num_excluded > 0 {
        warn!(
            "{num_excluded} of {} cell masses are not finite, they are counted but excluded from the mass mean and standard deviation",
            cells.len()
        );
    }
    if signal_average.is_none() {
        warn!("Every sample reading was classified as missing, the signal average is undefined");
    }
    let result = PipelineResult {
        ion_blank_threshold,
        detected_cells: cells.len(),
        mass_mean: stats.as_ref().map(|stats| stats.mean),
        mass_std: stats.as_ref().map(Stats::std_dev),
        ionic_concentration: signal_average
            .map(|average| average / calibration.detection_sensitivity),
    };
    info!("{result}");
    result
}
