use crate::{
    cell_detection::{ClassifierPolicy, Real},
    error::ConfigurationError,
};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::warn;

/// Instrument calibration constants used by the mass conversion.
#[derive(Debug, Clone, Parser, Serialize)]
pub(crate) struct Calibration {
    /// Dwell time (ms).
    #[clap(long = "dt", env = "SPCELL_DWELL_TIME", default_value_t = 0.10)]
    pub(crate) dwell_time: Real,

    /// Detection sensitivity (cps per µg/L).
    #[clap(long = "ds", env = "SPCELL_DETECTION_SENSITIVITY", default_value_t = 2100.0)]
    pub(crate) detection_sensitivity: Real,

    /// Sample flow (mL/min).
    #[clap(long = "sf", env = "SPCELL_SAMPLE_FLOW", default_value_t = 0.02)]
    pub(crate) sample_flow: Real,

    /// Nebulization efficiency (%).
    #[clap(long = "ne", env = "SPCELL_NEBULIZATION_EFFICIENCY", default_value_t = 11.0)]
    pub(crate) nebulization_efficiency: Real,
}

impl Calibration {
    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        ConfigurationError::check_positive("Dwell time", self.dwell_time)?;
        ConfigurationError::check_positive("Detection sensitivity", self.detection_sensitivity)?;
        ConfigurationError::check_positive("Sample flow", self.sample_flow)?;
        ConfigurationError::check_positive("Nebulization efficiency", self.nebulization_efficiency)
    }
}

/// Values which are not used by the pipeline but are recorded with each run.
#[derive(Debug, Clone, Parser, Serialize)]
pub(crate) struct RunInfo {
    /// Cells amount (mL⁻¹).
    #[clap(long = "ca", env = "SPCELL_CELLS_AMOUNT", default_value_t = 100000.0)]
    pub(crate) cells_amount: Real,

    /// TE_STD.
    #[clap(long = "te-std", env = "SPCELL_TE_STD", default_value_t = true, action = ArgAction::Set)]
    pub(crate) te_std: bool,

    /// Acquisition duration (s).
    #[clap(short = 'd', long = "duration", env = "SPCELL_DURATION", default_value_t = 120.0)]
    pub(crate) duration: Real,
}

#[derive(Debug, Clone, Parser, Serialize)]
pub(crate) struct SingleThresholdParameters {
    /// Ion threshold (cps). Readings above it are treated as saturated.
    #[clap(long = "it", env = "SPCELL_ION_THRESHOLD", default_value_t = 9550.0)]
    pub(crate) ion_threshold: Real,

    /// Background subtraction threshold (cps). Defaults to the ion threshold.
    #[clap(long)]
    pub(crate) subtraction_threshold: Option<Real>,
}

#[derive(Debug, Clone, Parser, Serialize)]
pub(crate) struct DualThresholdParameters {
    /// Cell threshold (cps). Readings above it are treated as saturated.
    #[clap(long = "ct", env = "SPCELL_CELL_THRESHOLD", default_value_t = 85000.0)]
    pub(crate) cell_threshold: Real,

    /// Ion threshold (cps). Only readings between the baseline and this threshold count as signal.
    #[clap(long = "it", env = "SPCELL_ION_THRESHOLD", default_value_t = 9550.0)]
    pub(crate) ion_threshold: Real,

    /// Background subtraction threshold (cps). Defaults to the cell threshold.
    #[clap(long)]
    pub(crate) subtraction_threshold: Option<Real>,

    /// Also render the mass histograms as SVG charts.
    #[clap(long)]
    pub(crate) charts: bool,
}

#[derive(Subcommand, Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub(crate) enum Mode {
    #[clap(about = "Classifies readings against a single ion threshold.")]
    Single(SingleThresholdParameters),
    #[clap(
        about = "Classifies readings against a cell threshold and an ion threshold band, and bins the masses into histograms."
    )]
    Dual(DualThresholdParameters),
}

impl Mode {
    pub(crate) fn policy(&self) -> ClassifierPolicy {
        match self {
            Mode::Single(parameters) => ClassifierPolicy::SingleThreshold {
                ion_threshold: parameters.ion_threshold,
            },
            Mode::Dual(parameters) => ClassifierPolicy::DualThreshold {
                cell_threshold: parameters.cell_threshold,
                ion_threshold: parameters.ion_threshold,
            },
        }
    }

    pub(crate) fn subtraction_threshold(&self) -> Real {
        let subtraction_threshold = match self {
            Mode::Single(parameters) => parameters.subtraction_threshold,
            Mode::Dual(parameters) => parameters.subtraction_threshold,
        };
        subtraction_threshold.unwrap_or_else(|| self.policy().default_subtraction_threshold())
    }

    pub(crate) fn histograms(&self) -> bool {
        matches!(self, Mode::Dual(_))
    }

    pub(crate) fn charts(&self) -> bool {
        matches!(self, Mode::Dual(DualThresholdParameters { charts: true, .. }))
    }
}

/// Everything the pipeline needs for one run.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PipelineSettings {
    pub(crate) policy: ClassifierPolicy,
    pub(crate) subtraction_threshold: Real,
    pub(crate) calibration: Calibration,
    pub(crate) histograms: bool,
}

impl PipelineSettings {
    pub(crate) fn new(calibration: &Calibration, mode: &Mode) -> Self {
        Self {
            policy: mode.policy(),
            subtraction_threshold: mode.subtraction_threshold(),
            calibration: calibration.clone(),
            histograms: mode.histograms(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        self.calibration.validate()?;
        ConfigurationError::check_finite("Subtraction threshold", self.subtraction_threshold)?;
        match self.policy {
            ClassifierPolicy::SingleThreshold { ion_threshold } => {
                ConfigurationError::check_finite("Ion threshold", ion_threshold)?;
            }
            ClassifierPolicy::DualThreshold {
                cell_threshold,
                ion_threshold,
            } => {
                ConfigurationError::check_finite("Cell threshold", cell_threshold)?;
                ConfigurationError::check_finite("Ion threshold", ion_threshold)?;
                if ion_threshold > cell_threshold {
                    warn!(
                        "Ion threshold {ion_threshold} is above cell threshold {cell_threshold}, readings between them are saturated"
                    );
                }
            }
        }
        Ok(())
    }
}
