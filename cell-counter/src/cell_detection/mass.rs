use super::{Column, Value};
use crate::parameters::Calibration;
use rayon::prelude::*;

/// Converts a background subtracted intensity (cps) to an elemental mass,
/// using dwell time (ms), detection sensitivity (cps per µg/L),
/// sample flow (mL/min) and nebulization efficiency (%).
/// The operation order is fixed so results match previously processed datasets.
pub(crate) fn convert_to_mass(subtracted: Value, calibration: &Calibration) -> Value {
    subtracted.map(|intensity| {
        intensity * calibration.dwell_time / 1000.0 / calibration.detection_sensitivity
            * calibration.sample_flow
            * calibration.nebulization_efficiency
            / 60.0
            * 10000.0
    })
}

#[tracing::instrument(skip_all, fields(num_rows = subtracted.len()))]
pub(crate) fn convert_series_to_mass(subtracted: &[Value], calibration: &Calibration) -> Column {
    subtracted
        .par_iter()
        .map(|&value| convert_to_mass(value, calibration))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn calibration() -> Calibration {
        Calibration {
            dwell_time: 0.10,
            detection_sensitivity: 2100.0,
            sample_flow: 0.02,
            nebulization_efficiency: 11.0,
        }
    }

    #[test]
    fn mass_formula() {
        let mass = convert_to_mass(Value::new(1000.0), &calibration())
            .get()
            .unwrap();
        assert_eq!(mass, 1000.0 * 0.10 / 1000.0 / 2100.0 * 0.02 * 11.0 / 60.0 * 10000.0);
        assert_approx_eq!(mass, 1.746_031_746e-3, 1e-12);
    }

    #[test]
    fn missing_is_not_coerced_to_zero() {
        assert_eq!(convert_to_mass(Value::MISSING, &calibration()), Value::MISSING);
    }

    #[test]
    fn column_is_row_aligned() {
        let subtracted = [Value::MISSING, Value::new(1000.0), Value::MISSING];
        let mass = convert_series_to_mass(&subtracted, &calibration());
        assert_eq!(mass.len(), 3);
        assert!(!mass[0].is_present());
        assert!(mass[1].is_present());
        assert!(!mass[2].is_present());
    }
}
