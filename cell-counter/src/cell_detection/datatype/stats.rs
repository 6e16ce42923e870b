use super::{super::Real, Value};

/// Descriptive statistics over the present values of a column.
/// `variance` is the population variance.
#[derive(Default, Clone, Debug, PartialEq)]
pub(crate) struct Stats {
    pub(crate) count: usize,
    pub(crate) mean: Real,
    pub(crate) variance: Real,
}

impl Stats {
    /// Returns `None` when no value is present, as the mean is then undefined.
    pub(crate) fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let present: Vec<Real> = values.into_iter().filter_map(|v| v.get()).collect();
        if present.is_empty() {
            return None;
        }
        let count = present.len();
        let mean = present.iter().sum::<Real>() / count as Real;
        let variance = present
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<Real>()
            / count as Real;
        Some(Self {
            count,
            mean,
            variance,
        })
    }

    pub(crate) fn std_dev(&self) -> Real {
        self.variance.sqrt()
    }
}
