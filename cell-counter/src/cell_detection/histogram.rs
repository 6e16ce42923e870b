use super::{Real, Value};
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;
use tracing::debug;

pub(crate) const COARSE_BIN_COUNT: usize = 100;
pub(crate) const FINE_BIN_COUNT: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub(crate) struct Bin {
    /// Lower edge of the bin.
    pub(crate) edge: Real,
    pub(crate) count: usize,
}

/// Equal-width linear bins spanning `[min, max]` of the present values.
/// Bins are half-open `[edge, edge + width)`, except the last which also
/// holds the maximum.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Histogram {
    bins: Vec<Bin>,
    width: Real,
}

impl Histogram {
    /// Returns `None` if there are no present values or no bins.
    pub(crate) fn new(values: &[Value], bin_count: usize) -> Option<Self> {
        if bin_count == 0 {
            return None;
        }
        let (min, max) = match values.iter().filter_map(Value::get).minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(value) => (value, value),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let width = (max - min) / bin_count as Real;

        let mut counts = vec![0usize; bin_count];
        for value in values.iter().filter_map(Value::get) {
            if let Some(count) = counts.get_mut(bin_index(value, min, width, bin_count)) {
                *count += 1;
            }
        }
        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                edge: min + i as Real * width,
                count,
            })
            .collect();
        Some(Self { bins, width })
    }

    pub(crate) fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub(crate) fn width(&self) -> Real {
        self.width
    }

    pub(crate) fn total(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    pub(crate) fn max_count(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or_default()
    }
}

fn bin_index(value: Real, min: Real, width: Real, bin_count: usize) -> usize {
    if width > 0.0 {
        (((value - min) / width).floor() as usize).min(bin_count - 1)
    } else {
        0
    }
}

/// The mass column binned at a coarse and a fine resolution, for charting.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MassHistograms {
    pub(crate) coarse: Histogram,
    pub(crate) fine: Histogram,
}

impl MassHistograms {
    #[tracing::instrument(skip_all, fields(num_rows = mass.len()))]
    pub(crate) fn new(mass: &[Value]) -> Option<Self> {
        let histograms = Self {
            coarse: Histogram::new(mass, COARSE_BIN_COUNT)?,
            fine: Histogram::new(mass, FINE_BIN_COUNT)?,
        };
        debug!(
            "Binned {} masses, coarse width {}, fine width {}",
            histograms.coarse.total(),
            histograms.coarse.width(),
            histograms.fine.width()
        );
        Some(histograms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn no_present_values() {
        assert_eq!(Histogram::new(&[], 10), None);
        assert_eq!(Histogram::new(&[Value::MISSING], 10), None);
        assert_eq!(MassHistograms::new(&[Value::MISSING]), None);
    }

    #[test]
    fn zero_bins() {
        assert_eq!(Histogram::new(&[Value::new(1.0)], 0), None);
    }

    #[test]
    fn small_histogram() {
        let values = [0.0, 1.0, 2.5, 9.9, 10.0, 5.0]
            .map(Value::new)
            .into_iter()
            .chain([Value::MISSING])
            .collect::<Vec<_>>();
        let histogram = Histogram::new(&values, 5).unwrap();
        assert_approx_eq!(histogram.width(), 2.0);
        let edges: Vec<_> = histogram.bins().iter().map(|bin| bin.edge).collect();
        assert_eq!(edges, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
        let counts: Vec<_> = histogram.bins().iter().map(|bin| bin.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 0, 2]);
    }

    #[test]
    fn single_distinct_value() {
        let values = [Value::new(4.0), Value::new(4.0)];
        let histogram = Histogram::new(&values, 3).unwrap();
        assert_eq!(histogram.bins().len(), 3);
        assert_eq!(histogram.bins()[0].count, 2);
        assert_eq!(histogram.total(), 2);
    }

    #[test]
    fn random_masses_are_fully_covered() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let mass: Vec<Value> = (0..rng.random_range(1..2000))
                .map(|_| {
                    if rng.random_bool(0.3) {
                        Value::MISSING
                    } else {
                        Value::new(rng.random_range(0.0..1e-3))
                    }
                })
                .collect();
            let num_present = mass.iter().filter(|v| v.is_present()).count();
            let min = mass.iter().filter_map(Value::get).fold(Real::MAX, Real::min);
            let max = mass.iter().filter_map(Value::get).fold(Real::MIN, Real::max);

            let Some(histograms) = MassHistograms::new(&mass) else {
                assert_eq!(num_present, 0);
                continue;
            };
            for (histogram, bin_count) in [
                (&histograms.coarse, COARSE_BIN_COUNT),
                (&histograms.fine, FINE_BIN_COUNT),
            ] {
                assert_eq!(histogram.bins().len(), bin_count);
                assert_eq!(histogram.total(), num_present);
                assert!(histogram.bins().windows(2).all(|w| w[0].edge <= w[1].edge));
                assert_eq!(histogram.bins()[0].edge, min);
                assert_eq!(bin_index(min, min, histogram.width(), bin_count), 0);
                if min < max {
                    assert_eq!(
                        bin_index(max, min, histogram.width(), bin_count),
                        bin_count - 1
                    );
                }
            }
        }
    }
}
