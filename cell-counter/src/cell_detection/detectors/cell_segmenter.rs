use super::{
    super::{Real, Value, iterators::EventFilter},
    Detector,
};
use serde::Serialize;

/// One cell event: the summed mass of a maximal run of consecutive present
/// mass readings.
#[derive(Default, Clone, Copy, Debug, PartialEq, Serialize)]
pub(crate) struct Cell {
    pub(crate) total_mass: Real,
}

/// Accumulates consecutive present masses into cells.
///
/// A missing reading closes the open run, if any. Consecutive missing
/// readings never produce an empty cell, and present zeros extend a run
/// rather than closing it. A run whose total is negative is background
/// over-subtraction, not a cell, and is discarded.
#[derive(Default, Clone, Debug)]
pub(crate) struct CellSegmenter {
    // `None` between runs.
    accumulator: Option<Real>,
}

impl Detector for CellSegmenter {
    type InputType = Value;
    type EventType = Cell;

    fn signal(&mut self, mass: Value) -> Option<Cell> {
        match mass.get() {
            Some(mass) => {
                *self.accumulator.get_or_insert(0.0) += mass;
                None
            }
            None => self.finish(),
        }
    }

    fn finish(&mut self) -> Option<Cell> {
        self.accumulator
            .take()
            .filter(|total_mass| *total_mass >= 0.0)
            .map(|total_mass| Cell { total_mass })
    }
}

/// Segments the mass column into cells, in a single ordered pass.
#[tracing::instrument(skip_all, fields(num_rows = mass.len(), num_cells))]
pub(crate) fn segment_cells(mass: &[Value]) -> Vec<Cell> {
    let cells: Vec<Cell> = mass
        .iter()
        .copied()
        .events(CellSegmenter::default())
        .collect();
    tracing::Span::current().record("num_cells", cells.len());
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: Option<Real> = None;

    fn masses(cells: &[Cell]) -> Vec<Real> {
        cells.iter().map(|cell| cell.total_mass).collect()
    }

    fn column(values: &[Option<Real>]) -> Vec<Value> {
        values.iter().copied().map(Value::from).collect()
    }

    #[test]
    fn zero_data() {
        assert!(segment_cells(&[]).is_empty());
    }

    #[test]
    fn runs_are_summed_and_trailing_run_is_flushed() {
        let cells = segment_cells(&column(&[
            Some(5.0),
            Some(3.0),
            M,
            Some(2.0),
            M,
            M,
            Some(7.0),
        ]));
        assert_eq!(masses(&cells), vec![8.0, 2.0, 7.0]);
    }

    #[test]
    fn single_row_run() {
        let cells = segment_cells(&column(&[M, Some(4.0), M]));
        assert_eq!(masses(&cells), vec![4.0]);
    }

    #[test]
    fn all_missing() {
        assert!(segment_cells(&column(&[M, M])).is_empty());
    }

    #[test]
    fn zero_is_present() {
        let cells = segment_cells(&column(&[Some(0.0), Some(0.0), M]));
        assert_eq!(masses(&cells), vec![0.0]);
    }

    #[test]
    fn zeros_do_not_close_a_run() {
        let cells = segment_cells(&column(&[Some(1.0), Some(0.0), Some(2.0), M, Some(3.0)]));
        assert_eq!(masses(&cells), vec![3.0, 3.0]);
    }

    #[test]
    fn leading_gaps_are_ignored() {
        let cells = segment_cells(&column(&[M, M, M, Some(1.5), Some(1.5)]));
        assert_eq!(masses(&cells), vec![3.0]);
    }

    #[test]
    fn negative_runs_are_discarded() {
        let cells = segment_cells(&column(&[Some(-1.0), M, Some(3.0), M]));
        assert_eq!(masses(&cells), vec![3.0]);

        let cells = segment_cells(&column(&[Some(-4.0), Some(1.0), M, Some(-0.5)]));
        assert!(cells.is_empty());
    }

    #[test]
    fn run_with_negative_readings_but_positive_total() {
        let cells = segment_cells(&column(&[Some(-1.0), Some(5.0), M]));
        assert_eq!(masses(&cells), vec![4.0]);
    }

    #[test]
    fn segmenter_finishes_once() {
        let mut segmenter = CellSegmenter::default();
        assert_eq!(segmenter.signal(Value::new(2.0)), None);
        assert_eq!(segmenter.finish(), Some(Cell { total_mass: 2.0 }));
        assert_eq!(segmenter.finish(), None);
        assert_eq!(segmenter.signal(Value::MISSING), None);
    }
}
