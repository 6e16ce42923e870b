pub(crate) mod cell_segmenter;

pub(crate) use cell_segmenter::{Cell, CellSegmenter, segment_cells};

/// A stateful scan over an ordered column.
/// `signal` is called once per row, in row order, and `finish` once after the
/// last row to flush any event still open.
pub(crate) trait Detector: Default + Clone {
    type InputType;
    type EventType;

    fn signal(&mut self, value: Self::InputType) -> Option<Self::EventType>;

    fn finish(&mut self) -> Option<Self::EventType>;
}
