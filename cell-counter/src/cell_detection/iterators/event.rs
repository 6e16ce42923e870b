use super::super::Detector;

/// Feeds a source iterator through a [Detector], yielding its events.
/// Once the source is exhausted the detector is flushed exactly once.
#[derive(Clone)]
pub(crate) struct EventIter<I, D>
where
    I: Iterator<Item = D::InputType>,
    D: Detector,
{
    source: I,
    detector: D,
    finished: bool,
}

impl<I, D> Iterator for EventIter<I, D>
where
    I: Iterator<Item = D::InputType>,
    D: Detector,
{
    type Item = D::EventType;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        for value in &mut self.source {
            if let Some(event) = self.detector.signal(value) {
                return Some(event);
            }
        }
        self.finished = true;
        self.detector.finish()
    }
}

pub(crate) trait EventFilter<I, D>
where
    I: Iterator<Item = D::InputType>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D>;
}

impl<I, D> EventFilter<I, D> for I
where
    I: Iterator<Item = D::InputType>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D> {
        EventIter {
            source: self,
            detector,
            finished: false,
        }
    }
}
