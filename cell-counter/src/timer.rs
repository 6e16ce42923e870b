use std::time::{Duration, Instant};
use tracing::info;

#[derive(Default)]
pub(crate) struct Timer {
    start: Option<Instant>,
    duration: Duration,
}

impl Timer {
    pub(crate) fn record(&mut self) -> Option<()> {
        if self.start.is_none() {
            self.start = Some(Instant::now());
            Some(())
        } else {
            None
        }
    }

    pub(crate) fn end(&mut self) -> Option<()> {
        self.duration = Instant::now().checked_duration_since(self.start?)?;
        self.start = None;
        Some(())
    }

    pub(crate) fn duration(&self) -> Duration {
        self.duration
    }
}

/// Wall-clock time of each phase of a run.
#[derive(Default)]
pub(crate) struct TimerSuite {
    pub(crate) full: Timer,
    pub(crate) load: Timer,
    pub(crate) processing: Timer,
    pub(crate) write: Timer,
}

impl TimerSuite {
    pub(crate) fn print(&self) {
        info!(
            "Load: {0}ms, Processing: {1}ms, Write: {2}ms",
            self.load.duration().as_millis(),
            self.processing.duration().as_millis(),
            self.write.duration().as_millis()
        );
        info!("Finished in {0:.3} sec", self.full.duration().as_secs_f64());
    }
}
