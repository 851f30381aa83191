//! Lightweight stage timers.
//!
//! Every pipeline stage (resize, detector inference, alignment, warp, embedder inference, blur)
//! wraps its work in a [`Timer`] so the orchestrator can log where time actually goes without
//! pulling in a full tracing/metrics stack for what is, in the end, a handful of numbers.

use std::{
    fmt,
    time::{Duration, Instant},
};

/// Tracks an exponential moving average of how long a named operation takes.
pub struct Timer {
    name: &'static str,
    avg: Option<Duration>,
}

impl Timer {
    /// Smoothing factor for the exponential moving average: how much weight the latest sample
    /// gets relative to the running average.
    const ALPHA: f64 = 0.1;

    pub fn new(name: &'static str) -> Self {
        Self { name, avg: None }
    }

    /// Runs `f`, recording how long it took, and returns its result.
    pub fn time<R>(&mut self, f: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let result = f();
        self.record(start.elapsed());
        result
    }

    fn record(&mut self, sample: Duration) {
        self.avg = Some(match self.avg {
            Some(avg) => {
                let avg = avg.as_secs_f64();
                let sample = sample.as_secs_f64();
                Duration::from_secs_f64(avg + Self::ALPHA * (sample - avg))
            }
            None => sample,
        });
        log::trace!("{}: sample={:?} avg={:?}", self.name, sample, self.avg);
    }

    /// Returns the name this timer was created with.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the current moving average, or `None` if [`Timer::time`] was never called.
    pub fn average(&self) -> Option<Duration> {
        self.avg
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.avg {
            Some(avg) => write!(f, "{}: {:.3} ms", self.name, avg.as_secs_f64() * 1000.0),
            None => write!(f, "{}: (no samples)", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_first_sample_exactly() {
        // Lets `RUST_LOG=trace cargo test` surface the per-sample trace line `record` emits.
        let _ = env_logger::try_init();

        let mut t = Timer::new("test");
        assert!(t.average().is_none());
        t.time(|| std::thread::sleep(Duration::from_millis(1)));
        assert!(t.average().unwrap() >= Duration::from_millis(1));
    }

    #[test]
    fn returns_closure_result() {
        let mut t = Timer::new("test");
        let value = t.time(|| 42);
        assert_eq!(value, 42);
    }
}
