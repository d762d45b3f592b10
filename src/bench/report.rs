//! Timing and result reporting

use super::Operation;
use crate::dtype::DType;
use std::fmt;
use std::time::{Duration, Instant};

/// A timed step outside the measured kernel, such as reading input
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    /// What the step did
    pub label: &'static str,
    /// Wall time of the step
    pub elapsed: Duration,
}

/// Result of one completed benchmark invocation
#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    /// What was measured
    pub label: &'static str,
    /// The kernel that ran
    pub operation: Operation,
    /// Element type of the kernel
    pub dtype: DType,
    /// Number of execution units
    pub units: usize,
    /// Problem size from the configuration
    pub size: usize,
    /// Kernel repetitions (or sweeps) inside the timed region
    pub reps: u64,
    /// Wall time of the timed region
    pub elapsed: Duration,
    /// One result value, printed for sanity checking
    pub sample: String,
    /// Untimed-kernel steps, in execution order
    pub phases: Vec<Phase>,
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for phase in &self.phases {
            writeln!(f, "{}: {:.9} s", phase.label, phase.elapsed.as_secs_f64())?;
        }
        write!(
            f,
            "{} [{} {}, units={}, size={}, reps={}]: {:.9} s, sample = {}",
            self.label,
            self.operation,
            self.dtype,
            self.units,
            self.size,
            self.reps,
            self.elapsed.as_secs_f64(),
            self.sample
        )
    }
}

/// How a benchmark invocation ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The kernel ran and was timed
    Completed(BenchReport),
    /// A collective allocation failed; nothing was computed
    Aborted,
}

/// Time `f` with a monotonic clock
pub fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let r = f();
    (r, start.elapsed())
}
