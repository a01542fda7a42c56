//! Termination predicates checked once per iteration.

use crate::error::{AlnsError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Termination rule.
///
/// The two `NoImprovement` variants are accepted but never fire; a search
/// configured with them runs until stopped by other means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopMethod {
    /// Wall time in seconds.
    #[cfg_attr(feature = "serde", serde(rename = "timeout"))]
    ByTimeout,
    /// Number of iterations.
    #[cfg_attr(feature = "serde", serde(rename = "iteration"))]
    ByIterationLimit,
    #[cfg_attr(feature = "serde", serde(rename = "timeout_no_improvement"))]
    ByTimeoutNoImprovement,
    #[cfg_attr(feature = "serde", serde(rename = "iteration_no_improvement"))]
    ByIterationLimitNoImprovement,
}

impl StopMethod {
    pub const ALL: [StopMethod; 4] = [
        StopMethod::ByTimeout,
        StopMethod::ByIterationLimit,
        StopMethod::ByTimeoutNoImprovement,
        StopMethod::ByIterationLimitNoImprovement,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            StopMethod::ByTimeout => "timeout",
            StopMethod::ByIterationLimit => "iteration",
            StopMethod::ByTimeoutNoImprovement => "timeout_no_improvement",
            StopMethod::ByIterationLimitNoImprovement => "iteration_no_improvement",
        }
    }
}

impl fmt::Display for StopMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StopMethod {
    type Err = AlnsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or_else(|| AlnsError::config(format!("missing or unknown stop method `{s}`")))
    }
}

/// Iteration or wall-time budget of a search run.
#[derive(Debug, Clone)]
pub struct StopCondition {
    method: StopMethod,
    limit: u64,
    iteration: u64,
    started: Option<Instant>,
}

impl StopCondition {
    /// Creates a condition; `limit` (iterations or seconds) must be positive.
    pub fn new(method: StopMethod, limit: u64) -> Result<Self> {
        if limit == 0 {
            return Err(AlnsError::config("stop limit must be positive"));
        }
        Ok(Self {
            method,
            limit,
            iteration: 0,
            started: None,
        })
    }

    /// Creates a condition from a method label such as `"iteration"`.
    pub fn from_label(label: &str, limit: u64) -> Result<Self> {
        Self::new(label.parse()?, limit)
    }

    pub fn iterations(limit: u64) -> Result<Self> {
        Self::new(StopMethod::ByIterationLimit, limit)
    }

    pub fn seconds(limit: u64) -> Result<Self> {
        Self::new(StopMethod::ByTimeout, limit)
    }

    pub fn method(&self) -> StopMethod {
        self.method
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of [`stop`](Self::stop) calls since the last reset.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Captures the wall-clock origin.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Wall time since [`start`](Self::start), zero if not started.
    pub fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Counts one iteration and reports whether the budget is exhausted.
    pub fn stop(&mut self) -> bool {
        self.iteration += 1;
        match self.method {
            StopMethod::ByIterationLimit => self.iteration > self.limit,
            StopMethod::ByTimeout => {
                let started = *self.started.get_or_insert_with(Instant::now);
                started.elapsed() >= Duration::from_secs(self.limit)
            }
            StopMethod::ByTimeoutNoImprovement | StopMethod::ByIterationLimitNoImprovement => false,
        }
    }

    /// Clears the counter and the clock for another run.
    pub fn reset(&mut self) {
        self.iteration = 0;
        self.started = None;
    }
}
