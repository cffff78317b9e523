//! Search configuration

use std::time::Duration;

/// Default wall-clock budget per machine move
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(3);

/// Deepest iteration the driver will attempt
pub const DEFAULT_MAX_DEPTH: u32 = 20;

/// Limits for one iterative-deepening search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Total wall-clock time shared by all iterations
    pub time_budget: Duration,
    /// Iterations stop once the depth would exceed this
    pub max_depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_TIME_BUDGET,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SearchConfig {
    pub fn new(time_budget: Duration, max_depth: u32) -> Self {
        Self {
            time_budget,
            max_depth,
        }
    }

    /// Set the wall-clock budget
    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    /// Set the depth cap
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}
