//! Tabu Search configuration.

use crate::schedule::RepairLimit;

/// How the search obtains its starting solution when none is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialStrategy {
    /// Shuffled order with uniformly random processors.
    #[default]
    Random,
    /// Greedy earliest-finish list schedule in topological order.
    Heuristic,
}

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use u_dagsched::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_max_iterations(1000)
///     .with_tabu_tenure(7)
///     .with_candidates_per_iteration(30)
///     .with_seed(42);
/// assert_eq!(config.max_iterations, 1000);
/// assert_eq!(config.tabu_tenure, 7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TabuConfig {
    /// Number of iterations to run.
    pub max_iterations: usize,
    /// How many iterations an applied move stays tabu.
    pub tabu_tenure: usize,
    /// Random neighbors generated and evaluated per iteration.
    pub candidates_per_iteration: usize,
    /// Whether a tabu move may be taken when it beats the global best.
    pub aspiration: bool,
    /// Random seed (None for a fresh random seed).
    pub seed: Option<u64>,
    /// Starting point when no seed solution is supplied.
    pub initial: InitialStrategy,
    /// Cap on feasibility repair passes per evaluation.
    pub repair: RepairLimit,
    /// Wall-clock budget, checked between iterations (None for no limit).
    pub time_limit_ms: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tabu_tenure: 10,
            candidates_per_iteration: 60,
            aspiration: true,
            seed: None,
            initial: InitialStrategy::Random,
            repair: RepairLimit::default(),
            time_limit_ms: None,
        }
    }
}

impl TabuConfig {
    /// Sets the number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the tabu tenure (number of iterations a move remains tabu).
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    /// Sets the number of neighbors sampled per iteration.
    pub fn with_candidates_per_iteration(mut self, n: usize) -> Self {
        self.candidates_per_iteration = n;
        self
    }

    /// Enables or disables aspiration criterion.
    pub fn with_aspiration(mut self, aspiration: bool) -> Self {
        self.aspiration = aspiration;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets how the starting solution is built.
    pub fn with_initial(mut self, initial: InitialStrategy) -> Self {
        self.initial = initial;
        self
    }

    /// Sets the repair pass cap.
    pub fn with_repair_limit(mut self, repair: RepairLimit) -> Self {
        self.repair = repair;
        self
    }

    /// Sets the wall-clock budget in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.candidates_per_iteration == 0 {
            return Err("candidates_per_iteration must be at least 1".into());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        self.repair.validate()
    }
}
