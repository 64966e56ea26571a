//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Start from the supplied seed solution (or build one) and evaluate it
//! 2. At each iteration:
//!    a. Sample `candidates_per_iteration` random neighbors and evaluate
//!    each with feasibility repair, adopting the repaired order
//!    b. Select the cheapest admissible candidate: its move is not tabu,
//!    or it beats the global best (aspiration). If none is admissible,
//!    take the cheapest candidate overall
//!    c. Add the winning move to the tabu memory and make it current
//!    d. Update the global best on strict improvement
//!    e. Age the tabu memory by one iteration
//! 3. Stop after `max_iterations` (or when the time limit is exceeded,
//!    checked between iterations)
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::config::{InitialStrategy, TabuConfig};
use super::memory::TabuMemory;
use super::neighborhood::random_move;
use super::types::Move;
use crate::error::{Error, Result};
use crate::graph::TaskGraph;
use crate::schedule::{heuristic_solution, random_solution, Solution};

/// Upper bound on history entries reserved up front.
const HISTORY_PREALLOC: usize = 4096;

/// Result of a Tabu Search run.
#[derive(Debug, Clone)]
pub struct TabuResult {
    /// Best solution found, with `cost` populated.
    pub best: Solution,
    /// Makespan of the best solution.
    pub best_cost: f64,
    /// Total iterations executed.
    pub iterations: usize,
    /// Iteration (1-based) at which the best solution was found; 0 if the
    /// starting solution was never improved.
    pub best_iteration: usize,
    /// Best cost after each iteration.
    pub cost_history: Vec<f64>,
    /// Current cost after each iteration.
    pub current_history: Vec<f64>,
    /// Whether the run stopped on the time limit.
    pub timed_out: bool,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// An evaluated neighbor and the move that produced it.
#[derive(Debug, Clone)]
struct Candidate {
    solution: Solution,
    mv: Move,
    cost: f64,
}

/// Mutable state of a single search run.
#[derive(Debug)]
struct SearchState {
    current: Solution,
    current_cost: f64,
    best: Solution,
    best_cost: f64,
    best_iteration: usize,
    iteration: usize,
    memory: TabuMemory,
}

impl SearchState {
    fn new(start: Solution, cost: f64, tenure: usize) -> Self {
        Self {
            best: start.clone(),
            best_cost: cost,
            current: start,
            current_cost: cost,
            best_iteration: 0,
            iteration: 0,
            memory: TabuMemory::new(tenure),
        }
    }

    /// Applies one iteration's selection and bookkeeping.
    ///
    /// Returns `false` if there was nothing to select from.
    fn advance(&mut self, candidates: Vec<Candidate>, aspiration: bool) -> bool {
        let Some(index) = select(&candidates, &self.memory, self.best_cost, aspiration) else {
            return false;
        };
        let Some(chosen) = candidates.into_iter().nth(index) else {
            return false;
        };

        self.memory.add(chosen.mv);
        self.current = chosen.solution;
        self.current_cost = chosen.cost;
        self.iteration += 1;

        if self.current_cost < self.best_cost {
            debug!(
                iteration = self.iteration,
                previous = self.best_cost,
                best = self.current_cost,
                "new best"
            );
            self.best = self.current.clone();
            self.best_cost = self.current_cost;
            self.best_iteration = self.iteration;
        }

        self.memory.decrement_all();
        true
    }
}

/// Picks the winning candidate index.
///
/// Lowest cost among admissible candidates (not tabu, or strictly better
/// than `best_cost` when aspiration is on), ties to the first seen. Falls
/// back to the lowest cost overall when nothing is admissible.
fn select(
    candidates: &[Candidate],
    memory: &TabuMemory,
    best_cost: f64,
    aspiration: bool,
) -> Option<usize> {
    let admissible = |c: &Candidate| !memory.contains(&c.mv) || (aspiration && c.cost < best_cost);

    lowest_cost(candidates.iter().enumerate().filter(|&(_, c)| admissible(c)))
        .or_else(|| lowest_cost(candidates.iter().enumerate()))
}

fn lowest_cost<'a>(iter: impl Iterator<Item = (usize, &'a Candidate)>) -> Option<usize> {
    let mut winner: Option<(usize, f64)> = None;
    for (i, c) in iter {
        if winner.is_none_or(|(_, cost)| c.cost < cost) {
            winner = Some((i, c.cost));
        }
    }
    winner.map(|(i, _)| i)
}

/// Tabu Search runner.
pub struct TabuRunner;

impl TabuRunner {
    /// Executes Tabu Search, seeding the RNG from `config.seed`.
    ///
    /// `seed` is the starting solution; when `None`, one is built according
    /// to `config.initial`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] if `config` fails validation
    /// - [`Error::MalformedSolution`] if the seed solution is malformed
    /// - [`Error::RepairDivergence`] if any evaluation fails to repair
    /// - [`Error::CyclicGraph`] for [`InitialStrategy::Heuristic`] on a
    ///   cyclic graph
    ///
    /// Evaluation failures abort the run; there is no partial result.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_dagsched::graph::{Edge, TaskGraph};
    /// use u_dagsched::tabu::{TabuConfig, TabuRunner};
    ///
    /// let graph = TaskGraph::new(
    ///     vec![vec![4.0, 2.0], vec![3.0, 3.0], vec![2.0, 5.0]],
    ///     vec![vec![0.0, 1.0], vec![1.0, 0.0]],
    ///     vec![Edge::new(0, 2, 2.0), Edge::new(1, 2, 1.0)],
    /// )
    /// .unwrap();
    ///
    /// let config = TabuConfig::default().with_max_iterations(50).with_seed(7);
    /// let result = TabuRunner::run(&graph, None, &config).unwrap();
    /// assert_eq!(result.best.cost, Some(result.best_cost));
    /// ```
    pub fn run(graph: &TaskGraph, seed: Option<Solution>, config: &TabuConfig) -> Result<TabuResult> {
        let mut rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self::run_with_rng(graph, seed, config, &mut rng)
    }

    /// Executes Tabu Search with a caller-owned random number generator.
    ///
    /// `config.seed` is ignored.
    pub fn run_with_rng<R: Rng>(
        graph: &TaskGraph,
        seed: Option<Solution>,
        config: &TabuConfig,
        rng: &mut R,
    ) -> Result<TabuResult> {
        config.validate().map_err(Error::InvalidConfig)?;
        let started = Instant::now();
        let time_limit = config.time_limit_ms.map(Duration::from_millis);

        let mut start = match seed {
            Some(solution) => solution,
            None => match config.initial {
                InitialStrategy::Random => random_solution(graph, rng),
                InitialStrategy::Heuristic => heuristic_solution(graph)?,
            },
        };
        let start_cost = start.evaluate(graph, config.repair)?.makespan;

        info!(
            tasks = graph.task_count(),
            processors = graph.processor_count(),
            max_iterations = config.max_iterations,
            tenure = config.tabu_tenure,
            candidates = config.candidates_per_iteration,
            start_cost,
            "tabu search started"
        );

        let mut state = SearchState::new(start, start_cost, config.tabu_tenure);
        let capacity = config.max_iterations.min(HISTORY_PREALLOC);
        let mut cost_history = Vec::with_capacity(capacity);
        let mut current_history = Vec::with_capacity(capacity);
        let mut timed_out = false;

        while state.iteration < config.max_iterations {
            if time_limit.is_some_and(|limit| started.elapsed() >= limit) {
                timed_out = true;
                break;
            }

            let candidates = generate_candidates(&state.current, graph, config, rng)?;
            if !state.advance(candidates, config.aspiration) {
                break;
            }

            cost_history.push(state.best_cost);
            current_history.push(state.current_cost);
        }

        let elapsed = started.elapsed();
        info!(
            iterations = state.iteration,
            best_cost = state.best_cost,
            best_iteration = state.best_iteration,
            timed_out,
            ?elapsed,
            "tabu search finished"
        );

        Ok(TabuResult {
            best: state.best,
            best_cost: state.best_cost,
            iterations: state.iteration,
            best_iteration: state.best_iteration,
            cost_history,
            current_history,
            timed_out,
            elapsed,
        })
    }
}

/// Samples and evaluates one iteration's neighbors.
fn generate_candidates<R: Rng>(
    current: &Solution,
    graph: &TaskGraph,
    config: &TabuConfig,
    rng: &mut R,
) -> Result<Vec<Candidate>> {
    (0..config.candidates_per_iteration)
        .map(|_| -> Result<Candidate> {
            let (mut solution, mv) = random_move(current, graph, rng);
            let cost = solution.evaluate(graph, config.repair)?.makespan;
            trace!(?mv, cost, "candidate");
            Ok(Candidate { solution, mv, cost })
        })
        .collect()
}

/// Runs Tabu Search and returns the best solution found.
///
/// Shorthand for [`TabuRunner::run`] keeping only `best`.
pub fn tabu_search(graph: &TaskGraph, seed: Option<Solution>, config: &TabuConfig) -> Result<Solution> {
    TabuRunner::run(graph, seed, config).map(|result| result.best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Malformed;
    use crate::graph::Edge;
    use crate::schedule::{solve, RepairLimit};

    fn candidate(mv: Move, cost: f64) -> Candidate {
        Candidate {
            solution: Solution::new(vec![0], vec![0]),
            mv,
            cost,
        }
    }

    fn swap(i: usize, j: usize) -> Move {
        Move::SwapOrder { i, j }
    }

    /// 0 -> {1, 2} -> 3 plus an independent task 4, on three processors.
    fn workflow() -> TaskGraph {
        TaskGraph::new(
            vec![
                vec![4.0, 6.0, 5.0],
                vec![3.0, 2.0, 7.0],
                vec![5.0, 4.0, 1.0],
                vec![2.0, 3.0, 2.0],
                vec![6.0, 6.0, 3.0],
            ],
            vec![
                vec![0.0, 0.5, 1.0],
                vec![0.5, 0.0, 2.0],
                vec![1.0, 2.0, 0.0],
            ],
            vec![
                Edge::new(0, 1, 2.0),
                Edge::new(0, 2, 3.0),
                Edge::new(1, 3, 1.0),
                Edge::new(2, 3, 4.0),
            ],
        )
        .unwrap()
    }

    // ---- Selection ----

    #[test]
    fn test_select_prefers_cheapest_non_tabu() {
        let memory = TabuMemory::new(5);
        let cands = vec![candidate(swap(0, 1), 9.0), candidate(swap(1, 2), 7.0)];
        assert_eq!(select(&cands, &memory, 8.0, true), Some(1));
    }

    #[test]
    fn test_select_skips_tabu_without_improvement() {
        let mut memory = TabuMemory::new(5);
        memory.add(swap(1, 2));
        let cands = vec![candidate(swap(0, 1), 9.0), candidate(swap(2, 1), 8.5)];
        assert_eq!(select(&cands, &memory, 8.0, true), Some(0));
    }

    #[test]
    fn test_select_aspiration_overrides_tabu() {
        let mut memory = TabuMemory::new(5);
        memory.add(swap(1, 2));
        let cands = vec![candidate(swap(0, 1), 9.0), candidate(swap(1, 2), 6.0)];
        assert_eq!(select(&cands, &memory, 8.0, true), Some(1));
        assert_eq!(select(&cands, &memory, 8.0, false), Some(0));
    }

    #[test]
    fn test_select_falls_back_to_cheapest_overall() {
        let mut memory = TabuMemory::new(5);
        memory.add(swap(0, 1));
        memory.add(swap(1, 2));
        let cands = vec![candidate(swap(0, 1), 12.0), candidate(swap(1, 2), 10.0)];
        assert_eq!(select(&cands, &memory, 8.0, true), Some(1));
    }

    #[test]
    fn test_select_ties_go_to_first_seen() {
        let memory = TabuMemory::new(5);
        let cands = vec![
            candidate(swap(0, 1), 9.0),
            candidate(swap(1, 2), 7.0),
            candidate(swap(2, 3), 7.0),
        ];
        assert_eq!(select(&cands, &memory, 8.0, true), Some(1));
    }

    #[test]
    fn test_select_empty() {
        assert_eq!(select(&[], &TabuMemory::new(1), 1.0, true), None);
    }

    // ---- Driver state ----

    #[test]
    fn test_advance_aspiration_updates_best() {
        let start = Solution::new(vec![0], vec![0]);
        let mut state = SearchState::new(start, 10.0, 5);
        state.memory.add(swap(3, 4));

        // Only the tabu move improves on the best.
        let improving = Candidate {
            solution: Solution::new(vec![0], vec![1]),
            mv: swap(4, 3),
            cost: 7.0,
        };
        assert!(state.advance(vec![candidate(swap(0, 1), 11.0), improving], true));

        assert_eq!(state.best_cost, 7.0);
        assert_eq!(state.best.assignment, vec![1]);
        assert_eq!(state.best_iteration, 1);
        assert!(state.memory.contains(&swap(3, 4)));
    }

    #[test]
    fn test_advance_accepts_worsening_move() {
        let start = Solution::new(vec![0], vec![0]);
        let mut state = SearchState::new(start, 5.0, 3);
        assert!(state.advance(vec![candidate(swap(0, 1), 6.0)], true));
        assert_eq!(state.current_cost, 6.0);
        assert_eq!(state.best_cost, 5.0);
        assert_eq!(state.best_iteration, 0);
        assert_eq!(state.iteration, 1);
    }

    #[test]
    fn test_advance_tenure_counts_selecting_iteration() {
        let mut state = SearchState::new(Solution::new(vec![0], vec![0]), 5.0, 2);
        state.advance(vec![candidate(swap(0, 1), 6.0)], true);
        assert!(state.memory.contains(&swap(0, 1)));
        state.advance(vec![candidate(swap(1, 2), 6.0)], true);
        assert!(!state.memory.contains(&swap(0, 1)));
    }

    // ---- End to end ----

    #[test]
    fn test_single_processor_makespan_is_sum() {
        let costs = [3.0, 1.5, 4.0, 2.5];
        let graph = TaskGraph::new(
            costs.iter().map(|&c| vec![c]).collect(),
            vec![vec![0.0]],
            vec![Edge::new(0, 2, 5.0), Edge::new(1, 3, 2.0)],
        )
        .unwrap();
        let total: f64 = costs.iter().sum();
        let config = TabuConfig::default()
            .with_max_iterations(30)
            .with_candidates_per_iteration(8)
            .with_seed(5);

        let result = TabuRunner::run(&graph, None, &config).unwrap();

        assert_eq!(result.best_cost, total);
        assert_eq!(result.best.assignment, vec![0; 4]);
        assert_eq!(result.best_iteration, 0, "nothing can improve on the start");
        assert!(result.cost_history.iter().all(|&c| c == total));
        assert!(result.current_history.iter().all(|&c| c == total));
    }

    #[test]
    fn test_finds_parallel_placement() {
        // Two independent tasks on two identical processors: optimum runs both at once.
        let graph = TaskGraph::new(
            vec![vec![5.0, 5.0], vec![5.0, 5.0]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            vec![],
        )
        .unwrap();
        let seed = Solution::new(vec![0, 1], vec![0, 0]);
        let config = TabuConfig::default()
            .with_max_iterations(20)
            .with_candidates_per_iteration(10)
            .with_seed(1);

        let result = TabuRunner::run(&graph, Some(seed), &config).unwrap();
        assert_eq!(result.best_cost, 5.0);
        assert_ne!(result.best.assignment[0], result.best.assignment[1]);
        assert!(result.best_iteration >= 1);
    }

    #[test]
    fn test_best_history_non_increasing_and_improves() {
        let graph = workflow();
        let config = TabuConfig::default()
            .with_max_iterations(100)
            .with_candidates_per_iteration(20)
            .with_seed(42);

        let result = TabuRunner::run(&graph, None, &config).unwrap();

        assert_eq!(result.iterations, 100);
        assert_eq!(result.cost_history.len(), 100);
        assert_eq!(result.current_history.len(), 100);
        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best cost history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
        for (best, current) in result.cost_history.iter().zip(&result.current_history) {
            assert!(best <= current);
        }
        assert!(!result.timed_out);
    }

    #[test]
    fn test_best_solution_is_feasible_as_stored() {
        let graph = workflow();
        let config = TabuConfig::default().with_max_iterations(60).with_seed(9);
        let result = TabuRunner::run(&graph, None, &config).unwrap();

        // The stored order is the repaired one, so re-solving needs no repair.
        let repaired = solve(result.best.order.clone(), &result.best.assignment, &graph).unwrap();
        assert_eq!(repaired.passes, 0);
        assert_eq!(repaired.schedule.makespan, result.best_cost);
        assert_eq!(result.best.cost, Some(result.best_cost));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let graph = workflow();
        let config = TabuConfig::default().with_max_iterations(40).with_seed(77);
        let a = TabuRunner::run(&graph, None, &config).unwrap();
        let b = TabuRunner::run(&graph, None, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_never_worse_than_heuristic_start() {
        let graph = workflow();
        let start = heuristic_solution(&graph).unwrap();
        let start_cost = solve(start.order.clone(), &start.assignment, &graph)
            .unwrap()
            .schedule
            .makespan;
        let config = TabuConfig::default()
            .with_max_iterations(50)
            .with_initial(InitialStrategy::Heuristic)
            .with_seed(3);

        let result = TabuRunner::run(&graph, None, &config).unwrap();
        assert!(result.best_cost <= start_cost);
    }

    #[test]
    fn test_malformed_seed_aborts() {
        let graph = workflow();
        let seed = Solution::new(vec![0, 1, 2], vec![0; 5]);
        let err = TabuRunner::run(&graph, Some(seed), &TabuConfig::default().with_seed(1));
        assert!(matches!(
            err,
            Err(Error::MalformedSolution(Malformed::NotAPermutation { .. }))
        ));
    }

    #[test]
    fn test_divergence_aborts_run() {
        let graph = TaskGraph::new(
            vec![vec![1.0], vec![1.0]],
            vec![vec![0.0]],
            vec![Edge::new(0, 1, 0.0), Edge::new(1, 0, 0.0)],
        )
        .unwrap();
        let config = TabuConfig::default()
            .with_seed(1)
            .with_repair_limit(RepairLimit::default().with_passes_per_task(2));
        assert!(matches!(
            TabuRunner::run(&graph, None, &config),
            Err(Error::RepairDivergence { .. })
        ));
    }

    #[test]
    fn test_dense_dag_runs_with_default_repair() {
        use rand::seq::SliceRandom;

        let n = 60;
        let mut rng = StdRng::seed_from_u64(11);
        let costs = (0..n)
            .map(|_| (0..4).map(|_| rng.random_range(1.0..10.0)).collect())
            .collect();
        let rates = (0..4)
            .map(|a| (0..4).map(|b| if a == b { 0.0 } else { 1.0 }).collect())
            .collect();
        let mut edges = Vec::new();
        for a in 0..n {
            for b in (a + 1)..n {
                if rng.random_bool(0.3) {
                    edges.push(Edge::new(a, b, rng.random_range(1.0..20.0)));
                }
            }
        }
        edges.shuffle(&mut rng);
        let graph = TaskGraph::new(costs, rates, edges).unwrap();
        assert!(graph.topological_order().is_ok());

        for seed in 0..3 {
            let config = TabuConfig::default()
                .with_max_iterations(5)
                .with_candidates_per_iteration(20)
                .with_seed(seed);
            let result = TabuRunner::run(&graph, None, &config)
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
            assert!(solve(result.best.order.clone(), &result.best.assignment, &graph).is_ok());
        }
    }

    #[test]
    fn test_invalid_config() {
        let config = TabuConfig::default().with_candidates_per_iteration(0);
        assert!(matches!(
            TabuRunner::run(&workflow(), None, &config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_time_limit_stops_between_iterations() {
        let graph = workflow();
        let config = TabuConfig::default()
            .with_max_iterations(usize::MAX)
            .with_candidates_per_iteration(5)
            .with_time_limit_ms(20)
            .with_seed(2);
        let result = TabuRunner::run(&graph, None, &config).unwrap();
        assert!(result.timed_out);
        assert_eq!(result.cost_history.len(), result.iterations);
    }

    #[test]
    fn test_tabu_search_returns_best() {
        let graph = workflow();
        let config = TabuConfig::default().with_max_iterations(30).with_seed(11);
        let best = tabu_search(&graph, None, &config).unwrap();
        let result = TabuRunner::run(&graph, None, &config).unwrap();
        assert_eq!(best, result.best);
    }

    #[test]
    fn test_run_with_rng_matches_seeded_run() {
        let graph = workflow();
        let config = TabuConfig::default().with_max_iterations(25).with_seed(13);
        let a = TabuRunner::run(&graph, None, &config).unwrap();
        let b = TabuRunner::run_with_rng(&graph, None, &config, &mut StdRng::seed_from_u64(13)).unwrap();
        assert_eq!(a.best, b.best);
    }
}
