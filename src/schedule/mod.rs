//! Schedule evaluation.
//!
//! Maps a [`Solution`] (dispatch order plus processor assignment) onto a
//! [`TaskGraph`](crate::graph::TaskGraph) and computes per-task start and
//! end times under processor contention and inter-processor communication
//! delay. The objective is the makespan.
//!
//! - [`evaluate`]: raw, unchecked `O(tasks + edges)` evaluation
//! - [`is_feasible`]: precedence check over all edges
//! - [`solve`]: validation, evaluation, and feasibility repair; returns
//!   the adjusted order alongside the schedule
//! - [`random_solution`], [`heuristic_solution`]: starting points for search

mod config;
mod evaluator;
mod initial;
mod types;

pub use config::RepairLimit;
pub use evaluator::{evaluate, is_feasible, solve, solve_with_limit, Repaired};
pub use initial::{heuristic_solution, random_solution};
pub use types::{ScheduleResult, Solution};
