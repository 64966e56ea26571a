//! Makespan evaluation and feasibility repair.
//!
//! # Algorithm
//!
//! Tasks are dispatched in `order`. Each task starts at the later of
//!
//! - its ready time: the latest predecessor end time plus the transfer
//!   delay `volume * comm_rate[p_from][p_to]` (zero on the same processor)
//! - the moment its processor becomes free
//!
//! and occupies its processor for `comp_cost[task][processor]`.
//!
//! An order that dispatches a successor before one of its predecessors
//! sees that predecessor's end time as zero, which can produce a schedule
//! violating precedence. [`solve`] repairs this by moving the consumer of
//! the first violated edge to the tail of the order and re-evaluating,
//! until every edge is respected or the [`RepairLimit`] is exhausted.

use tracing::{debug, trace};

use super::config::RepairLimit;
use super::types::{validate_parts, ScheduleResult};
use crate::error::{Error, Result};
use crate::graph::TaskGraph;

/// Outcome of [`solve`]: the repaired order and its schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    /// Dispatch order after repair; adopt it as the solution's order.
    pub order: Vec<usize>,
    /// Feasible schedule for `order`.
    pub schedule: ScheduleResult,
    /// Number of repair passes applied (0 if the input was feasible).
    pub passes: usize,
}

/// Computes start/end times and makespan for a dispatch order.
///
/// Runs in `O(tasks + edges)` and performs no validation or repair.
/// Tasks missing from `order` keep start and end time 0.
///
/// # Panics
///
/// Panics if a task id in `order` or a processor id in `assignment` is out
/// of range, or if `assignment` is shorter than the task count. Use
/// [`solve`] for checked evaluation.
pub fn evaluate(order: &[usize], assignment: &[usize], graph: &TaskGraph) -> ScheduleResult {
    let n = graph.task_count();
    let mut start_time = vec![0.0; n];
    let mut end_time = vec![0.0; n];
    let mut processor_free = vec![0.0; graph.processor_count()];

    for &task in order {
        let p = assignment[task];

        let ready = graph
            .predecessors(task)
            .iter()
            .map(|pred| {
                end_time[pred.task] + graph.transfer_delay(pred.volume, assignment[pred.task], p)
            })
            .fold(0.0, f64::max);

        let start = f64::max(ready, processor_free[p]);
        let end = start + graph.comp_cost(task, p);
        start_time[task] = start;
        end_time[task] = end;
        processor_free[p] = end;
    }

    let makespan = end_time.iter().copied().fold(0.0, f64::max);
    ScheduleResult {
        start_time,
        end_time,
        makespan,
    }
}

/// True iff `end_time[from] <= start_time[to]` for every edge.
pub fn is_feasible(result: &ScheduleResult, graph: &TaskGraph) -> bool {
    first_violation(result, graph).is_none()
}

/// Index of the first edge (in input order) whose precedence is violated.
fn first_violation(result: &ScheduleResult, graph: &TaskGraph) -> Option<usize> {
    graph
        .edges()
        .iter()
        .position(|e| result.end_time[e.from] > result.start_time[e.to])
}

/// Validates, evaluates, and repairs a solution with the default
/// [`RepairLimit`].
///
/// # Errors
///
/// - [`Error::MalformedSolution`] if `order` is not a permutation of all
///   tasks or `assignment` is incomplete or out of range
/// - [`Error::RepairDivergence`] if repair does not converge; with the
///   default limit this only happens on cyclic graphs
///
/// # Examples
///
/// ```
/// use u_dagsched::graph::{Edge, TaskGraph};
/// use u_dagsched::schedule::solve;
///
/// let graph = TaskGraph::new(
///     vec![vec![2.0], vec![3.0]],
///     vec![vec![0.0]],
///     vec![Edge::new(0, 1, 1.0)],
/// )
/// .unwrap();
///
/// // Task 1 is dispatched first, so repair moves it behind task 0.
/// let repaired = solve(vec![1, 0], &[0, 0], &graph).unwrap();
/// assert_eq!(repaired.order, vec![0, 1]);
/// assert_eq!(repaired.schedule.makespan, 5.0);
/// ```
pub fn solve(order: Vec<usize>, assignment: &[usize], graph: &TaskGraph) -> Result<Repaired> {
    solve_with_limit(order, assignment, graph, RepairLimit::default())
}

/// [`solve`] with an explicit repair pass cap.
pub fn solve_with_limit(
    mut order: Vec<usize>,
    assignment: &[usize],
    graph: &TaskGraph,
    limit: RepairLimit,
) -> Result<Repaired> {
    let (schedule, passes) = repair_in_place(&mut order, assignment, graph, limit)?;
    Ok(Repaired {
        order,
        schedule,
        passes,
    })
}

/// Validates, then evaluates and repairs `order` in place.
///
/// Returns the feasible schedule and the number of repair passes.
pub(crate) fn repair_in_place(
    order: &mut Vec<usize>,
    assignment: &[usize],
    graph: &TaskGraph,
    limit: RepairLimit,
) -> Result<(ScheduleResult, usize)> {
    validate_parts(order, assignment, graph)?;

    let cap = limit.pass_cap(graph);
    let mut result = evaluate(order, assignment, graph);
    let mut passes = 0;

    while let Some(edge_index) = first_violation(&result, graph) {
        if cap.is_some_and(|cap| passes >= cap) {
            return Err(Error::RepairDivergence { passes });
        }

        let edge = graph.edges()[edge_index];
        debug!(
            from = edge.from,
            to = edge.to,
            from_end = result.end_time[edge.from],
            to_start = result.start_time[edge.to],
            "precedence violated, moving successor to tail"
        );

        if let Some(pos) = order.iter().position(|&t| t == edge.to) {
            let task = order.remove(pos);
            order.push(task);
        }

        result = evaluate(order, assignment, graph);
        passes += 1;
    }

    if passes > 0 {
        trace!(passes, makespan = result.makespan, "repaired to a feasible schedule");
    }
    Ok((result, passes))
}
