//! Solution and schedule types.

use std::fmt;

use super::config::RepairLimit;
use super::evaluator::{is_feasible, repair_in_place};
use crate::error::{Malformed, Result};
use crate::graph::TaskGraph;

/// A candidate schedule: dispatch order plus processor assignment.
///
/// `order` is the sequence in which tasks are dispatched to their
/// processors; `assignment[t]` is the processor running task `t`.
/// `cost` caches the makespan of the last evaluation and is `None` until
/// the solution has been evaluated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Dispatch order; a permutation of all task ids.
    pub order: Vec<usize>,
    /// Processor id per task.
    pub assignment: Vec<usize>,
    /// Makespan of the last evaluation.
    pub cost: Option<f64>,
}

impl Solution {
    /// Creates an unevaluated solution.
    pub fn new(order: Vec<usize>, assignment: Vec<usize>) -> Self {
        Self {
            order,
            assignment,
            cost: None,
        }
    }

    /// Checks that `order` is a permutation of all tasks and that
    /// `assignment` has one in-range processor per task.
    pub fn validate(&self, graph: &TaskGraph) -> std::result::Result<(), Malformed> {
        validate_parts(&self.order, &self.assignment, graph)
    }

    /// Evaluates the solution, repairing precedence violations.
    ///
    /// On success `order` holds the repaired order and `cost` the makespan.
    /// The returned schedule corresponds to the repaired order.
    pub fn evaluate(&mut self, graph: &TaskGraph, limit: RepairLimit) -> Result<ScheduleResult> {
        let (schedule, _) = repair_in_place(&mut self.order, &self.assignment, graph, limit)?;
        self.cost = Some(schedule.makespan);
        Ok(schedule)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ss :")?;
        for t in &self.order {
            write!(f, " {t}")?;
        }
        write!(f, "\nms :")?;
        for p in &self.assignment {
            write!(f, " {p}")?;
        }
        match self.cost {
            Some(c) => write!(f, "\ncost : {c}"),
            None => write!(f, "\ncost : -"),
        }
    }
}

pub(crate) fn validate_parts(
    order: &[usize],
    assignment: &[usize],
    graph: &TaskGraph,
) -> std::result::Result<(), Malformed> {
    let n = graph.task_count();
    let not_perm = Malformed::NotAPermutation {
        expected: n,
        found: order.len(),
    };
    if order.len() != n {
        return Err(not_perm);
    }
    let mut seen = vec![false; n];
    for &t in order {
        if t >= n || seen[t] {
            return Err(not_perm);
        }
        seen[t] = true;
    }

    if assignment.len() != n {
        return Err(Malformed::AssignmentLength {
            expected: n,
            found: assignment.len(),
        });
    }
    let processor_count = graph.processor_count();
    if let Some((task, &processor)) = assignment
        .iter()
        .enumerate()
        .find(|&(_, &p)| p >= processor_count)
    {
        return Err(Malformed::ProcessorOutOfRange {
            task,
            processor,
            processor_count,
        });
    }
    Ok(())
}

/// Per-task timing produced by the evaluator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleResult {
    /// Start time per task.
    pub start_time: Vec<f64>,
    /// End time per task.
    pub end_time: Vec<f64>,
    /// Latest end time over all tasks.
    pub makespan: f64,
}

impl ScheduleResult {
    /// Whether every precedence edge is respected.
    ///
    /// See [`is_feasible`](super::is_feasible).
    pub fn is_feasible(&self, graph: &TaskGraph) -> bool {
        is_feasible(self, graph)
    }
}
