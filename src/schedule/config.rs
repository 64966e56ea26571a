//! Feasibility repair limits.

use crate::graph::TaskGraph;

/// Smallest per-task allowance for the cycle guard.
const MIN_AUTO_PASSES_PER_TASK: usize = 64;

/// Caps the number of repair passes performed by
/// [`solve_with_limit`](super::solve_with_limit).
///
/// Each pass moves one precedence-violating task to the tail of the
/// order and re-evaluates. After its move a task follows all of its
/// predecessors, and it is violated again only when one of them moves, so
/// on an acyclic graph repair always terminates. The pass count has no
/// useful polynomial bound though: it grows faster than the square of the
/// task count on dense graphs with a shuffled edge list.
///
/// Left unset, repair on an acyclic graph is uncapped, and the cap
/// `max(task_count, 64) * task_count` only guards against cycles. An
/// explicit `passes_per_task` caps every graph at
/// `passes_per_task * task_count`.
///
/// # Examples
///
/// ```
/// use u_dagsched::graph::{Edge, TaskGraph};
/// use u_dagsched::schedule::RepairLimit;
///
/// assert_eq!(RepairLimit::default().max_passes(10), 640);
/// assert_eq!(RepairLimit::default().max_passes(100), 10_000);
///
/// let dag = TaskGraph::new(vec![vec![1.0]; 2], vec![vec![0.0]], vec![Edge::new(0, 1, 1.0)]).unwrap();
/// assert_eq!(RepairLimit::default().pass_cap(&dag), None);
///
/// let limit = RepairLimit::default().with_passes_per_task(8);
/// assert_eq!(limit.max_passes(10), 80);
/// assert_eq!(limit.pass_cap(&dag), Some(16));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepairLimit {
    /// Allowed repair passes per task (None for automatic).
    pub passes_per_task: Option<usize>,
}

impl RepairLimit {
    /// Sets a fixed number of passes allowed per task.
    pub fn with_passes_per_task(mut self, n: usize) -> Self {
        self.passes_per_task = Some(n);
        self
    }

    /// Pass cap applied to `graph`, or None if repair runs uncapped.
    pub fn pass_cap(&self, graph: &TaskGraph) -> Option<usize> {
        if self.passes_per_task.is_none() && graph.is_acyclic() {
            None
        } else {
            Some(self.max_passes(graph.task_count()))
        }
    }

    /// Total pass budget for a graph with `task_count` tasks.
    pub fn max_passes(&self, task_count: usize) -> usize {
        let per_task = self
            .passes_per_task
            .unwrap_or_else(|| task_count.max(MIN_AUTO_PASSES_PER_TASK));
        per_task.saturating_mul(task_count.max(1))
    }

    /// Validates the limit.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.passes_per_task == Some(0) {
            return Err("repair passes_per_task must be at least 1 or None".into());
        }
        Ok(())
    }
}
