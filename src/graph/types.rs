//! Task graph model.

use std::collections::VecDeque;

use crate::error::{Error, Result};

/// A precedence edge carrying a data volume.
///
/// Task `to` may not start before task `from` has finished and its
/// output (`volume` units) has been transferred to `to`'s processor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Producing task.
    pub from: usize,
    /// Consuming task.
    pub to: usize,
    /// Transferred data volume.
    pub volume: f64,
}

impl Edge {
    /// Creates an edge `from -> to` with the given volume.
    pub fn new(from: usize, to: usize, volume: f64) -> Self {
        Self { from, to, volume }
    }
}

/// An incoming edge as seen from its consuming task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Predecessor {
    /// Producing task.
    pub task: usize,
    /// Transferred data volume.
    pub volume: f64,
}

/// Static description of a heterogeneous scheduling instance.
///
/// Holds the computation-cost matrix (task x processor), the
/// communication-rate matrix (processor x processor), and the precedence
/// edges. A per-task predecessor index is derived once at construction.
///
/// The graph is immutable after construction and may be shared by
/// reference across independent search runs.
///
/// Cycles are accepted; [`is_acyclic`](TaskGraph::is_acyclic) records
/// whether the edge relation has one, and
/// [`topological_order`](TaskGraph::topological_order) rejects it.
///
/// # Examples
///
/// ```
/// use u_dagsched::graph::{Edge, TaskGraph};
///
/// let graph = TaskGraph::new(
///     vec![vec![3.0, 5.0], vec![2.0, 1.0]],
///     vec![vec![0.0, 1.0], vec![1.0, 0.0]],
///     vec![Edge::new(0, 1, 10.0)],
/// )
/// .unwrap();
/// assert_eq!(graph.task_count(), 2);
/// assert_eq!(graph.predecessors(1).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TaskGraph {
    processor_count: usize,
    task_count: usize,
    comp_cost: Vec<Vec<f64>>,
    comm_rate: Vec<Vec<f64>>,
    edges: Vec<Edge>,
    predecessors: Vec<Vec<Predecessor>>,
    acyclic: bool,
}

impl TaskGraph {
    /// Builds a graph from its cost tables and edge list.
    ///
    /// * `comp_cost[t][p]` - time to run task `t` on processor `p`
    /// * `comm_rate[a][b]` - per-unit transfer cost from processor `a` to `b`
    /// * `edges` - precedence edges, kept in the given order
    ///
    /// # Errors
    ///
    /// [`Error::InvalidGraph`] if there are no tasks or processors, a table
    /// row has the wrong width, an edge endpoint is out of range, or a cost,
    /// rate, or volume is negative or not finite.
    pub fn new(
        comp_cost: Vec<Vec<f64>>,
        comm_rate: Vec<Vec<f64>>,
        edges: Vec<Edge>,
    ) -> Result<Self> {
        let task_count = comp_cost.len();
        let processor_count = comm_rate.len();

        if task_count == 0 {
            return Err(Error::InvalidGraph("graph has no tasks".into()));
        }
        if processor_count == 0 {
            return Err(Error::InvalidGraph("graph has no processors".into()));
        }

        for (a, row) in comm_rate.iter().enumerate() {
            if row.len() != processor_count {
                return Err(Error::InvalidGraph(format!(
                    "comm_rate row {a} has {} entries, expected {processor_count}",
                    row.len()
                )));
            }
            if let Some(b) = row.iter().position(|r| !r.is_finite() || *r < 0.0) {
                return Err(Error::InvalidGraph(format!(
                    "comm_rate[{a}][{b}] = {} is not a non-negative number",
                    row[b]
                )));
            }
        }

        for (t, row) in comp_cost.iter().enumerate() {
            if row.len() != processor_count {
                return Err(Error::InvalidGraph(format!(
                    "comp_cost row {t} has {} entries, expected {processor_count}",
                    row.len()
                )));
            }
            if let Some(p) = row.iter().position(|c| !c.is_finite() || *c < 0.0) {
                return Err(Error::InvalidGraph(format!(
                    "comp_cost[{t}][{p}] = {} is not a non-negative number",
                    row[p]
                )));
            }
        }

        let mut predecessors = vec![Vec::new(); task_count];
        for (i, e) in edges.iter().enumerate() {
            if e.from >= task_count || e.to >= task_count {
                return Err(Error::InvalidGraph(format!(
                    "edge {i} ({} -> {}) references a task outside 0..{task_count}",
                    e.from, e.to
                )));
            }
            if !e.volume.is_finite() || e.volume < 0.0 {
                return Err(Error::InvalidGraph(format!(
                    "edge {i} has invalid volume {}",
                    e.volume
                )));
            }
            predecessors[e.to].push(Predecessor {
                task: e.from,
                volume: e.volume,
            });
        }

        let mut graph = Self {
            processor_count,
            task_count,
            comp_cost,
            comm_rate,
            edges,
            predecessors,
            acyclic: false,
        };
        graph.acyclic = graph.kahn_order().len() == task_count;
        Ok(graph)
    }

    /// Number of processors.
    pub fn processor_count(&self) -> usize {
        self.processor_count
    }

    /// Number of tasks.
    pub fn task_count(&self) -> usize {
        self.task_count
    }

    /// Number of precedence edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Time to execute `task` on `processor`.
    #[inline]
    pub fn comp_cost(&self, task: usize, processor: usize) -> f64 {
        self.comp_cost[task][processor]
    }

    /// Per-unit transfer cost from processor `from` to processor `to`.
    #[inline]
    pub fn comm_rate(&self, from: usize, to: usize) -> f64 {
        self.comm_rate[from][to]
    }

    /// Communication delay for moving `volume` units between two processors.
    ///
    /// Zero when both ends are the same processor.
    #[inline]
    pub fn transfer_delay(&self, volume: f64, from: usize, to: usize) -> f64 {
        if from == to {
            0.0
        } else {
            volume * self.comm_rate[from][to]
        }
    }

    /// Precedence edges in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Incoming edges of `task`, in edge input order.
    pub fn predecessors(&self, task: usize) -> &[Predecessor] {
        &self.predecessors[task]
    }

    /// Whether the precedence edges form a DAG.
    pub fn is_acyclic(&self) -> bool {
        self.acyclic
    }

    /// Returns the tasks in Kahn (FIFO) topological order.
    ///
    /// Source tasks are seeded in ascending id order; a successor becomes
    /// ready when its last incoming edge is consumed.
    ///
    /// # Errors
    ///
    /// [`Error::CyclicGraph`] if some tasks never become ready.
    pub fn topological_order(&self) -> Result<Vec<usize>> {
        if !self.acyclic {
            return Err(Error::CyclicGraph);
        }
        Ok(self.kahn_order())
    }

    /// Kahn's algorithm; tasks on or behind a cycle are left out.
    fn kahn_order(&self) -> Vec<usize> {
        let mut successors = vec![Vec::new(); self.task_count];
        let mut indegree = vec![0usize; self.task_count];
        for e in &self.edges {
            successors[e.from].push(e.to);
            indegree[e.to] += 1;
        }

        let mut ready: VecDeque<usize> = (0..self.task_count).filter(|&t| indegree[t] == 0).collect();
        let mut order = Vec::with_capacity(self.task_count);

        while let Some(t) = ready.pop_front() {
            order.push(t);
            for &s in &successors[t] {
                indegree[s] -= 1;
                if indegree[s] == 0 {
                    ready.push_back(s);
                }
            }
        }

        order
    }
}
