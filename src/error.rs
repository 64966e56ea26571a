//! Error types.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by graph construction, evaluation, and search.
#[derive(Debug, Error)]
pub enum Error {
    /// The solution does not describe every task exactly once, or assigns
    /// a task to a processor that does not exist.
    #[error("malformed solution: {0}")]
    MalformedSolution(Malformed),

    /// Feasibility repair hit its pass cap without reaching a feasible
    /// schedule. Indicates a cyclic or otherwise pathological edge list.
    #[error("feasibility repair did not converge after {passes} passes")]
    RepairDivergence {
        /// Number of repair passes performed before giving up.
        passes: usize,
    },

    /// The task graph description is inconsistent.
    #[error("invalid task graph: {0}")]
    InvalidGraph(String),

    /// A topological order was required but the precedence edges form a cycle.
    #[error("precedence edges contain a cycle")]
    CyclicGraph,

    /// The `.dag` text could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number (0 when the input ended early or a section
        /// is missing).
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Reading a `.dag` file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Ways a [`Solution`](crate::schedule::Solution) can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    /// `order` is not a permutation of `0..task_count`.
    #[error("order is not a permutation of {expected} tasks (got {found} entries)")]
    NotAPermutation {
        /// Number of tasks in the graph.
        expected: usize,
        /// Length of the supplied order.
        found: usize,
    },

    /// `assignment` does not have one entry per task.
    #[error("assignment has {found} entries, expected {expected}")]
    AssignmentLength {
        /// Number of tasks in the graph.
        expected: usize,
        /// Length of the supplied assignment.
        found: usize,
    },

    /// A task is assigned to a processor id outside `0..processor_count`.
    #[error("task {task} assigned to processor {processor}, only {processor_count} exist")]
    ProcessorOutOfRange {
        /// Offending task.
        task: usize,
        /// Assigned processor id.
        processor: usize,
        /// Number of processors in the graph.
        processor_count: usize,
    },
}

impl From<Malformed> for Error {
    fn from(m: Malformed) -> Self {
        Error::MalformedSolution(m)
    }
}
