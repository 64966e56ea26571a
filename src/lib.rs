//! Heterogeneous DAG scheduling.
//!
//! Assigns precedence-constrained tasks to a fixed pool of heterogeneous
//! processors, minimizing makespan under processor contention and
//! inter-processor communication delay.
//!
//! - **Graph**: immutable task graph with computation costs per
//!   processor, communication rates between processors, and precedence
//!   edges carrying data volumes. Includes a loader for the `.dag` text
//!   format.
//! - **Schedule**: evaluation of a dispatch order plus processor
//!   assignment into start/end times, precedence feasibility checking,
//!   and bounded feasibility repair.
//! - **Tabu Search (TS)**: swap/reassign neighborhood search with a
//!   tenure-based tabu memory and aspiration criterion.
//!
//! # Example
//!
//! ```
//! use u_dagsched::graph::{Edge, TaskGraph};
//! use u_dagsched::tabu::{tabu_search, TabuConfig};
//!
//! let graph = TaskGraph::new(
//!     vec![vec![3.0, 5.0], vec![4.0, 2.0], vec![2.0, 2.0]],
//!     vec![vec![0.0, 0.5], vec![0.5, 0.0]],
//!     vec![Edge::new(0, 2, 4.0), Edge::new(1, 2, 2.0)],
//! )?;
//!
//! let config = TabuConfig::default().with_max_iterations(100).with_seed(42);
//! let best = tabu_search(&graph, None, &config)?;
//! assert!(best.cost.is_some());
//! # Ok::<(), u_dagsched::Error>(())
//! ```

pub mod error;
pub mod graph;
pub mod schedule;
pub mod tabu;

pub use error::{Error, Malformed, Result};
