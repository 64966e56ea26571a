//! Task graph model.
//!
//! A [`TaskGraph`] describes a precedence-constrained set of tasks and a
//! pool of heterogeneous processors: per-task computation costs on each
//! processor, per-unit communication rates between processors, and the
//! data volume carried by each precedence edge.
//!
//! # References
//!
//! - Topcuoglu, Hariri & Wu (2002), "Performance-Effective and
//!   Low-Complexity Task Scheduling for Heterogeneous Computing",
//!   *IEEE TPDS* 13(3), 260-274.

mod loader;
mod types;

pub use loader::{load_dag, parse_dag};
pub use types::{Edge, Predecessor, TaskGraph};
