//! Tabu Search (TS) over dispatch orders and processor assignments.
//!
//! A single-solution trajectory metaheuristic that uses a short-term
//! memory (the tabu list) to forbid recently applied moves, preventing
//! cycling and encouraging exploration of new regions of the search space.
//!
//! The neighborhood consists of two move kinds: swapping two positions of
//! the dispatch order, and reassigning one task to another processor.
//! Every neighbor is scored with the feasibility-repairing evaluator in
//! [`crate::schedule`].
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod memory;
mod neighborhood;
mod runner;
mod types;

pub use config::{InitialStrategy, TabuConfig};
pub use memory::TabuMemory;
pub use neighborhood::random_move;
pub use runner::{tabu_search, TabuResult, TabuRunner};
pub use types::Move;
