//! Random neighbor generation.

use rand::Rng;

use super::types::Move;
use crate::graph::TaskGraph;
use crate::schedule::Solution;

/// Draws one random move and applies it to a copy of `current`.
///
/// The two move kinds are chosen with equal probability:
///
/// - `SwapOrder`: two distinct positions drawn uniformly and exchanged
/// - `ReassignMachine`: a uniform task moved to a uniform processor other
///   than its current one (or the same one when only one processor exists)
///
/// With a single task no swap is possible, so a reassignment is drawn.
///
/// The returned neighbor is unevaluated (`cost == None`) and not repaired.
/// `current` must be well formed for `graph`.
pub fn random_move<R: Rng>(current: &Solution, graph: &TaskGraph, rng: &mut R) -> (Solution, Move) {
    let task_count = graph.task_count();
    let mut neighbor = Solution::new(current.order.clone(), current.assignment.clone());

    if task_count >= 2 && rng.random_bool(0.5) {
        let i = rng.random_range(0..task_count);
        // Uniform over the other positions.
        let mut j = rng.random_range(0..task_count - 1);
        if j >= i {
            j += 1;
        }
        neighbor.order.swap(i, j);
        (neighbor, Move::SwapOrder { i, j })
    } else {
        let task = rng.random_range(0..task_count);
        let processor_count = graph.processor_count();
        let old_processor = neighbor.assignment[task];
        let new_processor = if processor_count > 1 {
            let p = rng.random_range(0..processor_count - 1);
            if p >= old_processor {
                p + 1
            } else {
                p
            }
        } else {
            old_processor
        };
        neighbor.assignment[task] = new_processor;
        (
            neighbor,
            Move::ReassignMachine {
                task,
                old_processor,
                new_processor,
            },
        )
    }
}
