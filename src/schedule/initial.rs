//! Initial solution construction.

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::Solution;
use crate::error::Result;
use crate::graph::TaskGraph;

/// Uniformly random order and processor assignment.
///
/// The order is generally not precedence-respecting; evaluation repairs it.
pub fn random_solution<R: Rng>(graph: &TaskGraph, rng: &mut R) -> Solution {
    let mut order: Vec<usize> = (0..graph.task_count()).collect();
    order.shuffle(rng);
    let assignment = (0..graph.task_count())
        .map(|_| rng.random_range(0..graph.processor_count()))
        .collect();
    Solution::new(order, assignment)
}

/// Greedy list schedule in topological order.
///
/// Tasks are taken in FIFO topological order; each is placed on the
/// processor that finishes it earliest given its predecessors' placement
/// and the current processor availability (ties go to the lowest
/// processor id). The order of placement becomes the dispatch order, so
/// the result is feasible without repair.
///
/// # Errors
///
/// [`Error::CyclicGraph`](crate::error::Error::CyclicGraph) if the
/// precedence edges contain a cycle.
///
/// # Reference
///
/// Topcuoglu, Hariri & Wu (2002), "Performance-Effective and
/// Low-Complexity Task Scheduling for Heterogeneous Computing"
pub fn heuristic_solution(graph: &TaskGraph) -> Result<Solution> {
    let order = graph.topological_order()?;
    let mut assignment = vec![0usize; graph.task_count()];
    let mut end_time = vec![0.0f64; graph.task_count()];
    let mut processor_free = vec![0.0f64; graph.processor_count()];

    for &task in &order {
        let mut best_processor = 0;
        let mut best_finish = f64::INFINITY;

        for p in 0..graph.processor_count() {
            let ready = graph
                .predecessors(task)
                .iter()
                .map(|pred| {
                    end_time[pred.task]
                        + graph.transfer_delay(pred.volume, assignment[pred.task], p)
                })
                .fold(0.0, f64::max);
            let finish = f64::max(ready, processor_free[p]) + graph.comp_cost(task, p);
            if finish < best_finish {
                best_finish = finish;
                best_processor = p;
            }
        }

        assignment[task] = best_processor;
        end_time[task] = best_finish;
        processor_free[best_processor] = best_finish;
    }

    Ok(Solution::new(order, assignment))
}
