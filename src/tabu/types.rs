//! Move descriptors for the tabu neighborhood.

/// A local perturbation of a [`Solution`](crate::schedule::Solution).
///
/// Moves identify entries in the tabu memory. Equality is the tabu
/// matching rule: two `SwapOrder` moves are equal regardless of argument
/// order (`(i, j)` matches `(j, i)`); two `ReassignMachine` moves are equal
/// only if task, old processor, and new processor all match.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Move {
    /// Exchange the tasks at positions `i` and `j` of the order.
    SwapOrder {
        /// First position.
        i: usize,
        /// Second position.
        j: usize,
    },
    /// Move `task` from `old_processor` to `new_processor`.
    ReassignMachine {
        /// Reassigned task.
        task: usize,
        /// Processor before the move.
        old_processor: usize,
        /// Processor after the move.
        new_processor: usize,
    },
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Move::SwapOrder { i: a, j: b }, Move::SwapOrder { i: c, j: d }) => {
                (a == c && b == d) || (a == d && b == c)
            }
            (
                Move::ReassignMachine {
                    task: t1,
                    old_processor: o1,
                    new_processor: n1,
                },
                Move::ReassignMachine {
                    task: t2,
                    old_processor: o2,
                    new_processor: n2,
                },
            ) => t1 == t2 && o1 == o2 && n1 == n2,
            _ => false,
        }
    }
}

impl Eq for Move {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_symmetric() {
        assert_eq!(Move::SwapOrder { i: 2, j: 5 }, Move::SwapOrder { i: 5, j: 2 });
        assert_ne!(Move::SwapOrder { i: 2, j: 5 }, Move::SwapOrder { i: 2, j: 4 });
    }

    #[test]
    fn test_reassign_requires_all_fields() {
        let m = Move::ReassignMachine {
            task: 1,
            old_processor: 0,
            new_processor: 2,
        };
        assert_eq!(m, m);
        assert_ne!(
            m,
            Move::ReassignMachine {
                task: 1,
                old_processor: 2,
                new_processor: 0,
            }
        );
        assert_ne!(
            m,
            Move::ReassignMachine {
                task: 3,
                old_processor: 0,
                new_processor: 2,
            }
        );
    }

    #[test]
    fn test_kinds_never_equal() {
        assert_ne!(
            Move::SwapOrder { i: 0, j: 1 },
            Move::ReassignMachine {
                task: 0,
                old_processor: 0,
                new_processor: 1,
            }
        );
    }
}
