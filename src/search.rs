//! Best-first A* search over the FDR state space, using a STRIPS-bound
//! heuristic for cost estimates.

use crate::error::{Error, Result};
use crate::fdr::Fdr;
use crate::heuristics::{Cost, Heuristic, INFINITY};
use crate::strips::Strips;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A found plan: the ordered operator names and their accumulated cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub operators: Vec<String>,
    pub cost: Cost,
}

struct Node {
    state: Vec<usize>,
    g: Cost,
    parent: Option<Rc<Node>>,
    /// Name of the operator that produced this node from its parent; `None`
    /// only for the root.
    op_name: Option<String>,
}

impl Node {
    fn extract_plan(self: &Rc<Self>) -> Vec<String> {
        let mut ops = Vec::new();
        let mut cur = self.clone();
        while let Some(name) = cur.op_name.clone() {
            ops.push(name);
            cur = cur.parent.clone().expect("non-root node always has a parent");
        }
        ops.reverse();
        ops
    }
}

/// Open-queue entry: ordered by `(f, tiebreak)`, min-first. `BinaryHeap` is a
/// max-heap, so the ordering is reversed to turn it into a min-priority
/// queue, and `tiebreak` is a strictly increasing insertion counter giving
/// FIFO order among equal-f nodes.
struct QueueEntry {
    f: Cost,
    tiebreak: u64,
    node: Rc<Node>,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.tiebreak == other.tiebreak
    }
}
impl Eq for QueueEntry {}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.tiebreak.cmp(&self.tiebreak))
    }
}

/// Optional resource budget checked between node expansions.
pub struct Budget {
    deadline: Instant,
    duration: Duration,
}

impl Budget {
    pub fn new(duration: Duration) -> Self {
        Budget {
            deadline: Instant::now() + duration,
            duration,
        }
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Runs A* from the FDR's initial state to one of its goal states, using
/// `heuristic` evaluated over `strips`.
///
/// Returns `Error::Unsolvable` when the open set is exhausted, and
/// `Error::BudgetExceeded` if a `budget` is given and expires between
/// expansions.
pub fn a_star(
    fdr: &Fdr,
    strips: &Strips,
    heuristic: &dyn Heuristic,
    budget: Option<&Budget>,
) -> Result<Plan> {
    tracing::info!("search started");

    let mut open: BinaryHeap<QueueEntry> = BinaryHeap::new();
    let mut best_g: HashMap<Vec<usize>, Cost> = HashMap::new();
    let mut tiebreak_counter: u64 = 0;

    let root = Rc::new(Node {
        state: fdr.init_state.clone(),
        g: 0,
        parent: None,
        op_name: None,
    });
    best_g.insert(root.state.clone(), 0);

    let root_h = heuristic.evaluate(strips, &strips.project(&root.state))?;
    if root_h != INFINITY {
        open.push(QueueEntry {
            f: root_h,
            tiebreak: tiebreak_counter,
            node: root,
        });
        tiebreak_counter += 1;
    }

    while let Some(entry) = open.pop() {
        if let Some(budget) = budget {
            if budget.expired() {
                tracing::info!("search finished: budget exceeded");
                return Err(Error::BudgetExceeded(budget.duration));
            }
        }

        let node = entry.node;
        if fdr.satisfies_goal(&node.state) {
            tracing::info!(cost = node.g, "search finished: plan found");
            return Ok(Plan {
                operators: node.extract_plan(),
                cost: node.g,
            });
        }

        // A node may be stale (superseded by a cheaper path found later);
        // skip it instead of re-expanding.
        if best_g.get(&node.state).is_some_and(|&g| g < node.g) {
            continue;
        }

        for op in &fdr.operators {
            if !fdr.is_applicable(&node.state, op) {
                continue;
            }
            let succ_state = fdr.apply(&node.state, op);
            let succ_g = node.g + op.cost as Cost;

            let improves = best_g.get(&succ_state).is_none_or(|&g| succ_g < g);
            if !improves {
                continue;
            }
            best_g.insert(succ_state.clone(), succ_g);

            let h = heuristic.evaluate(strips, &strips.project(&succ_state))?;
            if h == INFINITY {
                // Dead end: never worth enqueuing.
                continue;
            }
            let succ = Rc::new(Node {
                state: succ_state,
                g: succ_g,
                parent: Some(node.clone()),
                op_name: Some(op.name.clone()),
            });
            open.push(QueueEntry {
                f: succ_g + h,
                tiebreak: tiebreak_counter,
                node: succ,
            });
            tiebreak_counter += 1;
        }
    }

    tracing::info!("search finished: unsolvable");
    Err(Error::Unsolvable)
}
