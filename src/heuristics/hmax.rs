//! h^max: the admissible delete-relaxation max-cost heuristic.

use super::{Cost, INFINITY};
use crate::strips::Strips;
use fixedbitset::FixedBitSet;

/// Per-fact achievement costs computed by one run of [`hmax`], plus the
/// derived heuristic value for any goal.
pub struct HmaxResult {
    pub sigma: Vec<Cost>,
}

impl HmaxResult {
    /// `max_{p in goal} sigma(p)`, or 0 for a vacuously satisfied empty goal.
    pub fn h(&self, goal: &[usize]) -> Cost {
        goal.iter().map(|&p| self.sigma[p]).max().unwrap_or(0)
    }
}

/// Computes h^max and the per-fact cost labels σ for `state`.
///
/// Dead ends are detected explicitly: if no more facts can be closed but the
/// goal is not fully achieved, the loop stops rather than spinning forever
/// picking an ever-absent minimum.
pub fn hmax(strips: &Strips, state: &FixedBitSet) -> HmaxResult {
    let num_facts = strips.num_facts();
    let mut sigma = vec![INFINITY; num_facts];
    for f in state.ones() {
        sigma[f] = 0;
    }

    let mut remaining: Vec<u32> = strips.actions.iter().map(|a| a.pre.len() as u32).collect();
    for (i, a) in strips.actions.iter().enumerate() {
        if a.pre.is_empty() {
            let cost = a.cost as Cost;
            for &p in &a.add {
                if cost < sigma[p] {
                    sigma[p] = cost;
                }
            }
        }
        debug_assert_eq!(remaining[i], a.pre.len() as u32);
    }

    let mut closed = FixedBitSet::with_capacity(num_facts);

    loop {
        if strips.goal.iter().all(|&g| closed.contains(g)) {
            break;
        }

        // argmin_{r in F\C} sigma(r), ties broken by smallest fact id.
        let mut q = None;
        let mut q_val = INFINITY;
        for r in 0..num_facts {
            if closed.contains(r) {
                continue;
            }
            if sigma[r] < q_val {
                q_val = sigma[r];
                q = Some(r);
            }
        }
        let Some(q) = q else {
            // Every remaining fact has σ = ∞: dead end, stop instead of looping.
            break;
        };
        closed.insert(q);

        for &ai in strips.dependents_of(q) {
            remaining[ai] -= 1;
            if remaining[ai] == 0 {
                let a = &strips.actions[ai];
                let v = (a.cost as Cost).saturating_add(sigma[q]);
                for &p in &a.add {
                    if v < sigma[p] {
                        sigma[p] = v;
                    }
                }
            }
        }
    }

    HmaxResult { sigma }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fdr::{Fdr, Operator, Variable};
    use crate::strips::StripsCompiler;

    fn bool_var(name: &str) -> Variable {
        Variable {
            name: name.to_string(),
            values: vec!["f".to_string(), "t".to_string()],
        }
    }

    #[test]
    fn s1_trivial_empty_goal_already_satisfied() {
        let fdr = Fdr {
            variables: vec![bool_var("v")],
            init_state: vec![0],
            goal: vec![(0, 0)],
            operators: vec![],
        };
        let strips = StripsCompiler::compile(&fdr);
        let result = hmax(&strips, &strips.s0);
        assert_eq!(result.h(&strips.goal), 0);
    }

    #[test]
    fn s2_one_action() {
        let fdr = Fdr {
            variables: vec![bool_var("v")],
            init_state: vec![0],
            goal: vec![(0, 1)],
            operators: vec![Operator {
                name: "set1".to_string(),
                preconditions: vec![],
                effects: vec![(0, 1)],
                cost: 4,
            }],
        };
        let strips = StripsCompiler::compile(&fdr);
        let result = hmax(&strips, &strips.s0);
        assert_eq!(result.h(&strips.goal), 4);
    }

    #[test]
    fn s4_unsolvable_goal_is_infinite() {
        let fdr = Fdr {
            variables: vec![bool_var("v")],
            init_state: vec![0],
            goal: vec![(0, 1)],
            operators: vec![],
        };
        let strips = StripsCompiler::compile(&fdr);
        let result = hmax(&strips, &strips.s0);
        assert_eq!(result.h(&strips.goal), INFINITY);
    }

    /// A small task with a shared precondition, shaped so that h^max must
    /// pick the max, not the sum, of precondition costs to get action o4's
    /// true cost.
    #[test]
    fn s3_textbook_shape_hmax() {
        // facts: 0..=4 ; variables are irrelevant here, build the STRIPS
        // task directly to pin down exact fact ids.
        use crate::strips::Action;
        let mut s0 = FixedBitSet::with_capacity(5);
        s0.insert(0);
        let actions = vec![
            Action {
                name: "o1".into(),
                pre: vec![0],
                add: vec![1, 2],
                cost: 3,
            },
            Action {
                name: "o2".into(),
                pre: vec![0],
                add: vec![3],
                cost: 5,
            },
            Action {
                name: "o3".into(),
                pre: vec![1],
                add: vec![2, 3],
                cost: 1,
            },
            Action {
                name: "o4".into(),
                pre: vec![0, 1],
                add: vec![4],
                cost: 4,
            },
        ];
        let strips = test_strips(actions, s0, vec![2, 3, 4]);
        let result = hmax(&strips, &strips.s0);
        assert_eq!(result.h(&strips.goal), 7);
    }

    /// Builds a [`Strips`] task directly from facts/actions, bypassing FDR
    /// compilation, for tests that want to pin exact fact ids.
    pub(crate) fn test_strips(
        actions: Vec<crate::strips::Action>,
        s0: FixedBitSet,
        goal: Vec<usize>,
    ) -> Strips {
        crate::strips::Strips::from_raw_parts(actions, s0, goal)
    }
}
