//! LM-cut: iterated h^max + justification-graph cut extraction,
//! accumulating an admissible landmark-cost lower bound.

use super::hmax::hmax;
use super::justification::{extract_cut, precondition_choice};
use super::{Cost, INFINITY};
use crate::error::{Error, Result};
use crate::strips::Strips;
use fixedbitset::FixedBitSet;

/// Evaluates h_LMCut(state) against `strips`.
pub fn lmcut(strips: &Strips, state: &FixedBitSet) -> Result<Cost> {
    let mut task = strips.lm_transform(state);
    // `lm_transform` appends `__lm_down`/`__lm_up` as the last two actions
    // and sets the task's sole goal fact to `up`; recover their fact ids
    // from there rather than re-deriving them.
    let up = task.goal[0];
    let down_action = &task.actions[task.actions.len() - 2];
    let down = down_action.pre[0];

    let mut h_lmcut: Cost = 0;
    let mut iteration: u32 = 0;

    loop {
        let result = hmax(&task, &task.s0);
        let h = result.h(&task.goal);
        if h == INFINITY {
            return Ok(INFINITY);
        }
        if h == 0 {
            return Ok(h_lmcut);
        }

        let pcf = precondition_choice(&task, &result.sigma, down);
        let cut = extract_cut(&task, &pcf, down, up);

        if cut.actions.is_empty() || cut.cost == 0 {
            return Err(Error::InternalInvariantViolation(format!(
                "lm-cut produced an empty or zero-cost landmark while h^max = {h} > 0"
            )));
        }

        h_lmcut = h_lmcut
            .checked_add(cut.cost)
            .ok_or_else(|| Error::InternalInvariantViolation("lm-cut accumulator overflowed".to_string()))?;

        tracing::debug!(iteration, cut_size = cut.actions.len(), cut_cost = cut.cost, h_lmcut, "lm-cut iteration");

        for &ai in &cut.actions {
            task.actions[ai].cost -= cut.cost as u32;
        }
        iteration += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fdr::{Fdr, Operator, Variable};
    use crate::strips::{Action, StripsCompiler};

    fn bool_var(name: &str) -> Variable {
        Variable {
            name: name.to_string(),
            values: vec!["f".to_string(), "t".to_string()],
        }
    }

    #[test]
    fn s1_trivial_empty() {
        let fdr = Fdr {
            variables: vec![bool_var("v")],
            init_state: vec![0],
            goal: vec![(0, 0)],
            operators: vec![],
        };
        let strips = StripsCompiler::compile(&fdr);
        assert_eq!(lmcut(&strips, &strips.s0).unwrap(), 0);
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
        assert_eq!(lmcut(&strips, &strips.s0).unwrap(), 4);
    }

    #[test]
    fn s4_unsolvable_is_infinite() {
        let fdr = Fdr {
            variables: vec![bool_var("v")],
            init_state: vec![0],
            goal: vec![(0, 1)],
            operators: vec![],
        };
        let strips = StripsCompiler::compile(&fdr);
        assert_eq!(lmcut(&strips, &strips.s0).unwrap(), INFINITY);
    }

    /// The textbook shared-precondition task, worked through by hand.
    #[test]
    fn s3_textbook_shape() {
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
        let strips = crate::strips::Strips::from_raw_parts(actions, s0, vec![2, 3, 4]);
        assert_eq!(lmcut(&strips, &strips.s0).unwrap(), 8);
    }

    /// LM-cut must always dominate h^max.
    #[test]
    fn lmcut_dominates_hmax() {
        let fdr = Fdr {
            variables: vec![bool_var("a"), bool_var("b")],
            init_state: vec![0, 0],
            goal: vec![(0, 1), (1, 1)],
            operators: vec![
                Operator {
                    name: "set_a".to_string(),
                    preconditions: vec![],
                    effects: vec![(0, 1)],
                    cost: 2,
                },
                Operator {
                    name: "set_b".to_string(),
                    preconditions: vec![(0, 1)],
                    effects: vec![(1, 1)],
                    cost: 3,
                },
            ],
        };
        let strips = StripsCompiler::compile(&fdr);
        let h = super::super::hmax::hmax(&strips, &strips.s0).h(&strips.goal);
        let hlm = lmcut(&strips, &strips.s0).unwrap();
        assert!(h <= hlm, "h^max={h} should be <= h_LMCut={hlm}");
        assert_eq!(hlm, 5);
    }
}
