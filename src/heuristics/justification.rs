//! The pcf-induced justification graph and disjunctive-landmark cut
//! extraction that LM-cut iterates on.

use super::Cost;
use crate::strips::Strips;

/// Precondition choice function: for each action, the precondition fact
/// responsible for its h^max value.
///
/// Actions with no preconditions have no supporter to pick; they are
/// treated as sourced from `down`, the universal zero-cost fact of the
/// transformed task, since they fire at cost 0 from the very first instant
/// just as `down` is true from the very first instant.
pub fn precondition_choice(strips: &Strips, sigma: &[Cost], down: usize) -> Vec<usize> {
    strips
        .actions
        .iter()
        .map(|a| {
            if a.pre.is_empty() {
                return down;
            }
            let (var, val) = strips.fact_var_val(a.pre[0]);
            let mut best = a.pre[0];
            let mut best_key = (sigma[a.pre[0]], var, val);
            for &p in &a.pre[1..] {
                let (var, val) = strips.fact_var_val(p);
                let key = (sigma[p], var, val);
                // argmax by sigma, ties broken by the lexicographically
                // greater (variable, value) pair.
                if key > best_key {
                    best_key = key;
                    best = p;
                }
            }
            best
        })
        .collect()
}

/// A disjunctive action landmark extracted from one cut of the
/// justification graph: the actions in it, and the minimum cost among them.
pub struct Cut {
    pub actions: Vec<usize>,
    pub cost: Cost,
}

/// Extracts the disjunctive-landmark cut given the current pcf.
///
/// `down` and `up` are the synthetic facts of the lm-cut transform; `goal`
/// is the transformed task's single-fact goal (`{up}`).
pub fn extract_cut(strips: &Strips, pcf: &[usize], down: usize, up: usize) -> Cut {
    let num_facts = strips.num_facts();

    // V*_g: backward reachability from `up` along zero-cost edges.
    let mut goal_zone = vec![false; num_facts];
    goal_zone[up] = true;
    let mut changed = true;
    while changed {
        changed = false;
        for (ai, a) in strips.actions.iter().enumerate() {
            if a.cost != 0 {
                continue;
            }
            let src = pcf[ai];
            if goal_zone[src] {
                continue;
            }
            if a.add.iter().any(|&q| goal_zone[q]) {
                goal_zone[src] = true;
                changed = true;
            }
        }
    }

    // V*_0: forward reachability from `down` along edges whose head is not in V*_g.
    let mut init_zone = vec![false; num_facts];
    init_zone[down] = true;
    changed = true;
    while changed {
        changed = false;
        for (ai, a) in strips.actions.iter().enumerate() {
            let src = pcf[ai];
            if !init_zone[src] {
                continue;
            }
            for &q in &a.add {
                if !goal_zone[q] && !init_zone[q] {
                    init_zone[q] = true;
                    changed = true;
                }
            }
        }
    }

    let mut actions = Vec::new();
    let mut cost = super::INFINITY;
    for (ai, a) in strips.actions.iter().enumerate() {
        let src = pcf[ai];
        if init_zone[src] && a.add.iter().any(|&q| goal_zone[q]) {
            actions.push(ai);
            cost = cost.min(a.cost as Cost);
        }
    }

    Cut { actions, cost }
}
