//! Propositional STRIPS compilation and the LM-cut transform.

use crate::fdr::Fdr;
use crate::ids::IdRegistry;
use fixedbitset::FixedBitSet;

/// A delete-relaxed STRIPS action: preconditions and add effects as fact ids,
/// a non-negative cost, and a stable name tracing back to the FDR operator it
/// was compiled from.
#[derive(Debug, Clone)]
pub struct Action {
    pub name: String,
    pub pre: Vec<usize>,
    pub add: Vec<usize>,
    pub cost: u32,
}

/// A propositional, delete-relaxed planning task.
///
/// Facts are dense integer ids `0..num_facts()`; `fact_var_val` and
/// `fact_of` let callers move between a fact id and the `(variable, value)`
/// pair it was interned from, which is how A* projects a multi-valued search
/// state into a fact set.
#[derive(Debug, Clone)]
pub struct Strips {
    ids: IdRegistry<(usize, usize)>,
    pub actions: Vec<Action>,
    pub s0: FixedBitSet,
    pub goal: Vec<usize>,
    /// For each fact, the indices of actions that have it as a precondition.
    /// Built once at compile time so h^max can decrement action counters
    /// without an O(|F|*|A|) scan.
    dependents: Vec<Vec<usize>>,
}

impl Strips {
    pub fn num_facts(&self) -> usize {
        self.ids.len()
    }

    pub fn fact_of(&self, var: usize, val: usize) -> Option<usize> {
        self.ids.id_of(&(var, val))
    }

    pub fn fact_var_val(&self, fact: usize) -> (usize, usize) {
        *self.ids.get_value(fact)
    }

    pub fn dependents_of(&self, fact: usize) -> &[usize] {
        &self.dependents[fact]
    }

    /// Projects an FDR state vector into the fact set used by the
    /// heuristics, by interning `(var, value)` for each variable.
    pub fn project(&self, state: &[usize]) -> FixedBitSet {
        let mut facts = FixedBitSet::with_capacity(self.num_facts());
        for (var, &val) in state.iter().enumerate() {
            let fact = self
                .fact_of(var, val)
                .expect("state assigns a value never seen during compilation");
            facts.insert(fact);
        }
        facts
    }

    fn rebuild_dependents(actions: &[Action], num_facts: usize) -> Vec<Vec<usize>> {
        let mut dependents = vec![Vec::new(); num_facts];
        for (idx, a) in actions.iter().enumerate() {
            for &p in &a.pre {
                dependents[p].push(idx);
            }
        }
        dependents
    }

    /// Builds the transformed task used by one LM-cut evaluation: two
    /// fresh facts `down`/`up`, two zero-cost synthetic actions, and a
    /// rerouted initial state/goal. The original task is left untouched;
    /// this returns an independent, owned clone whose action costs the
    /// caller is free to mutate across LM-cut iterations without affecting
    /// `self`.
    pub fn lm_transform(&self, state: &FixedBitSet) -> Strips {
        let mut ids = self.ids.clone();
        let mut actions = self.actions.clone();

        // `down` and `up` are facts that never occur as an FDR (var, val)
        // pair: negative variable indices keep them out of the domain's
        // dense id space semantics while still fitting the same IdRegistry.
        let down = ids.get_id((usize::MAX, 0));
        let up = ids.get_id((usize::MAX, 1));

        let down_add: Vec<usize> = state.ones().collect();
        actions.push(Action {
            name: "__lm_down".to_string(),
            pre: vec![down],
            add: down_add,
            cost: 0,
        });
        actions.push(Action {
            name: "__lm_up".to_string(),
            pre: self.goal.clone(),
            add: vec![up],
            cost: 0,
        });

        let num_facts = ids.len();
        let mut s0 = FixedBitSet::with_capacity(num_facts);
        s0.insert(down);

        let dependents = Strips::rebuild_dependents(&actions, num_facts);

        Strips {
            ids,
            actions,
            s0,
            goal: vec![up],
            dependents,
        }
    }

    /// Builds a task directly from facts/actions, bypassing FDR compilation.
    /// Used by unit tests that want to pin exact fact ids, e.g. a worked
    /// LM-cut example.
    #[cfg(test)]
    pub(crate) fn from_raw_parts(actions: Vec<Action>, s0: FixedBitSet, goal: Vec<usize>) -> Strips {
        let num_facts = s0.len();
        let mut ids: IdRegistry<(usize, usize)> = IdRegistry::new();
        for f in 0..num_facts {
            ids.get_id((f, 0));
        }
        let dependents = Strips::rebuild_dependents(&actions, num_facts);
        Strips {
            ids,
            actions,
            s0,
            goal,
            dependents,
        }
    }
}

/// Lowers a grounded [`Fdr`] task into a [`Strips`] task.
pub struct StripsCompiler;

impl StripsCompiler {
    pub fn compile(fdr: &Fdr) -> Strips {
        let mut ids: IdRegistry<(usize, usize)> = IdRegistry::new();

        // Intern every (variable, value) pair up front, in variable/value
        // order, so F is exactly the domain's facts and ids are dense.
        for (var, v) in fdr.variables.iter().enumerate() {
            for val in 0..v.domain_size() {
                ids.get_id((var, val));
            }
        }
        let num_facts = ids.len();

        let mut s0 = FixedBitSet::with_capacity(num_facts);
        for (var, &val) in fdr.init_state.iter().enumerate() {
            s0.insert(ids.get_id((var, val)));
        }

        let goal: Vec<usize> = fdr.goal.iter().map(|&(var, val)| ids.get_id((var, val))).collect();

        let actions: Vec<Action> = fdr
            .operators
            .iter()
            .map(|op| Action {
                name: op.name.clone(),
                pre: op.preconditions.iter().map(|&(var, val)| ids.get_id((var, val))).collect(),
                add: op.effects.iter().map(|&(var, val)| ids.get_id((var, val))).collect(),
                cost: op.cost,
            })
            .collect();

        let dependents = Strips::rebuild_dependents(&actions, num_facts);

        Strips {
            ids,
            actions,
            s0,
            goal,
            dependents,
        }
    }
}
