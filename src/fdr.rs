//! Finite-domain representation (FDR) task and the line-oriented task-file
//! loader that produces it.

use crate::error::{Error, Result};

/// A finite-domain variable: a name (for diagnostics) and an ordered list of
/// value labels. The variable's domain is `0..values.len()`.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub values: Vec<String>,
}

impl Variable {
    pub fn domain_size(&self) -> usize {
        self.values.len()
    }
}

/// An FDR operator: a partial-assignment precondition, a total-replacement
/// effect on the listed variables, and a non-negative cost.
#[derive(Debug, Clone)]
pub struct Operator {
    pub name: String,
    /// (variable index, required value index)
    pub preconditions: Vec<(usize, usize)>,
    /// (variable index, assigned value index)
    pub effects: Vec<(usize, usize)>,
    pub cost: u32,
}

/// A grounded finite-domain planning task.
#[derive(Debug, Clone)]
pub struct Fdr {
    pub variables: Vec<Variable>,
    /// Total assignment, one value index per variable.
    pub init_state: Vec<usize>,
    /// Partial assignment: (variable index, required value index).
    pub goal: Vec<(usize, usize)>,
    pub operators: Vec<Operator>,
}

impl Fdr {
    /// Applies an operator's effects to a state, replacing the listed
    /// variables' values. Does not check applicability.
    pub fn apply(&self, state: &[usize], op: &Operator) -> Vec<usize> {
        let mut next = state.to_vec();
        for &(var, val) in &op.effects {
            next[var] = val;
        }
        next
    }

    pub fn is_applicable(&self, state: &[usize], op: &Operator) -> bool {
        op.preconditions.iter().all(|&(var, val)| state[var] == val)
    }

    pub fn satisfies_goal(&self, state: &[usize]) -> bool {
        self.goal.iter().all(|&(var, val)| state[var] == val)
    }
}

/// A minimal line cursor over the pre-split, whitespace-trimmed lines of a
/// task file, tracking the section currently being parsed so errors can
/// report where they occurred.
struct Cursor<'a> {
    lines: &'a [&'a str],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Cursor { lines, pos: 0 }
    }

    fn next(&mut self, section: &str) -> Result<&'a str> {
        let line = self
            .lines
            .get(self.pos)
            .ok_or_else(|| Error::invalid_input(section, "unexpected end of file"))?;
        self.pos += 1;
        Ok(*line)
    }

    fn expect(&mut self, section: &str, expected: &str) -> Result<()> {
        let line = self.next(section)?;
        if line != expected {
            return Err(Error::invalid_input(
                section,
                format!("expected `{expected}`, found `{line}`"),
            ));
        }
        Ok(())
    }

    fn next_int(&mut self, section: &str) -> Result<i64> {
        let line = self.next(section)?;
        line.parse::<i64>()
            .map_err(|_| Error::invalid_input(section, format!("expected an integer, found `{line}`")))
    }

    fn next_usize(&mut self, section: &str) -> Result<usize> {
        let v = self.next_int(section)?;
        usize::try_from(v).map_err(|_| Error::invalid_input(section, format!("expected a non-negative integer, found {v}")))
    }

    fn next_ints(&mut self, section: &str, count: usize) -> Result<Vec<i64>> {
        let line = self.next(section)?;
        let parts: Vec<i64> = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<i64>()
                    .map_err(|_| Error::invalid_input(section, format!("expected an integer, found `{tok}`")))
            })
            .collect::<Result<_>>()?;
        if parts.len() != count {
            return Err(Error::invalid_input(
                section,
                format!("expected {count} integers on line `{line}`, found {}", parts.len()),
            ));
        }
        Ok(parts)
    }
}

/// Parses a line-oriented finite-domain task file into an [`Fdr`].
///
/// This is the only entry point of the loader; `load_file` is a thin
/// convenience wrapper that reads the path first.
pub struct TaskLoader;

impl TaskLoader {
    pub fn load_file(path: &std::path::Path) -> Result<Fdr> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::invalid_input("file", format!("could not read {}: {e}", path.display())))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Fdr> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let mut c = Cursor::new(&lines);

        // 6-line header (version + metric info): skipped.
        for _ in 0..6 {
            c.next("header")?;
        }

        let num_vars = c.next_usize("variables")?;
        tracing::debug!(num_vars, "parsing variables");
        let mut variables = Vec::with_capacity(num_vars);
        for _ in 0..num_vars {
            c.expect("variables", "begin_variable")?;
            let name = c.next("variables")?.to_string();
            c.next("variables")?; // axiom layer, always -1 for this subset of the format
            let num_values = c.next_usize("variables")?;
            let mut values = Vec::with_capacity(num_values);
            for _ in 0..num_values {
                values.push(c.next("variables")?.to_string());
            }
            c.expect("variables", "end_variable")?;
            variables.push(Variable { name, values });
        }

        let num_mutex_groups = c.next_usize("mutex_groups")?;
        for _ in 0..num_mutex_groups {
            loop {
                let line = c.next("mutex_groups")?;
                if line == "end_mutex_group" {
                    break;
                }
            }
        }

        c.expect("init_state", "begin_state")?;
        let mut init_state = Vec::with_capacity(num_vars);
        for var_idx in 0..num_vars {
            let val_idx = c.next_usize("init_state")?;
            check_value(&variables, var_idx, val_idx, "init_state")?;
            init_state.push(val_idx);
        }
        c.expect("init_state", "end_state")?;

        c.expect("goal", "begin_goal")?;
        let num_goals = c.next_usize("goal")?;
        let mut goal = Vec::with_capacity(num_goals);
        for _ in 0..num_goals {
            let parts = c.next_ints("goal", 2)?;
            let (var_idx, val_idx) = as_var_val(&variables, &parts, "goal")?;
            goal.push((var_idx, val_idx));
        }
        c.expect("goal", "end_goal")?;

        let num_operators = c.next_usize("operators")?;
        tracing::debug!(num_operators, "parsing operators");
        let mut operators = Vec::with_capacity(num_operators);
        for _ in 0..num_operators {
            c.expect("operators", "begin_operator")?;
            let name = c.next("operators")?.to_string();

            let num_pre = c.next_usize("operators")?;
            let mut preconditions = Vec::with_capacity(num_pre);
            for _ in 0..num_pre {
                let parts = c.next_ints("operators", 2)?;
                let (var_idx, val_idx) = as_var_val(&variables, &parts, "operators")?;
                preconditions.push((var_idx, val_idx));
            }

            let num_eff = c.next_usize("operators")?;
            let mut effects = Vec::with_capacity(num_eff);
            for _ in 0..num_eff {
                let parts = c.next_ints("operators", 4)?;
                let var_idx = usize::try_from(parts[1])
                    .map_err(|_| Error::invalid_input("operators", format!("negative variable index {}", parts[1])))?;
                let var = variables.get(var_idx).ok_or_else(|| {
                    Error::invalid_input("operators", format!("variable index {var_idx} out of range"))
                })?;
                let from_idx = parts[2];
                let to_idx = usize::try_from(parts[3])
                    .map_err(|_| Error::invalid_input("operators", format!("negative value index {}", parts[3])))?;
                if to_idx >= var.domain_size() {
                    return Err(Error::invalid_input(
                        "operators",
                        format!("value index {to_idx} out of range for variable {var_idx}"),
                    ));
                }
                // from_idx == -1 means "no precondition on this variable"; any
                // other value contributes the prevail precondition that
                // triggers this (flattened) conditional effect.
                if from_idx != -1 {
                    let from_idx = usize::try_from(from_idx).map_err(|_| {
                        Error::invalid_input("operators", format!("invalid from-value index {from_idx}"))
                    })?;
                    if from_idx >= var.domain_size() {
                        return Err(Error::invalid_input(
                            "operators",
                            format!("from-value index {from_idx} out of range for variable {var_idx}"),
                        ));
                    }
                    preconditions.push((var_idx, from_idx));
                }
                effects.push((var_idx, to_idx));
            }

            let cost = c.next_usize("operators")? as u32;
            c.expect("operators", "end_operator")?;

            operators.push(Operator {
                name,
                preconditions,
                effects,
                cost,
            });
        }

        tracing::info!(
            num_vars = variables.len(),
            num_operators = operators.len(),
            "task loaded"
        );

        Ok(Fdr {
            variables,
            init_state,
            goal,
            operators,
        })
    }
}

fn as_var_val(variables: &[Variable], parts: &[i64], section: &str) -> Result<(usize, usize)> {
    let var_idx = usize::try_from(parts[0])
        .map_err(|_| Error::invalid_input(section, format!("negative variable index {}", parts[0])))?;
    let val_idx = usize::try_from(parts[1])
        .map_err(|_| Error::invalid_input(section, format!("negative value index {}", parts[1])))?;
    check_value(variables, var_idx, val_idx, section)?;
    Ok((var_idx, val_idx))
}

fn check_value(variables: &[Variable], var_idx: usize, val_idx: usize, section: &str) -> Result<()> {
    let var = variables
        .get(var_idx)
        .ok_or_else(|| Error::invalid_input(section, format!("variable index {var_idx} out of range")))?;
    if val_idx >= var.domain_size() {
        return Err(Error::invalid_input(
            section,
            format!("value index {val_idx} out of range for variable {var_idx}"),
        ));
    }
    Ok(())
}
