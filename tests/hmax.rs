//! Whole-pipeline integration tests for h^max: TaskLoader -> StripsCompiler
//! -> A* search, driven off hand-written task-file fixtures.

use fdr_planner::{a_star, Hmax, StripsCompiler, TaskLoader};

fn one_var_two_values(goal_val: usize, op_cost: Option<u32>) -> String {
    let goal_line = format!("0 {goal_val}");
    let ops = match op_cost {
        None => "0\n".to_string(),
        Some(cost) => format!(
            "1\nbegin_operator\nset1\n0\n1\n0 0 -1 1\n{cost}\nend_operator\n"
        ),
    };
    format!(
        "v\nm\nh\nh\nh\nh\n\
         1\n\
         begin_variable\nv\n-1\n2\nval0\nval1\nend_variable\n\
         0\n\
         begin_state\n0\nend_state\n\
         begin_goal\n1\n{goal_line}\nend_goal\n\
         {ops}"
    )
}

#[test]
fn s1_trivial_empty_plan() {
    let fdr = TaskLoader::parse(&one_var_two_values(0, None)).unwrap();
    let strips = StripsCompiler::compile(&fdr);
    let plan = a_star(&fdr, &strips, &Hmax, None).unwrap();
    assert!(plan.operators.is_empty());
    assert_eq!(plan.cost, 0);
}

#[test]
fn s2_one_action_plan() {
    let fdr = TaskLoader::parse(&one_var_two_values(1, Some(4))).unwrap();
    let strips = StripsCompiler::compile(&fdr);
    let plan = a_star(&fdr, &strips, &Hmax, None).unwrap();
    assert_eq!(plan.operators, vec!["set1".to_string()]);
    assert_eq!(plan.cost, 4);
}

#[test]
fn s4_unsolvable_task_reports_failure() {
    let fdr = TaskLoader::parse(&one_var_two_values(1, None)).unwrap();
    let strips = StripsCompiler::compile(&fdr);
    let err = a_star(&fdr, &strips, &Hmax, None).unwrap_err();
    assert!(matches!(err, fdr_planner::Error::Unsolvable));
}

/// A three-variable chain, each step gated on the previous one, so h^max
/// must actually chain several operators rather than solving in one step.
#[test]
fn chained_preconditions_find_optimal_cost() {
    let text = "v\nm\nh\nh\nh\nh\n\
        3\n\
        begin_variable\na\n-1\n2\nf\nt\nend_variable\n\
        begin_variable\nb\n-1\n2\nf\nt\nend_variable\n\
        begin_variable\nc\n-1\n2\nf\nt\nend_variable\n\
        0\n\
        begin_state\n0\n0\n0\nend_state\n\
        begin_goal\n1\n2 1\nend_goal\n\
        3\n\
        begin_operator\nset_a\n0\n1\n0 0 -1 1\n1\nend_operator\n\
        begin_operator\nset_b\n1\n0 1\n1\n0 1 -1 1\n2\nend_operator\n\
        begin_operator\nset_c\n1\n1 1\n1\n0 2 -1 1\n3\nend_operator\n";
    let fdr = TaskLoader::parse(text).unwrap();
    let strips = StripsCompiler::compile(&fdr);
    let plan = a_star(&fdr, &strips, &Hmax, None).unwrap();
    assert_eq!(plan.cost, 6);
    assert_eq!(
        plan.operators,
        vec!["set_a".to_string(), "set_b".to_string(), "set_c".to_string()]
    );
}
