use arrowhead::algebra::CsrMatrix;
use arrowhead::assembly::{get_infinity, AssemblySettings, ScenarioTree};
use arrowhead::comm::{ExecutionGroup, SerialGroup};
use arrowhead::problem::{InMemoryProblem, StageData};

fn assembled_tree(provider: &InMemoryProblem<f64>) -> ScenarioTree {
    let group = SerialGroup;
    let settings = AssemblySettings::<f64>::default();
    let mut tree = ScenarioTree::new(provider, &group, &settings);
    tree.assign_processes(&mut |_id| ExecutionGroup::single(0));
    tree.load_local_sizes(provider, &group);
    tree.compute_global_sizes(&group);
    tree
}

// three first-stage variables: box bounded, lower only, free
fn bounded_problem() -> InMemoryProblem<f64> {
    let inf = get_infinity();
    let first = StageData::from_constraints(
        CsrMatrix::zeros(0, 3),
        vec![],
        vec![],
        vec![-2.0, 1.0, -inf],
        vec![3.0, inf, inf],
    );
    let scenario = StageData::from_constraints(
        // two inequality rows: double sided and upper only
        CsrMatrix::new(2, 1, vec![0, 1, 2], vec![0, 0], vec![1.0, 2.0]),
        vec![-1.0, -inf],
        vec![4.0, 7.0],
        vec![0.0],
        vec![inf],
    );
    InMemoryProblem::new(first, vec![scenario])
}

#[test]
fn infinite_variable_bounds_emit_zero() {
    let provider = bounded_problem();
    let tree = assembled_tree(&provider);
    let group = SerialGroup;

    let xlow = tree.create_var_lower(&provider, &group);
    let xupp = tree.create_var_upper(&provider, &group);
    let ixlow = tree.create_var_lower_mask(&provider, &group);
    let ixupp = tree.create_var_upper_mask(&provider, &group);

    assert_eq!(xlow.local_segment(), &[-2.0, 1.0, 0.0]);
    assert_eq!(ixlow.local_segment(), &[1.0, 1.0, 0.0]);
    assert_eq!(xupp.local_segment(), &[3.0, 0.0, 0.0]);
    assert_eq!(ixupp.local_segment(), &[1.0, 0.0, 0.0]);

    // scenario variable is bounded below only
    assert_eq!(xlow.children()[0].local_segment(), &[0.0]);
    assert_eq!(ixlow.children()[0].local_segment(), &[1.0]);
    assert_eq!(ixupp.children()[0].local_segment(), &[0.0]);
}

#[test]
fn one_sided_inequality_rows() {
    let provider = bounded_problem();
    let tree = assembled_tree(&provider);
    let group = SerialGroup;

    let child = &tree.children()[0];
    assert_eq!((child.my(), child.mz()), (0, 2));

    let clow = tree.create_ineq_lower(&provider, &group);
    let cupp = tree.create_ineq_upper(&provider, &group);
    let iclow = tree.create_ineq_lower_mask(&provider, &group);
    let icupp = tree.create_ineq_upper_mask(&provider, &group);

    assert_eq!(clow.children()[0].local_segment(), &[-1.0, 0.0]);
    assert_eq!(iclow.children()[0].local_segment(), &[1.0, 0.0]);
    assert_eq!(cupp.children()[0].local_segment(), &[4.0, 7.0]);
    assert_eq!(icupp.children()[0].local_segment(), &[1.0, 1.0]);
}

#[test]
fn sentinel_comparison_is_strict() {
    let inf = get_infinity();
    // strictly inside the sentinel counts as finite, at it does not;
    // the interior value must be representably below 1e20 (the ulp
    // there is 16384, so offsets like inf - 1.0 round back to inf)
    let near = 0.5 * inf;
    assert!(near < inf);

    let first = StageData::from_constraints(
        CsrMatrix::zeros(0, 2),
        vec![],
        vec![],
        vec![-near, -inf],
        vec![near, inf],
    );
    let provider = InMemoryProblem::new(first, vec![]);
    let tree = assembled_tree(&provider);
    let group = SerialGroup;

    let ixlow = tree.create_var_lower_mask(&provider, &group);
    let ixupp = tree.create_var_upper_mask(&provider, &group);
    let xlow = tree.create_var_lower(&provider, &group);

    assert_eq!(ixlow.local_segment(), &[1.0, 0.0]);
    assert_eq!(ixupp.local_segment(), &[1.0, 0.0]);
    assert_eq!(xlow.local_segment(), &[-near, 0.0]);
}

// one equality and one inequality linking row over every node's variable
fn linked_problem() -> InMemoryProblem<f64> {
    let mut first = StageData::from_constraints(
        CsrMatrix::zeros(0, 1),
        vec![],
        vec![],
        vec![0.0],
        vec![1.0],
    );
    first.link_rows = Some(CsrMatrix::new(2, 1, vec![0, 1, 2], vec![0, 0], vec![1.0, 1.0]));

    let scenarios = (0..2)
        .map(|_| {
            let mut stage = StageData::from_constraints(
                CsrMatrix::new(1, 1, vec![0, 1], vec![0], vec![1.0]),
                vec![3.0],
                vec![3.0],
                vec![0.0],
                vec![1.0],
            );
            stage.coupling = Some(CsrMatrix::zeros(1, 1));
            stage.link_rows = Some(CsrMatrix::new(2, 1, vec![0, 1, 2], vec![0, 0], vec![1.0, -1.0]));
            stage
        })
        .collect();

    let mut provider = InMemoryProblem::new(first, scenarios);
    provider.link_row_lb = vec![1.0, 0.0];
    provider.link_row_ub = vec![1.0, 5.0];
    provider
}

#[test]
fn linking_rows_split_by_class() {
    let provider = linked_problem();
    let tree = assembled_tree(&provider);

    assert_eq!(tree.mle(), 1);
    assert_eq!(tree.mli(), 1);
    for child in tree.children() {
        assert_eq!(child.mle(), 1);
        assert_eq!(child.mli(), 1);
    }
}

#[test]
fn linking_rows_produce_cmat_blocks() {
    let provider = linked_problem();
    let tree = assembled_tree(&provider);
    let group = SerialGroup;

    let jac_eq = tree.create_eq_jacobian(&provider, &group);
    let jac_ineq = tree.create_ineq_jacobian(&provider, &group);

    let root_eq = jac_eq.as_active().unwrap();
    let cmat = root_eq.cmat.as_ref().unwrap();
    assert_eq!((cmat.nrows(), cmat.ncols()), (1, 1));
    assert_eq!(cmat.get_entry((0, 0)).unwrap(), 1.0);

    for child in jac_eq.children() {
        let cmat = child.as_active().unwrap().cmat.as_ref().unwrap();
        assert_eq!(cmat.nrows(), 1);
        assert_eq!(cmat.get_entry((0, 0)).unwrap(), 1.0);
    }
    for child in jac_ineq.children() {
        let cmat = child.as_active().unwrap().cmat.as_ref().unwrap();
        assert_eq!(cmat.nrows(), 1);
        assert_eq!(cmat.get_entry((0, 0)).unwrap(), -1.0);
    }
}

#[test]
fn linking_rows_do_not_enter_node_counts() {
    let provider = linked_problem();
    let tree = assembled_tree(&provider);

    // linking rows live beside the per-node partitions, not inside them
    assert_eq!((tree.my(), tree.mz()), (0, 0));
    assert_eq!(tree.my_global(), 2);
    assert_eq!(tree.mz_global(), 0);
}
