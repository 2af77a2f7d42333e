use msarbor::{CostMatrix, ReducedCosts, Solver};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

fn random_costs(rng: &mut XorShiftRng, n: usize, max: i32) -> CostMatrix {
    CostMatrix::from_fn(n, |_, _| Some(rng.gen_range(0..max))).unwrap()
}

#[test]
fn solving_twice_gives_identical_results() {
    let mut rng = XorShiftRng::seed_from_u64(1);
    let costs = random_costs(&mut rng, 15, 10);
    let mut solver = Solver::new(15).unwrap();

    let first = solver.solve(&costs).unwrap();
    let pred = solver.predecessors().to_vec();
    let parents = solver.aux_parents().to_vec();
    let duals = solver.duals().to_vec();

    assert_eq!(solver.solve(&costs).unwrap(), first);
    assert_eq!(solver.predecessors(), pred.as_slice());
    assert_eq!(solver.aux_parents(), parents.as_slice());
    assert_eq!(solver.duals(), duals.as_slice());
}

#[test]
fn a_reused_solver_matches_fresh_solvers() {
    let mut rng = XorShiftRng::seed_from_u64(2);
    let instances: Vec<CostMatrix> = (0..20).map(|_| random_costs(&mut rng, 9, 6)).collect();

    let mut reused = Solver::new(9).unwrap();
    let mut reused_rc = ReducedCosts::new(9).unwrap();
    for costs in &instances {
        let mut fresh = Solver::new(9).unwrap();
        let mut fresh_rc = ReducedCosts::new(9).unwrap();

        assert_eq!(
            reused.solve_with_reduced_costs(costs, &mut reused_rc).unwrap(),
            fresh.solve_with_reduced_costs(costs, &mut fresh_rc).unwrap()
        );
        assert_eq!(reused.predecessors(), fresh.predecessors());
        assert_eq!(reused.aux_parents(), fresh.aux_parents());
        assert_eq!(reused.duals(), fresh.duals());
        assert_eq!(reused_rc, fresh_rc);
    }
}

#[test]
fn a_reused_solver_forgets_missing_arcs_of_earlier_instances() {
    let mut solver = Solver::new(3).unwrap();

    let sparse = CostMatrix::from_fn(3, |tail, head| (tail == 0 && head == 1).then_some(1)).unwrap();
    solver.solve(&sparse).unwrap();
    assert!(!solver.is_feasible());

    let dense = CostMatrix::from_fn(3, |_, _| Some(1)).unwrap();
    assert_eq!(solver.solve(&dense).unwrap(), 2);
    assert!(solver.is_feasible());
    assert!(solver.missing_arc_heads().is_empty());
}
