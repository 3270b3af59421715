//! Cross-cutting engine properties: configuration handling and the
//! statistical behaviour of the execution policies.

mod common;

use std::time::Duration;

use common::BanditGame;
use ismcts::{Budget, RootParallel, SearchError, Sequential, SoSolver};

#[test]
fn test_default_configuration() {
    let solver = SoSolver::new();
    assert_eq!(solver.settings().budget(), Budget::Iterations(1000));
    assert!((solver.settings().exploration_bias() - 0.7).abs() < 1e-12);
}

#[test]
fn test_budget_modes_are_mutually_exclusive() {
    let mut solver = SoSolver::new();

    solver.set_iteration_time(Duration::from_millis(5)).unwrap();
    assert_eq!(
        solver.settings().budget(),
        Budget::Time(Duration::from_millis(5))
    );

    solver.set_iteration_count(64).unwrap();
    assert_eq!(solver.settings().budget(), Budget::Iterations(64));
}

#[test]
fn test_invalid_configuration_is_rejected_synchronously() {
    let mut solver = SoSolver::new();

    assert!(matches!(
        solver.set_iteration_count(0),
        Err(SearchError::Configuration(_))
    ));
    assert!(matches!(
        solver.set_iteration_time(Duration::ZERO),
        Err(SearchError::Configuration(_))
    ));
    assert!(matches!(
        solver.set_exploration_bias(-0.5),
        Err(SearchError::Configuration(_))
    ));

    // The failed calls left the defaults untouched.
    assert_eq!(solver.settings().budget(), Budget::Iterations(1000));
    assert!((solver.settings().exploration_bias() - 0.7).abs() < 1e-12);
}

#[test]
fn test_root_parallel_spends_the_full_budget_per_worker() {
    let game = BanditGame::new(vec![0.5, 0.5, 0.5]);
    let mut solver = SoSolver::with_execution(RootParallel::with_workers(3));
    solver.set_iteration_count(200).unwrap();

    solver.search(&game).unwrap();
    // Three independent trees, 200 determinizations each.
    assert_eq!(game.determinization_count(), 600);
}

#[test]
fn test_sequential_and_root_parallel_agree_on_the_best_arm() {
    // With a wide win-probability gap both policies must identify arm 0;
    // root parallelization merges more samples and may only do better.
    let arms = vec![0.9, 0.1, 0.1];

    let mut sequential = SoSolver::with_execution(Sequential);
    sequential.set_iteration_count(2000).unwrap();
    assert_eq!(sequential.search(&BanditGame::new(arms.clone())).unwrap(), 0);

    let mut parallel = SoSolver::with_execution(RootParallel::with_workers(4));
    parallel.set_iteration_count(2000).unwrap();
    assert_eq!(parallel.search(&BanditGame::new(arms)).unwrap(), 0);
}
