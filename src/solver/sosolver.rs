//! # Single-Objective Solver
//!
//! Searches one scalar reward channel. Each simulation samples a
//! determinization of the root information set, descends the tree while every
//! legal move has already been tried, expands one new node, plays out to a
//! terminal state and backpropagates the terminal rewards along the visited
//! path.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{Result, SearchError};
use crate::execution::{ExecutionPolicy, Sequential};
use crate::policies::{random_element, Exp3, Ucb1};
use crate::solver::{best_move, node_kind, playout, run_budget, SearchSettings};
use crate::tree::{NodeId, Tree};
use crate::GameState;

/// Single-objective Information Set MCTS solver.
///
/// Generic over the [`ExecutionPolicy`] deciding how many independent trees
/// are grown per decision; defaults to [`Sequential`].
pub struct SoSolver<X: ExecutionPolicy = Sequential> {
    settings: SearchSettings,
    execution: X,
}

impl SoSolver<Sequential> {
    /// A sequential solver with the default budget (1000 iterations) and
    /// exploration bias (0.7).
    pub fn new() -> Self {
        Self::with_execution(Sequential)
    }
}

impl Default for SoSolver<Sequential> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: ExecutionPolicy> SoSolver<X> {
    /// A solver growing trees under the given execution policy.
    pub fn with_execution(execution: X) -> Self {
        SoSolver {
            settings: SearchSettings::default(),
            execution,
        }
    }

    /// See [`SearchSettings::set_iteration_count`].
    pub fn set_iteration_count(&mut self, count: usize) -> Result<()> {
        self.settings.set_iteration_count(count)
    }

    /// See [`SearchSettings::set_iteration_time`].
    pub fn set_iteration_time(&mut self, time: Duration) -> Result<()> {
        self.settings.set_iteration_time(time)
    }

    /// See [`SearchSettings::set_exploration_bias`].
    pub fn set_exploration_bias(&mut self, bias: f64) -> Result<()> {
        self.settings.set_exploration_bias(bias)
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Selects a move for the current player of `root_state`.
    ///
    /// Blocking; grows fresh trees per the execution policy, merges their
    /// root statistics and returns the most visited legal move.
    ///
    /// # Errors
    /// [`SearchError::EmptyRoot`] when the root has no legal moves;
    /// [`SearchError::ContractViolation`] when a collaborator misbehaves
    /// mid-search; [`SearchError::Worker`] when a parallel worker fails.
    pub fn search<G: GameState>(&self, root_state: &G) -> Result<G::Move> {
        let root_moves = root_state.get_possible_moves();
        if root_moves.is_empty() {
            return Err(SearchError::EmptyRoot);
        }
        log::debug!(
            "single-objective search: {:?}, {} tree(s)",
            self.settings.budget(),
            self.execution.num_trees()
        );

        let trees = self
            .execution
            .run(|worker| self.grow_tree(root_state, worker))?;
        let trees: Vec<&Tree<G::Move>> = trees.iter().collect();
        let best = best_move(&trees, &root_moves)?;
        log::debug!("selected move {:?}", best);
        Ok(best)
    }

    fn grow_tree<G: GameState>(&self, root_state: &G, worker: usize) -> Result<Tree<G::Move>> {
        let mut tree = Tree::new();
        let mut rng = Xoshiro256PlusPlus::from_os_rng();
        run_budget(self.settings.budget(), || {
            self.simulate(&mut tree, root_state, &mut rng)
        })?;
        log::trace!("worker {} grew a tree of {} nodes", worker, tree.len());
        Ok(tree)
    }

    /// One determinize → select → expand → playout → backpropagate cycle.
    fn simulate<G, R>(&self, tree: &mut Tree<G::Move>, root_state: &G, rng: &mut R) -> Result<()>
    where
        G: GameState,
        R: Rng,
    {
        let mut state = root_state.determinize(root_state.get_current_player());
        let mut node = tree.root();

        // Selection, ending with at most one expansion.
        loop {
            if state.is_terminal() {
                break;
            }
            let moves = state.get_possible_moves();
            if moves.is_empty() {
                return Err(SearchError::ContractViolation(
                    "no legal moves from a non-terminal state during selection".into(),
                ));
            }
            let untried = tree.untried_moves(node, &moves);
            if !untried.is_empty() {
                let mv = random_element(&untried, rng).clone();
                node = tree.add_child(node, mv.clone(), state.get_current_player(), node_kind(&state));
                state.make_move(&mv);
                break;
            }
            let chosen = self.select_child(tree, node, &moves, &state, rng);
            let mv = tree
                .get(chosen)
                .incoming_move()
                .cloned()
                .expect("a non-root node always carries a move");
            state.make_move(&mv);
            node = chosen;
        }

        playout(&mut state, rng)?;
        tree.backpropagate(node, &state);
        Ok(())
    }

    /// Picks a child among the legal candidates, recording their
    /// availability at this moment of descent.
    fn select_child<G, R>(
        &self,
        tree: &mut Tree<G::Move>,
        node: NodeId,
        moves: &[G::Move],
        state: &G,
        rng: &mut R,
    ) -> NodeId
    where
        G: GameState,
        R: Rng,
    {
        let candidates = tree.legal_children(node, moves);
        debug_assert!(
            !candidates.is_empty(),
            "selection requires every legal move to have a child"
        );
        tree.mark_available(&candidates);
        if state.is_simultaneous_turn() {
            Exp3.choose(tree, &candidates, rng)
        } else {
            Ucb1::new(self.settings.exploration_bias()).choose(tree, &candidates)
        }
    }
}
