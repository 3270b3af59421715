//! # Multi-Objective Solver
//!
//! Grows one tree per player from each shared determinization, so that every
//! player's best response is estimated from their own reward channel. This
//! matters for games with simultaneous moves, where the acting player's tree
//! alone cannot represent the opponents' independent decisions.

use std::collections::HashMap;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{Result, SearchError};
use crate::execution::{ExecutionPolicy, Sequential};
use crate::policies::{random_element, Exp3, Ucb1};
use crate::solver::{best_move, node_kind, playout, run_budget, SearchSettings};
use crate::tree::{NodeId, Tree};
use crate::PomGameState;

/// One worker's forest: a search tree per player.
type Forest<M> = HashMap<i32, Tree<M>>;

/// Multi-objective Information Set MCTS solver.
///
/// Requires [`PomGameState`] so it can maintain one tree per player. The
/// final decision reads only the trees of the player to move at the root;
/// the other trees exist to model the other players' choices during the
/// descent.
pub struct MoSolver<X: ExecutionPolicy = Sequential> {
    settings: SearchSettings,
    execution: X,
}

impl MoSolver<Sequential> {
    /// A sequential solver with the default budget (1000 iterations) and
    /// exploration bias (0.7).
    pub fn new() -> Self {
        Self::with_execution(Sequential)
    }
}

impl Default for MoSolver<Sequential> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: ExecutionPolicy> MoSolver<X> {
    /// A solver growing forests under the given execution policy.
    pub fn with_execution(execution: X) -> Self {
        MoSolver {
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

    /// Selects a move for the current player of `root_state`, reading only
    /// that player's statistics.
    ///
    /// # Errors
    /// As [`SoSolver::search`](crate::SoSolver::search), plus a contract
    /// violation when the player list does not cover every acting player.
    pub fn search<G: PomGameState>(&self, root_state: &G) -> Result<G::Move> {
        let root_moves = root_state.get_possible_moves();
        if root_moves.is_empty() {
            return Err(SearchError::EmptyRoot);
        }
        let players = root_state.get_players();
        let observer = root_state.get_current_player();
        if !players.contains(&observer) {
            return Err(SearchError::ContractViolation(format!(
                "current player {observer} is missing from the player list"
            )));
        }
        log::debug!(
            "multi-objective search for player {}: {:?}, {} forest(s) of {} tree(s)",
            observer,
            self.settings.budget(),
            self.execution.num_trees(),
            players.len()
        );

        let forests = self
            .execution
            .run(|worker| self.grow_forest(root_state, &players, worker))?;
        let observer_trees: Vec<&Tree<G::Move>> = forests
            .iter()
            .map(|forest| {
                forest
                    .get(&observer)
                    .expect("every forest holds a tree per player")
            })
            .collect();
        let best = best_move(&observer_trees, &root_moves)?;
        log::debug!("selected move {:?} for player {}", best, observer);
        Ok(best)
    }

    fn grow_forest<G: PomGameState>(
        &self,
        root_state: &G,
        players: &[i32],
        worker: usize,
    ) -> Result<Forest<G::Move>> {
        let mut forest: Forest<G::Move> =
            players.iter().map(|&player| (player, Tree::new())).collect();
        let mut rng = Xoshiro256PlusPlus::from_os_rng();
        run_budget(self.settings.budget(), || {
            self.simulate(&mut forest, root_state, &mut rng)
        })?;
        log::trace!(
            "worker {} grew {} trees totalling {} nodes",
            worker,
            forest.len(),
            forest.values().map(Tree::len).sum::<usize>()
        );
        Ok(forest)
    }

    /// One simulation over a shared determinization: every player's tree
    /// descends the same move sequence, but only the acting player's tree
    /// selects it.
    fn simulate<G, R>(&self, forest: &mut Forest<G::Move>, root_state: &G, rng: &mut R) -> Result<()>
    where
        G: PomGameState,
        R: Rng,
    {
        let mut state = root_state.determinize(root_state.get_current_player());
        let mut cursors: HashMap<i32, NodeId> = forest
            .iter()
            .map(|(&player, tree)| (player, tree.root()))
            .collect();

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
            let acting = state.get_current_player();
            let target = forest.get_mut(&acting).ok_or_else(|| {
                SearchError::ContractViolation(format!(
                    "acting player {acting} is missing from the player list"
                ))
            })?;
            let cursor = cursors[&acting];

            let untried = target.untried_moves(cursor, &moves);
            let (mv, expanded) = if untried.is_empty() {
                let candidates = target.legal_children(cursor, &moves);
                debug_assert!(!candidates.is_empty());
                target.mark_available(&candidates);
                let chosen = if state.is_simultaneous_turn() {
                    Exp3.choose(target, &candidates, rng)
                } else {
                    Ucb1::new(self.settings.exploration_bias()).choose(target, &candidates)
                };
                let mv = target
                    .get(chosen)
                    .incoming_move()
                    .cloned()
                    .expect("a non-root node always carries a move");
                (mv, false)
            } else {
                (random_element(&untried, rng).clone(), true)
            };

            // Every player's tree follows the same move. Trees the acting
            // player does not own still record which of their existing
            // children were legal at this step, keeping availability counts
            // meaningful in every tree.
            let kind = node_kind(&state);
            for (&player, tree) in forest.iter_mut() {
                let position = cursors[&player];
                if player != acting {
                    let siblings = tree.legal_children(position, &moves);
                    tree.mark_available(&siblings);
                }
                let next = tree.find_or_add_child(position, &mv, acting, kind);
                cursors.insert(player, next);
            }
            state.make_move(&mv);
            if expanded {
                break;
            }
        }

        playout(&mut state, rng)?;
        for (&player, tree) in forest.iter_mut() {
            tree.backpropagate(cursors[&player], &state);
        }
        Ok(())
    }
}
