//! # Solvers
//!
//! The decision-making entry points. Both solvers repeat the same unit of
//! work — determinize, select down the tree, expand one node, play out to a
//! terminal state, backpropagate — until a termination budget is exhausted,
//! then return the root move with the best combined visit count.
//!
//! [`SoSolver`] searches a single scalar reward channel for the player to
//! move. [`MoSolver`] grows one tree per player from shared determinizations,
//! for games where every player's perspective must be searched at once.

mod mosolver;
mod sosolver;

pub use mosolver::MoSolver;
pub use sosolver::SoSolver;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::error::{Result, SearchError};
use crate::policies::random_element;
use crate::tree::{NodeKind, Tree};
use crate::GameState;

const DEFAULT_ITERATION_COUNT: usize = 1000;
const DEFAULT_EXPLORATION_BIAS: f64 = 0.7;

/// Termination budget for one `search()` call.
///
/// The two modes are mutually exclusive by construction; configuring one
/// replaces the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Run exactly this many simulations per tree.
    Iterations(usize),
    /// Keep starting simulations until this much wall-clock time has
    /// elapsed. Checked at iteration boundaries only; a simulation already
    /// in flight always completes.
    Time(Duration),
}

impl Default for Budget {
    fn default() -> Self {
        Budget::Iterations(DEFAULT_ITERATION_COUNT)
    }
}

/// Shared solver configuration: termination budget and exploration bias.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    budget: Budget,
    exploration_bias: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            budget: Budget::default(),
            exploration_bias: DEFAULT_EXPLORATION_BIAS,
        }
    }
}

impl SearchSettings {
    /// Switches to a fixed iteration budget.
    ///
    /// # Errors
    /// Rejects a zero count.
    pub fn set_iteration_count(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            return Err(SearchError::Configuration(
                "iteration count must be positive".into(),
            ));
        }
        self.budget = Budget::Iterations(count);
        Ok(())
    }

    /// Switches to a wall-clock budget.
    ///
    /// # Errors
    /// Rejects a zero duration.
    pub fn set_iteration_time(&mut self, time: Duration) -> Result<()> {
        if time.is_zero() {
            return Err(SearchError::Configuration(
                "iteration time must be positive".into(),
            ));
        }
        self.budget = Budget::Time(time);
        Ok(())
    }

    /// Sets the UCB exploration coefficient; 0 degenerates to pure
    /// exploitation.
    ///
    /// # Errors
    /// Rejects negative and NaN values.
    pub fn set_exploration_bias(&mut self, bias: f64) -> Result<()> {
        if !bias.is_finite() || bias < 0.0 {
            return Err(SearchError::Configuration(
                "exploration bias must be a non-negative number".into(),
            ));
        }
        self.exploration_bias = bias;
        Ok(())
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn exploration_bias(&self) -> f64 {
        self.exploration_bias
    }
}

/// Repeats `body` until the budget is exhausted, aborting on the first
/// error.
pub(crate) fn run_budget<F>(budget: Budget, mut body: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    match budget {
        Budget::Iterations(count) => {
            for _ in 0..count {
                body()?;
            }
        }
        Budget::Time(limit) => {
            let start = Instant::now();
            while start.elapsed() < limit {
                body()?;
            }
        }
    }
    Ok(())
}

/// Advances `state` with uniformly random legal moves until it reports
/// terminal.
pub(crate) fn playout<G: GameState, R: Rng>(state: &mut G, rng: &mut R) -> Result<()> {
    loop {
        if state.is_terminal() {
            return Ok(());
        }
        let moves = state.get_possible_moves();
        if moves.is_empty() {
            return Err(SearchError::ContractViolation(
                "no legal moves from a non-terminal state during playout".into(),
            ));
        }
        let mv = random_element(&moves, rng);
        state.make_move(mv);
    }
}

/// The statistics kind for nodes created at the current decision point.
pub(crate) fn node_kind<G: GameState>(state: &G) -> NodeKind {
    if state.is_simultaneous_turn() {
        NodeKind::Exp3
    } else {
        NodeKind::Ucb
    }
}

/// Merges root-level visit counts across finished trees and returns the most
/// visited move.
///
/// Candidates are restricted to `root_moves`, the moves the caller can
/// actually play: determinized states may have expanded root children that
/// are not legal from the observer's point of view. The most-visited child is
/// the conventional robust choice; a high-average, low-visit child is
/// statistically unreliable under a stochastic reward signal. Ties resolve to
/// the earliest move in `root_moves`.
pub(crate) fn best_move<M>(trees: &[&Tree<M>], root_moves: &[M]) -> Result<M>
where
    M: Clone + Eq + std::hash::Hash,
{
    let mut visits: HashMap<&M, u64> = HashMap::new();
    for tree in trees {
        for &child in tree.get(tree.root()).children() {
            let node = tree.get(child);
            if let Some(mv) = node.incoming_move() {
                *visits.entry(mv).or_insert(0) += u64::from(node.visits());
            }
        }
    }

    let mut best: Option<(&M, u64)> = None;
    for mv in root_moves {
        let count = visits.get(mv).copied().unwrap_or(0);
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((mv, count)),
        }
    }
    best.map(|(mv, _)| mv.clone()).ok_or(SearchError::EmptyRoot)
}
