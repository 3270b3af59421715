//! # Information Set Monte Carlo Tree Search
//!
//! This crate provides a decision-making engine for games and other
//! sequential-decision processes with hidden information. Instead of
//! searching over full game states — which the acting player cannot observe —
//! the engine repeatedly samples *determinizations* (fully-observable states
//! consistent with the player's information set), grows a statistics tree
//! keyed on moves, and returns the move that proved most robust across all
//! samples.
//!
//! ## Architecture
//! - [`GameState`]: the trait your game implements to provide move
//!   generation, state transitions, determinization and terminal rewards.
//! - [`SoSolver`]: single-objective solver returning the best move for the
//!   player to move, judged by one scalar reward channel.
//! - [`MoSolver`]: multi-objective solver maintaining a tree per player, for
//!   games where every player's perspective must be searched at once (for
//!   example simultaneous-move games); requires [`PomGameState`].
//! - [`Sequential`] / [`RootParallel`]: execution policies controlling how
//!   many independent trees are grown and on which threads. Root-parallel
//!   trees share nothing while growing; their root statistics are summed
//!   after all workers finish.
//!
//! Searches are configured with either a fixed iteration count or a
//! wall-clock budget, plus a UCB exploration bias. Every `search()` call
//! builds fresh trees; nothing persists between decisions.
//!
//! ## Example
//! ```
//! use ismcts::{GameState, SoSolver};
//!
//! /// One decision: move 1 always pays out, move 0 never does.
//! #[derive(Clone)]
//! struct PickOne {
//!     picked: Option<u8>,
//! }
//!
//! impl GameState for PickOne {
//!     type Move = u8;
//!
//!     fn determinize(&self, _observer: i32) -> Self {
//!         self.clone() // no hidden information in this game
//!     }
//!
//!     fn get_possible_moves(&self) -> Vec<u8> {
//!         if self.picked.is_none() { vec![0, 1] } else { Vec::new() }
//!     }
//!
//!     fn make_move(&mut self, mv: &u8) {
//!         self.picked = Some(*mv);
//!     }
//!
//!     fn is_terminal(&self) -> bool {
//!         self.picked.is_some()
//!     }
//!
//!     fn get_current_player(&self) -> i32 {
//!         0
//!     }
//!
//!     fn get_result(&self, _player: i32) -> f64 {
//!         match self.picked {
//!             Some(mv) => f64::from(mv),
//!             None => 0.0,
//!         }
//!     }
//! }
//!
//! let solver = SoSolver::new();
//! let best = solver.search(&PickOne { picked: None }).unwrap();
//! assert_eq!(best, 1);
//! ```

pub mod error;
pub mod execution;
pub mod policies;
pub mod solver;
pub mod tree;

pub use error::{Result, SearchError};
pub use execution::{ExecutionPolicy, RootParallel, Sequential};
pub use policies::{Exp3, Ucb1};
pub use solver::{Budget, MoSolver, SearchSettings, SoSolver};
pub use tree::{Node, NodeId, NodeKind, Tree};

/// The game model consumed by the solvers. Must be cloneable so that
/// determinizations can be advanced independently of the root state; `Send`
/// and `Sync` are required for parallel search.
///
/// The state should function as a finite state machine: after each
/// `make_move` it is ready to report the next player's legal moves, until it
/// reports terminal.
pub trait GameState: Clone + Send + Sync {
    /// The type of a move in the game.
    type Move: Clone + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync;

    /// Returns a copy of this state with the information hidden from
    /// `observer` resampled to a concrete, consistent configuration.
    ///
    /// Each call should draw an independent sample; the engine calls this
    /// once per simulation.
    fn determinize(&self, observer: i32) -> Self;

    /// Returns all legal moves from the current state, or an empty vector if
    /// the game is over.
    fn get_possible_moves(&self) -> Vec<Self::Move>;

    /// Applies a move to the state, modifying it and updating whose turn is
    /// next.
    fn make_move(&mut self, mv: &Self::Move);

    /// Returns true if the game is over.
    fn is_terminal(&self) -> bool;

    /// Returns the player whose turn it is to move.
    fn get_current_player(&self) -> i32;

    /// Returns the terminal result for the given player, preferentially in
    /// `[0, 1]` (0 loss, 0.5 draw, 1 win). Only called on terminal states.
    fn get_result(&self, player: i32) -> f64;

    /// Whether the current decision point is a simultaneous move, i.e.
    /// several players commit moves without seeing each other's choices.
    /// Override for games that feature such moves; the default is `false`.
    fn is_simultaneous_turn(&self) -> bool {
        false
    }
}

/// A game with partially observable moves, able to enumerate its players.
///
/// Required by [`MoSolver`], which keeps an individual search tree per
/// player.
pub trait PomGameState: GameState {
    /// Returns the identifiers of all players.
    fn get_players(&self) -> Vec<i32>;
}
