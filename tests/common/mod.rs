//! Shared game fixtures for the integration tests.
//!
//! Each fixture is the smallest game exercising one engine path: a perfect-
//! information board game, an instrumented bandit with known arm odds, a
//! single-move boundary case, a contract violator and a simultaneous-move
//! game with independent per-player reward channels.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ismcts::{GameState, PomGameState};
use rand::Rng;

/// The m-n-k game: generalised tic-tac-toe on an m by n board, won by
/// connecting k fields in a row. Perfect information, players 1 and -1.
#[derive(Clone)]
pub struct MnkGame {
    m: usize,
    n: usize,
    k: usize,
    board: Vec<i32>,
    current_player: i32,
}

impl MnkGame {
    pub fn new(m: usize, n: usize, k: usize) -> Self {
        MnkGame {
            m,
            n,
            k,
            board: vec![0; m * n],
            current_player: 1,
        }
    }

    /// A 3x3 game resumed from the given flat board.
    pub fn from_board(board: Vec<i32>, current_player: i32) -> Self {
        assert_eq!(board.len(), 9);
        MnkGame {
            m: 3,
            n: 3,
            k: 3,
            board,
            current_player,
        }
    }

    fn cell(&self, row: i32, col: i32) -> i32 {
        if row < 0 || col < 0 || row >= self.n as i32 || col >= self.m as i32 {
            0
        } else {
            self.board[row as usize * self.m + col as usize]
        }
    }

    fn has_line(&self, player: i32) -> bool {
        let k = self.k as i32;
        for row in 0..self.n as i32 {
            for col in 0..self.m as i32 {
                for (dc, dr) in [(1, 0), (0, 1), (1, 1), (1, -1)] {
                    let mut run = 0;
                    while run < k && self.cell(row + run * dr, col + run * dc) == player {
                        run += 1;
                    }
                    if run == k {
                        return true;
                    }
                }
            }
        }
        false
    }

    pub fn winner(&self) -> Option<i32> {
        for player in [1, -1] {
            if self.has_line(player) {
                return Some(player);
            }
        }
        None
    }
}

impl GameState for MnkGame {
    type Move = usize;

    fn determinize(&self, _observer: i32) -> Self {
        self.clone() // perfect information
    }

    fn get_possible_moves(&self) -> Vec<usize> {
        if self.winner().is_some() {
            return Vec::new();
        }
        (0..self.board.len())
            .filter(|&idx| self.board[idx] == 0)
            .collect()
    }

    fn make_move(&mut self, mv: &usize) {
        self.board[*mv] = self.current_player;
        self.current_player = -self.current_player;
    }

    fn is_terminal(&self) -> bool {
        self.get_possible_moves().is_empty()
    }

    fn get_current_player(&self) -> i32 {
        self.current_player
    }

    fn get_result(&self, player: i32) -> f64 {
        match self.winner() {
            Some(winner) if winner == player => 1.0,
            Some(_) => 0.0,
            None => 0.5,
        }
    }
}

impl PomGameState for MnkGame {
    fn get_players(&self) -> Vec<i32> {
        vec![1, -1]
    }
}

/// Position where the player to move must pick cell 2 to force a draw;
/// cell 0 lets the opponent complete a diagonal and win.
pub fn p1_draw_or_lose() -> MnkGame {
    MnkGame::from_board(vec![0, 1, 0, 1, -1, -1, -1, -1, 1], 1)
}

/// A fully played-out drawn board; no legal moves remain.
pub fn finished_board() -> MnkGame {
    MnkGame::from_board(vec![1, 1, -1, -1, -1, 1, 1, -1, 1], 1)
}

/// One-armed-bandit row: a single decision among arms with fixed win
/// probabilities, then the game ends. Counts determinizations so tests can
/// verify the exact number of simulations performed.
#[derive(Clone)]
pub struct BanditGame {
    arms: Vec<f64>,
    outcome: Option<f64>,
    determinizations: Arc<AtomicUsize>,
}

impl BanditGame {
    pub fn new(arms: Vec<f64>) -> Self {
        BanditGame {
            arms,
            outcome: None,
            determinizations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of determinizations sampled so far, across all clones.
    pub fn determinization_count(&self) -> usize {
        self.determinizations.load(Ordering::SeqCst)
    }
}

impl GameState for BanditGame {
    type Move = usize;

    fn determinize(&self, _observer: i32) -> Self {
        self.determinizations.fetch_add(1, Ordering::SeqCst);
        self.clone()
    }

    fn get_possible_moves(&self) -> Vec<usize> {
        if self.outcome.is_none() {
            (0..self.arms.len()).collect()
        } else {
            Vec::new()
        }
    }

    fn make_move(&mut self, mv: &usize) {
        let won = rand::rng().random::<f64>() < self.arms[*mv];
        self.outcome = Some(if won { 1.0 } else { 0.0 });
    }

    fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    fn get_current_player(&self) -> i32 {
        0
    }

    fn get_result(&self, _player: i32) -> f64 {
        self.outcome.unwrap_or(0.0)
    }
}

impl PomGameState for BanditGame {
    fn get_players(&self) -> Vec<i32> {
        vec![0]
    }
}

/// Exactly one legal move, then the game is over.
#[derive(Clone)]
pub struct SingleMoveGame {
    done: bool,
}

impl SingleMoveGame {
    pub fn new() -> Self {
        SingleMoveGame { done: false }
    }
}

impl GameState for SingleMoveGame {
    type Move = u8;

    fn determinize(&self, _observer: i32) -> Self {
        self.clone()
    }

    fn get_possible_moves(&self) -> Vec<u8> {
        if self.done {
            Vec::new()
        } else {
            vec![7]
        }
    }

    fn make_move(&mut self, _mv: &u8) {
        self.done = true;
    }

    fn is_terminal(&self) -> bool {
        self.done
    }

    fn get_current_player(&self) -> i32 {
        0
    }

    fn get_result(&self, _player: i32) -> f64 {
        1.0
    }
}

/// Broken collaborator: after its one move it claims the game is not over
/// while offering no legal moves.
#[derive(Clone)]
pub struct DeadEndGame {
    moved: bool,
}

impl DeadEndGame {
    pub fn new() -> Self {
        DeadEndGame { moved: false }
    }
}

impl GameState for DeadEndGame {
    type Move = u8;

    fn determinize(&self, _observer: i32) -> Self {
        self.clone()
    }

    fn get_possible_moves(&self) -> Vec<u8> {
        if self.moved {
            Vec::new()
        } else {
            vec![0]
        }
    }

    fn make_move(&mut self, _mv: &u8) {
        self.moved = true;
    }

    fn is_terminal(&self) -> bool {
        false
    }

    fn get_current_player(&self) -> i32 {
        0
    }

    fn get_result(&self, _player: i32) -> f64 {
        0.0
    }
}

/// Simultaneous-move game with independent reward channels: players 0 and 1
/// secretly commit to side 0 or 1; player 0 is paid for side 0, player 1 for
/// side 1, regardless of what the other player does. A committed but
/// unrevealed choice is hidden information for the other player.
#[derive(Clone)]
pub struct SimulPickGame {
    picks: [Option<u8>; 2],
    turn: usize,
}

impl SimulPickGame {
    pub fn new() -> Self {
        SimulPickGame {
            picks: [None, None],
            turn: 0,
        }
    }

    /// The state after player 0 committed to `side`, with player 1 to move.
    pub fn after_first_pick(side: u8) -> Self {
        SimulPickGame {
            picks: [Some(side), None],
            turn: 1,
        }
    }
}

impl GameState for SimulPickGame {
    type Move = u8;

    fn determinize(&self, observer: i32) -> Self {
        let mut state = self.clone();
        for player in 0..2 {
            if player != observer as usize && state.picks[player].is_some() {
                state.picks[player] = Some(rand::rng().random_range(0..2));
            }
        }
        state
    }

    fn get_possible_moves(&self) -> Vec<u8> {
        if self.turn < 2 {
            vec![0, 1]
        } else {
            Vec::new()
        }
    }

    fn make_move(&mut self, mv: &u8) {
        self.picks[self.turn] = Some(*mv);
        self.turn += 1;
    }

    fn is_terminal(&self) -> bool {
        self.turn >= 2
    }

    fn get_current_player(&self) -> i32 {
        self.turn.min(1) as i32
    }

    fn get_result(&self, player: i32) -> f64 {
        let wanted = if player == 0 { 0 } else { 1 };
        if self.picks[player as usize] == Some(wanted) {
            1.0
        } else {
            0.0
        }
    }

    fn is_simultaneous_turn(&self) -> bool {
        !self.is_terminal()
    }
}

impl PomGameState for SimulPickGame {
    fn get_players(&self) -> Vec<i32> {
        vec![0, 1]
    }
}
