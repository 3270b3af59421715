//! # Search Tree
//!
//! The information tree that guides the search. Unlike a conventional game
//! tree, its nodes are keyed by the move that led to them rather than by full
//! game states: a node aggregates statistics over every determinization in
//! which its move sequence was played, which is exactly the information-set
//! view of the game.
//!
//! The tree is an arena: all nodes live in a single `Vec` and refer to each
//! other by [`NodeId`]. Each tree is owned and mutated by exactly one search
//! worker, so the statistics path needs no locks or atomics. Parent links are
//! used only to walk back up during backpropagation.

use std::fmt;

use crate::GameState;

/// Handle to a node inside a [`Tree`] arena.
///
/// Ids are only meaningful for the tree that created them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodeId(usize);

/// How a node accumulates reward.
///
/// Nodes for ordinary, turn-based decision points keep plain reward sums and
/// are selected with UCB1. Nodes created at simultaneous-move decision points
/// keep importance-weighted sums and are selected with EXP3, which does not
/// assume the opponents' choices stay fixed while we search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeKind {
    /// Sequential decision point; UCB1 statistics.
    Ucb,
    /// Simultaneous decision point; EXP3 statistics.
    Exp3,
}

/// A node in the information tree.
///
/// Tracks the move that created it, the player who made that move (the
/// observer of this node's reward channel) and the selection statistics:
/// visit count, availability count and accumulated reward.
#[derive(Debug, Clone)]
pub struct Node<M> {
    /// Move that led here; `None` only for the root.
    mv: Option<M>,
    /// Player who made `mv`; `None` only for the root.
    player: Option<i32>,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    visits: u32,
    /// Times the parent was visited while this node's move was legal.
    /// Under hidden information not every child is legal in every
    /// determinization, so this, not the parent's visit count, is the
    /// denominator of the exploration bonus.
    available: u32,
    score: f64,
    /// Last EXP3 selection probability, used to importance-weight rewards.
    probability: f64,
}

impl<M> Node<M> {
    fn new(mv: Option<M>, player: Option<i32>, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Node {
            mv,
            player,
            kind,
            parent,
            children: Vec::new(),
            visits: 0,
            available: 1,
            score: 0.0,
            probability: 1.0,
        }
    }

    /// The move that created this node, or `None` for the root.
    pub fn incoming_move(&self) -> Option<&M> {
        self.mv.as_ref()
    }

    /// The player who made the incoming move, or `None` for the root.
    pub fn player(&self) -> Option<i32> {
        self.player
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of times this node's subtree was entered.
    pub fn visits(&self) -> u32 {
        self.visits
    }

    /// Number of times this node was a legal option while its parent was
    /// visited.
    pub fn available(&self) -> u32 {
        self.available
    }

    /// Reward accumulated over all simulations through this node.
    pub fn score(&self) -> f64 {
        self.score
    }
}

impl<M: fmt::Debug> fmt::Display for Node<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.mv, self.player) {
            (Some(mv), Some(player)) => write!(
                f,
                "[M:{:?} by {}, V/S/A: {}/{:.1}/{}]",
                mv, player, self.visits, self.score, self.available
            ),
            _ => write!(f, "[root, V/S/A: {}/{:.1}/{}]", self.visits, self.score, self.available),
        }
    }
}

/// Arena-allocated search tree rooted at the current information set.
///
/// A fresh tree is grown for every `search()` call; nothing persists across
/// decisions.
#[derive(Debug, Clone)]
pub struct Tree<M> {
    nodes: Vec<Node<M>>,
}

impl<M: Clone + PartialEq> Tree<M> {
    /// Creates a tree holding only a root node.
    pub fn new() -> Self {
        Tree {
            nodes: vec![Node::new(None, None, NodeKind::Ucb, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrows a node. Panics if `id` came from a different tree.
    pub fn get(&self, id: NodeId) -> &Node<M> {
        &self.nodes[id.0]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut Node<M> {
        &mut self.nodes[id.0]
    }

    /// Adds a child of `parent` keyed by `mv`, made by `player`.
    pub fn add_child(&mut self, parent: NodeId, mv: M, player: i32, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(Some(mv), Some(player), kind, Some(parent)));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Looks up the child of `parent` keyed by `mv`.
    pub fn find_child(&self, parent: NodeId, mv: &M) -> Option<NodeId> {
        self.get(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.get(child).mv.as_ref() == Some(mv))
    }

    /// Returns the child keyed by `mv`, creating it if absent.
    pub fn find_or_add_child(&mut self, parent: NodeId, mv: &M, player: i32, kind: NodeKind) -> NodeId {
        match self.find_child(parent, mv) {
            Some(child) => child,
            None => self.add_child(parent, mv.clone(), player, kind),
        }
    }

    /// The subset of `legal` moves that have no child under `node` yet.
    pub fn untried_moves(&self, node: NodeId, legal: &[M]) -> Vec<M> {
        legal
            .iter()
            .filter(|mv| self.find_child(node, mv).is_none())
            .cloned()
            .collect()
    }

    /// The children of `node` whose moves are in `legal`.
    pub fn legal_children(&self, node: NodeId, legal: &[M]) -> Vec<NodeId> {
        self.get(node)
            .children
            .iter()
            .copied()
            .filter(|&child| {
                let mv = self.get(child).mv.as_ref();
                legal.iter().any(|m| Some(m) == mv)
            })
            .collect()
    }

    /// Records that each of `ids` was a legal option at a visit of its
    /// parent. Must be called with the legal-child set captured at the moment
    /// of descent; availability is never reconstructed after the fact.
    pub fn mark_available(&mut self, ids: &[NodeId]) {
        for &id in ids {
            self.get_mut(id).available += 1;
        }
    }

    pub(crate) fn set_probability(&mut self, id: NodeId, probability: f64) {
        self.get_mut(id).probability = probability;
    }

    /// Walks from `leaf` up to the root, incrementing each node's visit count
    /// and crediting it with the terminal reward for its own player.
    ///
    /// Only nodes on the exact path a simulation descended receive credit.
    pub fn backpropagate<G>(&mut self, leaf: NodeId, terminal: &G)
    where
        G: GameState<Move = M>,
    {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            if let Some(player) = node.player {
                let reward = terminal.get_result(player);
                node.score += match node.kind {
                    NodeKind::Ucb => reward,
                    NodeKind::Exp3 => reward / node.probability,
                };
            }
            current = node.parent;
        }
    }

    fn render(&self, id: NodeId, indent: usize, out: &mut String)
    where
        M: fmt::Debug,
    {
        for _ in 0..indent {
            out.push_str("| ");
        }
        out.push_str(&self.get(id).to_string());
        out.push('\n');
        for &child in self.get(id).children() {
            self.render(child, indent + 1, out);
        }
    }
}

impl<M: Clone + PartialEq> Default for Tree<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the whole tree, one node per line, indented by depth.
impl<M: Clone + PartialEq + fmt::Debug> fmt::Display for Tree<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(self.root(), 0, &mut out);
        write!(f, "{}", out)
    }
}
