//! # Tree Policies
//!
//! Selection rules choosing among the legal children of a node during the
//! descent phase.
//!
//! [`Ucb1`] is the default for turn-based decision points. Its exploration
//! bonus uses a node's *availability* count rather than the parent's visit
//! count: under hidden information a move can be illegal in some
//! determinizations, and dividing by raw parent visits would systematically
//! punish rarely-available moves.
//!
//! [`Exp3`] handles simultaneous-move decision points, where UCB's premise
//! (the environment holds still while we explore) does not apply. It samples
//! children from an exponential-weight distribution and records each child's
//! selection probability so rewards can be importance-weighted during
//! backpropagation.

use rand::Rng;

use crate::tree::{NodeId, Tree};

/// Picks a uniformly random element of a non-empty slice.
pub fn random_element<'a, T, R: Rng>(items: &'a [T], rng: &mut R) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

/// Upper confidence bound tree policy.
///
/// Combines a node's mean reward with an exploration bonus, using the
/// configurable exploration constant to set the balance of exploitation of
/// known robust moves against exploration of infrequently visited ones.
#[derive(Debug, Clone, Copy)]
pub struct Ucb1 {
    exploration: f64,
}

impl Ucb1 {
    pub fn new(exploration: f64) -> Self {
        Ucb1 {
            exploration: exploration.max(0.0),
        }
    }

    pub fn exploration_constant(&self) -> f64 {
        self.exploration
    }

    /// Returns the candidate with the highest UCB score. Unvisited candidates
    /// score infinity and are therefore taken first; ties resolve to the
    /// earliest candidate so that repeated searches stay reproducible.
    pub fn choose<M: Clone + PartialEq>(&self, tree: &Tree<M>, candidates: &[NodeId]) -> NodeId {
        debug_assert!(!candidates.is_empty());
        let mut best = candidates[0];
        let mut best_score = self.ucb_score(tree, best);
        for &id in &candidates[1..] {
            let score = self.ucb_score(tree, id);
            if score > best_score {
                best = id;
                best_score = score;
            }
        }
        best
    }

    fn ucb_score<M: Clone + PartialEq>(&self, tree: &Tree<M>, id: NodeId) -> f64 {
        let node = tree.get(id);
        let visits = node.visits();
        if visits == 0 {
            f64::INFINITY
        } else {
            let visits = f64::from(visits);
            node.score() / visits
                + self.exploration * (f64::from(node.available()).ln() / visits).sqrt()
        }
    }
}

impl Default for Ucb1 {
    fn default() -> Self {
        Ucb1::new(0.7)
    }
}

/// Exponential-weight tree policy for simultaneous-move decision points.
///
/// The probability calculation is the variant given as Algorithm 1 in
/// "Evaluation and Analysis of the Performance of the EXP3 Algorithm in
/// Stochastic Environments" (Seldin et al., 2012), using the combined visit
/// count of the candidates as the trial counter, because the candidate set
/// varies between determinizations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exp3;

impl Exp3 {
    /// Samples a candidate from the EXP3 distribution, storing each
    /// candidate's probability on its node for importance weighting.
    pub fn choose<M, R>(&self, tree: &mut Tree<M>, candidates: &[NodeId], rng: &mut R) -> NodeId
    where
        M: Clone + PartialEq,
        R: Rng,
    {
        debug_assert!(!candidates.is_empty());
        let k = candidates.len() as f64;
        let trials = candidates
            .iter()
            .map(|&id| f64::from(tree.get(id).visits()))
            .sum::<f64>();
        let rate = Self::exploration_rate(k, trials);
        let previous_rate = Self::exploration_rate(k, trials - 1.0);
        let exp_sum = candidates
            .iter()
            .map(|&id| (previous_rate * tree.get(id).score()).exp())
            .sum::<f64>();

        let mut weights = Vec::with_capacity(candidates.len());
        for &id in candidates {
            let weight = (previous_rate * tree.get(id).score()).exp();
            let probability = rate + (1.0 - k * rate) * weight / exp_sum;
            tree.set_probability(id, probability);
            weights.push(probability);
        }

        candidates[sample_weighted(&weights, rng)]
    }

    // The epsilon factor or exploration rate
    fn exploration_rate(k: f64, trials: f64) -> f64 {
        if trials <= 0.0 {
            1.0 / k
        } else {
            (k.ln() / (k * trials)).sqrt().min(1.0 / k)
        }
    }
}

/// Samples an index proportionally to `weights`.
fn sample_weighted<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    let mut remaining = rng.random::<f64>() * total;
    for (index, weight) in weights.iter().enumerate() {
        remaining -= weight;
        if remaining <= 0.0 {
            return index;
        }
    }
    weights.len() - 1
}
