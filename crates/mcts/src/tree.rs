//! Arena-allocated search tree.
//!
//! Nodes are stored in a contiguous vector and referenced by `NodeId`.
//! Parent links are plain indices, so cloning a tree for a worker is a
//! single `Vec` clone and splicing a subtree means re-indexing it.

use std::fmt;

use rand::Rng;
use tilebot_core::{Game, Outcome};

use crate::node::{Node, NodeId, NodeStats};
use crate::Result;

pub type GameNode<G> = Node<<G as Game>::State, <G as Game>::Action>;

/// One search tree rooted at `NodeId::ROOT`.
pub struct SearchTree<G: Game> {
    nodes: Vec<GameNode<G>>,
}

impl<G: Game> Clone for SearchTree<G> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
        }
    }
}

impl<G: Game> fmt::Debug for SearchTree<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchTree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root().stats)
            .finish()
    }
}

impl<G: Game> SearchTree<G> {
    /// Create a tree holding only a root for `state`.
    pub fn new<R: Rng + ?Sized>(game: &G, state: G::State, rng: &mut R) -> Self {
        let root = make_node(game, state, None, None, rng);
        Self { nodes: vec![root] }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get(&self, id: NodeId) -> &GameNode<G> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get_mut(&mut self, id: NodeId) -> &mut GameNode<G> {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> &GameNode<G> {
        self.get(NodeId::ROOT)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node ID in arena order, root first.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Direct children of `id` in creation order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Apply `action` to `parent`'s state and attach the result as a new child.
    ///
    /// Does not touch the parent's untried list.
    ///
    /// # Errors
    /// Propagates errors from `Game::apply`.
    pub fn add_child<R: Rng + ?Sized>(
        &mut self,
        game: &G,
        parent: NodeId,
        action: G::Action,
        rng: &mut R,
    ) -> Result<NodeId> {
        let state = game.apply(&self.get(parent).state, action)?;
        let child = make_node(game, state, Some(parent), Some(action), rng);
        let id = NodeId(self.nodes.len());
        self.nodes.push(child);
        self.get_mut(parent).children.push(id);
        Ok(id)
    }

    /// Record `outcome` on `leaf` and every ancestor up to the root.
    pub fn backpropagate(&mut self, leaf: NodeId, outcome: Outcome) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.stats.record(outcome);
            current = node.parent;
        }
    }

    /// Child of `id` with the highest UCB1 score. Ties keep the earliest child.
    ///
    /// Returns `None` if `id` has no children.
    ///
    /// # Panics
    /// Panics if any child has zero visits.
    pub fn select_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        let parent_visits = node.stats.visits;

        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for &child_id in &node.children {
            let score = self.get(child_id).stats.ucb(parent_visits, exploration);
            if best.is_none() || score > best_score {
                best = Some(child_id);
                best_score = score;
            }
        }
        best
    }

    /// Deep-copy the subtree of `source` rooted at `from` under `parent`.
    ///
    /// Returns the new ID of the copied subtree root.
    pub fn graft(&mut self, parent: NodeId, source: &SearchTree<G>, from: NodeId) -> NodeId {
        let grafted = NodeId(self.nodes.len());
        let mut stack = vec![(from, parent)];

        while let Some((src_id, dst_parent)) = stack.pop() {
            let src = source.get(src_id);
            let id = NodeId(self.nodes.len());
            self.nodes.push(Node {
                state: src.state.clone(),
                parent: Some(dst_parent),
                action: src.action,
                children: Vec::with_capacity(src.children.len()),
                stats: src.stats,
                untried: src.untried.clone(),
                outcome: src.outcome,
            });
            self.get_mut(dst_parent).children.push(id);
            stack.extend(src.children.iter().rev().map(|&child| (child, id)));
        }
        grafted
    }

    /// Number of nodes in the subtree rooted at `id`, including `id`.
    pub fn subtree_size(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            count += 1;
            stack.extend_from_slice(self.children(current));
        }
        count
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(NodeId::ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self.children(id).iter().map(|&child| (child, depth + 1)));
        }
        deepest
    }

    /// Statistics of every direct child of the root, in creation order.
    pub fn root_child_stats(&self) -> impl Iterator<Item = (NodeId, &NodeStats)> + '_ {
        self.children(NodeId::ROOT)
            .iter()
            .map(|&id| (id, &self.get(id).stats))
    }
}

fn make_node<G: Game, R: Rng + ?Sized>(
    game: &G,
    state: G::State,
    parent: Option<NodeId>,
    action: Option<G::Action>,
    rng: &mut R,
) -> GameNode<G> {
    let outcome = game.outcome(&state);
    // Terminal nodes are never expanded.
    let untried = if outcome.is_terminal() {
        Vec::new()
    } else {
        game.legal_actions(&state, rng)
    };
    Node::new(state, parent, action, untried, outcome)
}
