//! Search node types for tree storage.
//!
//! Nodes live in an arena and refer to each other by index, so the
//! child-to-parent link never owns anything.

use tilebot_core::Outcome;

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Visit and result tallies for one node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub visits: u32,
    pub wins: u32,
    pub losses: u32,
}

impl NodeStats {
    /// Count one simulation ending in `outcome`.
    ///
    /// `Ongoing` only happens when a rollout hits its depth cap; it adds a
    /// visit and nothing else.
    pub fn record(&mut self, outcome: Outcome) {
        self.visits += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Ongoing => {}
        }
    }

    /// Add another node's tallies onto these.
    pub fn absorb(&mut self, other: &NodeStats) {
        self.visits += other.visits;
        self.wins += other.wins;
        self.losses += other.losses;
    }

    /// Wins minus losses.
    #[inline]
    pub fn net(&self) -> i64 {
        i64::from(self.wins) - i64::from(self.losses)
    }

    /// UCB1 score with a net-result exploitation term:
    ///
    /// `(wins - losses) / n + c * sqrt(2 ln N / n)`
    ///
    /// # Panics
    /// Panics if this node has never been visited.
    pub fn ucb(&self, parent_visits: u32, exploration: f64) -> f64 {
        assert!(
            self.visits > 0,
            "BUG: UCB score requested for a node with zero visits"
        );
        let n = f64::from(self.visits);
        let exploit = self.net() as f64 / n;
        if exploration == 0.0 {
            return exploit;
        }
        let explore = (2.0 * f64::from(parent_visits).ln() / n).sqrt();
        exploit + exploration * explore
    }
}

/// A node in the search tree.
#[derive(Clone, Debug)]
pub struct Node<S, A> {
    /// World snapshot this node represents.
    pub state: S,

    /// Parent node (None for root).
    pub parent: Option<NodeId>,

    /// Action that led here from the parent (None for root).
    pub action: Option<A>,

    /// Expanded children in creation order.
    pub children: Vec<NodeId>,

    pub stats: NodeStats,

    /// Legal actions not yet expanded. Popped from the end.
    pub untried: Vec<A>,

    /// Outcome of `state`, cached at creation.
    pub outcome: Outcome,
}

impl<S, A> Node<S, A> {
    pub fn new(
        state: S,
        parent: Option<NodeId>,
        action: Option<A>,
        untried: Vec<A>,
        outcome: Outcome,
    ) -> Self {
        Self {
            state,
            parent,
            action,
            children: Vec::new(),
            stats: NodeStats::default(),
            untried,
            outcome,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
