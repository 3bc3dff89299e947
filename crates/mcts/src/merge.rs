//! Shallow merge of worker trees into one decision tree.
//!
//! Only the first level is pooled. For each root child of a worker tree the
//! target root is searched for a child with the same merge key:
//! - match: the worker child's tallies are added to it; neither subtree is
//!   descended into, and the worker's deeper nodes are dropped
//! - no match: the worker child and its whole subtree are spliced in
//!
//! Finally the worker root's own tallies are added to the target root.
//! Per-key totals do not depend on the order workers are merged in.

use tilebot_core::Game;
use tracing::debug;

use crate::node::NodeId;
use crate::tree::SearchTree;

/// Merge one worker tree into `target`.
pub fn merge_worker_tree<G: Game>(game: &G, target: &mut SearchTree<G>, worker: &SearchTree<G>) {
    let mut matched = 0;
    let mut grafted = 0;

    for &child in worker.children(NodeId::ROOT) {
        let node = worker.get(child);
        let key = game.merge_key(&node.state);
        match find_child(game, target, &key) {
            Some(existing) => {
                target.get_mut(existing).stats.absorb(&node.stats);
                matched += 1;
            }
            None => {
                target.graft(NodeId::ROOT, worker, child);
                grafted += 1;
            }
        }
    }

    let worker_root = worker.root().stats;
    target.get_mut(NodeId::ROOT).stats.absorb(&worker_root);
    debug!(matched, grafted, visits = worker_root.visits, "merged worker tree");
}

/// Merge every worker tree into `target`, in order.
pub fn merge_worker_trees<G: Game>(game: &G, target: &mut SearchTree<G>, workers: &[SearchTree<G>]) {
    for worker in workers {
        merge_worker_tree(game, target, worker);
    }
}

// The last matching child wins if keys repeat among the target's children.
fn find_child<G: Game>(game: &G, target: &SearchTree<G>, key: &G::Key) -> Option<NodeId> {
    target
        .children(NodeId::ROOT)
        .iter()
        .rev()
        .copied()
        .find(|&id| game.merge_key(&target.get(id).state) == *key)
}
