//! Top-down recursive construction of the node arena.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::trace;

#[cfg(feature = "rayon")]
use crate::aabbtree::constants::PARALLEL_THRESHOLD;
use crate::aabbtree::node::{Node, NodeId};
use crate::aabbtree::proxy::{surround, Proxy};
use crate::aabbtree::split::{Split, SplitParams};
use crate::r#type::TreeFloat;

/// The result of a finished build.
#[derive(Debug)]
pub(crate) struct BuiltTree<N: TreeFloat, const D: usize> {
    pub(crate) nodes: Vec<Node<N, D>>,
    pub(crate) root: NodeId,
    pub(crate) total_branches: usize,
    pub(crate) total_leaves: usize,
    pub(crate) total_fallback_splits: usize,
}

/// Shared state of one build.
///
/// Recursive calls on disjoint proxy runs may run on different threads. They share only the node
/// arena, which is behind a mutex, and the atomic counters.
pub(crate) struct TreeBuilder<N: TreeFloat, const D: usize, S> {
    leaf_cutoff: usize,
    nodes: Mutex<Vec<Node<N, D>>>,
    total_branches: AtomicUsize,
    total_leaves: AtomicUsize,
    total_fallback_splits: AtomicUsize,
    phantom: PhantomData<fn() -> S>,
}

impl<N: TreeFloat, const D: usize, S: Split<N, D>> TreeBuilder<N, D, S> {
    /// `nodes` is an empty buffer whose capacity is reused for the arena.
    pub(crate) fn new(leaf_cutoff: usize, nodes: Vec<Node<N, D>>) -> Self {
        debug_assert!(leaf_cutoff >= 1);
        debug_assert!(nodes.is_empty());
        Self {
            leaf_cutoff,
            nodes: Mutex::new(nodes),
            total_branches: AtomicUsize::new(0),
            total_leaves: AtomicUsize::new(0),
            total_fallback_splits: AtomicUsize::new(0),
            phantom: PhantomData,
        }
    }

    /// Build the tree over `proxies`, reordering them so each leaf owns a contiguous run.
    ///
    /// `proxies` must not be empty.
    pub(crate) fn build(self, proxies: &mut [Proxy<N, D>]) -> BuiltTree<N, D> {
        debug_assert!(!proxies.is_empty());
        let root = self.build_recursive(proxies, 0);
        BuiltTree {
            nodes: self
                .nodes
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            root,
            total_branches: self.total_branches.into_inner(),
            total_leaves: self.total_leaves.into_inner(),
            total_fallback_splits: self.total_fallback_splits.into_inner(),
        }
    }

    fn allocate(&self, node: Node<N, D>) -> NodeId {
        let mut nodes = self.nodes.lock().unwrap_or_else(PoisonError::into_inner);
        nodes.push(node);
        NodeId(nodes.len() - 1)
    }

    /// `first_index` is the position of `proxies[0]` in the full proxy array. Since runs are
    /// fixed before recursing, each leaf's range is known without a shared cursor.
    fn build_recursive(&self, proxies: &mut [Proxy<N, D>], first_index: usize) -> NodeId {
        let (bbox, center_bbox) = surround(proxies);
        let count = proxies.len();

        if count <= self.leaf_cutoff {
            self.total_leaves.fetch_add(1, Ordering::Relaxed);
            return self.allocate(Node::leaf(bbox, first_index, count));
        }

        let split_dim = center_bbox.max_extent_axis();
        let params = SplitParams {
            bbox: &bbox,
            center_bbox: &center_bbox,
            split_dim,
        };
        let outcome = S::split(&params, proxies);
        debug_assert!(
            outcome.index > 0 && outcome.index < count,
            "Split {} is not inside 1..{}",
            outcome.index,
            count
        );
        if outcome.fallback {
            self.total_fallback_splits.fetch_add(1, Ordering::Relaxed);
            trace!(count, split_dim, "Split fell back to equal counts");
        }

        let (left_proxies, right_proxies) = proxies.split_at_mut(outcome.index);
        let (left, right) = self.build_children(
            left_proxies,
            right_proxies,
            first_index,
            first_index + outcome.index,
        );

        self.total_branches.fetch_add(1, Ordering::Relaxed);
        self.allocate(Node::branch(bbox, left, right, split_dim))
    }

    #[cfg(feature = "rayon")]
    fn build_children(
        &self,
        left_proxies: &mut [Proxy<N, D>],
        right_proxies: &mut [Proxy<N, D>],
        left_first_index: usize,
        right_first_index: usize,
    ) -> (NodeId, NodeId) {
        if left_proxies.len() + right_proxies.len() > PARALLEL_THRESHOLD {
            rayon::join(
                || self.build_recursive(left_proxies, left_first_index),
                || self.build_recursive(right_proxies, right_first_index),
            )
        } else {
            (
                self.build_recursive(left_proxies, left_first_index),
                self.build_recursive(right_proxies, right_first_index),
            )
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn build_children(
        &self,
        left_proxies: &mut [Proxy<N, D>],
        right_proxies: &mut [Proxy<N, D>],
        left_first_index: usize,
        right_first_index: usize,
    ) -> (NodeId, NodeId) {
        (
            self.build_recursive(left_proxies, left_first_index),
            self.build_recursive(right_proxies, right_first_index),
        )
    }
}
