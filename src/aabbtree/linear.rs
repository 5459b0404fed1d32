//! A flattened, pointer-free copy of an [`AabbTree`].
//!
//! Nodes are stored in depth-first, left-first order. The left child of a branch is always the
//! next node in the array and the right child sits `right_offset` slots further along, so every
//! subtree occupies a contiguous run of the array.

use std::ops::{Index, Range};

use tinyvec::TinyVec;

use crate::aabb::Aabb;
use crate::aabbtree::index::AabbTree;
use crate::aabbtree::node::{NodeId, NodeKind};
use crate::aabbtree::proxy::Proxy;
use crate::r#type::TreeFloat;

/// A node of a [`LinearAabbTree`].
///
/// A `count` of zero marks a branch, in which case `offset` is the distance to the right child.
/// Otherwise the node is a leaf over the proxies `offset..offset + count`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearNode<N: TreeFloat, const D: usize> {
    bbox: Aabb<N, D>,
    offset: u32,
    count: u8,
    split_dim: u8,
}

impl<N: TreeFloat, const D: usize> LinearNode<N, D> {
    /// The box surrounding everything below this node.
    #[inline]
    pub fn bbox(&self) -> &Aabb<N, D> {
        &self.bbox
    }

    #[inline]
    pub fn is_branch(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.count != 0
    }

    /// The distance from this node to its right child. Only valid for branches.
    #[inline]
    pub fn right_offset(&self) -> usize {
        debug_assert!(self.is_branch());
        self.offset as usize
    }

    /// The axis this branch was split along. Only valid for branches.
    #[inline]
    pub fn split_dim(&self) -> usize {
        debug_assert!(self.is_branch());
        self.split_dim as usize
    }

    /// The first proxy of this leaf. Only valid for leaves.
    #[inline]
    pub fn first_index(&self) -> usize {
        debug_assert!(self.is_leaf());
        self.offset as usize
    }

    /// The number of proxies in this leaf; zero for branches.
    #[inline]
    pub fn count(&self) -> usize {
        self.count as usize
    }

    /// The positions in the proxy array owned by this leaf. Only valid for leaves.
    #[inline]
    pub fn proxy_range(&self) -> Range<usize> {
        let first = self.first_index();
        first..first + self.count()
    }
}

/// A read-only, array-backed copy of an [`AabbTree`].
///
/// ```
/// use aabb_tree::Aabb;
/// use aabb_tree::aabbtree::AabbTree3;
///
/// let boxes: Vec<_> = (0..100)
///     .map(|i| {
///         let x = i as f32;
///         Aabb::new([x, 0., 0.], [x + 1., 1., 1.])
///     })
///     .collect();
/// let mut tree: AabbTree3<f32> = AabbTree3::new(4);
/// tree.init_boxes(&boxes);
///
/// let linear = tree.linearize();
/// assert_eq!(linear.len(), tree.total_nodes());
/// assert_eq!(linear[0].bbox(), tree.bounds().unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearAabbTree<N: TreeFloat, const D: usize> {
    nodes: Vec<LinearNode<N, D>>,
}

impl<N: TreeFloat, const D: usize> LinearAabbTree<N, D> {
    /// Flatten `tree`.
    ///
    /// Panics if the tree has more than `u32::MAX` nodes or more than 256 dimensions.
    pub fn new<S>(tree: &AabbTree<N, D, S>) -> Self {
        assert!(
            tree.total_nodes() <= u32::MAX as usize,
            "Cannot linearize a tree of {} nodes",
            tree.total_nodes()
        );
        assert!(D <= 256, "Cannot linearize a {}-dimensional tree", D);

        let mut linear = Self {
            nodes: Vec::with_capacity(tree.total_nodes()),
        };
        if let Some(root) = tree.root() {
            linear.flatten(tree, root.id());
            debug_assert_eq!(linear.nodes.len(), tree.total_nodes());
        }
        linear
    }

    fn flatten<S>(&mut self, tree: &AabbTree<N, D, S>, id: NodeId) {
        let node = &tree.nodes()[id.index()];
        let node_index = self.nodes.len();

        match node.kind {
            NodeKind::Leaf { first_index, count } => {
                debug_assert!(count > 0 && count < 256);
                self.nodes.push(LinearNode {
                    bbox: node.bbox,
                    offset: to_offset(first_index),
                    count: count as u8,
                    split_dim: 0,
                });
            }
            NodeKind::Branch {
                left,
                right,
                split_dim,
            } => {
                self.nodes.push(LinearNode {
                    bbox: node.bbox,
                    offset: 0,
                    count: 0,
                    split_dim: split_dim as u8,
                });
                self.flatten(tree, left);
                self.nodes[node_index].offset = to_offset(self.nodes.len() - node_index);
                self.flatten(tree, right);
            }
        }
    }

    /// The number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in depth-first, left-first order. The root is first.
    pub fn nodes(&self) -> &[LinearNode<N, D>] {
        &self.nodes
    }

    /// The root node, or `None` for an empty tree.
    pub fn root(&self) -> Option<&LinearNode<N, D>> {
        self.nodes.first()
    }

    pub fn get(&self, index: usize) -> Option<&LinearNode<N, D>> {
        self.nodes.get(index)
    }

    /// The array position of the left child of the branch at `index`.
    #[inline]
    pub fn left_child(&self, index: usize) -> usize {
        debug_assert!(self.nodes[index].is_branch());
        index + 1
    }

    /// The array position of the right child of the branch at `index`.
    #[inline]
    pub fn right_child(&self, index: usize) -> usize {
        index + self.nodes[index].right_offset()
    }

    /// Search for boxes intersecting `query`.
    ///
    /// `proxies` must be the proxies of the tree this was flattened from. Results are the input
    /// positions of the matching values, in no particular order.
    pub fn search(&self, query: &Aabb<N, D>, proxies: &[Proxy<N, D>]) -> Vec<usize> {
        let mut results = vec![];
        if self.nodes.is_empty() {
            return results;
        }

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[usize; 64]> = TinyVec::new();
        stack.push(0);

        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !node.bbox.intersects(query) {
                continue;
            }

            if node.is_leaf() {
                for proxy in &proxies[node.proxy_range()] {
                    if proxy.bbox.intersects(query) {
                        results.push(proxy.value_index);
                    }
                }
            } else {
                stack.push(self.right_child(index));
                stack.push(self.left_child(index));
            }
        }

        results
    }
}

impl<N: TreeFloat, const D: usize> Index<usize> for LinearAabbTree<N, D> {
    type Output = LinearNode<N, D>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

impl<'a, N: TreeFloat, const D: usize, S> From<&'a AabbTree<N, D, S>> for LinearAabbTree<N, D> {
    fn from(tree: &'a AabbTree<N, D, S>) -> Self {
        Self::new(tree)
    }
}

fn to_offset(value: usize) -> u32 {
    u32::try_from(value)
        .unwrap_or_else(|_| panic!("Offset {} does not fit in a linear node", value))
}
