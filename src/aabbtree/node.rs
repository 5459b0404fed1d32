use crate::aabb::Aabb;
use crate::r#type::TreeFloat;

/// The position of a node in its tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The arena position of this node, usable with
    /// [`AabbTree::nodes`][crate::aabbtree::AabbTree::nodes].
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The payload of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// An interior node with exactly two children.
    Branch {
        left: NodeId,
        right: NodeId,
        /// The axis the proxies were partitioned along.
        split_dim: usize,
    },
    /// A run of `count` proxies starting at `first_index`.
    Leaf { first_index: usize, count: usize },
}

/// A node of an [`AabbTree`][crate::aabbtree::AabbTree].
///
/// The box of every node is the tight union of the boxes of the proxies below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node<N: TreeFloat, const D: usize> {
    pub(crate) bbox: Aabb<N, D>,
    pub(crate) kind: NodeKind,
}

impl<N: TreeFloat, const D: usize> Node<N, D> {
    pub(crate) fn leaf(bbox: Aabb<N, D>, first_index: usize, count: usize) -> Self {
        Self {
            bbox,
            kind: NodeKind::Leaf { first_index, count },
        }
    }

    pub(crate) fn branch(bbox: Aabb<N, D>, left: NodeId, right: NodeId, split_dim: usize) -> Self {
        Self {
            bbox,
            kind: NodeKind::Branch {
                left,
                right,
                split_dim,
            },
        }
    }

    /// The box surrounding everything below this node.
    #[inline]
    pub fn bbox(&self) -> &Aabb<N, D> {
        &self.bbox
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Returns `true` if this is an interior node with two children.
    #[inline]
    pub fn is_branch(&self) -> bool {
        !self.is_leaf()
    }
}
