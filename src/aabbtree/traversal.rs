//! Utilities to traverse the tree structure.

use std::ops::Range;

use crate::aabb::Aabb;
use crate::aabbtree::node::{Node, NodeId, NodeKind};
use crate::aabbtree::proxy::Proxy;
use crate::r#type::TreeFloat;

/// A node of an [`AabbTree`][crate::aabbtree::AabbTree] together with the tree it lives in.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a, N: TreeFloat, const D: usize> {
    nodes: &'a [Node<N, D>],
    proxies: &'a [Proxy<N, D>],
    id: NodeId,
}

impl<'a, N: TreeFloat, const D: usize> NodeRef<'a, N, D> {
    pub(crate) fn new(nodes: &'a [Node<N, D>], proxies: &'a [Proxy<N, D>], id: NodeId) -> Self {
        Self { nodes, proxies, id }
    }

    fn node(&self) -> &'a Node<N, D> {
        &self.nodes[self.id.0]
    }

    fn with_id(&self, id: NodeId) -> Self {
        Self::new(self.nodes, self.proxies, id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The box surrounding everything below this node.
    pub fn bbox(&self) -> &'a Aabb<N, D> {
        &self.node().bbox
    }

    pub fn kind(&self) -> &'a NodeKind {
        &self.node().kind
    }

    /// Returns `true` if this is a leaf node without children.
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// Returns `true` if this is an interior node with two children.
    pub fn is_branch(&self) -> bool {
        self.node().is_branch()
    }

    /// The axis this branch was split along. `None` for leaves.
    pub fn split_dim(&self) -> Option<usize> {
        match self.node().kind {
            NodeKind::Branch { split_dim, .. } => Some(split_dim),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// The left and right child. `None` for leaves.
    pub fn children(&self) -> Option<(Self, Self)> {
        match self.node().kind {
            NodeKind::Branch { left, right, .. } => Some((self.with_id(left), self.with_id(right))),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// The positions in the proxy array owned by this leaf. `None` for branches.
    pub fn leaf_range(&self) -> Option<Range<usize>> {
        match self.node().kind {
            NodeKind::Leaf { first_index, count } => Some(first_index..first_index + count),
            NodeKind::Branch { .. } => None,
        }
    }

    /// The proxies owned by this leaf. Empty for branches.
    pub fn proxies(&self) -> &'a [Proxy<N, D>] {
        match self.leaf_range() {
            Some(range) => &self.proxies[range],
            None => &[],
        }
    }
}

/// Depth-first, left-first iterator over the nodes of a tree.
#[derive(Debug, Clone)]
pub struct Preorder<'a, N: TreeFloat, const D: usize> {
    nodes: &'a [Node<N, D>],
    proxies: &'a [Proxy<N, D>],
    stack: Vec<NodeId>,
}

impl<'a, N: TreeFloat, const D: usize> Preorder<'a, N, D> {
    pub(crate) fn new(
        nodes: &'a [Node<N, D>],
        proxies: &'a [Proxy<N, D>],
        root: Option<NodeId>,
    ) -> Self {
        Self {
            nodes,
            proxies,
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a, N: TreeFloat, const D: usize> Iterator for Preorder<'a, N, D> {
    type Item = NodeRef<'a, N, D>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let NodeKind::Branch { left, right, .. } = self.nodes[id.0].kind {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some(NodeRef::new(self.nodes, self.proxies, id))
    }
}

#[cfg(test)]
mod test {
    use crate::aabbtree::{AabbTree2, EqualCountSplit};
    use crate::test::unit_squares;

    #[test]
    fn preorder_visits_every_node_once() {
        let mut tree: AabbTree2<f64, EqualCountSplit> = AabbTree2::new(2);
        tree.init_boxes(&unit_squares(25));

        let visited: Vec<_> = tree.preorder().map(|node| node.id()).collect();
        assert_eq!(visited.len(), tree.total_nodes());
        assert_eq!(visited[0], tree.root().unwrap().id());

        let mut sorted = visited.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), visited.len());
    }

    #[test]
    fn preorder_leaves_cover_proxies_in_order() {
        let mut tree: AabbTree2<f64> = AabbTree2::new(3);
        tree.init_boxes(&unit_squares(40));

        let mut next = 0;
        for node in tree.preorder().filter(|node| node.is_leaf()) {
            let range = node.leaf_range().unwrap();
            assert_eq!(range.start, next);
            assert_eq!(node.proxies().len(), range.len());
            next = range.end;
        }
        assert_eq!(next, 40);
    }

    #[test]
    fn children_of_root() {
        let mut tree: AabbTree2<f64> = AabbTree2::new(4);
        tree.init_boxes(&unit_squares(9));

        let root = tree.root().unwrap();
        assert!(root.is_branch());
        assert!(root.proxies().is_empty());
        assert!(root.leaf_range().is_none());

        let (left, right) = root.children().unwrap();
        assert_eq!(left.bbox().union(right.bbox()), *root.bbox());
        assert!(root.split_dim().unwrap() < 2);
    }
}
