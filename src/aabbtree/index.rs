use std::marker::PhantomData;

use tinyvec::TinyVec;
use tracing::debug;

use crate::aabb::Aabb;
use crate::aabbtree::builder::TreeBuilder;
use crate::aabbtree::constants::{DEFAULT_LEAF_CUTOFF, MAX_LEAF_CUTOFF};
use crate::aabbtree::linear::LinearAabbTree;
use crate::aabbtree::node::{Node, NodeId, NodeKind};
use crate::aabbtree::proxy::{build_proxies, try_build_proxies, Proxy};
use crate::aabbtree::split::{Split, SurfaceAreaSplit};
use crate::aabbtree::traversal::{NodeRef, Preorder};
use crate::error::{AabbTreeError, Result};
use crate::r#type::TreeFloat;

/// An axis-aligned bounding box tree.
///
/// The tree is a strict binary tree over box proxies of the input values. Leaves hold between 1
/// and `leaf_cutoff` proxies; branches are split along the axis of largest center extent with the
/// strategy `S`.
///
/// ```
/// use aabb_tree::Aabb;
/// use aabb_tree::aabbtree::{AabbTree, EqualCountSplit};
///
/// let values = [(0., 0.), (1., 1.), (2., 2.)];
/// let mut tree: AabbTree<f64, 2, EqualCountSplit> = AabbTree::new(2);
/// tree.init(&values, |&(x, y)| Aabb::new([x, y], [x + 2., y + 2.]));
///
/// assert_eq!(tree.total_leaves(), 2);
/// let mut results = tree.search(&Aabb::new([3.5, 3.5], [5., 5.]));
/// results.sort();
/// assert_eq!(results, vec![2]);
/// ```
#[derive(Debug)]
pub struct AabbTree<N: TreeFloat, const D: usize, S = SurfaceAreaSplit> {
    leaf_cutoff: usize,
    nodes: Vec<Node<N, D>>,
    root: Option<NodeId>,
    proxies: Vec<Proxy<N, D>>,
    total_branches: usize,
    total_leaves: usize,
    total_fallback_splits: usize,
    phantom: PhantomData<fn() -> S>,
}

/// A two-dimensional [`AabbTree`].
pub type AabbTree2<N, S = SurfaceAreaSplit> = AabbTree<N, 2, S>;

/// A three-dimensional [`AabbTree`].
pub type AabbTree3<N, S = SurfaceAreaSplit> = AabbTree<N, 3, S>;

impl<N: TreeFloat, const D: usize, S: Split<N, D>> Default for AabbTree<N, D, S> {
    fn default() -> Self {
        Self::new(DEFAULT_LEAF_CUTOFF)
    }
}

impl<N: TreeFloat, const D: usize, S: Split<N, D>> AabbTree<N, D, S> {
    /// Create an empty tree whose leaves hold at most `leaf_cutoff` proxies.
    ///
    /// Panics unless `1 <= leaf_cutoff <= 255`.
    pub fn new(leaf_cutoff: usize) -> Self {
        assert!(
            (1..=MAX_LEAF_CUTOFF).contains(&leaf_cutoff),
            "Leaf cutoff must be in 1..={}, got {}",
            MAX_LEAF_CUTOFF,
            leaf_cutoff
        );
        Self {
            leaf_cutoff,
            nodes: Vec::new(),
            root: None,
            proxies: Vec::new(),
            total_branches: 0,
            total_leaves: 0,
            total_fallback_splits: 0,
            phantom: PhantomData,
        }
    }

    /// Create an empty tree, reporting an out of range leaf cutoff as an error.
    pub fn try_new(leaf_cutoff: usize) -> Result<Self> {
        if !(1..=MAX_LEAF_CUTOFF).contains(&leaf_cutoff) {
            return Err(AabbTreeError::InvalidLeafCutoff(leaf_cutoff));
        }
        Ok(Self::new(leaf_cutoff))
    }

    /// Create an empty tree with room for `num_items` proxies and their nodes.
    pub fn with_capacity(leaf_cutoff: usize, num_items: usize) -> Self {
        let mut tree = Self::new(leaf_cutoff);
        tree.proxies.reserve_exact(num_items);
        tree.nodes.reserve(node_capacity(num_items, leaf_cutoff));
        tree
    }

    /// Build the tree over `values`, discarding any previous contents.
    ///
    /// `func` maps each value to its box. Boxes must be finite with `min < max` on every axis;
    /// this is only checked in debug builds. Use [`AabbTree::try_init`] for untrusted input.
    ///
    /// An empty input leaves the tree empty.
    pub fn init<I, F>(&mut self, values: I, func: F)
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Aabb<N, D>,
    {
        self.clear_nodes();
        let proxies = build_proxies(values, func, std::mem::take(&mut self.proxies));
        self.build(proxies);
    }

    /// Like [`AabbTree::init`], but validates every box first.
    ///
    /// On error the tree is left empty.
    pub fn try_init<I, F>(&mut self, values: I, func: F) -> Result<()>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Aabb<N, D>,
    {
        self.clear_nodes();
        match try_build_proxies(values, func, std::mem::take(&mut self.proxies)) {
            Ok(proxies) => {
                self.build(proxies);
                Ok(())
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    /// Build the tree directly over a slice of boxes.
    pub fn init_boxes(&mut self, boxes: &[Aabb<N, D>]) {
        self.init(boxes, |bbox| *bbox);
    }

    /// Build the tree over a flat coordinate buffer, `2 * D` values per box.
    ///
    /// See [`Aabb::cast_interleaved`] for the layout.
    pub fn init_interleaved(&mut self, coords: &[N]) -> Result<()> {
        let boxes = Aabb::try_cast_interleaved(coords)?;
        self.init_boxes(boxes);
        Ok(())
    }

    /// Release all nodes and proxies.
    pub fn clear(&mut self) {
        self.clear_nodes();
        self.nodes = Vec::new();
        self.proxies = Vec::new();
    }

    /// Reset the tree but keep the allocations for reuse by the next build.
    fn clear_nodes(&mut self) {
        self.nodes.clear();
        self.proxies.clear();
        self.root = None;
        self.total_branches = 0;
        self.total_leaves = 0;
        self.total_fallback_splits = 0;
    }

    fn build(&mut self, mut proxies: Vec<Proxy<N, D>>) {
        if proxies.is_empty() {
            self.proxies = proxies;
            return;
        }

        let mut node_buffer = std::mem::take(&mut self.nodes);
        node_buffer.reserve(node_capacity(proxies.len(), self.leaf_cutoff));
        let builder = TreeBuilder::<N, D, S>::new(self.leaf_cutoff, node_buffer);
        let built = builder.build(&mut proxies);

        debug_assert_eq!(built.nodes.len(), built.total_branches + built.total_leaves);
        debug!(
            num_items = proxies.len(),
            leaf_cutoff = self.leaf_cutoff,
            branches = built.total_branches,
            leaves = built.total_leaves,
            fallback_splits = built.total_fallback_splits,
            "Built AABB tree"
        );

        self.nodes = built.nodes;
        self.root = Some(built.root);
        self.proxies = proxies;
        self.total_branches = built.total_branches;
        self.total_leaves = built.total_leaves;
        self.total_fallback_splits = built.total_fallback_splits;
    }
}

impl<N: TreeFloat, const D: usize, S> AabbTree<N, D, S> {
    /// The maximum number of proxies per leaf.
    pub fn leaf_cutoff(&self) -> usize {
        self.leaf_cutoff
    }

    /// Returns `true` if the tree holds no proxies.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The root node, or `None` for an empty tree.
    pub fn root(&self) -> Option<NodeRef<'_, N, D>> {
        self.root.map(|id| NodeRef::new(&self.nodes, &self.proxies, id))
    }

    /// The node with the given id.
    pub fn node(&self, id: NodeId) -> NodeRef<'_, N, D> {
        NodeRef::new(&self.nodes, &self.proxies, id)
    }

    /// The node arena. Children are allocated before their parent, in no particular order.
    pub fn nodes(&self) -> &[Node<N, D>] {
        &self.nodes
    }

    /// The proxies, ordered so that every leaf owns a contiguous run.
    pub fn proxies(&self) -> &[Proxy<N, D>] {
        &self.proxies
    }

    /// The box surrounding all proxies, or `None` for an empty tree.
    pub fn bounds(&self) -> Option<&Aabb<N, D>> {
        self.root.map(|id| &self.nodes[id.0].bbox)
    }

    pub fn total_branches(&self) -> usize {
        self.total_branches
    }

    pub fn total_leaves(&self) -> usize {
        self.total_leaves
    }

    pub fn total_nodes(&self) -> usize {
        self.total_branches + self.total_leaves
    }

    /// How many splits during the last build fell back to the equal-count split.
    pub fn total_fallback_splits(&self) -> usize {
        self.total_fallback_splits
    }

    /// The number of nodes on the longest root-to-leaf path. Zero for an empty tree.
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };

        let mut max_depth = 0;
        let mut stack: TinyVec<[(NodeId, usize); 64]> = TinyVec::new();
        stack.push((root, 1));
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let NodeKind::Branch { left, right, .. } = self.nodes[id.0].kind {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }
        max_depth
    }

    /// Depth-first, left-first iteration over all nodes.
    pub fn preorder(&self) -> Preorder<'_, N, D> {
        Preorder::new(&self.nodes, &self.proxies, self.root)
    }

    /// Search the tree for boxes intersecting `query`.
    ///
    /// Results are the input positions of the matching values, in no particular order.
    pub fn search(&self, query: &Aabb<N, D>) -> Vec<usize> {
        let mut results = vec![];
        let Some(root) = self.root else {
            return results;
        };

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[NodeId; 64]> = TinyVec::new();
        stack.push(root);

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if !node.bbox.intersects(query) {
                continue;
            }

            match node.kind {
                NodeKind::Leaf { first_index, count } => {
                    for proxy in &self.proxies[first_index..first_index + count] {
                        if proxy.bbox.intersects(query) {
                            results.push(proxy.value_index);
                        }
                    }
                }
                NodeKind::Branch { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        results
    }

    /// Search the tree for boxes containing `point`.
    pub fn search_point(&self, point: &[N; D]) -> Vec<usize> {
        self.search(&Aabb::from_point(*point))
    }

    /// Flatten this tree into a [`LinearAabbTree`].
    pub fn linearize(&self) -> LinearAabbTree<N, D> {
        LinearAabbTree::new(self)
    }
}

/// An upper bound on the nodes of a balanced build, used to size the arena.
fn node_capacity(num_items: usize, leaf_cutoff: usize) -> usize {
    2 * num_items.div_ceil(leaf_cutoff.max(1))
}
