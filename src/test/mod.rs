//! Shared fixtures for unit tests.

use rand::rngs::StdRng;
use rand::Rng;

use crate::aabbtree::{AabbTree, NodeKind, Proxy};
use crate::Aabb;

/// The unit square with lower corner `(x, y)`.
pub(crate) fn unit_square(x: f64, y: f64) -> Aabb<f64, 2> {
    Aabb::new([x, y], [x + 1., y + 1.])
}

/// `n` unit squares on a ten-wide grid with a gap between neighbors.
pub(crate) fn unit_squares(n: usize) -> Vec<Aabb<f64, 2>> {
    (0..n)
        .map(|i| unit_square((i % 10) as f64 * 2., (i / 10) as f64 * 2.))
        .collect()
}

/// Seventeen boxes of mixed size and overlap, all with distinct centers.
pub(crate) fn seventeen_boxes() -> Vec<Aabb<f64, 2>> {
    vec![
        Aabb::new([0., 0.], [1., 1.]),
        Aabb::new([2., 0.], [3., 2.]),
        Aabb::new([5., 1.], [9., 2.]),
        Aabb::new([0.5, 3.], [1.5, 7.]),
        Aabb::new([4., 4.], [5., 5.]),
        Aabb::new([10., 10.], [11., 12.]),
        Aabb::new([12., 0.], [13., 1.]),
        Aabb::new([3., 8.], [6., 9.]),
        Aabb::new([7., 7.], [7.5, 7.5]),
        Aabb::new([15., 3.], [16., 5.]),
        Aabb::new([1., 12.], [2., 14.]),
        Aabb::new([8., 3.], [10., 6.]),
        Aabb::new([14., 14.], [15., 15.]),
        Aabb::new([6., 12.], [9., 13.]),
        Aabb::new([11., 6.], [12., 8.]),
        Aabb::new([0., 9.], [2., 10.]),
        Aabb::new([13., 9.], [16., 11.]),
    ]
}

/// `n` valid boxes with corners in `[0, 110)` on every axis.
pub(crate) fn random_boxes<const D: usize>(rng: &mut StdRng, n: usize) -> Vec<Aabb<f64, D>> {
    (0..n)
        .map(|_| {
            let min: [f64; D] = std::array::from_fn(|_| rng.gen_range(0.0..100.0));
            let max: [f64; D] = std::array::from_fn(|i| min[i] + rng.gen_range(0.5..10.0));
            Aabb::new(min, max)
        })
        .collect()
}

/// One-dimensional proxies from `(min, max)` intervals, in input order.
pub(crate) fn proxies_from_intervals(intervals: &[(f64, f64)]) -> Vec<Proxy<f64, 1>> {
    intervals
        .iter()
        .enumerate()
        .map(|(i, &(min, max))| Proxy::new(Aabb::new([min], [max]), i))
        .collect()
}

pub(crate) fn proxies_from_boxes(boxes: &[Aabb<f64, 2>]) -> Vec<Proxy<f64, 2>> {
    boxes
        .iter()
        .enumerate()
        .map(|(i, bbox)| Proxy::new(*bbox, i))
        .collect()
}

/// Check every structural invariant of a tree built over `boxes`.
pub(crate) fn check_tree_invariants<S, const D: usize>(
    tree: &AabbTree<f64, D, S>,
    boxes: &[Aabb<f64, D>],
) {
    let proxies = tree.proxies();
    assert_eq!(proxies.len(), boxes.len());

    // value indices are a permutation of the input and point at the right box
    let mut seen = vec![false; boxes.len()];
    for proxy in proxies {
        assert!(!seen[proxy.value_index()]);
        seen[proxy.value_index()] = true;
        assert_eq!(proxy.bbox(), &boxes[proxy.value_index()]);
    }

    if boxes.is_empty() {
        assert!(tree.is_empty());
        assert!(tree.nodes().is_empty());
        return;
    }

    assert_eq!(tree.nodes().len(), tree.total_nodes());
    assert_eq!(tree.total_branches() + 1, tree.total_leaves());

    let mut next = 0;
    let mut branches = 0;
    let mut leaves = 0;
    for node in tree.preorder() {
        match *node.kind() {
            NodeKind::Leaf { first_index, count } => {
                leaves += 1;
                assert!(count >= 1 && count <= tree.leaf_cutoff());
                // leaves partition the proxy array in preorder
                assert_eq!(first_index, next);
                next += count;

                let mut bbox = Aabb::empty();
                for proxy in node.proxies() {
                    assert!(node.bbox().contains(proxy.bbox()));
                    bbox |= proxy.bbox();
                }
                assert_eq!(&bbox, node.bbox());
            }
            NodeKind::Branch { split_dim, .. } => {
                branches += 1;
                assert!(split_dim < D);
                let (left, right) = node.children().unwrap();
                assert_ne!(left.id(), right.id());
                assert!(node.bbox().contains(left.bbox()));
                assert!(node.bbox().contains(right.bbox()));
                assert_eq!(&left.bbox().union(right.bbox()), node.bbox());
            }
        }
    }
    assert_eq!(next, proxies.len());
    assert_eq!(branches, tree.total_branches());
    assert_eq!(leaves, tree.total_leaves());
}
