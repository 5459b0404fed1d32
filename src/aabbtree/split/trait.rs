use crate::aabb::Aabb;
use crate::aabbtree::proxy::Proxy;
use crate::r#type::TreeFloat;

/// The geometry of the proxy run being split.
#[derive(Debug, Clone, Copy)]
pub struct SplitParams<'a, N: TreeFloat, const D: usize> {
    /// Union of the proxy boxes.
    pub bbox: &'a Aabb<N, D>,
    /// Box around the proxy centers.
    pub center_bbox: &'a Aabb<N, D>,
    /// The axis of largest extent of `center_bbox`.
    pub split_dim: usize,
}

/// Where a run of proxies was split, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Proxies before this position form the left child. Always in `1..len`.
    pub index: usize,
    /// Set when the strategy's own rule degenerated and the equal-count split was used instead.
    pub fallback: bool,
}

impl SplitOutcome {
    pub(crate) fn primary(index: usize) -> Self {
        Self {
            index,
            fallback: false,
        }
    }

    pub(crate) fn fallback(index: usize) -> Self {
        Self {
            index,
            fallback: true,
        }
    }
}

/// A rule for partitioning proxies along `split_dim`.
///
/// Implementations rearrange `proxies` in place so that everything "left" of the split precedes
/// [`SplitOutcome::index`]. They are only called with at least two proxies and must return an
/// index strictly inside the run.
pub trait Split<N: TreeFloat, const D: usize> {
    fn split(params: &SplitParams<N, D>, proxies: &mut [Proxy<N, D>]) -> SplitOutcome;
}
