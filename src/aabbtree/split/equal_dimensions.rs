use crate::aabbtree::proxy::Proxy;
use crate::aabbtree::split::equal_counts::split_equal_counts;
use crate::aabbtree::split::util::{is_proper, partition};
use crate::aabbtree::split::{Split, SplitOutcome, SplitParams};
use crate::r#type::TreeFloat;

/// Split at the midpoint of the center box along the split axis.
///
/// Proxies whose center lies strictly below the midpoint go left. If that leaves one side empty
/// the run is split by [`EqualCountSplit`][crate::aabbtree::EqualCountSplit] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EqualDimensionSplit;

impl<N: TreeFloat, const D: usize> Split<N, D> for EqualDimensionSplit {
    fn split(params: &SplitParams<N, D>, proxies: &mut [Proxy<N, D>]) -> SplitOutcome {
        let axis = params.split_dim;
        let two = N::one() + N::one();
        let midpoint = (params.center_bbox.min[axis] + params.center_bbox.max[axis]) / two;

        let split = partition(proxies, |proxy| proxy.center[axis] < midpoint);
        if is_proper(split, proxies.len()) {
            SplitOutcome::primary(split)
        } else {
            SplitOutcome::fallback(split_equal_counts(axis, proxies))
        }
    }
}
