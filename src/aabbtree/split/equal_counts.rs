use crate::aabbtree::proxy::Proxy;
use crate::aabbtree::split::util::cmp_centers;
use crate::aabbtree::split::{Split, SplitOutcome, SplitParams};
use crate::r#type::TreeFloat;

/// Split at the median center along the split axis.
///
/// This uses selection rather than a full sort, so the order of proxies with equal centers is
/// unspecified. For two or more proxies the split is always proper, which makes this the fallback
/// of the other strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EqualCountSplit;

impl<N: TreeFloat, const D: usize> Split<N, D> for EqualCountSplit {
    fn split(params: &SplitParams<N, D>, proxies: &mut [Proxy<N, D>]) -> SplitOutcome {
        SplitOutcome::primary(split_equal_counts(params.split_dim, proxies))
    }
}

pub(super) fn split_equal_counts<N: TreeFloat, const D: usize>(
    split_dim: usize,
    proxies: &mut [Proxy<N, D>],
) -> usize {
    debug_assert!(proxies.len() >= 2);
    let split = proxies.len() / 2;
    proxies.select_nth_unstable_by(split, |a, b| cmp_centers(a, b, split_dim));
    split
}
