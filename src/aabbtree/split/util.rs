use std::cmp::Ordering;

use crate::aabbtree::proxy::Proxy;
use crate::r#type::TreeFloat;

/// Move every element matching `pred` to the front and return how many there are.
///
/// Relative order is not preserved.
pub(super) fn partition<T>(items: &mut [T], mut pred: impl FnMut(&T) -> bool) -> usize {
    let mut split = 0;
    for i in 0..items.len() {
        if pred(&items[i]) {
            items.swap(split, i);
            split += 1;
        }
    }
    split
}

/// Order proxies by their center coordinate along `axis`.
#[inline]
pub(super) fn cmp_centers<N: TreeFloat, const D: usize>(
    a: &Proxy<N, D>,
    b: &Proxy<N, D>,
    axis: usize,
) -> Ordering {
    // Centers of valid boxes are never NaN
    a.center[axis]
        .partial_cmp(&b.center[axis])
        .unwrap_or(Ordering::Equal)
}

/// Returns `true` if the split leaves both sides non-empty.
#[inline]
pub(super) fn is_proper(split: usize, len: usize) -> bool {
    split != 0 && split != len
}

/// Convert a count to the coordinate type. Every `usize` has a (possibly rounded) float value.
#[inline]
pub(super) fn count_to_float<N: TreeFloat>(count: usize) -> N {
    N::from(count).unwrap_or_else(N::infinity)
}
