//! Conversion of caller values into box proxies.

use crate::aabb::Aabb;
use crate::error::{AabbTreeError, Result};
use crate::r#type::TreeFloat;

/// A stand-in for one input value: its box, the box center and its position in the input.
///
/// Proxies are reordered in place while the tree is built, so a leaf's proxies are a contiguous
/// run of [`AabbTree::proxies`][crate::aabbtree::AabbTree::proxies]. `value_index` always refers
/// back to the caller's original element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proxy<N: TreeFloat, const D: usize> {
    pub(crate) bbox: Aabb<N, D>,
    pub(crate) center: [N; D],
    pub(crate) value_index: usize,
}

impl<N: TreeFloat, const D: usize> Proxy<N, D> {
    pub(crate) fn new(bbox: Aabb<N, D>, value_index: usize) -> Self {
        Self {
            bbox,
            center: bbox.center(),
            value_index,
        }
    }

    /// The box of the original value.
    #[inline]
    pub fn bbox(&self) -> &Aabb<N, D> {
        &self.bbox
    }

    /// The center of [`Proxy::bbox`].
    #[inline]
    pub fn center(&self) -> &[N; D] {
        &self.center
    }

    /// The position of the original value in the input sequence.
    #[inline]
    pub fn value_index(&self) -> usize {
        self.value_index
    }
}

/// Create one proxy per input value, appending to the empty buffer `proxies`.
///
/// Boxes must be valid (finite, `min < max` on every axis). This is only checked in debug builds.
pub(crate) fn build_proxies<N, const D: usize, I, F>(
    values: I,
    mut func: F,
    mut proxies: Vec<Proxy<N, D>>,
) -> Vec<Proxy<N, D>>
where
    N: TreeFloat,
    I: IntoIterator,
    F: FnMut(I::Item) -> Aabb<N, D>,
{
    debug_assert!(proxies.is_empty());
    let values = values.into_iter();
    proxies.reserve(values.size_hint().0);
    for (value_index, value) in values.enumerate() {
        let bbox = func(value);
        debug_assert!(
            bbox.is_valid(),
            "Box at input position {} is degenerate or not finite: {:?}",
            value_index,
            bbox
        );
        proxies.push(Proxy::new(bbox, value_index));
    }
    proxies
}

/// Like [`build_proxies`], but reports the first invalid box instead of asserting.
pub(crate) fn try_build_proxies<N, const D: usize, I, F>(
    values: I,
    mut func: F,
    mut proxies: Vec<Proxy<N, D>>,
) -> Result<Vec<Proxy<N, D>>>
where
    N: TreeFloat,
    I: IntoIterator,
    F: FnMut(I::Item) -> Aabb<N, D>,
{
    debug_assert!(proxies.is_empty());
    let values = values.into_iter();
    proxies.reserve(values.size_hint().0);
    for (index, value) in values.enumerate() {
        let bbox = func(value);
        if !bbox.is_valid() {
            return Err(AabbTreeError::DegenerateBox { index });
        }
        proxies.push(Proxy::new(bbox, index));
    }
    Ok(proxies)
}

/// The union of all proxy boxes and the box around all proxy centers.
pub(crate) fn surround<N: TreeFloat, const D: usize>(
    proxies: &[Proxy<N, D>],
) -> (Aabb<N, D>, Aabb<N, D>) {
    let mut bbox = Aabb::empty();
    let mut center_bbox = Aabb::empty();
    for proxy in proxies {
        bbox |= &proxy.bbox;
        center_bbox.expand(&proxy.center);
    }
    (bbox, center_bbox)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn proxies_keep_input_order() {
        let values = vec![(0.0f64, 1.0), (2.0, 4.0), (-1.0, 0.0)];
        let proxies = build_proxies(&values, |&(lo, hi)| Aabb::new([lo], [hi]), Vec::new());
        assert_eq!(proxies.len(), 3);
        for (i, proxy) in proxies.iter().enumerate() {
            assert_eq!(proxy.value_index(), i);
        }
        assert_eq!(proxies[1].center(), &[3.0]);
    }

    #[test]
    fn try_build_reports_first_bad_box() {
        let values = [[0.0f64, 1.0], [1.0, 1.0], [2.0, 1.0]];
        let result = try_build_proxies(values, |[lo, hi]| Aabb::new([lo], [hi]), Vec::new());
        assert_eq!(result, Err(AabbTreeError::DegenerateBox { index: 1 }));
    }

    #[test]
    fn surround_boxes_and_centers() {
        let proxies = vec![
            Proxy::new(Aabb::new([0.0f64, 0.0], [2.0, 2.0]), 0),
            Proxy::new(Aabb::new([4.0f64, 1.0], [6.0, 5.0]), 1),
        ];
        let (bbox, center_bbox) = surround(&proxies);
        assert_eq!(bbox, Aabb::new([0.0, 0.0], [6.0, 5.0]));
        assert_eq!(center_bbox, Aabb::new([1.0, 1.0], [5.0, 3.0]));
    }
}
