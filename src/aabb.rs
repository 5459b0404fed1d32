//! Axis-aligned bounding boxes over `D` dimensions.

use std::ops::{BitOr, BitOrAssign};

use geo_traits::{CoordTrait, RectTrait};

use crate::error::{AabbTreeError, Result};
use crate::r#type::TreeFloat;

/// An axis-aligned bounding box.
///
/// The layout is two consecutive coordinate arrays, so a flat buffer of
/// `[min_0, .., min_D, max_0, .., max_D]` records can be viewed as a slice of boxes without
/// copying (see [`Aabb::cast_interleaved`]).
///
/// The empty box has `min = +inf` and `max = -inf` on every axis and is the identity of
/// [`Aabb::union`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<N: TreeFloat, const D: usize> {
    /// Lower corner.
    pub min: [N; D],
    /// Upper corner.
    pub max: [N; D],
}

// SAFETY: `repr(C)` over two arrays of the same `Pod` scalar leaves no padding and every bit
// pattern of `N` is a valid `N`.
unsafe impl<N: TreeFloat, const D: usize> bytemuck::Zeroable for Aabb<N, D> {}
unsafe impl<N: TreeFloat, const D: usize> bytemuck::Pod for Aabb<N, D> {}

impl<N: TreeFloat, const D: usize> Default for Aabb<N, D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<N: TreeFloat, const D: usize> Aabb<N, D> {
    /// The empty box.
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: [N::infinity(); D],
            max: [N::neg_infinity(); D],
        }
    }

    /// Create a box from its lower and upper corners.
    #[inline]
    pub fn new(min: [N; D], max: [N; D]) -> Self {
        Self { min, max }
    }

    /// A zero-extent box around a single point.
    #[inline]
    pub fn from_point(point: [N; D]) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// View a flat coordinate buffer as boxes.
    ///
    /// Each box occupies `2 * D` consecutive values: the `D` lower coordinates followed by the `D`
    /// upper coordinates. Panics if the buffer length is not a multiple of `2 * D`.
    pub fn cast_interleaved(coords: &[N]) -> &[Self] {
        bytemuck::cast_slice(coords)
    }

    /// Like [`Aabb::cast_interleaved`], but reports a bad buffer length as an error.
    pub fn try_cast_interleaved(coords: &[N]) -> Result<&[Self]> {
        bytemuck::try_cast_slice(coords).map_err(|err| {
            AabbTreeError::General(format!(
                "Cannot view {} coordinates as {}-dimensional boxes: {}",
                coords.len(),
                D,
                err
            ))
        })
    }

    /// Returns `true` if the box contains no point, i.e. `min > max` on some axis.
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..D).any(|i| self.min[i] > self.max[i])
    }

    /// Returns `true` if every coordinate is finite and `min < max` strictly on every axis.
    ///
    /// This is the precondition for boxes handed to tree construction.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..D).all(|i| {
            self.min[i].is_finite() && self.max[i].is_finite() && self.min[i] < self.max[i]
        })
    }

    /// The smallest box surrounding both `self` and `other`.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: std::array::from_fn(|i| self.min[i].min(other.min[i])),
            max: std::array::from_fn(|i| self.max[i].max(other.max[i])),
        }
    }

    /// Grow this box to include `point`.
    #[inline]
    pub fn expand(&mut self, point: &[N; D]) {
        for (i, &x) in point.iter().enumerate() {
            self.min[i] = self.min[i].min(x);
            self.max[i] = self.max[i].max(x);
        }
    }

    /// The midpoint of the box.
    #[inline]
    pub fn center(&self) -> [N; D] {
        let two = N::one() + N::one();
        std::array::from_fn(|i| (self.min[i] + self.max[i]) / two)
    }

    /// The per-axis extent `max - min`.
    #[inline]
    pub fn diagonal(&self) -> [N; D] {
        std::array::from_fn(|i| self.max[i] - self.min[i])
    }

    /// The axis of largest extent. Ties go to the lowest axis.
    pub fn max_extent_axis(&self) -> usize {
        let diagonal = self.diagonal();
        let mut axis = 0;
        for i in 1..D {
            if diagonal[i] > diagonal[axis] {
                axis = i;
            }
        }
        axis
    }

    /// The boundary measure of the box: `2 * sum_i prod_{j != i} extent_j`.
    ///
    /// This is the perimeter in two dimensions and the surface area in three. The empty box has
    /// surface area zero.
    pub fn surface_area(&self) -> N {
        if self.is_empty() {
            return N::zero();
        }

        let diagonal = self.diagonal();
        let mut total = N::zero();
        for i in 0..D {
            let mut face = N::one();
            for (j, &extent) in diagonal.iter().enumerate() {
                if j != i {
                    face = face * extent;
                }
            }
            total = total + face;
        }
        total + total
    }

    /// Returns `true` if `other` lies entirely inside this box (boundaries included).
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        (0..D).all(|i| self.min[i] <= other.min[i] && other.max[i] <= self.max[i])
    }

    /// Returns `true` if `point` lies inside this box (boundaries included).
    #[inline]
    pub fn contains_point(&self, point: &[N; D]) -> bool {
        (0..D).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    /// Returns `true` if the two closed boxes share at least one point.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }
}

impl<N: TreeFloat> Aabb<N, 2> {
    /// Create a two-dimensional box from any [`RectTrait`] implementation.
    pub fn from_rect(rect: &impl RectTrait<T = N>) -> Self {
        let min = rect.min();
        let max = rect.max();
        Self {
            min: [min.x(), min.y()],
            max: [max.x(), max.y()],
        }
    }
}

impl<N: TreeFloat, const D: usize> BitOrAssign<&Aabb<N, D>> for Aabb<N, D> {
    #[inline]
    fn bitor_assign(&mut self, rhs: &Aabb<N, D>) {
        *self = self.union(rhs);
    }
}

impl<N: TreeFloat, const D: usize> BitOrAssign for Aabb<N, D> {
    #[inline]
    fn bitor_assign(&mut self, rhs: Aabb<N, D>) {
        *self = self.union(&rhs);
    }
}

impl<N: TreeFloat, const D: usize> BitOr for Aabb<N, D> {
    type Output = Aabb<N, D>;

    #[inline]
    fn bitor(self, rhs: Aabb<N, D>) -> Self::Output {
        self.union(&rhs)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_box_is_union_identity() {
        let a = Aabb::new([1.0f64, 2.0], [3.0, 5.0]);
        assert!(Aabb::<f64, 2>::empty().is_empty());
        assert_eq!(Aabb::empty() | a, a);
        assert_eq!(Aabb::<f64, 2>::empty().surface_area(), 0.0);
    }

    #[test]
    fn union_and_containment() {
        let a = Aabb::new([0.0f32, 0.0], [1.0, 1.0]);
        let b = Aabb::new([2.0f32, -1.0], [3.0, 0.5]);
        let mut c = a;
        c |= &b;
        assert_eq!(c, Aabb::new([0.0, -1.0], [3.0, 1.0]));
        assert!(c.contains(&a));
        assert!(c.contains(&b));
        assert!(!a.intersects(&b));
        assert!(c.intersects(&b));
        assert!(c.contains_point(&[3.0, 1.0]));
    }

    #[test]
    fn surface_area_per_dimension() {
        let square = Aabb::new([0.0f64, 0.0], [2.0, 3.0]);
        assert_eq!(square.surface_area(), 10.0);

        let cube = Aabb::new([0.0f64, 0.0, 0.0], [1.0, 2.0, 3.0]);
        assert_eq!(cube.surface_area(), 22.0);
    }

    #[test]
    fn center_and_axis() {
        let a = Aabb::new([0.0f64, -4.0, 1.0], [2.0, 4.0, 2.0]);
        assert_eq!(a.center(), [1.0, 0.0, 1.5]);
        assert_eq!(a.diagonal(), [2.0, 8.0, 1.0]);
        assert_eq!(a.max_extent_axis(), 1);

        // ties resolve to the lowest axis
        let b = Aabb::new([0.0f64, 0.0], [1.0, 1.0]);
        assert_eq!(b.max_extent_axis(), 0);
    }

    #[test]
    fn validity() {
        assert!(Aabb::new([0.0f64, 0.0], [1.0, 1.0]).is_valid());
        assert!(!Aabb::new([0.0f64, 0.0], [0.0, 1.0]).is_valid());
        assert!(!Aabb::new([0.0f64, f64::NAN], [1.0, 1.0]).is_valid());
        assert!(!Aabb::new([0.0f64, 0.0], [f64::INFINITY, 1.0]).is_valid());
    }

    #[test]
    fn interleaved_buffer() {
        let coords = [0.0f64, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let boxes = Aabb::<f64, 2>::cast_interleaved(&coords);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[1], Aabb::new([4.0, 5.0], [6.0, 7.0]));

        assert!(Aabb::<f64, 3>::try_cast_interleaved(&coords).is_err());
    }

    #[test]
    fn from_geo_rect() {
        let rect = geo_0_31::Rect::new(
            geo_0_31::coord! { x: 3.0, y: 4.0 },
            geo_0_31::coord! { x: 1.0, y: 2.0 },
        );
        let a = Aabb::from_rect(&rect);
        assert_eq!(a, Aabb::new([1.0, 2.0], [3.0, 4.0]));
    }
}
