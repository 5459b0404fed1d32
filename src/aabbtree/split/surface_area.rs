use crate::aabb::Aabb;
use crate::aabbtree::constants::DEFAULT_SAH_BINS;
use crate::aabbtree::proxy::Proxy;
use crate::aabbtree::split::equal_counts::split_equal_counts;
use crate::aabbtree::split::util::{count_to_float, is_proper, partition};
use crate::aabbtree::split::{Split, SplitOutcome, SplitParams};
use crate::r#type::TreeFloat;

/// Split by the binned surface area heuristic.
///
/// Proxy centers are sorted into `BINS` evenly spaced buckets along the split axis. Each of the
/// `BINS - 1` bucket boundaries is scored with
///
/// ```text
/// cost = surface_area(left) * count(left) + surface_area(right) * count(right)
/// ```
///
/// and the proxies are partitioned at the cheapest boundary. When all centers coincide along the
/// axis, or the chosen boundary leaves one side empty, the run is split by
/// [`EqualCountSplit`][crate::aabbtree::EqualCountSplit] instead.
///
/// `BINS` must be greater than 1; smaller values fail to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceAreaSplit<const BINS: usize = DEFAULT_SAH_BINS>;

impl<const BINS: usize> SurfaceAreaSplit<BINS> {
    const CHECK_BINS: () = assert!(BINS > 1, "SurfaceAreaSplit needs more than one bin");
}

/// Running union of boxes and proxy count over a set of buckets.
#[derive(Debug, Clone, Copy)]
struct Bin<N: TreeFloat, const D: usize> {
    bbox: Aabb<N, D>,
    count: usize,
}

impl<N: TreeFloat, const D: usize> Bin<N, D> {
    fn empty() -> Self {
        Self {
            bbox: Aabb::empty(),
            count: 0,
        }
    }

    fn merge(&self, other: &Self) -> Self {
        Self {
            bbox: self.bbox.union(&other.bbox),
            count: self.count + other.count,
        }
    }

    fn cost(&self) -> N {
        self.bbox.surface_area() * count_to_float(self.count)
    }
}

impl<N: TreeFloat, const D: usize, const BINS: usize> Split<N, D> for SurfaceAreaSplit<BINS> {
    fn split(params: &SplitParams<N, D>, proxies: &mut [Proxy<N, D>]) -> SplitOutcome {
        #[allow(clippy::let_unit_value)]
        let () = Self::CHECK_BINS;

        let axis = params.split_dim;
        let center_min = params.center_bbox.min[axis];
        let center_max = params.center_bbox.max[axis];
        if center_min == center_max {
            return SplitOutcome::fallback(split_equal_counts(axis, proxies));
        }

        let num_bins = count_to_float::<N>(BINS);
        let extent = center_max - center_min;
        let bin_of = |proxy: &Proxy<N, D>| -> usize {
            let position = num_bins * ((proxy.center[axis] - center_min) / extent);
            position.to_usize().unwrap_or(0).min(BINS - 1)
        };

        let mut bins = [Bin::<N, D>::empty(); BINS];
        for proxy in proxies.iter() {
            let bin = &mut bins[bin_of(proxy)];
            bin.bbox |= &proxy.bbox;
            bin.count += 1;
        }

        // left_sweep[k] covers bins[..=k], right_sweep[k] covers bins[k + 1..]
        let mut left_sweep = [Bin::<N, D>::empty(); BINS];
        let mut right_sweep = [Bin::<N, D>::empty(); BINS];
        let mut running = Bin::empty();
        for k in 0..BINS - 1 {
            running = running.merge(&bins[k]);
            left_sweep[k] = running;
        }
        running = Bin::empty();
        for k in (0..BINS - 1).rev() {
            running = running.merge(&bins[k + 1]);
            right_sweep[k] = running;
        }

        let mut best_bin = 0;
        let mut best_cost = N::infinity();
        for k in 0..BINS - 1 {
            let cost = left_sweep[k].cost() + right_sweep[k].cost();
            if cost < best_cost {
                best_cost = cost;
                best_bin = k;
            }
        }

        let split = partition(proxies, |proxy| bin_of(proxy) <= best_bin);
        if is_proper(split, proxies.len()) {
            SplitOutcome::primary(split)
        } else {
            SplitOutcome::fallback(split_equal_counts(axis, proxies))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::aabbtree::proxy::surround;
    use crate::test::{proxies_from_boxes, unit_square};

    fn split_with<S: Split<f64, 2>>(proxies: &mut [Proxy<f64, 2>]) -> SplitOutcome {
        let (bbox, center_bbox) = surround(proxies);
        let params = SplitParams {
            bbox: &bbox,
            center_bbox: &center_bbox,
            split_dim: center_bbox.max_extent_axis(),
        };
        S::split(&params, proxies)
    }

    #[test]
    fn picks_cheapest_boundary() {
        // nine unit squares in a row; boundaries after the 4th and 5th square tie, the first wins
        let boxes: Vec<_> = (0..9).map(|i| unit_square(i as f64, 0.)).collect();
        let mut proxies = proxies_from_boxes(&boxes);
        let outcome = split_with::<SurfaceAreaSplit>(&mut proxies);
        assert_eq!(outcome, SplitOutcome::primary(4));
        assert!(proxies[..4].iter().all(|p| p.center()[0] < 4.));
    }

    #[test]
    fn splits_between_clusters() {
        let mut proxies = proxies_from_boxes(&[
            unit_square(100., 0.),
            unit_square(0., 0.),
            unit_square(1., 0.),
            unit_square(99., 0.),
            unit_square(2., 0.),
            unit_square(0.5, 0.),
        ]);
        let outcome = split_with::<SurfaceAreaSplit>(&mut proxies);
        assert_eq!(outcome, SplitOutcome::primary(4));
        assert!(proxies[..4].iter().all(|p| p.center()[0] < 50.));
        assert!(proxies[4..].iter().all(|p| p.center()[0] > 50.));
    }

    #[test]
    fn coincident_centers_fall_back() {
        let mut proxies = proxies_from_boxes(&[
            Aabb::new([0., 0.], [2., 2.]),
            Aabb::new([0.5, 0.5], [1.5, 1.5]),
            Aabb::new([-1., -1.], [3., 3.]),
            Aabb::new([0.9, 0.], [1.1, 2.]),
        ]);
        let outcome = split_with::<SurfaceAreaSplit>(&mut proxies);
        assert_eq!(outcome, SplitOutcome::fallback(2));
    }

    #[test]
    fn two_bins_still_split() {
        let mut proxies = proxies_from_boxes(&[
            unit_square(0., 0.),
            unit_square(10., 0.),
            unit_square(5., 0.),
        ]);
        let outcome = split_with::<SurfaceAreaSplit<2>>(&mut proxies);
        assert_eq!(outcome, SplitOutcome::primary(1));
    }

    #[test]
    fn empty_buckets_do_not_poison_costs() {
        let mut proxies = proxies_from_boxes(&[
            unit_square(0., 0.),
            unit_square(0.1, 0.),
            unit_square(0.2, 0.),
            unit_square(90., 0.),
        ]);
        let outcome = split_with::<SurfaceAreaSplit<16>>(&mut proxies);
        assert_eq!(outcome, SplitOutcome::primary(3));
        assert_eq!(proxies[3].value_index(), 3);
    }
}
