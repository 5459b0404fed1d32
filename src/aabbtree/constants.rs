/// The leaf cutoff used by [`AabbTree::default`][crate::aabbtree::AabbTree].
pub const DEFAULT_LEAF_CUTOFF: usize = 8;

/// The largest allowed leaf cutoff. Linearized leaves store their count in a `u8`.
pub const MAX_LEAF_CUTOFF: usize = 255;

/// Subtrees over more proxies than this are built with the left half on another task.
pub const PARALLEL_THRESHOLD: usize = 16384;

/// The bin count used by [`SurfaceAreaSplit`][crate::aabbtree::SurfaceAreaSplit] by default.
pub const DEFAULT_SAH_BINS: usize = 8;
