//! Strategies for partitioning a run of proxies in two.

mod equal_counts;
mod equal_dimensions;
mod surface_area;
mod r#trait;
mod util;

pub use equal_counts::EqualCountSplit;
pub use equal_dimensions::EqualDimensionSplit;
pub use r#trait::{Split, SplitOutcome, SplitParams};
pub use surface_area::SurfaceAreaSplit;
