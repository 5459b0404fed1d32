use std::fmt::Debug;

use num_traits::{Float, NumCast};

/// A trait for the floating point types that can be used as box coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Tree construction relies on
/// IEEE infinities for the empty box and on `Pod` to reinterpret flat coordinate buffers, so only
/// `f32` and `f64` qualify.
pub trait TreeFloat:
    private::Sealed + Float + NumCast + Debug + Default + Send + Sync + bytemuck::Pod
{
}

impl TreeFloat for f32 {}

impl TreeFloat for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
