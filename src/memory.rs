use num::{Float, NumCast, Zero};
use rand::distributions::uniform::SampleUniform;
use std::{
    fmt::{Debug, Display, LowerExp},
    iter::Sum,
    ops::{Add, AddAssign, Div, Sub, SubAssign},
};

/// Floating-point type the clustering is computed in. Input samples, centroids and
/// distances all share it.
pub trait Primitive: Add<Output = Self> + AddAssign + Sum + Sub<Output = Self> + SubAssign
                + Div<Output = Self> + Zero + Float + NumCast + SampleUniform
                + PartialOrd + Copy + Default + Display + Debug + Sync + Send + LowerExp + 'static
                + for<'a> AddAssign<&'a Self> {
    /// Convert a sample count into the primitive, used as divisor when averaging.
    fn from_count(cnt: usize) -> Self;
}
impl Primitive for f32 {
    #[inline(always)] fn from_count(cnt: usize) -> Self { cnt as f32 }
}
impl Primitive for f64 {
    #[inline(always)] fn from_count(cnt: usize) -> Self { cnt as f64 }
}

