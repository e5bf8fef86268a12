pub mod full_math;
pub use full_math::*;

pub mod fixed_point;
pub use fixed_point::*;
