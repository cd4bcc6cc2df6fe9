//! Fixed-point math: the Q16.16 scalar and the vector/matrix types built on it.

pub mod fixed;
pub mod mat4;
pub mod trig;
pub mod vec3;
pub mod vec4;

pub use fixed::Fixed;
pub use mat4::Mat4;
pub use vec3::Vec3;
pub use vec4::Vec4;
