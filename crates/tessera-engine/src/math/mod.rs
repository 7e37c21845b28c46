//! Minimal 3D math for the quad pipeline.
//!
//! Conventions:
//! - Matrices are column-major (OpenGL layout), 16 `f32`s.
//! - Clip space is GL-style (z in `[-1, 1]`); the wgpu backend remaps on upload.
//! - Angles are radians.

pub mod mat4;
mod vec3;

pub use mat4::Mat4;
pub use vec3::Vec3;
