//! Tessera engine crate.
//!
//! Textured quads over a small graphics-context seam, plus the platform and
//! GPU runtime that drives them.
//!
//! - [`math`], [`texture`]: CPU-side data
//! - [`gfx`]: the [`GraphicsContext`](gfx::GraphicsContext) trait and its wgpu
//!   and recording implementations
//! - [`quad`]: textured quad, atlas quad, text terminal
//! - [`scene`]: spin state and projection
//! - [`device`], [`window`], [`core`]: runtime loop

pub mod math;
pub mod texture;
pub mod gfx;
pub mod quad;
pub mod scene;

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod paint;
