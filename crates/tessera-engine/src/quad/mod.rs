//! Textured quad renderers.
//!
//! - [`TexturedQuad`]: one quad, one program, one draw
//! - [`AtlasQuad`]: selects a tile of a uniform atlas grid via UVs
//! - [`TextTerminal`]: atlas quad addressed by character
//!
//! All of them are generic over [`GraphicsContext`](crate::gfx::GraphicsContext)
//! and take the context explicitly on every GPU-touching call.

mod atlas;
mod error;
pub mod geometry;
mod terminal;
mod textured;

pub use atlas::{AtlasQuad, TileGrid};
pub use error::QuadError;
pub use geometry::UvRect;
pub use terminal::TextTerminal;
pub use textured::TexturedQuad;
