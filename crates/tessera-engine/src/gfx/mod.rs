//! Graphics-context seam between renderers and the GPU API.
//!
//! Renderers are written against [`GraphicsContext`] and always pass explicit
//! handles; there is no "currently bound" state. Two implementations:
//! - [`WgpuContext`]: records into a wgpu frame
//! - [`RecordingContext`]: headless, records the call sequence

mod context;
mod error;
pub mod recording;
mod wgpu_ctx;

pub use context::{BufferKind, GraphicsContext, IndexedDraw, ProgramSource, VertexAttribute};
pub use error::GfxError;
pub use recording::{GfxCall, RecordedHandle, RecordingContext, ResourceId};
pub use wgpu_ctx::{FrameTarget, WgpuBuffer, WgpuContext, WgpuProgram, WgpuTexture};
