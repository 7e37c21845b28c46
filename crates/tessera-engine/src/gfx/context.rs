use crate::math::Mat4;
use crate::texture::TextureData;

use super::GfxError;

/// Buffer role. Backends pick usage flags from it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    /// Per-vertex attribute data (`f32` components).
    Vertex,
    /// Triangle-list indices (`u16`).
    Index,
}

/// One vertex attribute, fed from its own tightly packed buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    /// Shader location; also the vertex buffer slot.
    pub location: u32,
    /// Number of `f32` components (1..=4).
    pub components: u32,
}

/// Everything a backend needs to build the program.
#[derive(Debug, Copy, Clone)]
pub struct ProgramSource<'a> {
    pub label: &'a str,
    /// WGSL module containing both stages.
    pub wgsl: &'a str,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    /// Attributes in vertex buffer slot order.
    pub attributes: &'a [VertexAttribute],
}

/// One indexed triangle-list draw with explicit handles.
///
/// Nothing is taken from "currently bound" state: the draw names the program,
/// every vertex buffer, the index buffer and the texture for slot 0.
pub struct IndexedDraw<'a, C: GraphicsContext + ?Sized> {
    pub program: &'a C::Program,
    /// Vertex buffers in the program's attribute order.
    pub vertex_buffers: &'a [&'a C::Buffer],
    pub index_buffer: &'a C::Buffer,
    pub texture: &'a C::Texture,
    pub index_count: u32,
}

/// Graphics capability injected into renderers.
///
/// Handle types own their GPU resource and release it on drop.
pub trait GraphicsContext {
    type Program;
    type Buffer;
    type Texture;

    /// Compiles both stages and links them. Fails with the backend's diagnostic log.
    fn build_program(&mut self, source: &ProgramSource<'_>) -> Result<Self::Program, GfxError>;

    fn create_buffer(&mut self, kind: BufferKind, contents: &[u8], label: &str) -> Self::Buffer;

    /// Replaces the whole contents of `buffer`.
    fn write_buffer(&mut self, buffer: &mut Self::Buffer, contents: &[u8]);

    /// Uploads `data` as a sampled RGBA8 texture. Fails when the device
    /// cannot hold it (for example, larger than its 2D size limit).
    fn create_texture(&mut self, data: &TextureData, label: &str) -> Result<Self::Texture, GfxError>;

    /// Sets the model-view-projection matrix used by `program`'s next draws.
    ///
    /// Each draw uses the matrix set before it, even when several draws of
    /// the same program land in one frame.
    fn set_transform(&mut self, program: &Self::Program, matrix: &Mat4);

    fn draw_indexed(&mut self, draw: IndexedDraw<'_, Self>);
}
