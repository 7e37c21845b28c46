use crate::gfx::{BufferKind, GraphicsContext, IndexedDraw, ProgramSource};
use crate::math::Mat4;

use super::geometry::{DEFAULT_UVS, POSITION_ATTR, QUAD_INDICES, QUAD_POSITIONS, UV_ATTR};
use super::QuadError;

const SHADER_SRC: &str = include_str!("shaders/textured_quad.wgsl");

const PROGRAM: ProgramSource<'static> = ProgramSource {
    label: "tessera textured quad",
    wgsl: SHADER_SRC,
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
    attributes: &[POSITION_ATTR, UV_ATTR],
};

/// A single textured quad: 4 vertices, 2 triangles, one draw call.
///
/// Owns its program and buffers; they are released when the quad is dropped.
/// The transform is not managed here: set it on [`program`](Self::program)
/// (or via [`set_transform`](Self::set_transform)) before [`render`](Self::render).
pub struct TexturedQuad<C: GraphicsContext> {
    program: C::Program,
    position_buffer: C::Buffer,
    uv_buffer: C::Buffer,
    index_buffer: C::Buffer,

    positions: [f32; 12],
    uvs: [f32; 8],
}

impl<C: GraphicsContext> TexturedQuad<C> {
    /// Builds the program and uploads the unit quad with full-texture UVs.
    ///
    /// Fails with [`QuadError::ShaderBuild`] if the program cannot be built;
    /// no buffers are created in that case.
    pub fn new(ctx: &mut C) -> Result<Self, QuadError> {
        let program = ctx.build_program(&PROGRAM)?;

        let position_buffer = ctx.create_buffer(
            BufferKind::Vertex,
            bytemuck::cast_slice(&QUAD_POSITIONS),
            "tessera quad positions",
        );
        let uv_buffer = ctx.create_buffer(
            BufferKind::Vertex,
            bytemuck::cast_slice(&DEFAULT_UVS),
            "tessera quad uvs",
        );
        let index_buffer = ctx.create_buffer(
            BufferKind::Index,
            bytemuck::cast_slice(&QUAD_INDICES),
            "tessera quad indices",
        );

        Ok(Self {
            program,
            position_buffer,
            uv_buffer,
            index_buffer,
            positions: QUAD_POSITIONS,
            uvs: DEFAULT_UVS,
        })
    }

    /// Replaces the per-vertex UVs. Values are not range-checked.
    pub fn set_uvs(&mut self, ctx: &mut C, uvs: [f32; 8]) {
        self.uvs = uvs;
        ctx.write_buffer(&mut self.uv_buffer, bytemuck::cast_slice(&self.uvs));
    }

    /// Replaces the four model-space vertex positions (xyz each).
    pub fn set_positions(&mut self, ctx: &mut C, positions: [f32; 12]) {
        self.positions = positions;
        ctx.write_buffer(&mut self.position_buffer, bytemuck::cast_slice(&self.positions));
    }

    #[inline]
    pub fn uvs(&self) -> &[f32; 8] {
        &self.uvs
    }

    #[inline]
    pub fn positions(&self) -> &[f32; 12] {
        &self.positions
    }

    /// Program handle whose transform slot feeds the vertex stage.
    #[inline]
    pub fn program(&self) -> &C::Program {
        &self.program
    }

    /// Uploads the combined model-view-projection matrix.
    pub fn set_transform(&self, ctx: &mut C, mvp: &Mat4) {
        ctx.set_transform(&self.program, mvp);
    }

    /// Draws the quad (6 indices) sampling `texture` in slot 0.
    pub fn render(&self, ctx: &mut C, texture: &C::Texture) {
        ctx.draw_indexed(IndexedDraw {
            program: &self.program,
            vertex_buffers: &[&self.position_buffer, &self.uv_buffer],
            index_buffer: &self.index_buffer,
            texture,
            index_count: QUAD_INDICES.len() as u32,
        });
    }
}
