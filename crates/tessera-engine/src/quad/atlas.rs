use std::ops::Deref;

use crate::gfx::GraphicsContext;

use super::geometry::{UvRect, DEFAULT_UVS};
use super::{QuadError, TexturedQuad};

/// Uniform `columns`×`rows` grid of tiles packed into one texture.
///
/// Tiles are addressed row-major from `(u, v) = (0, 0)`:
/// tile `i` sits at column `i % columns`, row `i / columns`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_width: f32,
    tile_height: f32,
}

impl TileGrid {
    pub fn new(columns: u32, rows: u32) -> Result<Self, QuadError> {
        if columns == 0 || rows == 0 {
            return Err(QuadError::EmptyGrid { columns, rows });
        }

        Ok(Self {
            columns,
            rows,
            tile_width: 1.0 / columns as f32,
            tile_height: 1.0 / rows as f32,
        })
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn tile_size(&self) -> (f32, f32) {
        (self.tile_width, self.tile_height)
    }

    #[inline]
    pub fn tile_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// UV rectangle of tile `index`; fails past the last tile.
    pub fn tile_rect(&self, index: u32) -> Result<UvRect, QuadError> {
        if u64::from(index) >= self.tile_count() {
            return Err(QuadError::TileOutOfRange {
                index,
                columns: self.columns,
                rows: self.rows,
            });
        }

        let x = index % self.columns;
        let y = index / self.columns;

        let u0 = x as f32 * self.tile_width;
        let v0 = y as f32 * self.tile_height;

        Ok(UvRect {
            u0,
            v0,
            u1: u0 + self.tile_width,
            v1: v0 + self.tile_height,
        })
    }

    /// Per-vertex UVs for tile `index` in quad vertex order.
    pub fn tile_uvs(&self, index: u32) -> Result<[f32; 8], QuadError> {
        self.tile_rect(index).map(|r| r.corners())
    }
}

/// Textured quad that can show a single tile of an atlas.
///
/// Starts with the full-texture mapping; call [`set_tile_uvs`](Self::set_tile_uvs)
/// to select a tile. Read access to the underlying quad (`render`, `program`,
/// `uvs`) goes through `Deref`.
pub struct AtlasQuad<C: GraphicsContext> {
    quad: TexturedQuad<C>,
    grid: TileGrid,
    tile: Option<u32>,
}

impl<C: GraphicsContext> AtlasQuad<C> {
    /// `columns`×`rows` atlas. The grid is validated before any GPU work.
    pub fn new(ctx: &mut C, columns: u32, rows: u32) -> Result<Self, QuadError> {
        let grid = TileGrid::new(columns, rows)?;
        let quad = TexturedQuad::new(ctx)?;
        Ok(Self {
            quad,
            grid,
            tile: None,
        })
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Currently selected tile, `None` while showing custom or full-texture UVs.
    #[inline]
    pub fn current_tile(&self) -> Option<u32> {
        self.tile
    }

    /// Maps tile `index` onto the quad. Out-of-range indices leave the quad untouched.
    pub fn set_tile_uvs(&mut self, ctx: &mut C, index: u32) -> Result<(), QuadError> {
        let uvs = self.grid.tile_uvs(index)?;
        self.quad.set_uvs(ctx, uvs);
        self.tile = Some(index);
        Ok(())
    }

    /// Restores the full-texture mapping.
    pub fn reset_uvs(&mut self, ctx: &mut C) {
        self.quad.set_uvs(ctx, DEFAULT_UVS);
        self.tile = None;
    }

    /// Arbitrary UVs; clears the tile selection.
    pub fn set_uvs(&mut self, ctx: &mut C, uvs: [f32; 8]) {
        self.quad.set_uvs(ctx, uvs);
        self.tile = None;
    }

    pub fn set_positions(&mut self, ctx: &mut C, positions: [f32; 12]) {
        self.quad.set_positions(ctx, positions);
    }
}

impl<C: GraphicsContext> Deref for AtlasQuad<C> {
    type Target = TexturedQuad<C>;

    fn deref(&self) -> &TexturedQuad<C> {
        &self.quad
    }
}
