use crate::gfx::VertexAttribute;

// ── unit quad ─────────────────────────────────────────────────────────────
//
// Vertex order: bottom-left, bottom-right, top-right, top-left.

pub const QUAD_POSITIONS: [f32; 12] = [
    -1.0, -1.0, 0.0, //
    1.0, -1.0, 0.0, //
    1.0, 1.0, 0.0, //
    -1.0, 1.0, 0.0,
];

/// Full-texture mapping, same vertex order as [`QUAD_POSITIONS`].
pub const DEFAULT_UVS: [f32; 8] = [
    0.0, 0.0, //
    1.0, 0.0, //
    1.0, 1.0, //
    0.0, 1.0,
];

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

pub(super) const POSITION_ATTR: VertexAttribute = VertexAttribute {
    location: 0,
    components: 3,
};

pub(super) const UV_ATTR: VertexAttribute = VertexAttribute {
    location: 1,
    components: 2,
};

// ── uv rect ───────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in texture space, `(u0, v0)` to `(u1, v1)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl UvRect {
    pub const FULL: UvRect = UvRect {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };

    #[inline]
    pub fn width(&self) -> f32 {
        self.u1 - self.u0
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.v1 - self.v0
    }

    /// Per-vertex UVs in quad vertex order:
    /// `(u0,v0) (u1,v0) (u1,v1) (u0,v1)`.
    pub fn corners(&self) -> [f32; 8] {
        [
            self.u0, self.v0, //
            self.u1, self.v0, //
            self.u1, self.v1, //
            self.u0, self.v1,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_rect_corners_are_default_uvs() {
        assert_eq!(UvRect::FULL.corners(), DEFAULT_UVS);
    }

    #[test]
    fn indices_cover_two_triangles_of_four_vertices() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_POSITIONS.len() / 3));
    }
}
