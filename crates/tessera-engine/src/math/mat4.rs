use std::ops::{Index, IndexMut, Mul};

use bytemuck::{Pod, Zeroable};

use super::Vec3;

/// Column-major 4x4 matrix (OpenGL layout).
///
/// Element `m[c * 4 + r]` is row `r` of column `c`; the translation lives in
/// `m[12..15]`. Always fully populated.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    #[inline]
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    #[inline]
    pub const fn to_cols_array(&self) -> [f32; 16] {
        self.m
    }

    /// Returns a fresh perspective projection. See [`perspective`].
    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut out = Self::IDENTITY;
        perspective(&mut out, fovy, aspect, near, far);
        out
    }

    /// Returns a fresh translation matrix.
    pub fn from_translation(v: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        translate_in_place(&mut out, v);
        out
    }

    /// Applies this matrix to the point `(p, 1)` and returns the homogeneous result.
    pub fn transform_point(&self, p: Vec3) -> [f32; 4] {
        let m = &self.m;
        [
            m[0] * p.x + m[4] * p.y + m[8] * p.z + m[12],
            m[1] * p.x + m[5] * p.y + m[9] * p.z + m[13],
            m[2] * p.x + m[6] * p.y + m[10] * p.z + m[14],
            m[3] * p.x + m[7] * p.y + m[11] * p.z + m[15],
        ]
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|v| v.is_finite())
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for Mat4 {
    type Output = f32;
    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.m[i]
    }
}

impl IndexMut<usize> for Mat4 {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.m[i]
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    #[inline]
    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = Mat4::IDENTITY;
        multiply(&mut out, &self, &rhs);
        out
    }
}

impl Mul for &Mat4 {
    type Output = Mat4;
    #[inline]
    fn mul(self, rhs: &Mat4) -> Mat4 {
        let mut out = Mat4::IDENTITY;
        multiply(&mut out, self, rhs);
        out
    }
}

// ── free functions ────────────────────────────────────────────────────────
//
// Destination-first, returning the destination for chaining. Functions that
// take both `out` and `a` cannot alias under the borrow checker; the
// `*_in_place` variants cover the "same buffer" case.

/// Fills `dest` with the identity matrix.
pub fn identity(dest: &mut Mat4) -> &mut Mat4 {
    *dest = Mat4::IDENTITY;
    dest
}

/// Symmetric perspective projection, GL clip space (z in `[-1, 1]`).
///
/// Not validated: callers must ensure `0 < near < far` and `aspect > 0`.
/// Degenerate inputs yield a degenerate matrix.
pub fn perspective(out: &mut Mat4, fovy: f32, aspect: f32, near: f32, far: f32) -> &mut Mat4 {
    let f = 1.0 / (fovy / 2.0).tan();
    let nf = 1.0 / (near - far);

    out.m = [
        f / aspect, 0.0, 0.0, 0.0, //
        0.0, f, 0.0, 0.0, //
        0.0, 0.0, (far + near) * nf, -1.0, //
        0.0, 0.0, 2.0 * far * near * nf, 0.0,
    ];
    out
}

/// `out = a · Rx(rad)`.
pub fn rotate_x<'o>(out: &'o mut Mat4, a: &Mat4, rad: f32) -> &'o mut Mat4 {
    let (s, c) = rad.sin_cos();
    let a = &a.m;

    let (a10, a11, a12, a13) = (a[4], a[5], a[6], a[7]);
    let (a20, a21, a22, a23) = (a[8], a[9], a[10], a[11]);

    out.m = [
        a[0], a[1], a[2], a[3], //
        a10 * c + a20 * s,
        a11 * c + a21 * s,
        a12 * c + a22 * s,
        a13 * c + a23 * s,
        a20 * c - a10 * s,
        a21 * c - a11 * s,
        a22 * c - a12 * s,
        a23 * c - a13 * s,
        a[12], a[13], a[14], a[15],
    ];
    out
}

/// `out = a · Ry(rad)`.
pub fn rotate_y<'o>(out: &'o mut Mat4, a: &Mat4, rad: f32) -> &'o mut Mat4 {
    let (s, c) = rad.sin_cos();
    let a = &a.m;

    let (a00, a01, a02, a03) = (a[0], a[1], a[2], a[3]);
    let (a20, a21, a22, a23) = (a[8], a[9], a[10], a[11]);

    out.m = [
        a00 * c - a20 * s,
        a01 * c - a21 * s,
        a02 * c - a22 * s,
        a03 * c - a23 * s,
        a[4], a[5], a[6], a[7], //
        a00 * s + a20 * c,
        a01 * s + a21 * c,
        a02 * s + a22 * c,
        a03 * s + a23 * c,
        a[12], a[13], a[14], a[15],
    ];
    out
}

/// `out = a · T(v)`. Only the last column differs from `a`.
pub fn translate<'o>(out: &'o mut Mat4, a: &Mat4, v: Vec3) -> &'o mut Mat4 {
    out.m = a.m;
    translate_in_place(out, v)
}

/// `m = m · Rx(rad)`.
pub fn rotate_x_in_place(m: &mut Mat4, rad: f32) -> &mut Mat4 {
    let src = *m;
    rotate_x(m, &src, rad)
}

/// `m = m · Ry(rad)`.
pub fn rotate_y_in_place(m: &mut Mat4, rad: f32) -> &mut Mat4 {
    let src = *m;
    rotate_y(m, &src, rad)
}

/// `m = m · T(v)`.
///
/// The translation column is a function of the first three columns only, so
/// no copy of the source is needed.
pub fn translate_in_place(m: &mut Mat4, v: Vec3) -> &mut Mat4 {
    let a = &mut m.m;
    let Vec3 { x, y, z } = v;

    a[12] += a[0] * x + a[4] * y + a[8] * z;
    a[13] += a[1] * x + a[5] * y + a[9] * z;
    a[14] += a[2] * x + a[6] * y + a[10] * z;
    a[15] += a[3] * x + a[7] * y + a[11] * z;
    m
}

/// `out = a · b`: applying `out` to a vector applies `b` first, then `a`.
pub fn multiply<'o>(out: &'o mut Mat4, a: &Mat4, b: &Mat4) -> &'o mut Mat4 {
    let a = &a.m;
    let b = &b.m;

    for col in 0..4 {
        let (b0, b1, b2, b3) = (b[col * 4], b[col * 4 + 1], b[col * 4 + 2], b[col * 4 + 3]);
        for row in 0..4 {
            out.m[col * 4 + row] =
                b0 * a[row] + b1 * a[4 + row] + b2 * a[8 + row] + b3 * a[12 + row];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn assert_mat_eq(a: &Mat4, b: &Mat4) {
        for i in 0..16 {
            assert_abs_diff_eq!(a[i], b[i], epsilon = 1e-5);
        }
    }

    fn sample() -> Mat4 {
        Mat4::from_cols_array([
            1.0, 2.0, 3.0, 4.0, //
            5.0, 6.0, 7.0, 8.0, //
            9.0, 10.0, 11.0, 12.0, //
            13.0, 14.0, 15.0, 16.0,
        ])
    }

    // ── identity / multiply ───────────────────────────────────────────────

    #[test]
    fn identity_overwrites_everything() {
        let mut m = sample();
        identity(&mut m);
        assert_eq!(m, Mat4::IDENTITY);
    }

    #[test]
    fn identity_is_left_neutral() {
        let mut out = Mat4::default();
        multiply(&mut out, &Mat4::IDENTITY, &sample());
        assert_eq!(out, sample());
    }

    #[test]
    fn identity_is_right_neutral() {
        let mut out = Mat4::default();
        multiply(&mut out, &sample(), &Mat4::IDENTITY);
        assert_eq!(out, sample());
    }

    #[test]
    fn multiply_applies_right_operand_first() {
        // T(1,0,0) · Ry(90°): rotate +X onto -Z, then shift by +X.
        let mut rot = Mat4::IDENTITY;
        rotate_y_in_place(&mut rot, FRAC_PI_2);
        let shift = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));

        let p = (shift * rot).transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(p[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p[2], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p[3], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn multiply_matches_operator() {
        let a = sample();
        let mut b = Mat4::IDENTITY;
        rotate_x_in_place(&mut b, 0.3);
        let mut out = Mat4::default();
        multiply(&mut out, &a, &b);
        assert_eq!(out, &a * &b);
    }

    // ── translate ─────────────────────────────────────────────────────────

    #[test]
    fn zero_translation_is_noop() {
        let mut out = Mat4::default();
        translate(&mut out, &sample(), Vec3::zero());
        assert_eq!(out, sample());
    }

    #[test]
    fn translate_moves_origin() {
        let mut out = Mat4::default();
        translate(&mut out, &Mat4::IDENTITY, Vec3::new(0.0, 0.0, -3.0));
        let p = out.transform_point(Vec3::zero());
        assert_eq!(p, [0.0, 0.0, -3.0, 1.0]);
    }

    #[test]
    fn translate_in_place_matches_out_of_place() {
        let v = Vec3::new(1.5, -2.0, 0.25);
        let mut out = Mat4::default();
        translate(&mut out, &sample(), v);

        let mut m = sample();
        translate_in_place(&mut m, v);
        assert_eq!(m, out);
    }

    #[test]
    fn translate_recomputes_whole_last_column_for_projective_input() {
        // sample() has a non-zero bottom row, so m[15] picks up the offset too.
        let v = Vec3::new(1.0, 2.0, 3.0);
        let mut out = Mat4::default();
        translate(&mut out, &sample(), v);

        assert_eq!(out[12], 13.0 + 1.0 * 1.0 + 5.0 * 2.0 + 9.0 * 3.0);
        assert_eq!(out[15], 16.0 + 4.0 * 1.0 + 8.0 * 2.0 + 12.0 * 3.0);
        assert_eq!(out[15], 72.0);
        assert_mat_eq(&out, &(&sample() * &Mat4::from_translation(v)));
    }

    #[test]
    fn translate_keeps_affine_bottom_row() {
        let mut m = Mat4::IDENTITY;
        rotate_y_in_place(&mut m, 0.7);
        translate_in_place(&mut m, Vec3::new(4.0, -1.0, 2.0));
        assert_eq!(m[15], 1.0);
    }

    // ── rotations ─────────────────────────────────────────────────────────

    #[test]
    fn zero_rotation_is_noop() {
        let mut out = Mat4::default();
        rotate_x(&mut out, &sample(), 0.0);
        assert_eq!(out, sample());
        rotate_y(&mut out, &sample(), 0.0);
        assert_eq!(out, sample());
    }

    #[test]
    fn rotate_x_inverse_restores_input() {
        let theta = 0.83;
        let mut out = Mat4::default();
        let mut back = Mat4::default();
        rotate_x(&mut out, &sample(), theta);
        rotate_x(&mut back, &out, -theta);
        assert_mat_eq(&back, &sample());
    }

    #[test]
    fn rotate_y_inverse_restores_input() {
        let theta = -2.1;
        let mut m = sample();
        rotate_y_in_place(&mut m, theta);
        rotate_y_in_place(&mut m, -theta);
        assert_mat_eq(&m, &sample());
    }

    #[test]
    fn in_place_rotation_matches_out_of_place() {
        let mut out = Mat4::default();
        rotate_x(&mut out, &sample(), 1.1);
        let mut m = sample();
        rotate_x_in_place(&mut m, 1.1);
        assert_eq!(m, out);

        rotate_y(&mut out, &sample(), 0.4);
        let mut m = sample();
        rotate_y_in_place(&mut m, 0.4);
        assert_eq!(m, out);
    }

    #[test]
    fn rotate_x_quarter_turn_maps_y_to_z() {
        let mut m = Mat4::IDENTITY;
        rotate_x_in_place(&mut m, FRAC_PI_2);
        let p = m.transform_point(Vec3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(p[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p[2], 1.0, epsilon = 1e-6);
    }

    // ── perspective ───────────────────────────────────────────────────────

    #[test]
    fn perspective_reference_entries() {
        let (near, far) = (0.1f32, 100.0f32);
        let mut out = Mat4::default();
        perspective(&mut out, FRAC_PI_4, 1.0, near, far);

        assert_abs_diff_eq!(out[10], (far + near) / (near - far), epsilon = 1e-6);
        assert_eq!(out[11], -1.0);
        assert_abs_diff_eq!(out[14], 2.0 * far * near / (near - far), epsilon = 1e-6);
        assert_eq!(out[15], 0.0);
        assert_abs_diff_eq!(out[0], out[5], epsilon = 1e-6);
    }

    #[test]
    fn perspective_maps_near_and_far_planes() {
        let m = Mat4::perspective(FRAC_PI_4, 1.5, 0.1, 100.0);
        let n = m.transform_point(Vec3::new(0.0, 0.0, -0.1));
        let f = m.transform_point(Vec3::new(0.0, 0.0, -100.0));
        assert_abs_diff_eq!(n[2] / n[3], -1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(f[2] / f[3], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn perspective_degenerate_inputs_propagate() {
        let m = Mat4::perspective(FRAC_PI_4, 1.0, 1.0, 1.0);
        assert!(!m.is_finite());
    }
}
