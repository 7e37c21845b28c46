use std::f32::consts::FRAC_PI_4;

use crate::math::Mat4;

/// Perspective camera parameters. The aspect ratio comes from the surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    /// Vertical field of view, radians.
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fovy: FRAC_PI_4,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    /// `true` when `0 < near < far` and `0 < fovy < π`.
    pub fn is_valid(&self) -> bool {
        self.near > 0.0
            && self.far > self.near
            && self.fovy > 0.0
            && self.fovy < std::f32::consts::PI
    }

    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(self.fovy, aspect, self.near, self.far)
    }
}

/// Width over height of a surface in pixels.
///
/// A zero-sized surface (minimised window) falls back to 1.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// `projection · model`.
#[inline]
pub fn mvp(projection: &Mat4, model: &Mat4) -> Mat4 {
    projection * model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_projection_is_valid() {
        assert!(Projection::default().is_valid());
        let bad = Projection { near: 1.0, far: 1.0, ..Projection::default() };
        assert!(!bad.is_valid());
    }

    #[test]
    fn aspect_comes_from_surface() {
        let p = Projection::default();
        let wide = p.matrix(aspect_ratio(1600, 800));
        assert_abs_diff_eq!(wide[5] / wide[0], 2.0, epsilon = 1e-5);
    }

    #[test]
    fn zero_height_falls_back_to_square() {
        assert_eq!(aspect_ratio(800, 0), 1.0);
        let m = Projection::default().matrix(aspect_ratio(800, 0));
        assert!(m.is_finite());
        assert_eq!(m[0], m[5]);
    }

    #[test]
    fn quad_centre_projects_to_screen_centre() {
        let proj = Projection::default().matrix(aspect_ratio(800, 600));
        let model = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));
        let clip = mvp(&proj, &model).transform_point(Vec3::zero());
        assert_abs_diff_eq!(clip[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(clip[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(clip[3], 3.0, epsilon = 1e-6);
        let ndc_z = clip[2] / clip[3];
        assert!((-1.0..=1.0).contains(&ndc_z));
    }
}
