use crate::math::{mat4, Mat4, Vec3};

/// Angle advanced per frame at speed 1.0 (frame-stepped mode).
pub const STEP_PER_FRAME: f32 = 0.01;

/// Same rate as [`STEP_PER_FRAME`] at 60 Hz, in radians per second.
pub const RATE_PER_SECOND: f32 = STEP_PER_FRAME * 60.0;

pub const MAX_SPEED: f32 = 10.0;

/// Distance of the quad from the camera along -Z.
pub const VIEW_DISTANCE: f32 = 3.0;

/// X rotation as a fraction of the Y rotation.
const X_TILT: f32 = 0.7;

/// Rotation state of the spinning quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpinState {
    /// Accumulated angle, radians.
    pub angle: f32,
    /// Multiplier on the base rate, clamped to `[0, MAX_SPEED]`.
    speed: f32,
}

impl SpinState {
    pub fn new(speed: f32) -> Self {
        Self {
            angle: 0.0,
            speed: clamp_speed(speed),
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = clamp_speed(speed);
    }

    /// Adds `delta` to the speed, clamped.
    pub fn nudge(&mut self, delta: f32) {
        self.set_speed(self.speed + delta);
    }

    /// One fixed frame step.
    pub fn advance(&mut self) {
        self.angle += STEP_PER_FRAME * self.speed;
    }

    /// Frame-rate independent step.
    pub fn advance_by(&mut self, dt: f32) {
        self.angle += RATE_PER_SECOND * self.speed * dt;
    }

    /// `T(0, 0, -VIEW_DISTANCE) · Rx(0.7 θ) · Ry(θ)`.
    pub fn model_matrix(&self) -> Mat4 {
        let mut m = Mat4::from_translation(Vec3::new(0.0, 0.0, -VIEW_DISTANCE));
        mat4::rotate_x_in_place(&mut m, self.angle * X_TILT);
        mat4::rotate_y_in_place(&mut m, self.angle);
        m
    }
}

impl Default for SpinState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        return 0.0;
    }
    speed.clamp(0.0, MAX_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn advance_uses_fixed_step() {
        let mut s = SpinState::new(2.0);
        s.advance();
        s.advance();
        assert_abs_diff_eq!(s.angle, 0.04, epsilon = 1e-7);
    }

    #[test]
    fn advance_by_matches_fixed_step_at_sixty_hz() {
        let mut fixed = SpinState::new(1.5);
        let mut timed = SpinState::new(1.5);
        for _ in 0..60 {
            fixed.advance();
            timed.advance_by(1.0 / 60.0);
        }
        assert_abs_diff_eq!(fixed.angle, timed.angle, epsilon = 1e-5);
    }

    #[test]
    fn speed_is_clamped() {
        let mut s = SpinState::new(-1.0);
        assert_eq!(s.speed(), 0.0);
        s.nudge(25.0);
        assert_eq!(s.speed(), MAX_SPEED);
        s.set_speed(f32::NAN);
        assert_eq!(s.speed(), 0.0);
    }

    #[test]
    fn zero_angle_model_is_pure_translation() {
        let s = SpinState::default();
        assert_eq!(
            s.model_matrix(),
            Mat4::from_translation(Vec3::new(0.0, 0.0, -VIEW_DISTANCE))
        );
    }

    #[test]
    fn rotation_keeps_quad_centre_in_place() {
        let mut s = SpinState::default();
        s.angle = 1.234;
        let c = s.model_matrix().transform_point(Vec3::zero());
        assert_abs_diff_eq!(c[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c[2], -VIEW_DISTANCE, epsilon = 1e-6);
    }

    #[test]
    fn model_matches_explicit_composition() {
        let mut s = SpinState::default();
        s.angle = 0.5;

        let mut t = Mat4::IDENTITY;
        mat4::translate(&mut t, &Mat4::IDENTITY, Vec3::new(0.0, 0.0, -VIEW_DISTANCE));
        let mut rx = Mat4::IDENTITY;
        mat4::rotate_x(&mut rx, &t, 0.35);
        let mut ry = Mat4::IDENTITY;
        mat4::rotate_y(&mut ry, &rx, 0.5);

        assert_eq!(s.model_matrix(), ry);
    }
}
