use crate::{
    config::Config,
    math::{Matrix4, Quaternion, Vector3},
};

/// A free-flying look-at camera.
///
/// Only `eye`, `at` and `up` are authoritative. The view and projection matrices are rebuilt
/// from them on request.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    eye: Vector3,
    at: Vector3,
    up: Vector3,
    /// Degrees.
    fov: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera::new(60.0, 800.0 / 600.0, 0.1, 1000.0)
    }
}

impl Camera {
    /// A camera at `(0, 0, 5)` looking at the origin with `+y` up.
    pub fn new(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Camera {
        Camera {
            eye: Vector3::new(0.0, 0.0, 5.0),
            at: Vector3::new(0.0, 0.0, 0.0),
            up: Vector3::up(),
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    pub fn from_config(config: &Config) -> Camera {
        Camera::new(config.fov, config.aspect_ratio(), config.near, config.far)
    }

    #[inline]
    pub fn eye(&self) -> Vector3 {
        self.eye
    }

    #[inline]
    pub fn at(&self) -> Vector3 {
        self.at
    }

    #[inline]
    pub fn up(&self) -> Vector3 {
        self.up
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    #[inline]
    pub fn set_fov(&mut self, degrees: f32) {
        self.fov = degrees;
    }

    #[inline]
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    #[inline]
    pub fn view_matrix(&self) -> Matrix4 {
        Matrix4::look_at(self.eye, self.at, self.up)
    }

    #[inline]
    pub fn projection_matrix(&self) -> Matrix4 {
        Matrix4::perspective(self.fov.to_radians(), self.aspect_ratio, self.near, self.far)
    }

    /// Unit vector from the eye towards the look-at point.
    #[inline]
    pub fn forward(&self) -> Vector3 {
        (self.at - self.eye).normalized()
    }

    #[inline]
    pub fn right(&self) -> Vector3 {
        self.forward().cross(self.up).normalized()
    }

    fn translate(&mut self, offset: Vector3) {
        self.eye += offset;
        self.at += offset;
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.translate(self.forward() * distance);
    }

    pub fn move_backwards(&mut self, distance: f32) {
        self.translate(self.forward() * -distance);
    }

    pub fn move_left(&mut self, distance: f32) {
        self.translate(self.right() * -distance);
    }

    pub fn move_right(&mut self, distance: f32) {
        self.translate(self.right() * distance);
    }

    pub fn go_up(&mut self, distance: f32) {
        self.translate(self.up * distance);
    }

    pub fn go_down(&mut self, distance: f32) {
        self.translate(self.up * -distance);
    }

    /// Turn the view about `up`, keeping the distance to the look-at point.
    fn yaw(&mut self, degrees: f32) {
        let rotation = Quaternion::from_axis_angle(self.up, degrees.to_radians());
        self.at = self.eye + (self.at - self.eye).rotated(rotation);
    }

    /// Tilt the view about the right axis. `up` turns with it.
    fn pitch(&mut self, degrees: f32) {
        let offset = self.at - self.eye;
        let axis = offset.cross(self.up);
        let rotation = Quaternion::from_axis_angle(axis, degrees.to_radians());
        self.at = self.eye + offset.rotated(rotation);
        self.up = self.up.rotated(rotation).normalized();
    }

    pub fn pan_left(&mut self, degrees: f32) {
        self.yaw(degrees);
    }

    pub fn pan_right(&mut self, degrees: f32) {
        self.yaw(-degrees);
    }

    pub fn pan_up(&mut self, degrees: f32) {
        self.pitch(degrees);
    }

    pub fn pan_down(&mut self, degrees: f32) {
        self.pitch(-degrees);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn move_then_pan_from_clean_camera() {
        let mut camera = Camera::default();
        camera.move_forward(0.2);
        assert!(camera.eye().near(Vector3::new(0.0, 0.0, 4.8), EPSILON));
        assert!(camera.at().near(Vector3::new(0.0, 0.0, -0.2), EPSILON));

        camera.pan_left(5.0);
        assert!(camera.eye().near(Vector3::new(0.0, 0.0, 4.8), EPSILON));
        // Looking slightly to the left now, still five units ahead.
        let (sin, cos) = 5f32.to_radians().sin_cos();
        assert!(camera.at().near(Vector3::new(-5.0 * sin, 0.0, 4.8 - 5.0 * cos), EPSILON));
    }

    #[test]
    fn pans_are_reversible() {
        let mut camera = Camera::default();
        camera.pan_left(30.0);
        camera.pan_up(20.0);
        camera.pan_down(20.0);
        camera.pan_right(30.0);
        assert!(camera.at().near(Vector3::new(0.0, 0.0, 0.0), EPSILON));
        assert!(camera.up().near(Vector3::up(), EPSILON));
    }

    #[test]
    fn pan_up_keeps_up_orthogonal() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.pan_up(7.0);
            camera.pan_left(3.0);
        }
        assert!((camera.up().length() - 1.0).abs() < 1e-4);
        assert!(camera.forward().dot(camera.up()).abs() < 1e-3);
    }

    #[test]
    fn pan_up_looks_up() {
        let mut camera = Camera::default();
        camera.pan_up(90.0);
        assert!(camera.forward().near(Vector3::up(), EPSILON));
        assert!(camera.up().near(Vector3::new(0.0, 0.0, 1.0), EPSILON));
    }

    #[test]
    fn strafing_and_climbing() {
        let mut camera = Camera::default();
        camera.move_right(1.0);
        camera.go_up(2.0);
        camera.move_left(0.5);
        camera.go_down(0.5);
        camera.move_backwards(1.0);
        assert!(camera.eye().near(Vector3::new(0.5, 1.5, 6.0), EPSILON));
        assert!(camera.forward().near(Vector3::new(0.0, 0.0, -1.0), EPSILON));
    }

    #[test]
    fn view_puts_target_ahead() {
        let camera = Camera::default();
        let target = camera.view_matrix().transform_point(camera.at());
        assert!(target.near(Vector3::new(0.0, 0.0, -5.0), EPSILON));

        let mut narrow = camera.clone();
        narrow.set_fov(30.0);
        assert!(narrow.projection_matrix()[1][1] > camera.projection_matrix()[1][1]);
    }
}
