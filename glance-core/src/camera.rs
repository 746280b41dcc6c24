/// Camera basis maintenance, interactive look controls and projection
use nalgebra::{Matrix4, Vector3 as NaVector3};
use tracing::debug;

use crate::rotation::{rotation_matrix, transform_direction};
use crate::vector::Vector3;

/// Default look step: half a degree, in radians
pub const ROTATION_STEP: f32 = 0.5 * (std::f32::consts::PI / 180.0);

/// Default distance moved along the gaze per step
pub const TRANSLATION_SPEED: f32 = 0.05;

/// Near-plane rectangle, in camera space at the near distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearPlane {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl NearPlane {
    pub fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }
}

/// Perspective viewing volume handed to the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    /// Perspective matrix in the classic `glFrustum` layout.
    pub fn matrix(&self) -> Matrix4<f32> {
        let Frustum {
            left: l,
            right: r,
            bottom: b,
            top: t,
            near: n,
            far: f,
        } = *self;

        #[rustfmt::skip]
        let m = Matrix4::new(
            2.0 * n / (r - l), 0.0,               (r + l) / (r - l),  0.0,
            0.0,               2.0 * n / (t - b), (t + b) / (t - b),  0.0,
            0.0,               0.0,               -(f + n) / (f - n), -2.0 * f * n / (f - n),
            0.0,               0.0,               -1.0,               0.0,
        );
        m
    }
}

/// Right-handed orthonormal camera frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    /// Sideways axis
    pub u: Vector3,
    /// Up axis
    pub v: Vector3,
    /// Backward axis, opposite of the gaze
    pub w: Vector3,
}

/// Everything a backend needs to build its view matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParameters {
    pub eye: Vector3,
    pub target: Vector3,
    pub up: Vector3,
}

impl ViewParameters {
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            &self.eye.to_point(),
            &self.target.to_point(),
            &NaVector3::from(self.up),
        )
    }
}

/// Step sizes for the interactive camera controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraControls {
    /// Radians turned per look step
    pub rotation_step: f32,
    /// Distance moved per move step
    pub translation_speed: f32,
}

impl Default for CameraControls {
    fn default() -> Self {
        Self {
            rotation_step: ROTATION_STEP,
            translation_speed: TRANSLATION_SPEED,
        }
    }
}

impl CameraControls {
    pub fn with_rotation_step(mut self, radians: f32) -> Self {
        self.rotation_step = radians;
        self
    }

    pub fn with_translation_speed(mut self, speed: f32) -> Self {
        self.translation_speed = speed;
        self
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vector3,
    pub gaze: Vector3,
    pub up: Vector3,
    pub near_plane: NearPlane,
    pub near_distance: f32,
    pub far_distance: f32,
    pub image_width: u32,
    pub image_height: u32,
}

impl Camera {
    /// Build a camera and bring its gaze/up into an orthonormal frame.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: Vector3,
        gaze: Vector3,
        up: Vector3,
        near_plane: NearPlane,
        near_distance: f32,
        far_distance: f32,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let mut camera = Self {
            position,
            gaze,
            up,
            near_plane,
            near_distance,
            far_distance,
            image_width,
            image_height,
        };
        camera.orthonormalize();
        camera
    }

    /// Re-derive the camera frame from the current gaze and up.
    ///
    /// `w = -gaze`, `u = up × w`, `v = w × u`, all unit length. The corrected
    /// gaze (`-w`) and up (`v`) are written back so rounding error from
    /// repeated rotations never builds up.
    pub fn orthonormalize(&mut self) -> CameraBasis {
        let w = (-self.gaze).normalized();
        let u = self.up.normalized().cross(&w).normalized();
        let v = w.cross(&u);

        self.gaze = -w;
        self.up = v;

        CameraBasis { u, v, w }
    }

    /// The instantaneous `gaze × up` axis used for looking up and down.
    pub fn left_vector(&self) -> Vector3 {
        self.gaze.cross(&self.up)
    }

    /// Eye, look-at target and up for the backend.
    pub fn view_parameters(&mut self) -> ViewParameters {
        let CameraBasis { v, w, .. } = self.orthonormalize();
        ViewParameters {
            eye: self.position,
            target: self.position - w,
            up: v,
        }
    }

    pub fn frustum(&self) -> Frustum {
        Frustum {
            left: self.near_plane.left,
            right: self.near_plane.right,
            bottom: self.near_plane.bottom,
            top: self.near_plane.top,
            near: self.near_distance,
            far: self.far_distance,
        }
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.frustum().matrix()
    }

    /// Rotate the gaze by `angle` radians around `axis`, then fix up the frame.
    pub fn rotate_gaze(&mut self, axis: Vector3, angle: f32) {
        let rotation = rotation_matrix(axis, angle);
        self.gaze = transform_direction(&rotation, self.gaze);
        self.gaze.normalize();
        self.orthonormalize();
        debug!(gaze = %self.gaze, up = %self.up, "camera gaze rotated");
    }

    pub fn look_left(&mut self, step: f32) {
        self.rotate_gaze(self.up, step);
    }

    pub fn look_right(&mut self, step: f32) {
        self.rotate_gaze(self.up, -step);
    }

    pub fn look_up(&mut self, step: f32) {
        self.rotate_gaze(self.left_vector(), step);
    }

    pub fn look_down(&mut self, step: f32) {
        self.rotate_gaze(self.left_vector(), -step);
    }

    /// Move the eye along the gaze.
    pub fn move_forward(&mut self, speed: f32) {
        self.position += self.gaze * speed;
        debug!(position = %self.position, "camera moved");
    }

    pub fn move_backward(&mut self, speed: f32) {
        self.position -= self.gaze * speed;
        debug!(position = %self.position, "camera moved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const EPSILON: f32 = 1e-5;

    fn camera() -> Camera {
        Camera::new(
            Vector3::new(0.0, 0.0, 5.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::Y,
            NearPlane::new(-1.0, 1.0, -1.0, 1.0),
            1.0,
            100.0,
            800,
            600,
        )
    }

    fn assert_orthonormal(camera: &Camera) {
        assert_abs_diff_eq!(camera.gaze.norm(), 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.up.norm(), 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.gaze.dot(&camera.up), 0.0, epsilon = EPSILON);

        let left = camera.left_vector();
        assert_abs_diff_eq!(left.norm(), 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(left.dot(&camera.gaze), 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(left.dot(&camera.up), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_orthonormalize_fixes_skewed_up() {
        let mut camera = camera();
        camera.gaze = Vector3::new(0.0, 0.0, -3.0);
        camera.up = Vector3::new(0.0, 2.0, 1.0);

        let basis = camera.orthonormalize();
        assert_orthonormal(&camera);
        assert_eq!(camera.gaze, -basis.w);
        assert_eq!(camera.up, basis.v);
        assert_abs_diff_eq!(camera.up.y, 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(basis.u.cross(&basis.v).dot(&basis.w), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_look_left_scenario() {
        let mut camera = camera();
        camera.look_left(ROTATION_STEP);

        let step = 0.5_f32.to_radians();
        assert_abs_diff_eq!(camera.gaze.x, -step.sin(), epsilon = EPSILON);
        assert_abs_diff_eq!(camera.gaze.y, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.gaze.z, -step.cos(), epsilon = EPSILON);
        assert_abs_diff_eq!(camera.gaze.norm(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_look_up_raises_gaze() {
        let mut camera = camera();
        camera.look_up(0.1);
        assert!(camera.gaze.y > 0.0);
        assert_orthonormal(&camera);

        camera.look_down(0.1);
        assert_abs_diff_eq!(camera.gaze.y, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.gaze.z, -1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_left_then_right_restores_gaze() {
        let mut camera = camera();
        camera.look_left(0.2);
        camera.look_right(0.2);
        assert_abs_diff_eq!(camera.gaze.x, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.gaze.z, -1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_basis_stays_orthonormal_after_many_rotations() {
        let mut camera = camera();
        for i in 0..2000 {
            match i % 4 {
                0 => camera.look_left(ROTATION_STEP),
                1 => camera.look_up(ROTATION_STEP * 3.0),
                2 => camera.look_right(ROTATION_STEP * 0.7),
                _ => camera.look_down(ROTATION_STEP * 1.3),
            }
        }
        assert_orthonormal(&camera);
    }

    #[test]
    fn test_view_parameters_target_along_gaze() {
        let mut camera = camera();
        let view = camera.view_parameters();
        assert_eq!(view.eye, Vector3::new(0.0, 0.0, 5.0));
        assert_eq!(view.target, Vector3::new(0.0, 0.0, 4.0));
        assert_eq!(view.up, Vector3::Y);
    }

    #[test]
    fn test_move_forward_and_backward() {
        let mut camera = camera();
        camera.move_forward(TRANSLATION_SPEED);
        assert_abs_diff_eq!(camera.position.z, 4.95, epsilon = EPSILON);
        camera.move_backward(TRANSLATION_SPEED * 2.0);
        assert_abs_diff_eq!(camera.position.z, 5.05, epsilon = EPSILON);
    }

    #[test]
    fn test_frustum_matrix_maps_near_plane_corners() {
        let camera = camera();
        let projection = camera.projection_matrix();

        // Top-right corner of the near plane lands on NDC (1, 1, -1)
        let clip = projection * nalgebra::Vector4::new(1.0, 1.0, -1.0, 1.0);
        assert_abs_diff_eq!(clip.x / clip.w, 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(clip.y / clip.w, 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(clip.z / clip.w, -1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_controls_builders() {
        let controls = CameraControls::default()
            .with_rotation_step(0.1)
            .with_translation_speed(2.0);
        assert_eq!(controls.rotation_step, 0.1);
        assert_eq!(controls.translation_speed, 2.0);
        assert_abs_diff_eq!(CameraControls::default().rotation_step, 0.5_f32.to_radians(), epsilon = 1e-7);
    }
}
