//! Camera and light choreography.
//!
//! Positions are a pure function of the rotation angle, so the whole
//! animation can be checked numerically without a GL context. The camera
//! pans around the origin on a fixed-radius circle with a vertical bob; the
//! key light runs the same circle one radian ahead, and the fill light is
//! its mirror image underneath the subject.

use glam::{DMat3, DVec3, Mat4, Vec3};

/// Rotation added by the render loop every animation frame.
pub const FRAME_SPIN: f64 = 0.0025;
/// Rotation of the enclosing group per frame, simulating rotation of the
/// environment around the scene.
pub const GROUP_SPIN: f64 = 0.01;
/// Radius of the camera's circular track in the X/Z plane.
pub const CAMERA_RADIUS: f64 = 8.0;
/// Radius of the key light's circular track.
pub const LIGHT_RADIUS: f64 = 11.0;

const CAMERA_BOB_AMP: f64 = 2.5;
const CAMERA_BOB_LIFT: f64 = 2.0;
const LIGHT_PHASE: f64 = 1.0;
const LIGHT_BOB_PHASE: f64 = -3.0;
const LIGHT_BOB_AMP: f64 = 2.0;
const LIGHT_BOB_LIFT: f64 = 3.0;
const FILL_LIGHT_DROP: f64 = -6.0;

/// Camera and light positions for one frame, in group-local space.
#[derive(Debug, Clone, Copy)]
pub struct FramePose {
    pub camera: DVec3,
    pub key_light: DVec3,
    pub fill_light: DVec3,
}

pub fn camera_position(theta: f64) -> DVec3 {
    DVec3::new(
        theta.sin() * CAMERA_RADIUS,
        CAMERA_BOB_AMP * theta.cos() + CAMERA_BOB_LIFT,
        theta.cos() * CAMERA_RADIUS,
    )
}

pub fn key_light_position(theta: f64) -> DVec3 {
    DVec3::new(
        (theta + LIGHT_PHASE).sin() * LIGHT_RADIUS,
        LIGHT_BOB_AMP * (theta + LIGHT_BOB_PHASE).cos() + LIGHT_BOB_LIFT,
        (theta + LIGHT_PHASE).cos() * LIGHT_RADIUS,
    )
}

/// The fill light mirrors the key light: negated X/Z track and a negated,
/// lowered bob.
pub fn fill_light_position(theta: f64) -> DVec3 {
    let key = key_light_position(theta);
    DVec3::new(
        -key.x,
        -LIGHT_BOB_AMP * (theta + LIGHT_BOB_PHASE).cos() + FILL_LIGHT_DROP,
        -key.z,
    )
}

pub fn pose(theta: f64) -> FramePose {
    FramePose {
        camera: camera_position(theta),
        key_light: key_light_position(theta),
        fill_light: fill_light_position(theta),
    }
}

/// Rotate a group-local position into world space by the group's Y angle.
pub fn rotate_y(v: DVec3, angle: f64) -> DVec3 {
    DMat3::from_rotation_y(angle) * v
}

/// Perspective camera. Aspect is the only field that changes after startup,
/// on window resize.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new(aspect: f64) -> Self {
        Self {
            fov_y_deg: 45.0,
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = aspect;
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            (self.fov_y_deg as f32).to_radians(),
            self.aspect as f32,
            self.near as f32,
            self.far as f32,
        )
    }

    /// View matrix for an eye re-aimed at the origin.
    pub fn view(eye: DVec3) -> Mat4 {
        Mat4::look_at_rh(eye.as_vec3(), Vec3::ZERO, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f64; 6] = [0.0, 0.4, 1.7, 3.3, 12.9, 100.0];

    #[test]
    fn camera_stays_on_its_circle() {
        for theta in SAMPLES {
            let p = camera_position(theta);
            let r2 = p.x * p.x + p.z * p.z;
            assert!((r2 - CAMERA_RADIUS * CAMERA_RADIUS).abs() < 1e-9);
        }
    }

    #[test]
    fn fill_light_mirrors_key_light() {
        for theta in SAMPLES {
            let key = key_light_position(theta);
            let fill = fill_light_position(theta);
            assert!((fill.x + key.x).abs() < 1e-12);
            assert!((fill.z + key.z).abs() < 1e-12);
            // Bob negated and dropped: y_fill == -y_key - 3.
            assert!((fill.y - (-key.y - 3.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn group_rotation_preserves_track_radius() {
        for theta in SAMPLES {
            let p = rotate_y(camera_position(theta), 2.1);
            let r2 = p.x * p.x + p.z * p.z;
            assert!((r2 - CAMERA_RADIUS * CAMERA_RADIUS).abs() < 1e-9);
        }
    }

    #[test]
    fn resize_updates_aspect() {
        let mut camera = Camera::new(16.0 / 9.0);
        camera.set_aspect(1024.0 / 768.0);
        assert!((camera.aspect - 1024.0 / 768.0).abs() < 1e-12);
        // The projection must follow the stored aspect.
        let m = camera.projection();
        let expected = Mat4::perspective_rh_gl(
            45f32.to_radians(),
            (1024.0 / 768.0) as f32,
            0.1,
            1000.0,
        );
        assert!(m.abs_diff_eq(expected, 1e-6));
    }
}
