//! Fly camera with yaw/pitch orientation.

use glam::{Mat4, Vec3};

/// Pitch limit in degrees, short of straight up or down.
pub const MAX_PITCH: f32 = 89.0;

/// Perspective fly camera.
///
/// Angles are in degrees. Yaw 0 looks down -Z; positive yaw turns toward +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Vec3,
    /// Heading in degrees.
    pub yaw: f32,
    /// Elevation in degrees, clamped to `±MAX_PITCH` when used.
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width over height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Camera {
    /// Creates a camera at `position` looking down -Z.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Returns the unit view direction.
    #[must_use]
    pub fn front(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH).to_radians();
        Vec3::new(
            yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        )
        .normalize()
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::Y)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Returns `projection * view`.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Turns the camera, keeping pitch inside the limit.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw = (self.yaw + yaw_delta).rem_euclid(360.0);
        self.pitch = (self.pitch + pitch_delta).clamp(-MAX_PITCH, MAX_PITCH);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 60.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_axes() {
        let mut camera = Camera::default();
        assert!((camera.front() - Vec3::NEG_Z).length() < 1e-6);

        camera.yaw = 90.0;
        assert!((camera.front() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = Camera::default();
        camera.pitch = 120.0;
        let front = camera.front();
        assert!(front.y < 1.0);
        assert!(front.y > 0.99);

        camera.rotate(0.0, 500.0);
        assert_eq!(camera.pitch, MAX_PITCH);
        camera.rotate(-30.0, 0.0);
        assert_eq!(camera.yaw, 330.0);
    }

    #[test]
    fn test_view_projection_centers_target() {
        let camera = Camera::new(Vec3::new(10.0, 20.0, 30.0));
        let target = camera.position + camera.front() * 50.0;
        let clip = camera.view_projection() * target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
