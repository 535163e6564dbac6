//! Frustum culling for view-dependent light selection.
//!
//! Extracts frustum planes from the view-projection matrix and tests
//! bounding volumes against them.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// A plane in 3D space (Ax + By + Cz + D = 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Plane {
    /// Normal X component.
    pub a: f32,
    /// Normal Y component.
    pub b: f32,
    /// Normal Z component.
    pub c: f32,
    /// Distance from origin.
    pub d: f32,
}

impl Plane {
    /// Creates a new plane.
    #[must_use]
    pub const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    /// Normalizes the plane. A degenerate plane is returned unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.normal().length();
        if len > 0.0 {
            Self {
                a: self.a / len,
                b: self.b / len,
                c: self.c / len,
                d: self.d / len,
            }
        } else {
            self
        }
    }

    /// Returns the plane normal.
    #[inline]
    #[must_use]
    pub const fn normal(&self) -> Vec3 {
        Vec3::new(self.a, self.b, self.c)
    }

    /// Returns the signed distance from a point to the plane.
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.a * point.x + self.b * point.y + self.c * point.z + self.d
    }

    /// Converts to array format.
    #[must_use]
    pub const fn as_array(&self) -> [f32; 4] {
        [self.a, self.b, self.c, self.d]
    }
}

/// View frustum for culling.
///
/// Plane normals point inward: a point is inside when every signed
/// distance is non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far planes.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Left plane index.
    pub const LEFT: usize = 0;
    /// Right plane index.
    pub const RIGHT: usize = 1;
    /// Bottom plane index.
    pub const BOTTOM: usize = 2;
    /// Top plane index.
    pub const TOP: usize = 3;
    /// Near plane index.
    pub const NEAR: usize = 4;
    /// Far plane index.
    pub const FAR: usize = 5;

    /// Extracts frustum planes from a view-projection matrix.
    ///
    /// Uses the `[-1, 1]` clip depth identities. For `[0, 1]` depth
    /// projections the near plane lands slightly behind the real one, which
    /// only keeps more objects.
    #[must_use]
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        // m[col][row]
        let m = view_projection.to_cols_array_2d();
        let row = |r: usize| [m[0][r], m[1][r], m[2][r], m[3][r]];
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        let plane = |sign: f32, other: [f32; 4]| {
            Plane::new(
                r3[0] + sign * other[0],
                r3[1] + sign * other[1],
                r3[2] + sign * other[2],
                r3[3] + sign * other[3],
            )
            .normalized()
        };

        let mut planes = [Plane::default(); 6];
        planes[Self::LEFT] = plane(1.0, r0);
        planes[Self::RIGHT] = plane(-1.0, r0);
        planes[Self::BOTTOM] = plane(1.0, r1);
        planes[Self::TOP] = plane(-1.0, r1);
        planes[Self::NEAR] = plane(1.0, r2);
        planes[Self::FAR] = plane(-1.0, r2);

        Self { planes }
    }

    /// Tests if an AABB is at least partially inside.
    ///
    /// Conservative: boxes near a frustum corner may pass although they are
    /// outside, but a visible box never fails.
    #[must_use]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            // Corner furthest along the plane normal
            let positive = Vec3::new(
                if plane.a >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.b >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.c >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            plane.distance_to_point(positive) >= 0.0
        })
    }

    /// Tests if a sphere intersects the frustum.
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }

    /// Tests if a point is inside the frustum.
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Converts planes to array format for GPU upload.
    #[must_use]
    pub fn as_arrays(&self) -> [[f32; 4]; 6] {
        self.planes.map(|plane| plane.as_array())
    }
}

/// Axis-aligned bounding box for culling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a new AABB.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates an AABB from its center and half-extents.
    #[must_use]
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Returns the center of the AABB.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the half-extents of the AABB.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Returns true if both corners are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_frustum() -> Frustum {
        // Camera at origin looking down -Z
        let projection = Mat4::perspective_rh_gl(60f32.to_radians(), 16.0 / 9.0, 0.1, 500.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        Frustum::from_view_projection(&(projection * view))
    }

    #[test]
    fn test_plane_normalization() {
        let plane = Plane::new(3.0, 4.0, 0.0, 10.0);
        let normalized = plane.normalized();

        // 3-4-5 triangle, so length is 5
        assert!((normalized.a - 0.6).abs() < 0.001);
        assert!((normalized.b - 0.8).abs() < 0.001);
        assert!((normalized.d - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_degenerate_plane_unchanged() {
        let plane = Plane::new(0.0, 0.0, 0.0, 3.0);
        assert_eq!(plane.normalized(), plane);
    }

    #[test]
    fn test_planes_are_unit_length() {
        for plane in camera_frustum().planes {
            assert!((plane.normal().length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_point_containment() {
        let frustum = camera_frustum();
        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -10.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 10.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -600.0)));
        assert!(!frustum.contains_point(Vec3::new(100.0, 0.0, -10.0)));
    }

    #[test]
    fn test_sphere_margin() {
        let frustum = camera_frustum();
        // Behind the camera, 20 units from the near plane
        let center = Vec3::new(0.0, 0.0, 20.0);
        assert!(!frustum.intersects_sphere(center, 5.0));
        assert!(frustum.intersects_sphere(center, 25.0));
    }

    #[test]
    fn test_aabb_tests() {
        let frustum = camera_frustum();
        let inside = Aabb::from_center_half_extent(Vec3::new(0.0, 0.0, -50.0), Vec3::splat(2.0));
        let behind = Aabb::from_center_half_extent(Vec3::new(0.0, 0.0, 50.0), Vec3::splat(2.0));
        let straddling = Aabb::new(Vec3::new(-1.0, -1.0, -5.0), Vec3::new(1.0, 1.0, 5.0));

        assert!(frustum.intersects_aabb(&inside));
        assert!(!frustum.intersects_aabb(&behind));
        assert!(frustum.intersects_aabb(&straddling));
    }

    #[test]
    fn test_aabb_center() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::splat(32.0));
        assert_eq!(aabb.center(), Vec3::splat(16.0));
        assert_eq!(aabb.half_extents(), Vec3::splat(16.0));
        assert!(aabb.is_finite());
        assert!(!Aabb::new(Vec3::splat(f32::NAN), Vec3::ZERO).is_finite());
    }
}
