//! # City Data Model
//!
//! Everything the generator produces. Content is created once per chunk
//! and never mutated afterwards.

use glam::Vec3;

/// Deepest branch recursion level. The trunk is level 0.
pub const MAX_BRANCH_DEPTH: u8 = 2;

/// One box of a building: the trunk or a branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingPart {
    /// Position relative to the building origin.
    pub position: Vec3,
    /// Box size.
    pub size: Vec3,
    /// Color, possibly tinted from the building color.
    pub color: Vec3,
    /// Recursion level (0 = trunk).
    pub detail_level: u8,
    /// Index of the parent part in the same building (`None` for the trunk).
    pub parent: Option<usize>,
}

impl BuildingPart {
    /// Returns true for the trunk.
    #[inline]
    #[must_use]
    pub const fn is_trunk(&self) -> bool {
        self.parent.is_none()
    }
}

/// A generated building.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    /// World position of the footprint center at ground level.
    pub position: Vec3,
    /// Trunk size.
    pub size: Vec3,
    /// Base color.
    pub color: Vec3,
    /// Trunk first, then branches in generation order. Branches come in
    /// mirrored pairs at consecutive indices.
    pub parts: Vec<BuildingPart>,
    /// Per-building height variation scalar in [0, 0.3).
    pub height_variation: f32,
    /// Whether the roof carries an antenna.
    pub has_antenna: bool,
}

impl Building {
    /// Returns the trunk height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Returns the trunk footprint as world-space `(min, max)` corners.
    #[must_use]
    pub fn trunk_bounds(&self) -> (Vec3, Vec3) {
        let min = Vec3::new(
            self.position.x - self.size.x * 0.5,
            self.position.y,
            self.position.z - self.size.z * 0.5,
        );
        (min, min + self.size)
    }

    /// Iterates over the mirrored branch pairs as `(first, second)` indices.
    pub fn branch_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..self.parts.len()).step_by(2).map(|i| (i, i + 1))
    }
}

/// Building face a neon sign is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// +Z
    Front,
    /// -Z
    Back,
    /// -X
    Left,
    /// +X
    Right,
}

impl Face {
    /// Returns the outward unit normal.
    #[must_use]
    pub const fn normal(self) -> Vec3 {
        match self {
            Self::Front => Vec3::Z,
            Self::Back => Vec3::NEG_Z,
            Self::Left => Vec3::NEG_X,
            Self::Right => Vec3::X,
        }
    }
}

/// A point light attached to a building facade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeonLight {
    /// World position, slightly in front of the face.
    pub position: Vec3,
    /// Light color.
    pub color: Vec3,
    /// Intensity (non-negative).
    pub intensity: f32,
    /// Light radius (positive).
    pub radius: f32,
    /// Face the sign is mounted on.
    pub face: Face,
    /// Sign width along the face.
    pub width: f32,
    /// Sign height.
    pub height: f32,
}

/// A large atmospheric light source: a rooftop beam or a street-level box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightVolume {
    /// Ground anchor.
    pub base_position: Vec3,
    /// Vertical extent.
    pub height: f32,
    /// Base radius (cones) or half-size (boxes).
    pub base_radius: f32,
    /// Light color.
    pub color: Vec3,
    /// Intensity.
    pub intensity: f32,
    /// Cone/beam when true, box otherwise.
    pub is_cone: bool,
}

impl LightVolume {
    /// Returns the point halfway up the volume.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.base_position + Vec3::new(0.0, self.height * 0.5, 0.0)
    }
}

/// Content generated for one chunk (or the legacy full city), before it is
/// stored in the generator's pools.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityContent {
    /// Buildings in generation order.
    pub buildings: Vec<Building>,
    /// Neon lights in generation order.
    pub neon_lights: Vec<NeonLight>,
    /// Light volumes in generation order.
    pub light_volumes: Vec<LightVolume>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trunk_bounds() {
        let building = Building {
            position: Vec3::new(10.0, 0.0, 20.0),
            size: Vec3::new(4.0, 30.0, 6.0),
            color: Vec3::splat(0.2),
            parts: Vec::new(),
            height_variation: 0.0,
            has_antenna: false,
        };

        let (min, max) = building.trunk_bounds();
        assert_eq!(min, Vec3::new(8.0, 0.0, 17.0));
        assert_eq!(max, Vec3::new(12.0, 30.0, 23.0));
    }

    #[test]
    fn test_face_normals_are_horizontal() {
        for face in [Face::Front, Face::Back, Face::Left, Face::Right] {
            assert_eq!(face.normal().y, 0.0);
            assert!((face.normal().length() - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_volume_center() {
        let volume = LightVolume {
            base_position: Vec3::new(1.0, 0.0, 2.0),
            height: 8.0,
            base_radius: 3.0,
            color: Vec3::ONE,
            intensity: 10.0,
            is_cone: false,
        };
        assert_eq!(volume.center(), Vec3::new(1.0, 4.0, 2.0));
    }
}
