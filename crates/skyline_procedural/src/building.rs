//! # Building Generation
//!
//! Buildings, their recursive branch geometry, facade neon lights and
//! rooftop beams.
//!
//! ## Draw Order
//!
//! Every value comes from one shared stream, so the order of draws below is
//! part of the output. Reordering two draws changes every building after
//! them. Each `unit` call is one uniform draw in [0, 1).

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use skyline_core::{BeamConfig, CityConfig};

use crate::city::{
    Building, BuildingPart, CityContent, Face, LightVolume, NeonLight, MAX_BRANCH_DEPTH,
};

/// Gap between a neon sign and its face.
const NEON_FACE_OFFSET: f32 = 0.05;

/// Fraction of a wall a neon sign may cover.
const NEON_WALL_COVERAGE: f32 = 0.8;

#[inline]
fn unit(rng: &mut ChaCha8Rng) -> f32 {
    rng.gen::<f32>()
}

/// Generates one building at a world XZ position and appends it, its neon
/// lights and its beams to `out`.
pub(crate) fn generate_building(
    rng: &mut ChaCha8Rng,
    config: &CityConfig,
    position: Vec2,
    out: &mut CityContent,
) {
    let mut width = 2.0 + unit(rng) * 4.0;
    let mut depth = 2.0 + unit(rng) * 4.0;
    if unit(rng) > 0.5 {
        width *= 1.5 + unit(rng) * 2.0;
    } else {
        depth *= 1.5 + unit(rng) * 2.0;
    }

    let height = generate_height(rng, config);
    let color = generate_color(rng);
    let height_variation = unit(rng) * 0.3;
    let has_antenna = unit(rng) > 0.7;

    let size = Vec3::new(width, height, depth);
    let mut parts = vec![BuildingPart {
        position: Vec3::ZERO,
        size,
        color,
        detail_level: 0,
        parent: None,
    }];
    generate_branches(rng, &mut parts, 0, color);

    let building = Building {
        position: Vec3::new(position.x, 0.0, position.y),
        size,
        color,
        parts,
        height_variation,
        has_antenna,
    };

    add_neon_lights(rng, &building, &mut out.neon_lights);
    if config.beams.enabled {
        add_beams(rng, &config.beams, &building, &mut out.light_volumes);
    }

    out.buildings.push(building);
}

/// Height biased toward low buildings, with a pseudo-radial center bias.
pub(crate) fn generate_height(rng: &mut ChaCha8Rng, config: &CityConfig) -> f32 {
    let exponential = unit(rng);
    let height_factor = (-config.height_distribution_lambda * exponential).exp();

    let dx = unit(rng) - 0.5;
    let dz = unit(rng) - 0.5;
    let distance = (dx * dx + dz * dz).sqrt();
    let center_bias = 1.0 - distance * 0.3;

    let factor = (height_factor * center_bias).clamp(0.0, 1.0);
    config.min_height + factor * (config.max_height - config.min_height)
}

/// Dark industrial gray with a brown, green or blue tint.
fn generate_color(rng: &mut ChaCha8Rng) -> Vec3 {
    let gray = 0.1 + unit(rng) * 0.2;
    let tint = unit(rng);

    if tint < 0.3 {
        Vec3::new(gray, gray * 0.8, gray * 0.6)
    } else if tint < 0.6 {
        Vec3::new(gray * 0.7, gray, gray * 0.8)
    } else {
        Vec3::new(gray * 0.8, gray * 0.8, gray)
    }
}

/// Adds mirrored branch pairs to `parts[parent]`.
///
/// The parent's depth decides how many pairs are likely: the trunk gets
/// 0 to 3 pairs, deeper branches 0 to 2 with a bias toward none.
fn generate_branches(
    rng: &mut ChaCha8Rng,
    parts: &mut Vec<BuildingPart>,
    parent: usize,
    base_color: Vec3,
) {
    let depth = parts[parent].detail_level;
    if depth >= MAX_BRANCH_DEPTH {
        return;
    }

    let chance = unit(rng);
    let pairs = if depth == 0 {
        match chance {
            c if c < 0.3 => 0,
            c if c < 0.6 => 1,
            c if c < 0.85 => 2,
            _ => 3,
        }
    } else {
        match chance {
            c if c < 0.6 => 0,
            c if c < 0.9 => 1,
            _ => 2,
        }
    };

    for _ in 0..pairs {
        add_symmetric_branches(rng, parts, parent, depth + 1, base_color);
    }
}

/// Appends two mirrored parts attached to `parts[parent]`, then recurses
/// into each of them depth-first.
fn add_symmetric_branches(
    rng: &mut ChaCha8Rng,
    parts: &mut Vec<BuildingPart>,
    parent: usize,
    detail_level: u8,
    base_color: Vec3,
) {
    let p = parts[parent];

    let direction = unit(rng);
    let size_scale = 0.3 + unit(rng) * 0.4;
    let attachment_height = 0.3 + unit(rng) * 0.5;
    let extend = 0.4 + unit(rng) * 0.6;

    let (size, first, second, color);
    if direction < 0.33 {
        // Front/back along Z
        size = Vec3::new(p.size.x * size_scale, p.size.y * size_scale, p.size.z * extend);
        let attach_y = p.position.y + p.size.y * attachment_height - size.y * 0.5;
        let attach_x = (unit(rng) - 0.5) * p.size.x * 0.6;
        color = base_color * (0.9 + unit(rng) * 0.2);

        let reach = p.size.z * 0.5 + size.z * 0.5;
        first = Vec3::new(p.position.x + attach_x, attach_y, p.position.z + reach);
        second = Vec3::new(p.position.x - attach_x, attach_y, p.position.z - reach);
    } else if direction < 0.66 {
        // Left/right along X
        size = Vec3::new(p.size.x * extend, p.size.y * size_scale, p.size.z * size_scale);
        let attach_y = p.position.y + p.size.y * attachment_height - size.y * 0.5;
        let attach_z = (unit(rng) - 0.5) * p.size.z * 0.6;
        color = base_color * (0.9 + unit(rng) * 0.2);

        let reach = p.size.x * 0.5 + size.x * 0.5;
        first = Vec3::new(p.position.x + reach, attach_y, p.position.z + attach_z);
        second = Vec3::new(p.position.x - reach, attach_y, p.position.z - attach_z);
    } else {
        // Vertical extensions on the roof
        let width = p.size.x * (0.7 + unit(rng) * 0.3);
        let depth = p.size.z * (0.7 + unit(rng) * 0.3);
        size = Vec3::new(width, p.size.y * size_scale, depth);
        color = base_color * (0.9 + unit(rng) * 0.2);

        let y = p.position.y + p.size.y * 0.5 + size.y * 0.5;
        let dx = p.size.x * 0.15;
        let dz = p.size.z * 0.15;
        first = Vec3::new(p.position.x - dx, y, p.position.z + dz);
        second = Vec3::new(p.position.x + dx, y, p.position.z - dz);
    }

    let first_index = parts.len();
    for position in [first, second] {
        parts.push(BuildingPart {
            position,
            size,
            color,
            detail_level,
            parent: Some(parent),
        });
    }

    if detail_level < MAX_BRANCH_DEPTH {
        generate_branches(rng, parts, first_index, base_color);
        generate_branches(rng, parts, first_index + 1, base_color);
    }
}

/// Mounts 2 to 9 neon signs on random faces of random parts.
fn add_neon_lights(rng: &mut ChaCha8Rng, building: &Building, out: &mut Vec<NeonLight>) {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = 2 + (unit(rng) * 8.0) as usize;

    for _ in 0..count {
        let last = building.parts.len() - 1;
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let index = ((unit(rng) * building.parts.len() as f32) as usize).min(last);
        let part = &building.parts[index];
        let part_origin = building.position + part.position;

        let face = match unit(rng) {
            s if s < 0.25 => Face::Front,
            s if s < 0.5 => Face::Back,
            s if s < 0.75 => Face::Left,
            _ => Face::Right,
        };
        let wall_width = match face {
            Face::Front | Face::Back => part.size.x,
            Face::Left | Face::Right => part.size.z,
        };
        let wall_height = part.size.y;

        // Mostly small signs, occasionally a billboard
        let size_roll = unit(rng);
        let base_size = if size_roll < 0.6 {
            0.3 + unit(rng) * 0.5
        } else if size_roll < 0.85 {
            0.8 + unit(rng) * 1.2
        } else if size_roll < 0.95 {
            2.0 + unit(rng) * 2.0
        } else {
            4.0 + unit(rng) * 4.0
        };

        let aspect = 0.5 + unit(rng) * 1.5;
        let mut width = base_size * aspect;
        let mut height = base_size;

        let max_width = wall_width * NEON_WALL_COVERAGE;
        let max_height = wall_height * NEON_WALL_COVERAGE;
        if width > max_width {
            height *= max_width / width;
            width = max_width;
        }
        if height > max_height {
            width *= max_height / height;
            height = max_height;
        }

        let along = (unit(rng) - 0.5) * (wall_width - width);
        let up = unit(rng) * (wall_height - height) + height * 0.5;

        let y = part_origin.y + up;
        let position = match face {
            Face::Front => Vec3::new(
                part_origin.x + along,
                y,
                part_origin.z + part.size.z * 0.5 + NEON_FACE_OFFSET,
            ),
            Face::Back => Vec3::new(
                part_origin.x + along,
                y,
                part_origin.z - part.size.z * 0.5 - NEON_FACE_OFFSET,
            ),
            Face::Left => Vec3::new(
                part_origin.x - part.size.x * 0.5 - NEON_FACE_OFFSET,
                y,
                part_origin.z + along,
            ),
            Face::Right => Vec3::new(
                part_origin.x + part.size.x * 0.5 + NEON_FACE_OFFSET,
                y,
                part_origin.z + along,
            ),
        };

        let color = match unit(rng) {
            c if c < 0.3 => Vec3::new(1.0, 0.3, 0.1),
            c if c < 0.6 => Vec3::new(1.0, 0.8, 0.2),
            c if c < 0.8 => Vec3::new(0.2, 0.8, 1.0),
            _ => Vec3::new(0.8, 0.2, 1.0),
        };
        let intensity = 0.5 + unit(rng) * 1.5;
        let radius = 8.0 + unit(rng) * 12.0;

        out.push(NeonLight {
            position,
            color,
            intensity,
            radius,
            face,
            width,
            height,
        });
    }
}

/// Light beams rising from the roof of tall buildings.
fn add_beams(
    rng: &mut ChaCha8Rng,
    beams: &BeamConfig,
    building: &Building,
    out: &mut Vec<LightVolume>,
) {
    let height = building.height();
    if height < beams.min_building_height {
        return;
    }
    if unit(rng) > beams.spawn_chance {
        return;
    }

    let count = if height > beams.min_building_height * 2.0 && unit(rng) < 0.5 {
        2
    } else {
        1
    };

    for _ in 0..count {
        let radius = lerp(beams.min_radius, beams.max_radius, unit(rng));
        let beam_height = lerp(beams.min_height, beams.max_height, unit(rng));
        let offset_x = (unit(rng) - 0.5) * building.size.x * 0.3;
        let offset_z = (unit(rng) - 0.5) * building.size.z * 0.3;

        let color = match unit(rng) {
            c if c < 0.5 => Vec3::new(0.3, 1.2, 1.5),
            c if c < 0.8 => Vec3::new(0.5, 0.9, 1.4),
            _ => Vec3::new(0.8, 1.0, 1.5),
        };
        let intensity = lerp(beams.min_intensity, beams.max_intensity, unit(rng));
        let is_cone = unit(rng) > 0.3;

        out.push(LightVolume {
            base_position: building.position + Vec3::new(offset_x, height, offset_z),
            height: beam_height,
            base_radius: radius,
            color,
            intensity,
            is_cone,
        });
    }
}

/// Scatters street-level box lights in the gaps between `buildings`.
///
/// Only the given buildings are considered, so the result depends on
/// nothing outside the chunk being generated.
pub(crate) fn add_ground_lights(
    rng: &mut ChaCha8Rng,
    config: &CityConfig,
    buildings: &[Building],
    out: &mut Vec<LightVolume>,
) {
    if buildings.is_empty() {
        return;
    }

    let mut min = Vec2::splat(f32::MAX);
    let mut max = Vec2::splat(f32::MIN);
    for building in buildings {
        let center = Vec2::new(building.position.x, building.position.z);
        let extent = Vec2::new(building.size.x, building.size.z);
        min = min.min(center - extent);
        max = max.max(center + extent);
    }

    let ground = &config.ground_lights;
    let mut placed = 0;
    for _ in 0..ground.attempts {
        if placed >= ground.max_count {
            break;
        }

        let x = min.x + unit(rng) * (max.x - min.x);
        let z = min.y + unit(rng) * (max.y - min.y);

        let blocked = buildings.iter().any(|building| {
            let clearance_x = (x - building.position.x).abs() - building.size.x * 0.5;
            let clearance_z = (z - building.position.z).abs() - building.size.z * 0.5;
            clearance_x < ground.min_clearance
                && clearance_z < ground.min_clearance
                && building.size.y > 0.0
        });
        if blocked {
            continue;
        }

        let height = lerp(ground.min_height, ground.max_height, unit(rng));
        let half_size = lerp(ground.min_size, ground.max_size, unit(rng));
        let color = match unit(rng) {
            c if c < 0.2 => Vec3::new(0.2, 1.0, 1.2),
            c if c < 0.4 => Vec3::new(1.0, 0.3, 1.0),
            c if c < 0.6 => Vec3::new(1.2, 0.6, 0.2),
            c if c < 0.8 => Vec3::new(0.3, 0.5, 1.3),
            _ => Vec3::new(1.0, 0.4, 0.8),
        };
        let intensity = lerp(ground.min_intensity, ground.max_intensity, unit(rng));

        out.push(LightVolume {
            base_position: Vec3::new(x, 0.0, z),
            height,
            base_radius: half_size,
            color,
            intensity,
            is_cone: false,
        });
        placed += 1;
    }

    if placed > 0 {
        tracing::trace!("Placed {} ground lights", placed);
    }
}

#[inline]
fn lerp(min: f32, max: f32, t: f32) -> f32 {
    min + t * (max - min)
}
