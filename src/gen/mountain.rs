//! Mountain ring generation.
//!
//! Two variants share the ring layout. The cone ring is the sculpted one: a
//! closed circle of displaced truncated cones, every dimension and every
//! perturbation drawn through [`hash01`] so a mountain is a pure function of
//! `(seed, index, salt)`. The ridge ring is the cheap silhouette strip the
//! scene can fall back to. A fixed seed keeps the skyline identical across
//! sessions; the mountains are persistent background, not something to
//! reshuffle on reload.

use cgmath::{Basis3, InnerSpace, Rad, Rotation, Rotation3, Vector3};

use crate::config::{
    MOUNTAIN_COLOR, MOUNTAIN_CONE_RING_FACTOR, RIDGE_BASE_LIFT, RIDGE_INNER_FACTOR,
    RIDGE_OUTER_FACTOR,
};
use crate::r#gen::mesh::{self, MeshData};
use crate::r#gen::rng::{hash01, SeededRng};

const RADIAL_SEGMENTS: usize = 12;
const HEIGHT_SEGMENTS: usize = 6;

// Distinct salts keep draws from the same conceptual stream uncorrelated.
const SALT_JITTER_Z: u32 = 500;
const SALT_BASE_RADIUS: u32 = 1_000;
const SALT_TOP_RADIUS: u32 = 2_000;
const SALT_HEIGHT: u32 = 3_000;
const SALT_ROTATION: u32 = 4_000;
const SALT_VERTEX: u32 = 10_000;
const SALT_BASE_BAND: u32 = 20_000;

// The three periodic displacement signals, at visibly different frequencies.
const RADIAL_FREQ: f32 = 1.8;
const RADIAL_AMP: f32 = 0.45;
const ANGULAR_FREQ: f32 = 5.0;
const ANGULAR_AMP: f32 = 0.35;
const RIDGE_ANGULAR_FREQ: f32 = 3.0;
const RIDGE_RADIAL_FREQ: f32 = 1.2;
const RIDGE_AMP: f32 = 0.5;
const VERTEX_JITTER_AMP: f32 = 0.25;
const BASE_BAND: f32 = 0.05;
const BASE_JITTER_AMP: f32 = 0.1;

/// Build all `count` mountains of the cone ring around `ring_radius`.
pub fn generate_cone_ring(seed: u32, count: usize, ring_radius: f32) -> Vec<MeshData> {
    (0..count)
        .map(|i| generate_mountain(seed, i, count, ring_radius))
        .collect()
}

/// Build mountain `index` of `count` on the ring. Deterministic: the same
/// arguments produce bit-identical vertex data on every call.
pub fn generate_mountain(seed: u32, index: usize, count: usize, ring_radius: f32) -> MeshData {
    let i = index as u32;
    let theta = index as f32 / count as f32 * std::f32::consts::TAU;

    let jitter_x = (hash01(seed.wrapping_add(i)) - 0.5) * 2.0;
    let jitter_z = (hash01(seed.wrapping_add(i).wrapping_add(SALT_JITTER_Z)) - 0.5) * 2.0;

    let base_radius = 3.0 + hash01(seed.wrapping_add(i).wrapping_add(SALT_BASE_RADIUS)) * 2.5;
    let top_radius = 0.3 + hash01(seed.wrapping_add(i).wrapping_add(SALT_TOP_RADIUS)) * 0.6;
    let height = 6.0 + hash01(seed.wrapping_add(i).wrapping_add(SALT_HEIGHT)) * 6.0;

    let mut mesh = mesh::truncated_cone(
        base_radius,
        top_radius,
        height,
        RADIAL_SEGMENTS,
        HEIGHT_SEGMENTS,
        MOUNTAIN_COLOR,
    );
    displace(&mut mesh, seed, i, height);

    // Face outward along the ring, with a little seeded wobble so the
    // repetition of the displacement pattern doesn't read.
    let wobble = (hash01(seed.wrapping_add(i).wrapping_add(SALT_ROTATION)) - 0.5) * 0.8;
    let rotation: Basis3<f32> = Basis3::from_angle_y(Rad(-theta + wobble));
    let translation = Vector3::new(
        theta.cos() * ring_radius * MOUNTAIN_CONE_RING_FACTOR + jitter_x,
        0.0,
        theta.sin() * ring_radius * MOUNTAIN_CONE_RING_FACTOR + jitter_z,
    );
    for v in 0..mesh.vertex_count() {
        let p = rotation.rotate_vector(mesh.position(v)) + translation;
        mesh.set_position(v, p);
    }
    // One normal pass after both displacement and the rigid transform.
    mesh.compute_vertex_normals();
    mesh
}

/// Sculpt the cone into a peak.
///
/// Vertices above the midline get their radial distance rebuilt from four
/// deterministic signals, scaled by the vertex's own height fraction so the
/// top moves most and the base ring stays put. Vertices sitting on the base
/// only get a slight x/z shove to break the perfect circle.
fn displace(mesh: &mut MeshData, seed: u32, mountain: u32, height: f32) {
    let midline = height * 0.5;

    for v in 0..mesh.vertex_count() {
        let p = mesh.position(v);
        let vertex_salt = seed
            .wrapping_add(mountain.wrapping_mul(101))
            .wrapping_add((v as u32).wrapping_mul(17));

        if p.y > midline {
            let planar = Vector3::new(p.x, 0.0, p.z);
            let distance = planar.magnitude();
            let angle = p.z.atan2(p.x);
            let fraction = p.y / height;

            let swell = (distance * RADIAL_FREQ).sin() * RADIAL_AMP
                + (angle * ANGULAR_FREQ).cos() * ANGULAR_AMP
                + (angle * RIDGE_ANGULAR_FREQ + distance * RIDGE_RADIAL_FREQ).sin() * RIDGE_AMP
                + (hash01(vertex_salt.wrapping_add(SALT_VERTEX)) - 0.5) * VERTEX_JITTER_AMP;

            let displaced = (distance + swell * fraction).max(0.05);
            let scale = displaced / distance;
            mesh.set_position(v, Vector3::new(p.x * scale, p.y, p.z * scale));
        } else if p.y.abs() < BASE_BAND {
            let dx = (hash01(vertex_salt.wrapping_add(SALT_BASE_BAND)) - 0.5) * BASE_JITTER_AMP;
            let dz = (hash01(vertex_salt.wrapping_add(SALT_BASE_BAND + 1)) - 0.5) * BASE_JITTER_AMP;
            mesh.set_position(v, Vector3::new(p.x + dx, p.y, p.z + dz));
        }
    }
}

/// Ridge-silhouette variant: one closed triangle strip between an inner base
/// circle and an outer peaked circle, the distant-skyline mesh the original
/// scene ships. Heights mix a 3-cycle sinusoid with a seeded draw per
/// segment.
pub fn generate_ridge_ring(seed: u32, segments: usize, ring_radius: f32) -> MeshData {
    let inner = ring_radius * RIDGE_INNER_FACTOR;
    let outer = ring_radius * RIDGE_OUTER_FACTOR;
    let mut rng = SeededRng::new(seed);

    let mut mesh = MeshData::with_capacity((segments + 1) * 2, segments * 6);
    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let theta = u * std::f32::consts::TAU;
        let height = 6.0 + (theta * 3.0).sin() * 5.0 + rng.next_f32() * 5.0;

        mesh.push_vertex(
            [
                theta.cos() * outer,
                height + RIDGE_BASE_LIFT,
                theta.sin() * outer,
            ],
            [u, 1.0],
            MOUNTAIN_COLOR,
        );
        mesh.push_vertex(
            [theta.cos() * inner, RIDGE_BASE_LIFT, theta.sin() * inner],
            [u, 0.0],
            MOUNTAIN_COLOR,
        );
    }

    for i in 0..segments {
        let a = (i * 2) as u32;
        let b = a + 1;
        let c = a + 2;
        let d = a + 3;
        mesh.indices.extend_from_slice(&[a, b, c, b, d, c]);
    }

    mesh.compute_vertex_normals();
    mesh
}
