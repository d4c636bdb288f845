//! Meadow assembly: scatter blades over a disk, emit one combined mesh.

use anyhow::Context as _;
use cgmath::Vector3;

use crate::r#gen::blade::{self, INDICES_PER_BLADE, VERTS_PER_BLADE};
use crate::r#gen::mesh::MeshData;
use crate::r#gen::rng::SeededRng;

/// Remap `val` from `[old_min, old_max]` to `[new_min, new_max]`.
fn convert_range(val: f32, old_min: f32, old_max: f32, new_min: f32, new_max: f32) -> f32 {
    ((val - old_min) * (new_max - new_min)) / (old_max - old_min) + new_min
}

/// Build the whole grass field: `blade_count` blades inside a disk of
/// `radius`, concatenated into a single static mesh with smooth normals.
///
/// Blade centers are drawn with `r = R * sqrt(u)`; the square root is what
/// makes the samples uniform per unit *area* rather than piling up at the
/// center. Each blade's five vertices share one UV pair, the blade center
/// remapped from `[-R, R]` to `[0, 1]`, which the shader uses for the
/// large-scale grass/cloud texture blend.
///
/// This is a one-shot build. The field never mutates afterwards; all wind
/// animation happens in the shader off the bend mask and the time uniform.
pub fn generate_field(blade_count: usize, radius: f32, seed: u32) -> anyhow::Result<MeshData> {
    let mut rng = SeededRng::new(seed);
    let mut mesh = MeshData::with_capacity(
        blade_count * VERTS_PER_BLADE,
        blade_count * INDICES_PER_BLADE,
    );

    for i in 0..blade_count {
        let r = radius * rng.next_f32().sqrt();
        let theta = rng.next_f32() * std::f32::consts::TAU;
        let center = Vector3::new(r * theta.cos(), 0.0, r * theta.sin());

        let uv = [
            convert_range(center.x, -radius, radius, 0.0, 1.0),
            convert_range(center.z, -radius, radius, 0.0, 1.0),
        ];

        let blade = blade::generate_blade(center, (i * VERTS_PER_BLADE) as u32, &mut rng);
        for v in 0..VERTS_PER_BLADE {
            mesh.push_vertex(blade.positions[v], uv, blade.colors[v]);
        }
        mesh.indices.extend_from_slice(&blade.indices);
    }

    mesh.validate()
        .with_context(|| format!("grass field with {blade_count} blades"))?;
    mesh.compute_vertex_normals();
    Ok(mesh)
}
