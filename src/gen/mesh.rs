//! CPU-side mesh buffers and primitive builders.
//!
//! `MeshData` mirrors the attribute layout the scenery pipelines expect:
//! flat `f32` arrays for position/uv/color (3/2/3 components per vertex) and
//! a `u32` index list. Generators append into it and the renderer interleaves
//! it into a vertex buffer once at upload.

use anyhow::bail;
use cgmath::{InnerSpace, Vector3, Zero};

/// Parallel attribute arrays plus triangle indices.
///
/// The arrays must stay aligned: `positions.len() / 3` is the vertex count
/// and `uvs`/`colors` describe exactly the same vertices. [`MeshData::validate`]
/// checks that before anything reaches the GPU.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<f32>,
    pub uvs: Vec<f32>,
    pub colors: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            uvs: Vec::with_capacity(vertices * 2),
            colors: Vec::with_capacity(vertices * 3),
            normals: Vec::new(),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn push_vertex(&mut self, position: [f32; 3], uv: [f32; 2], color: [f32; 3]) {
        self.positions.extend_from_slice(&position);
        self.uvs.extend_from_slice(&uv);
        self.colors.extend_from_slice(&color);
    }

    pub fn position(&self, vertex: usize) -> Vector3<f32> {
        Vector3::new(
            self.positions[vertex * 3],
            self.positions[vertex * 3 + 1],
            self.positions[vertex * 3 + 2],
        )
    }

    pub fn set_position(&mut self, vertex: usize, p: Vector3<f32>) {
        self.positions[vertex * 3] = p.x;
        self.positions[vertex * 3 + 1] = p.y;
        self.positions[vertex * 3 + 2] = p.z;
    }

    /// Fail fast on mismatched attribute lengths or out-of-range indices.
    ///
    /// A corrupt mesh renders as garbage or panics deep inside the GPU
    /// abstraction, so construction is the place to catch it.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.positions.len() % 3 != 0 {
            bail!(
                "position array length {} is not a multiple of 3",
                self.positions.len()
            );
        }
        let vertices = self.vertex_count();
        if self.uvs.len() != vertices * 2 {
            bail!(
                "uv array holds {} vertices but positions hold {}",
                self.uvs.len() / 2,
                vertices
            );
        }
        if self.colors.len() != vertices * 3 {
            bail!(
                "color array holds {} vertices but positions hold {}",
                self.colors.len() / 3,
                vertices
            );
        }
        if !self.normals.is_empty() && self.normals.len() != vertices * 3 {
            bail!(
                "normal array holds {} vertices but positions hold {}",
                self.normals.len() / 3,
                vertices
            );
        }
        if self.indices.len() % 3 != 0 {
            bail!("index count {} is not a multiple of 3", self.indices.len());
        }
        if let Some(max) = self.indices.iter().max() {
            if *max as usize >= vertices {
                bail!("index {} exceeds vertex count {}", max, vertices);
            }
        }
        Ok(())
    }

    /// Smooth per-vertex normals over the whole index buffer.
    ///
    /// Face normals are accumulated on each referenced vertex and normalized
    /// at the end, the same accumulate-then-average scheme the model loader
    /// uses for tangents. Degenerate triangles contribute nothing.
    pub fn compute_vertex_normals(&mut self) {
        let vertices = self.vertex_count();
        let mut accum = vec![Vector3::<f32>::zero(); vertices];

        for tri in self.indices.chunks(3) {
            let a = self.position(tri[0] as usize);
            let b = self.position(tri[1] as usize);
            let c = self.position(tri[2] as usize);
            let face = (b - a).cross(c - a);
            if face.magnitude2() > 0.0 {
                accum[tri[0] as usize] += face;
                accum[tri[1] as usize] += face;
                accum[tri[2] as usize] += face;
            }
        }

        self.normals.clear();
        self.normals.reserve(vertices * 3);
        for n in accum {
            let n = if n.magnitude2() > 0.0 {
                n.normalize()
            } else {
                Vector3::unit_y()
            };
            self.normals.extend_from_slice(&[n.x, n.y, n.z]);
        }
    }

}

/// Open-ended truncated cone around the y axis, base at y = 0.
///
/// Rows run bottom to top; there are no caps because the silhouette is all
/// that ever shows. Local y goes from 0 (base) to `height` (top) so the
/// displacement pass can reason about "above the midline" directly.
pub fn truncated_cone(
    base_radius: f32,
    top_radius: f32,
    height: f32,
    radial_segments: usize,
    height_segments: usize,
    color: [f32; 3],
) -> MeshData {
    let rows = height_segments + 1;
    let cols = radial_segments + 1;
    let mut mesh = MeshData::with_capacity(rows * cols, radial_segments * height_segments * 6);

    for row in 0..rows {
        let v = row as f32 / height_segments as f32;
        let y = v * height;
        let radius = base_radius + (top_radius - base_radius) * v;
        for col in 0..cols {
            let u = col as f32 / radial_segments as f32;
            let theta = u * std::f32::consts::TAU;
            mesh.push_vertex(
                [radius * theta.cos(), y, radius * theta.sin()],
                [u, v],
                color,
            );
        }
    }

    for row in 0..height_segments {
        for col in 0..radial_segments {
            let a = (row * cols + col) as u32;
            let b = a + 1;
            let c = a + cols as u32;
            let d = c + 1;
            mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    mesh.compute_vertex_normals();
    mesh
}

/// UV sphere centered on the origin. The sky dome is drawn from inside it.
pub fn uv_sphere(radius: f32, segments: usize, color: [f32; 3]) -> MeshData {
    let rows = segments + 1;
    let cols = segments + 1;
    let mut mesh = MeshData::with_capacity(rows * cols, segments * segments * 6);

    for row in 0..rows {
        let v = row as f32 / segments as f32;
        let phi = v * std::f32::consts::PI;
        for col in 0..cols {
            let u = col as f32 / segments as f32;
            let theta = u * std::f32::consts::TAU;
            let position = [
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ];
            mesh.push_vertex(position, [u, v], color);
        }
    }

    for row in 0..segments {
        for col in 0..segments {
            let a = (row * cols + col) as u32;
            let b = a + 1;
            let c = a + cols as u32;
            let d = c + 1;
            mesh.indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }

    mesh.compute_vertex_normals();
    mesh
}

/// Flat disk in the xz plane, fanned from a center vertex.
pub fn disk(radius: f32, segments: usize, y: f32, color: [f32; 3]) -> MeshData {
    let mut mesh = MeshData::with_capacity(segments + 2, segments * 3);
    mesh.push_vertex([0.0, y, 0.0], [0.5, 0.5], color);

    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
        let (x, z) = (radius * theta.cos(), radius * theta.sin());
        mesh.push_vertex(
            [x, y, z],
            [0.5 + theta.cos() * 0.5, 0.5 + theta.sin() * 0.5],
            color,
        );
    }

    for i in 0..segments {
        let a = (i + 1) as u32;
        let b = (i + 2) as u32;
        mesh.indices.extend_from_slice(&[0, b, a]);
    }

    mesh.compute_vertex_normals();
    mesh
}
