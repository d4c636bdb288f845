use std::io::{BufReader, Cursor};
use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::data_structures::model::{Material, MaterialBindings, Mesh, Model, ModelVertex};
use crate::data_structures::texture::Texture;
use crate::resources::io::{load_binary, load_string};
use crate::resources::texture::load_texture;

/**
 * This module contains all logic for loading models, textures and audio from
 * external files.
 */
pub mod io;
pub mod texture;

/// Raw audio-file bytes. Decoding and playback are the host UI's business;
/// the scene only needs to know the fetch finished.
#[derive(Debug)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
}

pub async fn load_audio(file_name: &str) -> anyhow::Result<AudioClip> {
    let bytes = load_binary(file_name).await?;
    log::info!("audio '{}' fetched ({} bytes)", file_name, bytes.len());
    Ok(AudioClip { bytes })
}

/// Load an OBJ+MTL pair into a [`Model`].
///
/// Materials land in a name-keyed map of shared handles while the file is
/// still being processed; each mesh resolves its handle here, once. Anything
/// the MTL can't provide (missing texture file, missing material) falls back
/// to a plain white material rather than failing the whole prop.
pub async fn load_model_obj(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<Model> {
    let obj_text: String = load_string(file_name).await?;
    let obj_cursor = Cursor::new(obj_text);
    let mut obj_reader = BufReader::new(obj_cursor);

    // MTL and texture references inside the files are relative to the OBJ.
    let base_dir = file_name
        .rsplit_once('/')
        .map(|(dir, _)| dir.to_string())
        .unwrap_or_default();
    let join = |name: &str| {
        if base_dir.is_empty() {
            name.to_string()
        } else {
            format!("{base_dir}/{name}")
        }
    };

    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| {
            let path = join(&p);
            async move {
                match load_string(&path).await {
                    Ok(mat_text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text))),
                    Err(e) => {
                        log::error!("material library '{path}' not found: {e}");
                        Err(tobj::LoadError::OpenFileFailed)
                    }
                }
            }
        },
    )
    .await?;

    let mut materials = MaterialBindings::default();
    let fallback = materials.insert(Material::new(
        device,
        "default",
        Texture::create_white(device, queue),
        [1.0, 1.0, 1.0],
        layout,
    ));

    let mut material_names = Vec::new();
    for m in obj_materials.unwrap_or_default() {
        let diffuse_texture = match &m.diffuse_texture {
            Some(name) => match load_texture(&join(name), device, queue, None).await {
                Ok(tex) => tex,
                Err(e) => {
                    log::error!("diffuse texture '{}' failed to load: {}", name, e);
                    Texture::create_white(device, queue)
                }
            },
            None => Texture::create_white(device, queue),
        };
        let base_color = m.diffuse.unwrap_or([1.0, 1.0, 1.0]);
        materials.insert(Material::new(
            device,
            &m.name,
            diffuse_texture,
            base_color,
            layout,
        ));
        material_names.push(m.name.clone());
    }

    let mut meshes = Vec::new();
    for m in &models {
        let vertices = build_vertices(&m.mesh);
        if vertices.is_empty() {
            log::warn!("mesh '{}' in {} has no vertices, skipping", m.name, file_name);
            continue;
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", file_name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", file_name)),
            contents: bytemuck::cast_slice(&m.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let material = m
            .mesh
            .material_id
            .and_then(|id| material_names.get(id))
            .and_then(|name| materials.get(name))
            .unwrap_or(&fallback);

        meshes.push(Mesh {
            name: m.name.clone(),
            vertex_buffer,
            index_buffer,
            num_elements: m.mesh.indices.len() as u32,
            material: Arc::clone(material),
        });
    }

    log::info!(
        "model '{}' loaded: {} meshes, {} materials",
        file_name,
        meshes.len(),
        materials.len()
    );
    Ok(Model { meshes, materials })
}

/// Expand tobj's SoA arrays into interleaved vertices, computing smooth
/// normals when the OBJ ships without them.
fn build_vertices(mesh: &tobj::Mesh) -> Vec<ModelVertex> {
    let mut vertices = (0..mesh.positions.len() / 3)
        .map(|i| ModelVertex {
            position: [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ],
            tex_coords: [
                mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                1.0 - mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
            ],
            normal: [
                mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
            ],
        })
        .collect::<Vec<_>>();

    if mesh.normals.is_empty() {
        use cgmath::{InnerSpace, Vector3, Zero};
        let mut accum = vec![Vector3::<f32>::zero(); vertices.len()];
        for c in mesh.indices.chunks(3) {
            let p0: Vector3<f32> = vertices[c[0] as usize].position.into();
            let p1: Vector3<f32> = vertices[c[1] as usize].position.into();
            let p2: Vector3<f32> = vertices[c[2] as usize].position.into();
            let face = (p1 - p0).cross(p2 - p0);
            accum[c[0] as usize] += face;
            accum[c[1] as usize] += face;
            accum[c[2] as usize] += face;
        }
        for (v, n) in vertices.iter_mut().zip(accum) {
            v.normal = if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            };
        }
    }

    vertices
}
