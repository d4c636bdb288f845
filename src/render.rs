//! Render batching.
//!
//! The vignette hands back a [`Render`] tree each frame; the host flattens
//! it into per-pipeline batches so each pipeline is bound exactly once per
//! frame regardless of how the scene composed itself.

use crate::data_structures::model::{Model, SceneryMesh};

/// Data for instanced prop rendering: a model plus its instance buffer.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// The grass mesh plus its texture bind group (grass + cloud maps).
pub struct FieldBatch<'a> {
    pub mesh: &'a SceneryMesh,
    pub textures: &'a wgpu::BindGroup,
}

/// Specifies how a piece of the scene should be rendered.
///
/// - `Field` goes through the grass pipeline
/// - `Sky` goes through the sky-dome pipeline
/// - `Silhouette`/`Silhouettes` go through the flat scenery pipeline
/// - `Instanced` goes through the model pipeline
/// - `Composed` nests other renders
pub enum Render<'a> {
    None,
    Field(FieldBatch<'a>),
    Sky(&'a SceneryMesh),
    Silhouette(&'a SceneryMesh),
    Silhouettes(Vec<&'a SceneryMesh>),
    Instanced(Instanced<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Flatten into the per-pipeline batches.
    pub(crate) fn collect(
        self,
        field: &mut Vec<FieldBatch<'a>>,
        sky: &mut Vec<&'a SceneryMesh>,
        silhouettes: &mut Vec<&'a SceneryMesh>,
        models: &mut Vec<Instanced<'a>>,
    ) {
        match self {
            Render::None => (),
            Render::Field(batch) => field.push(batch),
            Render::Sky(mesh) => sky.push(mesh),
            Render::Silhouette(mesh) => silhouettes.push(mesh),
            Render::Silhouettes(mut meshes) => silhouettes.append(&mut meshes),
            Render::Instanced(instanced) => models.push(instanced),
            Render::Composed(renders) => {
                for render in renders {
                    render.collect(field, sky, silhouettes, models);
                }
            }
        }
    }
}
