use crate::data_structures::instance::InstanceRaw;
use crate::data_structures::model::{ModelVertex, Vertex};
use crate::pipelines::{bloom, mk_render_pipeline, DEPTH_FORMAT};

/// Pipeline for loaded OBJ props (the flower and its clones, the cottage):
/// instanced, alpha-blended, wind-swayed in the vertex stage.
pub fn mk_model_pipeline(
    device: &wgpu::Device,
    material_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    scene_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Model Pipeline Layout"),
        bind_group_layouts: &[
            Some(material_layout),
            Some(camera_bind_group_layout),
            Some(scene_bind_group_layout),
        ],
        immediate_size: 0,
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Model Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("model_shader.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &layout,
        bloom::SCENE_FORMAT,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(DEPTH_FORMAT),
        // Petal and leaf geometry is unclosed; show both faces.
        None,
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
