use crate::data_structures::model::{SceneryVertex, Vertex};
use crate::pipelines::{bloom, mk_render_pipeline, DEPTH_FORMAT};

/// Grass pipeline: double-sided, vertex-colored, wind-animated in the vertex
/// stage off the bend mask.
pub fn mk_field_pipeline(
    device: &wgpu::Device,
    field_textures_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    scene_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Field Pipeline Layout"),
        bind_group_layouts: &[
            Some(field_textures_layout),
            Some(camera_bind_group_layout),
            Some(scene_bind_group_layout),
        ],
        immediate_size: 0,
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Field Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("field_shader.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &layout,
        bloom::SCENE_FORMAT,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        Some(DEPTH_FORMAT),
        // Blades are single quads viewed from both sides.
        None,
        &[SceneryVertex::desc()],
        shader,
    )
}
