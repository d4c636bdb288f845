use crate::data_structures::model::{SceneryVertex, Vertex};
use crate::pipelines::{bloom, mk_render_pipeline, DEPTH_FORMAT};

/// Flat-shaded pipeline for the mountains, the ridge ring and the ground
/// disk: vertex color with a touch of diffuse shading, no textures.
pub fn mk_silhouette_pipeline(
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    scene_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Silhouette Pipeline Layout"),
        bind_group_layouts: &[Some(camera_bind_group_layout), Some(scene_bind_group_layout)],
        immediate_size: 0,
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Silhouette Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("silhouette_shader.wgsl").into()),
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
        // The ridge strip is visible from both sides.
        None,
        &[SceneryVertex::desc()],
        shader,
    )
}
