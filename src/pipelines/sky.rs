use crate::data_structures::model::{SceneryVertex, Vertex};
use crate::pipelines::{bloom, mk_render_pipeline, DEPTH_FORMAT};

/// Sky dome pipeline. The sphere is viewed from inside, so back faces are
/// the ones that matter; culling stays off rather than flipping winding.
pub fn mk_sky_pipeline(
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    scene_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Sky Pipeline Layout"),
        bind_group_layouts: &[Some(camera_bind_group_layout), Some(scene_bind_group_layout)],
        immediate_size: 0,
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Sky Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("sky_shader.wgsl").into()),
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
        None,
        &[SceneryVertex::desc()],
        shader,
    )
}
