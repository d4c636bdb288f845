//! Render pipelines for the vignette's passes.
//!
//! One builder, [`mk_render_pipeline`], covers every pipeline; the per-pass
//! modules only differ in shader, vertex layout, blending and culling. The
//! scene pass renders into the bloom pass's HDR color target, so all scene
//! pipelines share [`bloom::SCENE_FORMAT`] rather than the surface format.

use wgpu::util::DeviceExt;

use crate::coordinator::UniformSet;
use crate::{config, data_structures::texture::Texture};

pub mod bloom;
pub mod field;
pub mod model;
pub mod silhouette;
pub mod sky;

/// The scene-wide uniform block, written once per tick from the
/// coordinator's [`UniformSet`] and read by every scene shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniformRaw {
    wind_direction: [f32; 3],
    wind_speed: f32,
    light_direction: [f32; 3],
    wind_strength: f32,
    ambient_color: [f32; 3],
    grass_time_ms: f32,
    zenith_color: [f32; 3],
    sky_time: f32,
    horizon_color: [f32; 3],
    model_time: f32,
    light_color: [f32; 3],
    star_density: f32,
}

impl From<&UniformSet> for SceneUniformRaw {
    fn from(u: &UniformSet) -> Self {
        use cgmath::InnerSpace;
        let light: cgmath::Vector3<f32> = config::LIGHT_DIRECTION.into();
        Self {
            wind_direction: u.wind_direction,
            wind_speed: u.wind_speed,
            light_direction: light.normalize().into(),
            wind_strength: u.wind_strength,
            ambient_color: config::AMBIENT_COLOR,
            grass_time_ms: u.grass_time_ms,
            zenith_color: config::SKY_ZENITH_COLOR,
            sky_time: u.sky_time,
            horizon_color: config::SKY_HORIZON_COLOR,
            model_time: u.model_time,
            light_color: config::LIGHT_COLOR,
            star_density: u.star_density,
        }
    }
}

/// GPU residence for [`SceneUniformRaw`].
#[derive(Debug)]
pub struct SceneUniformResources {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl SceneUniformResources {
    pub fn new(device: &wgpu::Device, uniforms: &UniformSet) -> Self {
        let raw = SceneUniformRaw::from(uniforms);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::cast_slice(&[raw]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("scene_uniform_bind_group_layout"),
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("scene_uniform_bind_group"),
        });
        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniforms: &UniformSet) {
        let raw = SceneUniformRaw::from(uniforms);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[raw]));
    }
}

#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    cull_mode: Option<wgpu::Face>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    mk_render_pipeline_ex(
        device,
        layout,
        color_format,
        blend,
        depth_format,
        cull_mode,
        vertex_layouts,
        shader,
        "fs_main",
    )
}

/// Variant taking the fragment entry point; the bloom shader packs several.
#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline_ex(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    cull_mode: Option<wgpu::Face>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
    fs_entry: &str,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: Some(true),
            depth_compare: Some(wgpu::CompareFunction::Less),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}

/// All scene pipelines, built once by the context.
#[derive(Debug)]
pub struct Pipelines {
    pub field: wgpu::RenderPipeline,
    pub sky: wgpu::RenderPipeline,
    pub silhouette: wgpu::RenderPipeline,
    pub model: wgpu::RenderPipeline,
}

// Re-export the depth format alongside the builders; every scene pipeline
// depth-tests against the same attachment.
pub const DEPTH_FORMAT: wgpu::TextureFormat = Texture::DEPTH_FORMAT;
