//! Bloom post-process: bright-pass, separable blur, composite.
//!
//! The scene renders into an HDR offscreen target ([`SCENE_FORMAT`]) so
//! emissive values above 1.0 survive until the bright-pass picks them out.
//! Strength, radius and threshold all come from the coordinator's uniform
//! set each frame; the pass itself owns only textures and pipelines.

use wgpu::util::DeviceExt;

use crate::coordinator::UniformSet;
use crate::pipelines::mk_render_pipeline_ex;

/// Offscreen color format for the scene pass.
pub const SCENE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct BloomParamsRaw {
    strength: f32,
    radius: f32,
    threshold: f32,
    _pad: f32,
    direction: [f32; 2],
    texel: [f32; 2],
}

#[derive(Debug)]
pub struct BloomPass {
    surface_format: wgpu::TextureFormat,
    sampler: wgpu::Sampler,
    sample_layout: wgpu::BindGroupLayout,
    composite_layout: wgpu::BindGroupLayout,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    params_bright: wgpu::Buffer,
    params_blur_h: wgpu::Buffer,
    params_blur_v: wgpu::Buffer,
    params_composite: wgpu::Buffer,
    // Recreated on resize.
    scene_view: wgpu::TextureView,
    bright_view: wgpu::TextureView,
    ping_view: wgpu::TextureView,
    bright_bind_group: wgpu::BindGroup,
    blur_h_bind_group: wgpu::BindGroup,
    blur_v_bind_group: wgpu::BindGroup,
    composite_bind_group: wgpu::BindGroup,
}

fn color_target(device: &wgpu::Device, width: u32, height: u32, label: &str) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: SCENE_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn params_buffer(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&[BloomParamsRaw {
            strength: 0.0,
            radius: 0.0,
            threshold: 1.0,
            _pad: 0.0,
            direction: [0.0, 0.0],
            texel: [0.0, 0.0],
        }]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

impl BloomPass {
    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        };

        let sample_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                texture_entry(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                uniform_entry(2),
            ],
            label: Some("bloom_sample_layout"),
        });
        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                uniform_entry(3),
            ],
            label: Some("bloom_composite_layout"),
        });

        let mk_shader = || wgpu::ShaderModuleDescriptor {
            label: Some("Bloom Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("bloom_shader.wgsl").into()),
        };
        let composite_shader = wgpu::ShaderModuleDescriptor {
            label: Some("Bloom Composite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("bloom_composite_shader.wgsl").into()),
        };

        let sample_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Bloom Sample Pipeline Layout"),
                bind_group_layouts: &[Some(&sample_layout)],
                immediate_size: 0,
            });
        let composite_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Bloom Composite Pipeline Layout"),
                bind_group_layouts: &[Some(&composite_layout)],
                immediate_size: 0,
            });

        let bright_pipeline = mk_render_pipeline_ex(
            device,
            &sample_pipeline_layout,
            SCENE_FORMAT,
            None,
            None,
            None,
            &[],
            mk_shader(),
            "fs_bright",
        );
        let blur_pipeline = mk_render_pipeline_ex(
            device,
            &sample_pipeline_layout,
            SCENE_FORMAT,
            None,
            None,
            None,
            &[],
            mk_shader(),
            "fs_blur",
        );
        let composite_pipeline = mk_render_pipeline_ex(
            device,
            &composite_pipeline_layout,
            config.format,
            None,
            None,
            None,
            &[],
            composite_shader,
            "fs_composite",
        );

        let params_bright = params_buffer(device, "bloom bright params");
        let params_blur_h = params_buffer(device, "bloom blur h params");
        let params_blur_v = params_buffer(device, "bloom blur v params");
        let params_composite = params_buffer(device, "bloom composite params");

        let (scene_view, bright_view, ping_view) =
            Self::make_targets(device, config.width, config.height);
        let (bright_bind_group, blur_h_bind_group, blur_v_bind_group, composite_bind_group) =
            Self::make_bind_groups(
                device,
                &sample_layout,
                &composite_layout,
                &sampler,
                &scene_view,
                &bright_view,
                &ping_view,
                &params_bright,
                &params_blur_h,
                &params_blur_v,
                &params_composite,
            );

        Self {
            surface_format: config.format,
            sampler,
            sample_layout,
            composite_layout,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            params_bright,
            params_blur_h,
            params_blur_v,
            params_composite,
            scene_view,
            bright_view,
            ping_view,
            bright_bind_group,
            blur_h_bind_group,
            blur_v_bind_group,
            composite_bind_group,
        }
    }

    fn make_targets(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (wgpu::TextureView, wgpu::TextureView, wgpu::TextureView) {
        (
            color_target(device, width, height, "bloom scene target"),
            color_target(device, width, height, "bloom bright target"),
            color_target(device, width, height, "bloom ping target"),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn make_bind_groups(
        device: &wgpu::Device,
        sample_layout: &wgpu::BindGroupLayout,
        composite_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        scene_view: &wgpu::TextureView,
        bright_view: &wgpu::TextureView,
        ping_view: &wgpu::TextureView,
        params_bright: &wgpu::Buffer,
        params_blur_h: &wgpu::Buffer,
        params_blur_v: &wgpu::Buffer,
        params_composite: &wgpu::Buffer,
    ) -> (
        wgpu::BindGroup,
        wgpu::BindGroup,
        wgpu::BindGroup,
        wgpu::BindGroup,
    ) {
        let sample_group = |view: &wgpu::TextureView, params: &wgpu::Buffer, label| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: sample_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params.as_entire_binding(),
                    },
                ],
                label: Some(label),
            })
        };

        // The image walks scene -> ping -> bright -> ping; each bind group
        // samples the stage before its own pass.
        let bright = sample_group(scene_view, params_bright, "bloom bright bind group");
        let blur_h = sample_group(ping_view, params_blur_h, "bloom blur h bind group");
        let blur_v = sample_group(bright_view, params_blur_v, "bloom blur v bind group");
        let composite = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: composite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(scene_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(ping_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: params_composite.as_entire_binding(),
                },
            ],
            label: Some("bloom composite bind group"),
        });

        (bright, blur_h, blur_v, composite)
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (scene_view, bright_view, ping_view) = Self::make_targets(device, width, height);
        self.scene_view = scene_view;
        self.bright_view = bright_view;
        self.ping_view = ping_view;
        let (bright, blur_h, blur_v, composite) = Self::make_bind_groups(
            device,
            &self.sample_layout,
            &self.composite_layout,
            &self.sampler,
            &self.scene_view,
            &self.bright_view,
            &self.ping_view,
            &self.params_bright,
            &self.params_blur_h,
            &self.params_blur_v,
            &self.params_composite,
        );
        self.bright_bind_group = bright;
        self.blur_h_bind_group = blur_h;
        self.blur_v_bind_group = blur_v;
        self.composite_bind_group = composite;
    }

    /// The HDR view the scene pass renders into.
    pub fn scene_view(&self) -> &wgpu::TextureView {
        &self.scene_view
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Push the frame's bloom settings into all four parameter buffers.
    pub fn update(&self, queue: &wgpu::Queue, uniforms: &UniformSet, width: u32, height: u32) {
        let texel = [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32];
        let base = BloomParamsRaw {
            strength: uniforms.bloom_strength,
            radius: uniforms.bloom_radius,
            threshold: uniforms.bloom_threshold,
            _pad: 0.0,
            direction: [0.0, 0.0],
            texel,
        };
        queue.write_buffer(&self.params_bright, 0, bytemuck::cast_slice(&[base]));
        queue.write_buffer(
            &self.params_blur_h,
            0,
            bytemuck::cast_slice(&[BloomParamsRaw {
                direction: [1.0, 0.0],
                ..base
            }]),
        );
        queue.write_buffer(
            &self.params_blur_v,
            0,
            bytemuck::cast_slice(&[BloomParamsRaw {
                direction: [0.0, 1.0],
                ..base
            }]),
        );
        queue.write_buffer(&self.params_composite, 0, bytemuck::cast_slice(&[base]));
    }

    /// Run bright-pass, both blur directions, and the composite to the
    /// surface. The scene pass must have finished into `scene_view` first.
    pub fn run(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        self.fullscreen_pass(
            encoder,
            "bloom bright pass",
            &self.bright_pipeline,
            &self.bright_bind_group,
            &self.ping_view,
        );
        // ping holds the thresholded image; blur it horizontally into
        // bright, then vertically back into ping for the composite.
        self.fullscreen_pass(
            encoder,
            "bloom blur h pass",
            &self.blur_pipeline,
            &self.blur_h_bind_group,
            &self.bright_view,
        );
        self.fullscreen_pass(
            encoder,
            "bloom blur v pass",
            &self.blur_pipeline,
            &self.blur_v_bind_group,
            &self.ping_view,
        );
        self.fullscreen_pass(
            encoder,
            "bloom composite pass",
            &self.composite_pipeline,
            &self.composite_bind_group,
            surface_view,
        );
    }

    fn fullscreen_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        pipeline: &wgpu::RenderPipeline,
        bind_group: &wgpu::BindGroup,
        target: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
