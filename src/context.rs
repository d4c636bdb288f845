use std::sync::Arc;

use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, Projection},
    config,
    coordinator::UniformSet,
    data_structures::texture,
    pipelines::{
        bloom::BloomPass, field::mk_field_pipeline, model::mk_model_pipeline,
        silhouette::mk_silhouette_pipeline, sky::mk_sky_pipeline, Pipelines,
        SceneUniformResources,
    },
    resources::texture::{field_textures_layout, material_layout},
};

/// Central GPU and window state: device, queue, surface, camera resources,
/// the scene uniform block and every pipeline the vignette draws with.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub scene_uniforms: SceneUniformResources,
    pub pipelines: Pipelines,
    pub bloom: BloomPass,
    pub field_textures_layout: wgpu::BindGroupLayout,
    pub material_layout: wgpu::BindGroupLayout,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("wgpu setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders assume an sRGB surface; fall back to whatever the
        // first supported format is otherwise.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = Camera::new(config::CAMERA_START_POSITION, [0.0, 0.0, 0.0]);
        let projection = Projection::new(
            config.width,
            config.height,
            cgmath::Deg(config::CAMERA_FOVY_DEG),
            config::CAMERA_NEAR,
            config::CAMERA_FAR,
        );
        let camera = CameraResources::new(&device, camera, &projection);

        let scene_uniforms = SceneUniformResources::new(&device, &UniformSet::default());

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let field_textures_layout = field_textures_layout(&device);
        let material_layout = material_layout(&device);

        let pipelines = Pipelines {
            field: mk_field_pipeline(
                &device,
                &field_textures_layout,
                &camera.bind_group_layout,
                &scene_uniforms.bind_group_layout,
            ),
            sky: mk_sky_pipeline(
                &device,
                &camera.bind_group_layout,
                &scene_uniforms.bind_group_layout,
            ),
            silhouette: mk_silhouette_pipeline(
                &device,
                &camera.bind_group_layout,
                &scene_uniforms.bind_group_layout,
            ),
            model: mk_model_pipeline(
                &device,
                &material_layout,
                &camera.bind_group_layout,
                &scene_uniforms.bind_group_layout,
            ),
        };

        let bloom = BloomPass::new(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            scene_uniforms,
            pipelines,
            bloom,
            field_textures_layout,
            material_layout,
            window,
            depth_texture,
            clear_colour: config::CLEAR_COLOR,
        })
    }
}

/// The slice of the context an async scene constructor needs. The wgpu
/// handles are internally reference counted, so cloning them here only
/// clones the refs.
#[derive(Clone, Debug)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub material_layout: wgpu::BindGroupLayout,
    pub field_textures_layout: wgpu::BindGroupLayout,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            material_layout: ctx.material_layout.clone(),
            field_textures_layout: ctx.field_textures_layout.clone(),
        }
    }
}
