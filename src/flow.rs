//! Flow control and the application event loop.
//!
//! The engine drives exactly one [`VignetteFlow`]: a scene that is
//! constructed asynchronously, receives window events, updates once per
//! display-refresh and returns its renderable batch. Asset loads spawned by
//! the scene resolve back into the single logical thread as [`Mutation`]s
//! delivered through the event-loop proxy, so no load ever blocks a frame.
//!
//! # Frame order
//!
//! Every `RedrawRequested`:
//! 1. `on_update` advances animation state (phase machine, dolly, controls)
//! 2. camera and scene uniforms are written
//! 3. the scene pass renders into the bloom target, bloom composites to the
//!    surface
//! 4. the next redraw is requested
//!
//! No two frames overlap; step 4 only happens at the end of step 3.

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{Context, InitContext},
    data_structures::{model::DrawModel, texture::Texture},
    render::{FieldBatch, Instanced, Render},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// A deferred change to the scene, produced by a finished load.
#[cfg(not(target_arch = "wasm32"))]
pub type Mutation<V> = Box<dyn FnOnce(&mut V) + Send>;
#[cfg(target_arch = "wasm32")]
pub type Mutation<V> = Box<dyn FnOnce(&mut V)>;

/// A fire-and-forget load: completes into the mutation that installs its
/// result (and resolves its gate token either way).
#[cfg(not(target_arch = "wasm32"))]
pub type LoadFuture<V> = Pin<Box<dyn Future<Output = Mutation<V>> + Send>>;
#[cfg(target_arch = "wasm32")]
pub type LoadFuture<V> = Pin<Box<dyn Future<Output = Mutation<V>>>>;

/// `Send` where threads exist, nothing on the web. Load futures hop onto the
/// tokio runtime natively but stay on the single browser thread under wasm.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSend: Send {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send> MaybeSend for T {}
#[cfg(target_arch = "wasm32")]
pub trait MaybeSend {}
#[cfg(target_arch = "wasm32")]
impl<T> MaybeSend for T {}

/// Output of the lifecycle hooks: either nothing, or loads to spawn.
pub enum Out<V> {
    Load(Vec<LoadFuture<V>>),
    Empty,
}

impl<V> Default for Out<V> {
    fn default() -> Self {
        Self::Empty
    }
}

/// Trait for the renderable scene.
///
/// # Lifecycle
///
/// 1. the async constructor builds the scene (procedural meshes, startup
///    textures) before the loop starts
/// 2. `on_init` runs once with the full context; loads returned here are
///    spawned immediately
/// 3. `on_window_events` sees every winit window event
/// 4. `on_update` runs every frame and reports whether the scene is visible
/// 5. `on_render` returns the frame's batch
pub trait VignetteFlow: Sized {
    fn on_init(&mut self, ctx: &mut Context) -> Out<Self>;

    fn on_window_events(&mut self, ctx: &mut Context, event: &WindowEvent) -> Out<Self>;

    /// Advance animation state. Returns `true` once the scene should draw
    /// (the readiness gate fired or the user entered by hand).
    fn on_update(&mut self, ctx: &mut Context, now: Instant, dt: Duration) -> bool;

    /// The uniform values the renderer should use this frame.
    fn uniforms(&self) -> &crate::coordinator::UniformSet;

    fn on_render(&self) -> Render<'_>;
}

/// Factory for the scene: runs before the first frame, off the event loop.
pub type FlowConstructor<V> =
    Box<dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<V>>>>>;

/// Application state bundle: GPU context plus surface status.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    is_surface_configured: bool,
    scene_visible: bool,
}

impl AppState {
    async fn new(window: Arc<Window>) -> Self {
        let ctx = match Context::new(window).await {
            Ok(ctx) => ctx,
            Err(e) => panic!("App initialization failed. Cannot create the main context: {e}"),
        };
        Self {
            ctx,
            is_surface_configured: false,
            scene_visible: false,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture =
                Texture::create_depth_texture(&self.ctx.device, [width, height], "depth_texture");
            self.ctx.bloom.resize(&self.ctx.device, width, height);
        }
    }

    fn render<V: VignetteFlow>(&mut self, flow: &V) -> Result<(), wgpu::SurfaceError> {
        // Reschedule; winit coalesces, so this cannot stack frames.
        self.ctx.window.request_redraw();

        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.ctx.bloom.scene_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if self.scene_visible {
                let mut field: Vec<FieldBatch> = Vec::new();
                let mut sky: Vec<_> = Vec::new();
                let mut silhouettes: Vec<_> = Vec::new();
                let mut models: Vec<Instanced> = Vec::new();
                flow.on_render()
                    .collect(&mut field, &mut sky, &mut silhouettes, &mut models);

                // Far to near: dome, mountains/ground, grass, then the
                // alpha-blended props.
                render_pass.set_pipeline(&self.ctx.pipelines.sky);
                for mesh in sky {
                    render_pass.set_bind_group(0, &self.ctx.camera.bind_group, &[]);
                    render_pass.set_bind_group(1, &self.ctx.scene_uniforms.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
                }

                render_pass.set_pipeline(&self.ctx.pipelines.silhouette);
                for mesh in silhouettes {
                    render_pass.set_bind_group(0, &self.ctx.camera.bind_group, &[]);
                    render_pass.set_bind_group(1, &self.ctx.scene_uniforms.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
                }

                render_pass.set_pipeline(&self.ctx.pipelines.field);
                for batch in field {
                    render_pass.set_bind_group(0, batch.textures, &[]);
                    render_pass.set_bind_group(1, &self.ctx.camera.bind_group, &[]);
                    render_pass.set_bind_group(2, &self.ctx.scene_uniforms.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, batch.mesh.vertex_buffer.slice(..));
                    render_pass.set_index_buffer(
                        batch.mesh.index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    render_pass.draw_indexed(0..batch.mesh.num_elements, 0, 0..1);
                }

                render_pass.set_pipeline(&self.ctx.pipelines.model);
                for instanced in models {
                    if instanced.amount == 0 {
                        log::warn!("you attempted to render a model with zero instances");
                        continue;
                    }
                    render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                    render_pass.draw_model_instanced(
                        instanced.model,
                        0..instanced.amount as u32,
                        &self.ctx.camera.bind_group,
                        &self.ctx.scene_uniforms.bind_group,
                    );
                }
            }
        }

        // Bloom always composites the scene target to the surface, even for
        // the clear-only loading frames.
        self.ctx.bloom.run(&mut encoder, &surface_view);

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub(crate) enum FlowEvent<V: 'static> {
    #[allow(dead_code)]
    Initialized {
        state: AppState,
        flow: V,
    },
    Mutation(Mutation<V>),
}

impl<V> Debug for FlowEvent<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { .. } => f.write_str("Initialized"),
            Self::Mutation(_) => f.write_str("Mutation(|&mut V| -> {...})"),
        }
    }
}

pub struct App<V: VignetteFlow + MaybeSend + 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: winit::event_loop::EventLoopProxy<FlowEvent<V>>,
    state: Option<AppState>,
    flow: Option<V>,
    // Held until the window exists, then taken exactly once.
    constructor: Option<FlowConstructor<V>>,
    last_time: Instant,
}

impl<V: VignetteFlow + MaybeSend + 'static> App<V> {
    fn new(event_loop: &EventLoop<FlowEvent<V>>, constructor: FlowConstructor<V>) -> Self {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            flow: None,
            constructor: Some(constructor),
            last_time: Instant::now(),
        }
    }

    /// Spawn the scene's load futures; each resolves into a mutation event.
    fn handle_out(&self, out: Out<V>) {
        let futures = match out {
            Out::Load(futures) => futures,
            Out::Empty => return,
        };
        for fut in futures {
            let proxy = self.proxy.clone();
            #[cfg(not(target_arch = "wasm32"))]
            self.async_runtime.spawn(async move {
                let mutation = fut.await;
                if proxy.send_event(FlowEvent::Mutation(mutation)).is_err() {
                    log::warn!("event loop closed before a load completed");
                }
            });
            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(async move {
                let mutation = fut.await;
                if proxy.send_event(FlowEvent::Mutation(mutation)).is_err() {
                    log::warn!("event loop closed before a load completed");
                }
            });
        }
    }
}

impl<V: VignetteFlow + MaybeSend + 'static> ApplicationHandler<FlowEvent<V>> for App<V> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes();

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let constructor = self.constructor.take().unwrap();

        let init_future = async move {
            let app_state = AppState::new(window).await;
            let flow = constructor((&app_state.ctx).into())
                .await
                .expect("scene construction failed");
            (app_state, flow)
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let (mut app_state, mut flow) = self.async_runtime.block_on(init_future);
            let out = flow.on_init(&mut app_state.ctx);
            self.state = Some(app_state);
            self.flow = Some(flow);
            self.handle_out(out);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let (state, flow) = init_future.await;
                assert!(proxy.send_event(FlowEvent::Initialized { state, flow }).is_ok());
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent<V>) {
        match event {
            FlowEvent::Initialized { state, flow } => {
                // The message from the wasm `spawn_local` above.
                self.state = Some(state);
                self.flow = Some(flow);

                let app_state = self.state.as_mut().unwrap();
                let size = app_state.ctx.window.inner_size();
                app_state.resize(size.width, size.height);
                let out = self.flow.as_mut().unwrap().on_init(&mut app_state.ctx);
                app_state.ctx.window.request_redraw();
                self.handle_out(out);
            }
            FlowEvent::Mutation(mutation) => {
                if let Some(flow) = &mut self.flow {
                    mutation(flow);
                }
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, _: DeviceEvent) {
        // Orbit rotation stays disabled; only wheel zoom (a window event)
        // moves the camera.
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let (state, flow) = match (&mut self.state, &mut self.flow) {
            (Some(state), Some(flow)) => (state, flow),
            _ => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);
        let out = flow.on_window_events(&mut state.ctx, &event);
        self.handle_out(out);

        let (state, flow) = match (&mut self.state, &mut self.flow) {
            (Some(state), Some(flow)) => (state, flow),
            _ => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now - self.last_time;
                self.last_time = now;

                // Animation state first, then uniforms, then the render.
                state.scene_visible = flow.on_update(&mut state.ctx, now, dt);

                state
                    .ctx
                    .camera
                    .uniform
                    .update_view_proj(&state.ctx.camera.camera, &state.ctx.projection);
                state.ctx.queue.write_buffer(
                    &state.ctx.camera.buffer,
                    0,
                    bytemuck::cast_slice(&[state.ctx.camera.uniform]),
                );
                state
                    .ctx
                    .scene_uniforms
                    .update(&state.ctx.queue, flow.uniforms());
                state.ctx.bloom.update(
                    &state.ctx.queue,
                    flow.uniforms(),
                    state.ctx.config.width,
                    state.ctx.config.height,
                );

                match state.render(flow) {
                    Ok(_) => (),
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

pub fn run<V: VignetteFlow + MaybeSend + 'static>(
    constructor: FlowConstructor<V>,
) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<FlowEvent<V>> = EventLoop::with_user_event().build()?;
    let mut app: App<V> = App::new(&event_loop, constructor);
    event_loop.run_app(&mut app)?;

    Ok(())
}
