//! Orbit camera, zoom controller, GPU uniform, and the dolly sequence.
//!
//! The vignette's camera never changes its viewing direction: it sits on a
//! ray from the orbit target and only its distance along that ray moves,
//! either through the damped scroll-zoom controller or through the one-shot
//! [`DollyAnimation`] that plays when the scene becomes ready.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3};
use instant::{Duration, Instant};
use wgpu::util::DeviceExt;
use winit::event::{MouseScrollDelta, WindowEvent};

use crate::config;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Position plus a fixed orbit target.
#[derive(Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, target: P) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).magnitude()
    }

    /// Unit vector from the target towards the camera.
    pub fn direction(&self) -> Vector3<f32> {
        (self.position - self.target).normalize()
    }

    /// Move along the current direction only; the direction itself is never
    /// touched here. Negative or zero distances are clamped away defensively.
    pub fn set_distance(&mut self, distance: f32) {
        let distance = distance.max(0.01);
        self.position = self.target + self.direction() * distance;
    }
}

#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Scroll-zoom with damping; rotation and panning stay disabled.
#[derive(Debug)]
pub struct OrbitController {
    zoom_speed: f32,
    damping: f32,
    velocity: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitController {
    pub fn new(zoom_speed: f32, damping: f32) -> Self {
        Self {
            zoom_speed,
            damping,
            velocity: 0.0,
            min_distance: config::CAMERA_MIN_DISTANCE,
            max_distance: config::CAMERA_MAX_DISTANCE,
        }
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        if let WindowEvent::MouseWheel { delta, .. } = event {
            let scroll = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
            };
            self.velocity += scroll * self.zoom_speed;
        }
    }

    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();
        if self.velocity.abs() > f32::EPSILON {
            let distance = (camera.distance() - self.velocity * dt)
                .clamp(self.min_distance, self.max_distance);
            camera.set_distance(distance);
        }
        // Exponential decay, frame-rate independent.
        self.velocity *= (-self.damping * dt).exp();
    }
}

/// Sinusoidal ease-in-out. Symmetric: `ease(p) == 1 - ease(1 - p)`.
pub fn ease_in_out_sine(progress: f32) -> f32 {
    (1.0 - (std::f32::consts::PI * progress).cos()) / 2.0
}

/// One-shot eased pull from a start distance to an end distance.
///
/// Created inactive; [`DollyAnimation::start`] arms it at most once, whether
/// the trigger was the readiness gate or the user entering by hand.
/// Deactivates once progress reaches 1 and never mutates the camera again.
#[derive(Debug)]
pub struct DollyAnimation {
    active: bool,
    started: bool,
    started_at: Option<Instant>,
    duration: Duration,
    start_distance: f32,
    end_distance: f32,
}

impl DollyAnimation {
    pub fn new(duration: Duration, start_distance: f32, end_distance: f32) -> Self {
        Self {
            active: false,
            started: false,
            started_at: None,
            duration,
            start_distance,
            end_distance,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Arm the animation. Calls after the first are ignored.
    pub fn start(&mut self, now: Instant) {
        if self.started {
            return;
        }
        self.started = true;
        self.active = true;
        self.started_at = Some(now);
    }

    /// Eased camera distance for a raw progress value in `[0, 1]`.
    pub fn distance_at(&self, progress: f32) -> f32 {
        let eased = ease_in_out_sine(progress.clamp(0.0, 1.0));
        self.start_distance + (self.end_distance - self.start_distance) * eased
    }

    pub fn progress(&self, now: Instant) -> f32 {
        match self.started_at {
            Some(start) => {
                let elapsed = (now - start).as_secs_f32();
                (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0)
            }
            None => 0.0,
        }
    }

    /// Advance the dolly and push the new distance onto the camera.
    ///
    /// Only the camera's distance along its current direction changes.
    pub fn apply(&mut self, now: Instant, camera: &mut Camera) {
        if !self.active {
            return;
        }
        let progress = self.progress(now);
        camera.set_distance(self.distance_at(progress));
        if progress >= 1.0 {
            self.active = false;
        }
    }
}

impl Default for DollyAnimation {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(config::DOLLY_DURATION_MS),
            config::DOLLY_START_DISTANCE,
            config::DOLLY_END_DISTANCE,
        )
    }
}

/// The camera uniform as the shaders see it.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::from_scale(1.0).into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.matrix() * camera.view_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera state bundled with its GPU resources, owned by the context.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub dolly: DollyAnimation,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: Camera, projection: &Projection) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
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
                label: Some("camera_bind_group_layout"),
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            controller: OrbitController::new(4.0, 6.0),
            dolly: DollyAnimation::default(),
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}
