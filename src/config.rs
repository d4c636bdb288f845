//! Fixed scene parameters.
//!
//! The vignette is not runtime-configurable; everything that shapes the scene
//! lives here as compile-time constants so the generators stay pure functions
//! of their seeds.

/// Radius of the circular meadow. The original plane is 50 units across.
pub const FIELD_RADIUS: f32 = 25.0;
pub const BLADE_COUNT: usize = 100_000;
pub const BLADE_WIDTH: f32 = 0.5;
pub const BLADE_HEIGHT: f32 = 0.7;
pub const BLADE_HEIGHT_VARIATION: f32 = 0.6;
/// How far the blade tip leans away from its base, independent of facing.
pub const BLADE_TIP_OFFSET: f32 = 0.1;

/// Seed for the blade scatter, so reloads grow the same meadow.
pub const FIELD_SEED: u32 = 20_417;

/// Ring the mountains sit on. Slightly wider than the meadow.
pub const MOUNTAIN_RING_RADIUS: f32 = 30.0;
pub const MOUNTAIN_COUNT: usize = 88;
pub const MOUNTAIN_SEED: u32 = 12345;
/// Cone-ring variant: mountains stand at 1.05x the ring radius.
pub const MOUNTAIN_CONE_RING_FACTOR: f32 = 1.05;
/// Ridge-silhouette variant: a strip between these two circles.
pub const RIDGE_INNER_FACTOR: f32 = 0.91;
pub const RIDGE_OUTER_FACTOR: f32 = 1.18;
pub const RIDGE_SEGMENTS: usize = 78;
pub const RIDGE_BASE_LIFT: f32 = 0.05;

pub const SKY_RADIUS: f32 = 60.0;
pub const SKY_SEGMENTS: usize = 64;
pub const STAR_DENSITY: f32 = 0.01;
/// Deep blue straight up, warm sunset at the horizon.
pub const SKY_ZENITH_COLOR: [f32; 3] = [0.039, 0.078, 0.275];
pub const SKY_HORIZON_COLOR: [f32; 3] = [1.0, 0.835, 0.502];

pub const WIND_DIRECTION: [f32; 3] = [1.0, 0.0, 0.0];
pub const WIND_SPEED: f32 = 3.0;
pub const WIND_STRENGTH: f32 = 0.1;

pub const BLOOM_STRENGTH: f32 = 0.087;
pub const BLOOM_RADIUS: f32 = 0.6;
pub const BLOOM_THRESHOLD: f32 = 1.0;

pub const CAMERA_FOVY_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_START_POSITION: [f32; 3] = [24.0, 3.6, -2.0];
pub const CAMERA_MIN_DISTANCE: f32 = 3.0;
pub const CAMERA_MAX_DISTANCE: f32 = 25.0;

pub const DOLLY_DURATION_MS: u64 = 4000;
pub const DOLLY_START_DISTANCE: f32 = 17.0;
pub const DOLLY_END_DISTANCE: f32 = 25.0;

/// #262837, the original renderer's clear colour.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.149,
    g: 0.157,
    b: 0.216,
    a: 1.0,
};

pub const GROUND_COLOR: [f32; 3] = [0.043, 0.239, 0.043];
pub const MOUNTAIN_COLOR: [f32; 3] = [0.094, 0.11, 0.165];

/// Moonlight: direction (normalized at upload), dim blue ambient, an
/// intensity above 1.0 so highlights reach the bloom threshold.
pub const LIGHT_DIRECTION: [f32; 3] = [4.0, 5.0, -2.0];
pub const AMBIENT_COLOR: [f32; 3] = [0.128, 0.147, 0.176];
pub const LIGHT_COLOR: [f32; 3] = [2.6, 2.6, 2.6];
