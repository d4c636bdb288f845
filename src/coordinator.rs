//! Per-frame update coordination.
//!
//! The coordinator owns the scene's phase machine and the [`UniformSet`] the
//! shader stage reads. Each display-refresh tick runs in a fixed order:
//! advance elapsed time, apply the dolly, update the orbit controller, write
//! uniforms, then the caller renders and reschedules. Nothing else mutates
//! this state, and no tick overlaps another; the host requests the next
//! redraw only after the current one finishes.

use instant::{Duration, Instant};

use crate::camera::{Camera, DollyAnimation, OrbitController};
use crate::config;
use crate::loading::{LoadGate, ReadyState};

/// Where the scene is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing tracked yet.
    Idle,
    /// Loads in flight; frames clear but draw no scene.
    Loading,
    /// All ticks animate and render.
    Running,
}

/// Every named value the shaders consume, owned here and written exactly once
/// per tick. The renderer only reads it.
#[derive(Clone, Copy, Debug)]
pub struct UniformSet {
    /// Grass shader time, milliseconds.
    pub grass_time_ms: f32,
    /// Star shader time, slowed way down.
    pub sky_time: f32,
    /// Wind-sway time for loaded models, seconds.
    pub model_time: f32,
    pub wind_direction: [f32; 3],
    pub wind_speed: f32,
    pub wind_strength: f32,
    pub star_density: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub bloom_threshold: f32,
}

impl Default for UniformSet {
    fn default() -> Self {
        Self {
            grass_time_ms: 0.0,
            sky_time: 0.0,
            model_time: 0.0,
            wind_direction: config::WIND_DIRECTION,
            wind_speed: config::WIND_SPEED,
            wind_strength: config::WIND_STRENGTH,
            star_density: config::STAR_DENSITY,
            bloom_strength: config::BLOOM_STRENGTH,
            bloom_radius: config::BLOOM_RADIUS,
            bloom_threshold: config::BLOOM_THRESHOLD,
        }
    }
}

/// The scene's frame-state machine.
#[derive(Debug)]
pub struct Coordinator {
    phase: Phase,
    started_at: Option<Instant>,
    pub uniforms: UniformSet,
    ready_state: Option<ReadyState>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            started_at: None,
            uniforms: UniformSet::default(),
            ready_state: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// How the loads ended, once running. `None` while still loading.
    pub fn ready_state(&self) -> Option<ReadyState> {
        self.ready_state
    }

    /// The gate has started tracking tokens.
    pub fn begin_loading(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Loading;
        }
    }

    /// Poll the gate; on its single fire, enter `Running`.
    pub fn poll_gate(&mut self, gate: &LoadGate, now: Instant) -> Option<ReadyState> {
        if self.phase != Phase::Loading {
            return None;
        }
        let state = gate.take_ready()?;
        self.enter_running(now, state);
        Some(state)
    }

    /// Manual "enter experience" trigger; skips waiting for stragglers.
    pub fn force_enter(&mut self, now: Instant) {
        if self.phase == Phase::Loading {
            log::info!("entering scene before all loads resolved");
            self.enter_running(now, ReadyState::Degraded { failed: 0 });
        }
    }

    fn enter_running(&mut self, now: Instant, state: ReadyState) {
        self.phase = Phase::Running;
        self.started_at = Some(now);
        self.ready_state = Some(state);
    }

    /// Wall-clock time in `Running`, independent of frame rate.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => now - start,
            None => Duration::from_secs(0),
        }
    }

    /// One tick of animation state. Returns whether the scene should draw.
    ///
    /// Order matters and matches the frame contract: dolly first (it moves
    /// the camera), controller second (it damps on top of the new distance),
    /// uniforms last so they see the final state of this tick.
    pub fn tick(
        &mut self,
        now: Instant,
        dt: Duration,
        camera: &mut Camera,
        controller: &mut OrbitController,
        dolly: &mut DollyAnimation,
    ) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        dolly.apply(now, camera);
        controller.update(camera, dt);

        let elapsed = self.elapsed(now).as_secs_f32();
        self.uniforms.grass_time_ms = elapsed * 1000.0;
        self.uniforms.sky_time = elapsed * 0.05;
        self.uniforms.model_time = elapsed;
        true
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}
