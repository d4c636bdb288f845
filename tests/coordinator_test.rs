use instant::{Duration, Instant};
use nightmeadow::camera::{Camera, DollyAnimation, OrbitController};
use nightmeadow::coordinator::{Coordinator, Phase};
use nightmeadow::loading::{LoadGate, LoadStatus, ReadyState};

fn rig() -> (Camera, OrbitController, DollyAnimation) {
    (
        Camera::new([24.0, 3.6, -2.0], [0.0, 0.0, 0.0]),
        OrbitController::new(4.0, 6.0),
        DollyAnimation::new(Duration::from_millis(4000), 17.0, 25.0),
    )
}

#[test]
fn phases_advance_idle_loading_running() {
    let mut coordinator = Coordinator::new();
    assert_eq!(coordinator.phase(), Phase::Idle);

    coordinator.begin_loading();
    assert_eq!(coordinator.phase(), Phase::Loading);

    let gate = LoadGate::new();
    let token = gate.register("asset");
    gate.seal();

    let now = Instant::now();
    assert_eq!(coordinator.poll_gate(&gate, now), None);
    assert_eq!(coordinator.phase(), Phase::Loading);

    token.resolve(LoadStatus::Loaded);
    assert_eq!(
        coordinator.poll_gate(&gate, now),
        Some(ReadyState::Complete)
    );
    assert_eq!(coordinator.phase(), Phase::Running);

    // The gate only ever fires once; the phase stays Running.
    assert_eq!(coordinator.poll_gate(&gate, now), None);
    assert_eq!(coordinator.phase(), Phase::Running);
}

#[test]
fn ticks_do_nothing_before_running() {
    let (mut camera, mut controller, mut dolly) = rig();
    let mut coordinator = Coordinator::new();
    coordinator.begin_loading();

    let now = Instant::now();
    let drew = coordinator.tick(
        now,
        Duration::from_millis(16),
        &mut camera,
        &mut controller,
        &mut dolly,
    );
    assert!(!drew);
    assert_eq!(coordinator.uniforms.grass_time_ms, 0.0);
}

#[test]
fn running_ticks_write_scaled_time_uniforms() {
    let (mut camera, mut controller, mut dolly) = rig();
    let mut coordinator = Coordinator::new();
    coordinator.begin_loading();

    let t0 = Instant::now();
    coordinator.force_enter(t0);
    assert_eq!(coordinator.phase(), Phase::Running);

    let t1 = t0 + Duration::from_millis(2000);
    let drew = coordinator.tick(
        t1,
        Duration::from_millis(16),
        &mut camera,
        &mut controller,
        &mut dolly,
    );
    assert!(drew);

    // Grass counts milliseconds, the sky crawls at 1/20th of seconds, the
    // props take plain seconds.
    assert!((coordinator.uniforms.grass_time_ms - 2000.0).abs() < 1.0);
    assert!((coordinator.uniforms.sky_time - 0.1).abs() < 1e-4);
    assert!((coordinator.uniforms.model_time - 2.0).abs() < 1e-3);
}

#[test]
fn dolly_runs_inside_the_tick() {
    let (mut camera, mut controller, mut dolly) = rig();
    let mut coordinator = Coordinator::new();
    coordinator.begin_loading();

    let t0 = Instant::now();
    coordinator.force_enter(t0);
    dolly.start(t0);

    coordinator.tick(
        t0,
        Duration::from_millis(0),
        &mut camera,
        &mut controller,
        &mut dolly,
    );
    assert!((camera.distance() - 17.0).abs() < 1e-3);

    coordinator.tick(
        t0 + Duration::from_millis(4000),
        Duration::from_millis(16),
        &mut camera,
        &mut controller,
        &mut dolly,
    );
    assert!((camera.distance() - 25.0).abs() < 1e-3);
    assert!(!dolly.is_active());

    // Further ticks leave the camera's distance alone.
    coordinator.tick(
        t0 + Duration::from_millis(6000),
        Duration::from_millis(16),
        &mut camera,
        &mut controller,
        &mut dolly,
    );
    assert!((camera.distance() - 25.0).abs() < 1e-3);
}

#[test]
fn force_enter_only_escapes_loading() {
    let mut coordinator = Coordinator::new();
    // Idle: nothing to enter yet.
    coordinator.force_enter(Instant::now());
    assert_eq!(coordinator.phase(), Phase::Idle);

    coordinator.begin_loading();
    coordinator.force_enter(Instant::now());
    assert_eq!(coordinator.phase(), Phase::Running);
    assert_eq!(
        coordinator.ready_state(),
        Some(ReadyState::Degraded { failed: 0 })
    );
}
