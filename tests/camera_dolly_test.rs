use cgmath::InnerSpace;
use instant::{Duration, Instant};
use nightmeadow::camera::{ease_in_out_sine, Camera, DollyAnimation};

fn dolly() -> DollyAnimation {
    DollyAnimation::new(Duration::from_millis(4000), 17.0, 25.0)
}

#[test]
fn easing_hits_both_endpoints() {
    assert!((ease_in_out_sine(0.0) - 0.0).abs() < 1e-6);
    assert!((ease_in_out_sine(1.0) - 1.0).abs() < 1e-6);
    assert!((ease_in_out_sine(0.5) - 0.5).abs() < 1e-6);
}

#[test]
fn easing_is_monotonic_and_symmetric() {
    let steps = 200;
    let mut previous = ease_in_out_sine(0.0);
    for i in 1..=steps {
        let p = i as f32 / steps as f32;
        let eased = ease_in_out_sine(p);
        assert!(eased >= previous, "not monotonic at p = {p}");
        previous = eased;

        let mirrored = 1.0 - ease_in_out_sine(1.0 - p);
        assert!((eased - mirrored).abs() < 1e-5, "asymmetric at p = {p}");
    }
}

#[test]
fn dolly_distance_interpolates_between_endpoints() {
    let dolly = dolly();
    assert!((dolly.distance_at(0.0) - 17.0).abs() < 1e-5);
    assert!((dolly.distance_at(1.0) - 25.0).abs() < 1e-5);
    // Out-of-range progress clamps instead of extrapolating.
    assert!((dolly.distance_at(-0.5) - 17.0).abs() < 1e-5);
    assert!((dolly.distance_at(1.5) - 25.0).abs() < 1e-5);

    let mut previous = dolly.distance_at(0.0);
    for i in 1..=100 {
        let d = dolly.distance_at(i as f32 / 100.0);
        assert!(d >= previous);
        previous = d;
    }
}

#[test]
fn dolly_moves_distance_but_never_direction() {
    let mut camera = Camera::new([24.0, 3.6, -2.0], [0.0, 0.0, 0.0]);
    let direction_before = camera.direction();

    let mut dolly = dolly();
    let t0 = Instant::now();
    dolly.start(t0);

    dolly.apply(t0, &mut camera);
    assert!((camera.distance() - 17.0).abs() < 1e-3);

    dolly.apply(t0 + Duration::from_millis(2000), &mut camera);
    assert!((camera.distance() - 21.0).abs() < 1e-3, "midpoint of the ease");

    dolly.apply(t0 + Duration::from_millis(4000), &mut camera);
    assert!((camera.distance() - 25.0).abs() < 1e-3);
    assert!(!dolly.is_active());

    let direction_after = camera.direction();
    assert!((direction_before - direction_after).magnitude() < 1e-5);
}

#[test]
fn finished_dolly_leaves_the_camera_alone() {
    let mut camera = Camera::new([24.0, 3.6, -2.0], [0.0, 0.0, 0.0]);
    let mut dolly = dolly();
    let t0 = Instant::now();
    dolly.start(t0);
    dolly.apply(t0 + Duration::from_millis(4000), &mut camera);
    assert!(!dolly.is_active());

    // Zoom somewhere else, then tick the dolly again: no effect.
    camera.set_distance(9.0);
    dolly.apply(t0 + Duration::from_millis(8000), &mut camera);
    assert!((camera.distance() - 9.0).abs() < 1e-5);
}

#[test]
fn dolly_arms_only_once() {
    let mut camera = Camera::new([0.0, 0.0, 20.0], [0.0, 0.0, 0.0]);
    let mut dolly = dolly();
    let t0 = Instant::now();
    dolly.start(t0);
    // A second trigger (say, pressing enter after the gate fired) is a no-op.
    dolly.start(t0 + Duration::from_millis(3000));
    assert!((dolly.progress(t0 + Duration::from_millis(4000)) - 1.0).abs() < 1e-6);

    dolly.apply(t0 + Duration::from_millis(4000), &mut camera);
    assert!(!dolly.is_active());
    dolly.start(t0 + Duration::from_millis(5000));
    assert!(!dolly.is_active(), "a finished dolly never re-arms");
}

#[test]
fn camera_distance_is_clamped_positive() {
    let mut camera = Camera::new([0.0, 0.0, 10.0], [0.0, 0.0, 0.0]);
    camera.set_distance(-5.0);
    assert!(camera.distance() > 0.0);
}
