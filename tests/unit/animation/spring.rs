use super::*;
use crate::foundation::core::{Fps, ScrollMetrics};
use crate::signal::env::{EnvEvent, SyntheticEnvironment};

fn setup() -> (SyntheticEnvironment, FrameScheduler) {
    let env = SyntheticEnvironment::new(ScrollMetrics::default());
    let sched = FrameScheduler::new(env.shared(), Fps::new(60, 1).unwrap());
    (env, sched)
}

fn run_frames(env: &SyntheticEnvironment, start: f64, n: usize) -> f64 {
    let mut at = start;
    for _ in 0..n {
        at += 1.0 / 60.0;
        env.dispatch(EnvEvent::Frame { at });
    }
    at
}

#[test]
fn config_rejects_non_positive_parameters() {
    assert!(SpringConfig::new(0.0, 10.0, 1.0).is_err());
    assert!(SpringConfig::new(100.0, -1.0, 1.0).is_err());
    assert!(SpringConfig::new(100.0, 10.0, f64::NAN).is_err());
    assert!(SpringConfig::new(100.0, 10.0, 1.0).is_ok());
    assert!(
        SpringConfig::default()
            .with_rest(0.0, 0.01)
            .is_err()
    );
}

#[test]
fn sanitized_replaces_only_invalid_fields() {
    let cfg = SpringConfig {
        stiffness: -5.0,
        damping: 42.0,
        mass: f64::INFINITY,
        ..SpringConfig::default()
    }
    .sanitized();
    assert_eq!(cfg.stiffness, 100.0);
    assert_eq!(cfg.damping, 42.0);
    assert_eq!(cfg.mass, 1.0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn every_damping_regime_converges_without_nan() {
    for damping in [2.0, 20.0, 80.0] {
        let cfg = SpringConfig::new(100.0, damping, 1.0).unwrap();
        let mut s = SpringState::new(0.0);
        for _ in 0..600 {
            s.advance(1.0, &cfg, 1.0 / 60.0);
            assert!(s.position.is_finite() && s.velocity.is_finite());
        }
        assert!((s.position - 1.0).abs() < 1e-3, "damping {damping}: {s:?}");
    }
}

#[test]
fn critically_damped_step_does_not_overshoot() {
    // zeta = 20 / (2 * sqrt(100)) = 1
    let cfg = SpringConfig::new(100.0, 20.0, 1.0).unwrap();
    let mut s = SpringState::new(0.0);
    let mut prev = 0.0;
    for _ in 0..300 {
        s.advance(1.0, &cfg, 1.0 / 60.0);
        assert!(s.position <= 1.0 + 1e-12);
        assert!(s.position >= prev - 1e-12);
        prev = s.position;
    }
}

#[test]
fn large_frame_delta_stays_bounded() {
    let cfg = SpringConfig::new(1000.0, 5.0, 1.0).unwrap();
    let mut s = SpringState::new(0.0);
    s.advance(1.0, &cfg, 30.0);
    assert!(s.position.is_finite());
    assert!((s.position - 1.0).abs() < 1e-6);
}

#[test]
fn step_input_settles_and_then_stops_updating() {
    let (env, sched) = setup();
    let source = ScalarSignal::new(0.0, 0.0);
    let cfg = SpringConfig::default().with_rest(0.001, 0.001).unwrap();
    let smoothed = SmoothedSignal::new(&source.reader(), cfg, &sched);
    assert!(!smoothed.is_animating());

    source.set(1.0, 0.0);
    assert!(smoothed.is_animating());

    let mut at = 0.0;
    let mut frames = 0;
    while smoothed.is_animating() && frames < 10_000 {
        at = run_frames(&env, at, 1);
        frames += 1;
        let v = smoothed.get();
        assert!(v.is_finite());
    }
    assert!(!smoothed.is_animating(), "spring never settled");
    assert!((smoothed.get() - 1.0).abs() < 0.001);
    assert_eq!(env.listener_count(), 0);

    let rested = smoothed.reader().sample();
    run_frames(&env, at, 30);
    assert_eq!(smoothed.reader().sample(), rested);
}

#[test]
fn output_is_continuous_for_a_step() {
    let (env, sched) = setup();
    let source = ScalarSignal::new(0.0, 0.0);
    let smoothed = SmoothedSignal::new(&source.reader(), SpringConfig::default(), &sched);
    source.set(100.0, 0.0);

    let mut prev = smoothed.get();
    let mut at = 0.0;
    for _ in 0..120 {
        at = run_frames(&env, at, 1);
        let v = smoothed.get();
        // bounded per-frame movement; no jump to the target
        assert!((v - prev).abs() < 40.0, "jump from {prev} to {v}");
        prev = v;
    }
}

#[test]
fn jump_teleports_and_stops() {
    let (env, sched) = setup();
    let smoothed = SmoothedSignal::detached(0.0, 0.0, SpringConfig::default(), &sched);
    smoothed.set_target(50.0);
    run_frames(&env, 0.0, 3);
    assert!(smoothed.is_animating());
    smoothed.jump(10.0, 1.0);
    assert!(!smoothed.is_animating());
    assert_eq!(smoothed.get(), 10.0);
    assert_eq!(smoothed.velocity(), 0.0);
    assert_eq!(smoothed.target(), 10.0);
}

#[test]
fn invalid_config_is_clamped_instead_of_producing_nan() {
    let (env, sched) = setup();
    let bad = SpringConfig {
        stiffness: 0.0,
        damping: -3.0,
        ..SpringConfig::default()
    };
    let smoothed = SmoothedSignal::detached(0.0, 0.0, bad, &sched);
    assert!(smoothed.config().validate().is_ok());
    smoothed.set_target(1.0);
    run_frames(&env, 0.0, 60);
    assert!(smoothed.get().is_finite());
}

#[test]
fn teardown_releases_source_and_frames() {
    let (env, sched) = setup();
    let source = ScalarSignal::new(0.0, 0.0);
    let mut smoothed = SmoothedSignal::new(&source.reader(), SpringConfig::default(), &sched);
    source.set(1.0, 0.0);
    assert_eq!(env.listener_count(), 1);
    smoothed.teardown();
    assert_eq!(env.listener_count(), 0);
    assert_eq!(source.observer_count(), 0);
}
