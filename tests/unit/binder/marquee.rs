use super::*;
use crate::binder::presentation::InMemoryPresentation;
use crate::foundation::core::{Fps, ScrollMetrics};
use crate::signal::env::{EnvEvent, SyntheticEnvironment};

fn setup() -> (SyntheticEnvironment, FrameScheduler) {
    let env = SyntheticEnvironment::new(ScrollMetrics::default());
    let sched = FrameScheduler::new(env.shared(), Fps::new(60, 1).unwrap());
    (env, sched)
}

fn frames(env: &SyntheticEnvironment, mut at: f64, n: usize) -> f64 {
    for _ in 0..n {
        at += 1.0 / 60.0;
        env.dispatch(EnvEvent::Frame { at });
    }
    at
}

#[test]
fn idle_drift_moves_at_base_velocity_within_wrap() {
    let (env, sched) = setup();
    let rec = InMemoryPresentation::shared();
    let velocity = ScalarSignal::new(0.0, 0.0);
    let binder = MarqueeBinder::new(
        &velocity.reader(),
        "text",
        MarqueeConfig::default(),
        &sched,
        rec.clone(),
    )
    .unwrap();
    assert_eq!(binder.offset().get(), -25.0);

    // First frame uses the cadence as dt: 5 %/s * 1/60 s.
    frames(&env, 0.0, 1);
    assert!((binder.offset().get() - (-25.0 + 5.0 / 60.0)).abs() < 1e-9);

    frames(&env, 1.0 / 60.0, 600);
    let x = binder.offset().get();
    assert!(x > -45.0 && x <= -20.0, "{x}");
    assert_eq!(
        rec.borrow().property("text", VisualProperty::TranslateX),
        Some(x)
    );
}

#[test]
fn scrolling_up_reverses_direction() {
    let (env, sched) = setup();
    let rec = InMemoryPresentation::shared();
    let velocity = ScalarSignal::new(0.0, 0.0);
    let binder = MarqueeBinder::new(
        &velocity.reader(),
        "text",
        MarqueeConfig::default(),
        &sched,
        rec,
    )
    .unwrap();

    velocity.set(-2000.0, 0.0);
    let at = frames(&env, 0.0, 30);
    assert!((binder.factor() + 5.0).abs() < 1e-6, "{}", binder.factor());

    let before = binder.offset().get();
    frames(&env, at, 1);
    let after = binder.offset().get();
    // direction -1 and factor -5: move_by = -5/60 * (1 + 5)
    let step = after - before;
    // a wrap from the -45 end back to -20 adds the interval width
    assert!((step + 0.5).abs() < 1e-6 || (step - 24.5).abs() < 1e-6, "{step}");
}

#[test]
fn hiding_stops_frames_and_teardown_releases() {
    let (env, sched) = setup();
    let rec = InMemoryPresentation::shared();
    let velocity = ScalarSignal::new(0.0, 0.0);
    let mut binder = MarqueeBinder::new(
        &velocity.reader(),
        "text",
        MarqueeConfig::default(),
        &sched,
        rec,
    )
    .unwrap();
    assert!(binder.is_visible());
    binder.set_visible(false);
    assert_eq!(env.listener_count(), 0);

    let x = binder.offset().get();
    frames(&env, 0.0, 10);
    assert_eq!(binder.offset().get(), x);

    binder.set_visible(true);
    assert_eq!(env.listener_count(), 1);
    binder.teardown();
    assert_eq!(env.listener_count(), 0);
    assert_eq!(velocity.observer_count(), 0);
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = MarqueeConfig {
        wrap_from: -20.0,
        wrap_to: -20.0,
        ..MarqueeConfig::default()
    };
    assert!(cfg.validate().is_err());
    assert!(MarqueeConfig::default().validate().is_ok());
}
