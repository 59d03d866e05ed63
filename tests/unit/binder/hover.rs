use super::*;
use crate::binder::presentation::InMemoryPresentation;
use crate::foundation::core::{Fps, ScrollMetrics};
use crate::signal::env::{EnvEvent, SyntheticEnvironment};
use crate::signal::pointer::PointerSource;

fn setup() -> (SyntheticEnvironment, FrameScheduler) {
    let env = SyntheticEnvironment::new(ScrollMetrics::default());
    let sched = FrameScheduler::new(env.shared(), Fps::new(60, 1).unwrap());
    (env, sched)
}

#[test]
fn intensity_steps_toward_one_without_overshoot() {
    let mut h = HoverIntensity::new(0.1).unwrap();
    assert_eq!(h.get(), 0.0);
    assert!((h.step(ALWAYS_ON_TARGET) - 0.1).abs() < 1e-12);
    let mut prev = h.get();
    for _ in 0..500 {
        let v = h.step(ALWAYS_ON_TARGET);
        assert!(v >= prev && v <= 1.0);
        prev = v;
    }
    assert!(prev > 0.999);
}

#[test]
fn factor_must_be_inside_unit_interval() {
    for bad in [0.0, 1.0, -0.5, 2.0, f64::NAN] {
        assert!(HoverIntensity::new(bad).is_err(), "{bad}");
    }
}

#[test]
fn pushes_uniforms_each_visible_frame() {
    let (env, sched) = setup();
    let rec = InMemoryPresentation::shared();
    let pointer = PointerSource::new(&env.shared());
    let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
    let hover = HoverBinder::new(
        &pointer.point(),
        rect,
        "image",
        HoverConfig::default(),
        &sched,
        rec.clone(),
    )
    .unwrap();

    env.dispatch(EnvEvent::Frame { at: 1.0 });
    let u = rec.borrow().uniforms("image").unwrap();
    assert!((u.hover_intensity - 0.1).abs() < 1e-12);
    assert_eq!(u.pointer_uv, (0.5, 0.5));
    assert!((u.elapsed_time - 1.0 / 60.0).abs() < 1e-12);

    env.dispatch(EnvEvent::PointerMove {
        at: 1.01,
        x: 25.0,
        y: 25.0,
    });
    env.dispatch(EnvEvent::Frame { at: 1.02 });
    let u = rec.borrow().uniforms("image").unwrap();
    assert_eq!(u.pointer_uv, (0.25, 0.75));
    assert!((hover.elapsed_time() - (1.0 / 60.0 + 0.02)).abs() < 1e-9);
}

#[test]
fn hidden_binder_registers_no_frame_callbacks() {
    let (env, sched) = setup();
    let rec = InMemoryPresentation::shared();
    let pointer = PointerSource::new(&env.shared());
    let mut hover = HoverBinder::new(
        &pointer.point(),
        Rect::new(0.0, 0.0, 10.0, 10.0),
        "image",
        HoverConfig::default(),
        &sched,
        rec.clone(),
    )
    .unwrap();
    assert_eq!(env.listener_count(), 2);

    hover.set_visible(false);
    assert_eq!(env.listener_count(), 1);
    env.dispatch(EnvEvent::Frame { at: 1.0 });
    assert!(rec.borrow().uniforms("image").is_none());

    hover.set_visible(true);
    env.dispatch(EnvEvent::Frame { at: 2.0 });
    assert!((hover.intensity() - 0.1).abs() < 1e-12);

    hover.teardown();
    assert!(!hover.is_visible());
    assert_eq!(env.listener_count(), 1);
}
