use super::*;
use crate::foundation::core::ScrollMetrics;
use crate::signal::env::SyntheticEnvironment;

fn setup() -> (SyntheticEnvironment, FrameScheduler) {
    let env = SyntheticEnvironment::new(ScrollMetrics::default());
    let sched = FrameScheduler::new(env.shared(), Fps::new(60, 1).unwrap());
    (env, sched)
}

#[test]
fn task_runs_only_between_start_and_stop() {
    let (env, sched) = setup();
    let frames = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&frames);
    let task = sched.schedule("test", move |info| {
        sink.borrow_mut().push(info);
        TaskStatus::Continue
    });

    env.dispatch(EnvEvent::Frame { at: 0.0 });
    assert!(frames.borrow().is_empty());
    assert_eq!(env.listener_count(), 0);

    task.start();
    task.start();
    assert_eq!(env.listener_count(), 1);
    env.dispatch(EnvEvent::Frame { at: 1.0 });
    env.dispatch(EnvEvent::Frame { at: 1.5 });
    task.stop();
    env.dispatch(EnvEvent::Frame { at: 2.0 });

    let got = frames.borrow();
    assert_eq!(got.len(), 2);
    assert!((got[0].dt - 1.0 / 60.0).abs() < 1e-12);
    assert_eq!(got[1].dt, 0.5);
    assert_eq!(env.listener_count(), 0);
}

#[test]
fn idle_status_self_terminates_and_waker_restarts() {
    let (env, sched) = setup();
    let remaining = Rc::new(Cell::new(2));
    let r = Rc::clone(&remaining);
    let task = sched.schedule("countdown", move |_| {
        r.set(r.get() - 1);
        if r.get() == 0 {
            TaskStatus::Idle
        } else {
            TaskStatus::Continue
        }
    });
    task.start();
    for i in 0..5 {
        env.dispatch(EnvEvent::Frame { at: f64::from(i) });
    }
    assert_eq!(remaining.get(), 0);
    assert!(!task.is_running());
    assert_eq!(env.listener_count(), 0);

    remaining.set(1);
    task.waker().wake();
    assert!(task.is_running());
    env.dispatch(EnvEvent::Frame { at: 10.0 });
    assert!(!task.is_running());
}

#[test]
fn dropping_task_cancels_listener() {
    let (env, sched) = setup();
    let task = sched.schedule("dropped", |_| TaskStatus::Continue);
    let waker = task.waker();
    task.start();
    assert_eq!(env.listener_count(), 1);
    drop(task);
    assert_eq!(env.listener_count(), 0);
    waker.wake();
    assert_eq!(env.listener_count(), 0);
}
