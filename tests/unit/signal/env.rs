use super::*;
use std::cell::Cell;

#[test]
fn dispatch_updates_state_and_routes_by_kind() {
    let env = SyntheticEnvironment::new(ScrollMetrics {
        scroll_y: 0.0,
        viewport_height: 100.0,
        content_height: 300.0,
    });
    let scrolls = Rc::new(Cell::new(0));
    let frames = Rc::new(Cell::new(0));

    let s = Rc::clone(&scrolls);
    let _a = env.listen(EventKind::Scroll, Box::new(move |_| s.set(s.get() + 1)));
    let f = Rc::clone(&frames);
    let _b = env.listen(EventKind::Frame, Box::new(move |_| f.set(f.get() + 1)));

    env.dispatch(EnvEvent::Scroll {
        at: 0.5,
        scroll_y: 40.0,
    });
    env.dispatch(EnvEvent::Frame { at: 0.6 });
    env.dispatch(EnvEvent::PointerMove {
        at: 0.7,
        x: 3.0,
        y: 4.0,
    });

    assert_eq!(scrolls.get(), 1);
    assert_eq!(frames.get(), 1);
    assert_eq!(env.scroll_metrics().scroll_y, 40.0);
    assert_eq!(env.pointer_position(), Some(Point::new(3.0, 4.0)));
    assert_eq!(env.now(), 0.7);
}

#[test]
fn dropped_listener_handles_leave_no_listeners() {
    let env = SyntheticEnvironment::default();
    let a = env.listen(EventKind::Scroll, Box::new(|_| {}));
    let b = env.listen(EventKind::Frame, Box::new(|_| {}));
    assert_eq!(env.listener_count(), 2);
    assert_eq!(env.listener_count_of(EventKind::Frame), 1);
    drop(a);
    b.unsubscribe();
    assert_eq!(env.listener_count(), 0);
}

#[test]
fn listener_may_remove_itself_during_dispatch() {
    let env = SyntheticEnvironment::default();
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let hits = Rc::new(Cell::new(0));
    let (s, h) = (Rc::clone(&slot), Rc::clone(&hits));
    let sub = env.listen(
        EventKind::Frame,
        Box::new(move |_| {
            h.set(h.get() + 1);
            s.borrow_mut().take();
        }),
    );
    *slot.borrow_mut() = Some(sub);

    env.dispatch(EnvEvent::Frame { at: 0.0 });
    env.dispatch(EnvEvent::Frame { at: 0.1 });
    assert_eq!(hits.get(), 1);
    assert_eq!(env.listener_count(), 0);
}

#[test]
fn events_parse_from_tagged_json() {
    let ev: EnvEvent = serde_json::from_str(r#"{"type":"scroll","at":1.0,"scroll_y":12.5}"#).unwrap();
    assert_eq!(
        ev,
        EnvEvent::Scroll {
            at: 1.0,
            scroll_y: 12.5
        }
    );
    assert_eq!(ev.kind(), EventKind::Scroll);
}
