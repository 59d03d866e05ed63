use super::*;

#[test]
fn parses_tagged_events() {
    let json = r#"{"events":[
        {"type":"scroll","at":0.5,"scroll_y":120},
        {"type":"frame","at":0.6}
    ]}"#;
    let trace = EventTrace::from_reader(json.as_bytes()).unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(
        trace.events[0],
        EnvEvent::Scroll {
            at: 0.5,
            scroll_y: 120.0
        }
    );
    assert_eq!(trace.frame_count(), 1);
    trace.validate().unwrap();
}

#[test]
fn push_frames_follows_cadence() {
    let mut trace = EventTrace::new();
    trace.push(EnvEvent::Scroll {
        at: 1.0,
        scroll_y: 10.0,
    });
    let last = trace.push_frames(1.0, Fps::new(30, 1).unwrap(), 3);
    assert_eq!(trace.frame_count(), 3);
    assert!((last - 1.1).abs() < 1e-12);
    assert!(trace.validate().is_ok());
}

#[test]
fn time_going_backwards_is_rejected() {
    let mut trace = EventTrace::new();
    trace
        .push(EnvEvent::Frame { at: 1.0 })
        .push(EnvEvent::Frame { at: 0.5 });
    let err = trace.validate().unwrap_err();
    assert!(matches!(err, MotionError::Validation(_)));

    let mut trace = EventTrace::new();
    trace.push(EnvEvent::Frame { at: f64::NAN });
    assert!(trace.validate().is_err());
}
