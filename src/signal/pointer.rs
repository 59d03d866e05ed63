use crate::foundation::core::{Point, Rect};
use crate::foundation::math::safe_ratio;
use crate::signal::env::{EnvEvent, EventKind, SharedEnvironment};
use crate::signal::value::{ScalarSignal, SignalReader, Subscription};

/// Pointer position in viewport coordinates, as two scalar signals.
pub struct PointerSource {
    x: ScalarSignal<f64>,
    y: ScalarSignal<f64>,
    point: ScalarSignal<Option<Point>>,
    listener: Option<Subscription>,
}

impl PointerSource {
    /// Start tracking pointer moves. Before the first move the position is the environment's
    /// last known pointer, or the origin.
    pub fn new(env: &SharedEnvironment) -> Self {
        let known = env.pointer_position();
        let start = known.unwrap_or(Point::ORIGIN);
        let now = env.now();
        let x = ScalarSignal::new(start.x, now);
        let y = ScalarSignal::new(start.y, now);
        let point = ScalarSignal::new(known, now);

        let (xw, yw, pw) = (x.share(), y.share(), point.share());
        let listener = env.listen(
            EventKind::PointerMove,
            Box::new(move |ev: &EnvEvent| {
                if let EnvEvent::PointerMove { at, x, y } = *ev {
                    if x.is_finite() && y.is_finite() {
                        xw.set(x, at);
                        yw.set(y, at);
                        pw.set(Some(Point::new(x, y)), at);
                    }
                }
            }),
        );

        Self {
            x,
            y,
            point,
            listener: Some(listener),
        }
    }

    /// Horizontal position.
    pub fn x(&self) -> SignalReader<f64> {
        self.x.reader()
    }

    /// Vertical position.
    pub fn y(&self) -> SignalReader<f64> {
        self.y.reader()
    }

    /// Combined position; `None` until the pointer has been seen.
    pub fn point(&self) -> SignalReader<Option<Point>> {
        self.point.reader()
    }

    /// Current position snapshot.
    pub fn position(&self) -> Point {
        Point::new(self.x.get(), self.y.get())
    }

    /// Whether the environment listener is still registered.
    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// Remove the environment listener.
    pub fn teardown(&mut self) {
        self.listener = None;
    }
}

/// Pointer position normalised into `rect` as shader UV coordinates.
///
/// `u` grows left to right, `v` grows bottom to top; both are clamped to `[0, 1]`. A degenerate
/// rect yields the centre `(0.5, 0.5)`.
pub fn pointer_uv(point: Point, rect: Rect) -> (f64, f64) {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return (0.5, 0.5);
    }
    let u = safe_ratio(point.x - rect.x0, rect.width()).clamp(0.0, 1.0);
    let v = 1.0 - safe_ratio(point.y - rect.y0, rect.height()).clamp(0.0, 1.0);
    (u, v)
}

/// Pointer offset from the centre of `rect`, in pixels.
pub fn offset_from_center(point: Point, rect: Rect) -> kurbo::Vec2 {
    point - rect.center()
}

#[cfg(test)]
#[path = "../../tests/unit/signal/pointer.rs"]
mod tests;
