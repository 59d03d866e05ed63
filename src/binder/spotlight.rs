use crate::animation::spring::{SmoothedSignal, SpringConfig};
use crate::binder::presentation::{SharedTarget, VisualProperty, present};
use crate::foundation::core::{Point, Rect, Vec2};
use crate::schedule::frame::FrameScheduler;
use crate::signal::pointer::offset_from_center;
use crate::signal::value::{Sample, SignalReader, Subscription};

/// Spotlight follow settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpotlightConfig {
    /// Spring shared by both axes.
    pub spring: SpringConfig,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig {
                stiffness: 150.0,
                damping: 15.0,
                ..SpringConfig::default()
            },
        }
    }
}

/// Moves a highlight toward the pointer, relative to the centre of its element.
///
/// Each axis has its own spring; both go idle once settled.
pub struct SpotlightBinder {
    x: SmoothedSignal,
    y: SmoothedSignal,
    listeners: Vec<Subscription>,
}

impl SpotlightBinder {
    /// Follow `pointer` over `rect` (viewport coordinates). Invalid springs fall back to defaults.
    pub fn new(
        pointer: &SignalReader<Option<Point>>,
        rect: Rect,
        element: impl Into<String>,
        config: SpotlightConfig,
        scheduler: &FrameScheduler,
        target: SharedTarget,
    ) -> Self {
        let element: String = element.into();
        let at = scheduler.env().now();
        let x = SmoothedSignal::detached(0.0, at, config.spring, scheduler);
        let y = SmoothedSignal::detached(0.0, at, config.spring, scheduler);
        present(&target, &element, VisualProperty::TranslateX, 0.0);
        present(&target, &element, VisualProperty::TranslateY, 0.0);

        let retarget = {
            let (x_cell, y_cell) = (x.handle(), y.handle());
            move |point: Option<Point>| {
                if let Some(p) = point {
                    let off = offset_from_center(p, rect);
                    x_cell.set_target(off.x);
                    y_cell.set_target(off.y);
                }
            }
        };
        retarget(pointer.get());

        let mut listeners = Vec::with_capacity(3);
        listeners.push(pointer.subscribe(move |s: &Sample<Option<Point>>| retarget(s.value)));
        for (axis, property) in [
            (&x, VisualProperty::TranslateX),
            (&y, VisualProperty::TranslateY),
        ] {
            let target = target.clone();
            let element = element.clone();
            listeners.push(axis.reader().subscribe(move |s: &Sample<f64>| {
                present(&target, &element, property, s.value);
            }));
        }

        Self { x, y, listeners }
    }

    /// Current smoothed offset from the element centre.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x.get(), self.y.get())
    }

    /// Whether either axis is still moving.
    pub fn is_animating(&self) -> bool {
        self.x.is_animating() || self.y.is_animating()
    }

    /// Stop following the pointer.
    pub fn teardown(&mut self) {
        self.listeners.clear();
        self.x.teardown();
        self.y.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binder/spotlight.rs"]
mod tests;
