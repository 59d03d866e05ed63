//! Scroll-velocity driven marquee text.
//!
//! The strip drifts at `base_velocity` (percent of its width per second). Scroll velocity,
//! spring-smoothed and mapped into a small factor, speeds the drift up and flips its direction
//! to follow the scroll direction.

use crate::animation::range::{MappedSignal, RangeMap};
use crate::animation::spring::{SmoothedSignal, SpringConfig};
use crate::binder::presentation::{SharedTarget, VisualProperty, present};
use crate::foundation::error::{MotionError, MotionResult};
use crate::foundation::math::wrap;
use crate::schedule::frame::{FrameInfo, FrameScheduler, FrameTask, TaskStatus};
use crate::signal::value::{ScalarSignal, SignalReader};
use std::cell::Cell;

/// Marquee drift settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    /// Idle drift in percent per second. The sign picks the initial direction.
    pub base_velocity: f64,
    /// Spring applied to the scroll velocity.
    pub spring: SpringConfig,
    /// Scroll velocity mapped onto `±max_factor`.
    pub max_velocity: f64,
    /// Largest extra speed factor.
    pub max_factor: f64,
    /// Wrap interval start (percent).
    pub wrap_from: f64,
    /// Wrap interval end (percent).
    pub wrap_to: f64,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            base_velocity: 5.0,
            spring: SpringConfig {
                stiffness: 400.0,
                damping: 50.0,
                ..SpringConfig::default()
            },
            max_velocity: 1000.0,
            max_factor: 5.0,
            wrap_from: -20.0,
            wrap_to: -45.0,
        }
    }
}

impl MarqueeConfig {
    /// Reject non-finite or empty ranges.
    pub fn validate(&self) -> MotionResult<()> {
        self.spring.validate()?;
        if !self.base_velocity.is_finite() {
            return Err(MotionError::config("marquee base_velocity must be finite"));
        }
        if !self.max_velocity.is_finite() || self.max_velocity <= 0.0 {
            return Err(MotionError::config("marquee max_velocity must be positive"));
        }
        if !self.max_factor.is_finite() || self.max_factor < 0.0 {
            return Err(MotionError::config("marquee max_factor must be >= 0"));
        }
        if !(self.wrap_from.is_finite() && self.wrap_to.is_finite())
            || self.wrap_from == self.wrap_to
        {
            return Err(MotionError::config("marquee wrap interval must be non-empty"));
        }
        Ok(())
    }

    fn factor_map(&self) -> MotionResult<RangeMap<f64>> {
        RangeMap::new(
            vec![-self.max_velocity, 0.0, self.max_velocity],
            vec![-self.max_factor, 0.0, self.max_factor],
        )
    }
}

struct Drift {
    base_x: Cell<f64>,
    direction: Cell<f64>,
}

/// Writes the wrapped marquee offset as `TranslateX` on every frame while visible.
pub struct MarqueeBinder {
    smoothed: SmoothedSignal,
    factor: MappedSignal<f64>,
    offset: ScalarSignal<f64>,
    task: FrameTask,
}

impl MarqueeBinder {
    /// Drive `element` from the scroll `velocity`. Starts visible.
    pub fn new(
        velocity: &SignalReader<f64>,
        element: impl Into<String>,
        config: MarqueeConfig,
        scheduler: &FrameScheduler,
        target: SharedTarget,
    ) -> MotionResult<Self> {
        config.validate()?;
        let element = element.into();
        let smoothed = SmoothedSignal::new(velocity, config.spring, scheduler);
        let factor = MappedSignal::new(&smoothed.reader(), config.factor_map()?);

        let start = wrap(config.wrap_from, config.wrap_to, 0.0);
        let offset = ScalarSignal::new(start, scheduler.env().now());
        present(&target, &element, VisualProperty::TranslateX, start);

        let drift = Drift {
            base_x: Cell::new(0.0),
            direction: Cell::new(1.0),
        };
        let factor_r = factor.reader();
        let offset_w = offset.share();
        let task = scheduler.schedule("marquee", move |frame: FrameInfo| {
            let f = factor_r.get();
            let mut move_by = drift.direction.get() * config.base_velocity * frame.dt;
            if f < 0.0 {
                drift.direction.set(-1.0);
            } else if f > 0.0 {
                drift.direction.set(1.0);
            }
            move_by += drift.direction.get() * move_by * f;

            let base_x = drift.base_x.get() + move_by;
            drift.base_x.set(base_x);
            let x = wrap(config.wrap_from, config.wrap_to, base_x);
            if offset_w.set(x, frame.at) {
                present(&target, &element, VisualProperty::TranslateX, x);
            }
            TaskStatus::Continue
        });
        task.start();

        Ok(Self {
            smoothed,
            factor,
            offset,
            task,
        })
    }

    /// Wrapped offset in percent.
    pub fn offset(&self) -> SignalReader<f64> {
        self.offset.reader()
    }

    /// Current velocity factor.
    pub fn factor(&self) -> f64 {
        self.factor.get()
    }

    /// Start or stop the per-frame drift.
    pub fn set_visible(&self, visible: bool) {
        if visible {
            self.task.start();
        } else {
            self.task.stop();
        }
    }

    /// Whether the drift task is running.
    pub fn is_visible(&self) -> bool {
        self.task.is_running()
    }

    /// Stop drifting and detach from the velocity.
    pub fn teardown(&mut self) {
        self.task.stop();
        self.factor.teardown();
        self.smoothed.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binder/marquee.rs"]
mod tests;
