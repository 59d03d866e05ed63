//! Hover-driven distortion uniforms.
//!
//! The intensity is a one-step exponential smoother. Its target is always `1` while the element
//! is mounted and visible, whatever the pointer proximity.

use crate::binder::presentation::{ShaderUniforms, SharedUniforms};
use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{MotionError, MotionResult};
use crate::schedule::frame::{FrameInfo, FrameScheduler, FrameTask, TaskStatus};
use crate::signal::pointer::pointer_uv;
use crate::signal::value::SignalReader;
use std::cell::Cell;
use std::rc::Rc;

/// Intensity target while mounted and visible.
pub const ALWAYS_ON_TARGET: f64 = 1.0;

/// Scalar in `[0, 1]` stepping toward a target by a fixed fraction per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverIntensity {
    value: f64,
    factor: f64,
}

impl HoverIntensity {
    /// Start at `0`. `factor` must lie strictly inside `(0, 1)`.
    pub fn new(factor: f64) -> MotionResult<Self> {
        if !(factor > 0.0 && factor < 1.0) {
            return Err(MotionError::config(format!(
                "hover factor must be in (0, 1), got {factor}"
            )));
        }
        Ok(Self { value: 0.0, factor })
    }

    /// `value += (target - value) * factor`, clamped to `[0, 1]`.
    pub fn step(&mut self, target: f64) -> f64 {
        let target = if target.is_finite() {
            target.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.value = (self.value + (target - self.value) * self.factor).clamp(0.0, 1.0);
        self.value
    }

    /// Current intensity.
    pub fn get(&self) -> f64 {
        self.value
    }

    /// Smoothing factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

/// Hover binder settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Per-frame smoothing factor in `(0, 1)`.
    pub factor: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self { factor: 0.1 }
    }
}

#[derive(Default)]
struct HoverState {
    intensity: Cell<f64>,
    elapsed: Cell<f64>,
}

/// Pushes distortion uniforms for one element on every frame while visible.
pub struct HoverBinder {
    state: Rc<HoverState>,
    task: FrameTask,
}

impl HoverBinder {
    /// Bind `element` covering `rect` (viewport coordinates). Starts visible.
    pub fn new(
        pointer: &SignalReader<Option<Point>>,
        rect: Rect,
        element: impl Into<String>,
        config: HoverConfig,
        scheduler: &FrameScheduler,
        sink: SharedUniforms,
    ) -> MotionResult<Self> {
        let mut intensity = HoverIntensity::new(config.factor)?;
        let element = element.into();
        let state = Rc::new(HoverState::default());

        let pointer = pointer.clone();
        let shared = Rc::clone(&state);
        let task = scheduler.schedule("hover", move |frame: FrameInfo| {
            let hover_intensity = intensity.step(ALWAYS_ON_TARGET);
            let elapsed_time = shared.elapsed.get() + frame.dt;
            shared.intensity.set(hover_intensity);
            shared.elapsed.set(elapsed_time);

            let uv = pointer.get().map_or((0.5, 0.5), |p| pointer_uv(p, rect));
            sink.borrow_mut().push_uniforms(
                &element,
                ShaderUniforms {
                    hover_intensity,
                    pointer_uv: uv,
                    elapsed_time,
                },
            );
            TaskStatus::Continue
        });
        task.start();

        Ok(Self { state, task })
    }

    /// Intensity after the last frame.
    pub fn intensity(&self) -> f64 {
        self.state.intensity.get()
    }

    /// Accumulated visible time in seconds.
    pub fn elapsed_time(&self) -> f64 {
        self.state.elapsed.get()
    }

    /// Start or stop the per-frame task. Intensity and elapsed time are kept while hidden.
    pub fn set_visible(&self, visible: bool) {
        if visible {
            self.task.start();
        } else {
            self.task.stop();
        }
    }

    /// Whether the per-frame task is running.
    pub fn is_visible(&self) -> bool {
        self.task.is_running()
    }

    /// Cancel the per-frame task.
    pub fn teardown(&mut self) {
        self.task.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binder/hover.rs"]
mod tests;
