//! Damped-spring smoothing.
//!
//! The spring is advanced with the closed-form solution of the damped harmonic oscillator, so a
//! step is exact for any frame delta and long frames cannot make the integration blow up.

use crate::foundation::error::{MotionError, MotionResult};
use crate::schedule::frame::{FrameInfo, FrameScheduler, FrameTask, TaskStatus, TaskWaker};
use crate::signal::value::{Sample, ScalarSignal, SignalReader, Subscription};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

const DEFAULT_STIFFNESS: f64 = 100.0;
const DEFAULT_DAMPING: f64 = 10.0;
const DEFAULT_MASS: f64 = 1.0;
const DEFAULT_REST_DELTA: f64 = 0.01;
const DEFAULT_REST_SPEED: f64 = 0.01;

/// Spring constants and rest thresholds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Spring constant `k` (> 0).
    pub stiffness: f64,
    /// Damping coefficient `c` (> 0).
    pub damping: f64,
    /// Mass `m` (> 0).
    pub mass: f64,
    /// Distance to target under which the spring may come to rest.
    pub rest_delta: f64,
    /// Speed under which the spring may come to rest.
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            mass: DEFAULT_MASS,
            rest_delta: DEFAULT_REST_DELTA,
            rest_speed: DEFAULT_REST_SPEED,
        }
    }
}

impl SpringConfig {
    /// Validated config with default rest thresholds.
    pub fn new(stiffness: f64, damping: f64, mass: f64) -> MotionResult<Self> {
        let cfg = Self {
            stiffness,
            damping,
            mass,
            ..Self::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Replace the rest thresholds.
    pub fn with_rest(mut self, rest_delta: f64, rest_speed: f64) -> MotionResult<Self> {
        self.rest_delta = rest_delta;
        self.rest_speed = rest_speed;
        self.validate()?;
        Ok(self)
    }

    /// Reject non-positive or non-finite parameters.
    pub fn validate(&self) -> MotionResult<()> {
        let fields = [
            ("stiffness", self.stiffness),
            ("damping", self.damping),
            ("mass", self.mass),
            ("rest_delta", self.rest_delta),
            ("rest_speed", self.rest_speed),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v <= 0.0 {
                return Err(MotionError::config(format!(
                    "spring {name} must be a positive finite number, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Copy with every invalid field replaced by its default.
    pub fn sanitized(self) -> Self {
        fn pick(name: &str, v: f64, fallback: f64) -> f64 {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                tracing::warn!(field = name, value = v, fallback, "invalid spring parameter");
                fallback
            }
        }
        Self {
            stiffness: pick("stiffness", self.stiffness, DEFAULT_STIFFNESS),
            damping: pick("damping", self.damping, DEFAULT_DAMPING),
            mass: pick("mass", self.mass, DEFAULT_MASS),
            rest_delta: pick("rest_delta", self.rest_delta, DEFAULT_REST_DELTA),
            rest_speed: pick("rest_speed", self.rest_speed, DEFAULT_REST_SPEED),
        }
    }

    /// Damping ratio `ζ = c / (2·sqrt(k·m))`.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt()).max(1e-9)
    }
}

/// Position and velocity of a 1D spring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringState {
    /// Current position.
    pub position: f64,
    /// Current velocity (units per second).
    pub velocity: f64,
}

impl SpringState {
    /// At `initial` with zero velocity.
    pub fn new(initial: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
        }
    }

    /// Advance by `dt` seconds toward `target`.
    ///
    /// `cfg` is expected to be valid; non-finite or non-positive `dt` is a no-op.
    pub fn advance(&mut self, target: f64, cfg: &SpringConfig, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 || !target.is_finite() {
            return;
        }
        let w0 = (cfg.stiffness / cfg.mass).sqrt();
        let zeta = cfg.damping_ratio();
        let x0 = self.position - target;
        let v0 = self.velocity;

        let (x, v) = if (zeta - 1.0).abs() < 1e-6 {
            // Critically damped.
            let e = (-w0 * dt).exp();
            let b = v0 + w0 * x0;
            (e * (x0 + b * dt), e * (v0 - w0 * b * dt))
        } else if zeta < 1.0 {
            // Underdamped.
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            let e = (-zeta * w0 * dt).exp();
            let (s, c) = (wd * dt).sin_cos();
            let x = e * (x0 * c + ((v0 + zeta * w0 * x0) / wd) * s);
            let v = e * (v0 * c - ((zeta * w0 * v0 + w0 * w0 * x0) / wd) * s);
            (x, v)
        } else {
            // Overdamped.
            let z2 = (zeta * zeta - 1.0).sqrt();
            let r1 = -w0 * (zeta - z2);
            let r2 = -w0 * (zeta + z2);
            let c1 = (v0 - r2 * x0) / (r1 - r2);
            let c2 = x0 - c1;
            let (e1, e2) = ((r1 * dt).exp(), (r2 * dt).exp());
            (c1 * e1 + c2 * e2, r1 * c1 * e1 + r2 * c2 * e2)
        };

        if x.is_finite() && v.is_finite() {
            self.position = target + x;
            self.velocity = v;
        } else {
            self.position = target;
            self.velocity = 0.0;
        }
    }

    /// Snap onto `target` when inside both rest thresholds. Returns `true` when at rest.
    pub fn settle(&mut self, target: f64, cfg: &SpringConfig) -> bool {
        if (self.position - target).abs() < cfg.rest_delta && self.velocity.abs() < cfg.rest_speed
        {
            self.position = target;
            self.velocity = 0.0;
            return true;
        }
        false
    }
}

struct SpringCell {
    state: SpringState,
    target: f64,
    config: SpringConfig,
}

/// Spring-smoothed follower of a target value.
///
/// Animates on frame ticks while away from the target and stops its frame task once at rest.
pub struct SmoothedSignal {
    output: ScalarSignal<f64>,
    cell: Rc<RefCell<SpringCell>>,
    task: FrameTask,
    input: Option<Subscription>,
}

impl SmoothedSignal {
    /// Follow `source`. Invalid config fields fall back to defaults.
    pub fn new(source: &SignalReader<f64>, config: SpringConfig, scheduler: &FrameScheduler) -> Self {
        let initial = source.sample();
        let mut this = Self::detached(initial.value, initial.at, config, scheduler);

        let handle = this.handle();
        this.input = Some(source.subscribe(move |s: &Sample<f64>| handle.set_target(s.value)));
        this
    }

    /// Spring resting at `initial`, driven only through [`set_target`](Self::set_target).
    pub fn detached(
        initial: f64,
        at: f64,
        config: SpringConfig,
        scheduler: &FrameScheduler,
    ) -> Self {
        let initial = if initial.is_finite() { initial } else { 0.0 };
        let output = ScalarSignal::new(initial, at);
        let cell = Rc::new(RefCell::new(SpringCell {
            state: SpringState::new(initial),
            target: initial,
            config: config.sanitized(),
        }));

        let out_w = output.share();
        let body_cell = Rc::clone(&cell);
        let task = scheduler.schedule("spring", move |frame: FrameInfo| {
            let (position, at_rest) = {
                let mut c = body_cell.borrow_mut();
                let SpringCell {
                    state,
                    target,
                    config,
                } = &mut *c;
                state.advance(*target, config, frame.dt);
                let at_rest = state.settle(*target, config);
                (state.position, at_rest)
            };
            out_w.set(position, frame.at);
            if at_rest {
                tracing::trace!(position, "spring at rest");
                TaskStatus::Idle
            } else {
                TaskStatus::Continue
            }
        });

        Self {
            output,
            cell,
            task,
            input: None,
        }
    }

    /// Retarget; starts animating if the spring was resting.
    pub fn set_target(&self, target: f64) {
        if !target.is_finite() {
            return;
        }
        self.cell.borrow_mut().target = target;
        self.task.start();
    }

    /// Non-owning handle for retargeting from observer callbacks.
    pub fn handle(&self) -> SpringHandle {
        SpringHandle {
            cell: Rc::downgrade(&self.cell),
            waker: self.task.waker(),
        }
    }

    /// Teleport to `value` with zero velocity and stop animating.
    pub fn jump(&self, value: f64, at: f64) {
        if !value.is_finite() {
            return;
        }
        {
            let mut c = self.cell.borrow_mut();
            c.state = SpringState::new(value);
            c.target = value;
        }
        self.task.stop();
        self.output.set(value, at);
    }

    /// Smoothed output.
    pub fn reader(&self) -> SignalReader<f64> {
        self.output.reader()
    }

    /// Current smoothed value.
    pub fn get(&self) -> f64 {
        self.output.get()
    }

    /// Current target.
    pub fn target(&self) -> f64 {
        self.cell.borrow().target
    }

    /// Current spring velocity.
    pub fn velocity(&self) -> f64 {
        self.cell.borrow().state.velocity
    }

    /// Effective (sanitized) configuration.
    pub fn config(&self) -> SpringConfig {
        self.cell.borrow().config
    }

    /// Whether the frame task is running.
    pub fn is_animating(&self) -> bool {
        self.task.is_running()
    }

    /// Stop animating and detach from the source.
    pub fn teardown(&mut self) {
        self.task.stop();
        self.input = None;
    }
}

/// Weak retarget handle of a [`SmoothedSignal`].
#[derive(Clone)]
pub struct SpringHandle {
    cell: Weak<RefCell<SpringCell>>,
    waker: TaskWaker,
}

impl SpringHandle {
    /// Retarget the spring if it still exists. Non-finite targets are ignored.
    pub fn set_target(&self, target: f64) {
        if !target.is_finite() {
            return;
        }
        if let Some(cell) = self.cell.upgrade() {
            cell.borrow_mut().target = target;
            self.waker.wake();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
