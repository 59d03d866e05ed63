use crate::foundation::math::safe_ratio;
use crate::schedule::frame::{FrameInfo, FrameScheduler, FrameTask, TaskStatus};
use crate::signal::value::{Sample, ScalarSignal, SignalReader, Subscription};
use std::cell::RefCell;
use std::rc::Rc;

/// Samples older than this (two 60 Hz frames) no longer describe current motion.
pub const DEFAULT_MAX_SAMPLE_AGE: f64 = 2.0 / 60.0;

/// Elapsed times below this are treated as the same instant.
const MIN_ELAPSED: f64 = 1e-6;

/// Finite-difference velocity over the previous sample only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityConditioner {
    previous: Option<(f64, f64)>, // (value, at)
    velocity: f64,
    max_sample_age: f64,
}

impl Default for VelocityConditioner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SAMPLE_AGE)
    }
}

impl VelocityConditioner {
    /// Conditioner treating samples older than `max_sample_age` seconds as stale.
    pub fn new(max_sample_age: f64) -> Self {
        let max_sample_age = if max_sample_age.is_finite() && max_sample_age > 0.0 {
            max_sample_age
        } else {
            DEFAULT_MAX_SAMPLE_AGE
        };
        Self {
            previous: None,
            velocity: 0.0,
            max_sample_age,
        }
    }

    /// Feed `value` observed at `at`; returns units per second.
    ///
    /// The first sample yields `0`. Samples at the same instant (or earlier) keep the last
    /// velocity but replace the stored value. Non-finite input is ignored.
    pub fn sample(&mut self, value: f64, at: f64) -> f64 {
        if !value.is_finite() || !at.is_finite() {
            return self.velocity;
        }
        match self.previous {
            None => self.velocity = 0.0,
            Some((prev, prev_at)) => {
                let elapsed = at - prev_at;
                if elapsed >= MIN_ELAPSED {
                    self.velocity = safe_ratio(value - prev, elapsed);
                }
            }
        }
        self.previous = Some((value, at));
        self.velocity
    }

    /// Zero the velocity when no sample arrived within the sample age at `now`.
    pub fn settle(&mut self, now: f64) -> f64 {
        if let Some((_, prev_at)) = self.previous {
            if now - prev_at > self.max_sample_age {
                self.velocity = 0.0;
            }
        }
        self.velocity
    }

    /// Last computed velocity.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Forget history; velocity becomes `0`.
    pub fn reset(&mut self) {
        self.previous = None;
        self.velocity = 0.0;
    }
}

/// Velocity of a source signal, published as a signal.
///
/// A frame task zeroes the velocity once the source stops changing and then goes idle.
pub struct VelocitySignal {
    output: ScalarSignal<f64>,
    conditioner: Rc<RefCell<VelocityConditioner>>,
    task: FrameTask,
    input: Option<Subscription>,
}

impl VelocitySignal {
    /// Track the velocity of `source`.
    pub fn new(source: &SignalReader<f64>, scheduler: &FrameScheduler) -> Self {
        Self::with_conditioner(source, VelocityConditioner::default(), scheduler)
    }

    /// Track the velocity of `source` with a custom conditioner.
    pub fn with_conditioner(
        source: &SignalReader<f64>,
        mut conditioner: VelocityConditioner,
        scheduler: &FrameScheduler,
    ) -> Self {
        let initial = source.sample();
        conditioner.reset();
        conditioner.sample(initial.value, initial.at);
        let output = ScalarSignal::new(0.0, initial.at);
        let conditioner = Rc::new(RefCell::new(conditioner));

        let out_w = output.share();
        let cond = Rc::clone(&conditioner);
        let task = scheduler.schedule("velocity", move |frame: FrameInfo| {
            let v = cond.borrow_mut().settle(frame.at);
            out_w.set(v, frame.at);
            if v == 0.0 {
                TaskStatus::Idle
            } else {
                TaskStatus::Continue
            }
        });

        let out_w = output.share();
        let cond = Rc::clone(&conditioner);
        let waker = task.waker();
        let input = source.subscribe(move |s: &Sample<f64>| {
            let v = cond.borrow_mut().sample(s.value, s.at);
            out_w.set(v, s.at);
            waker.wake();
        });

        Self {
            output,
            conditioner,
            task,
            input: Some(input),
        }
    }

    /// Velocity output (units per second).
    pub fn reader(&self) -> SignalReader<f64> {
        self.output.reader()
    }

    /// Current velocity.
    pub fn get(&self) -> f64 {
        self.output.get()
    }

    /// Whether the staleness task is running.
    pub fn is_tracking(&self) -> bool {
        self.task.is_running()
    }

    /// Detach from the source and publish a final `0`.
    pub fn teardown(&mut self) {
        if self.input.take().is_none() {
            return;
        }
        self.task.stop();
        self.conditioner.borrow_mut().reset();
        let at = self.output.sample().at;
        self.output.set(0.0, at);
    }
}

impl Drop for VelocitySignal {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/velocity.rs"]
mod tests;
