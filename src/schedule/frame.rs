//! Per-frame periodic tasks with an explicit start/stop lifecycle.
//!
//! A [`FrameTask`] only listens for animation frames while it is running. Returning
//! [`TaskStatus::Idle`] from the task body stops it from inside the frame; a later
//! [`FrameTask::start`] (or [`TaskWaker::wake`]) resumes it.

use crate::foundation::core::Fps;
use crate::signal::env::{EnvEvent, EventKind, SharedEnvironment};
use crate::signal::value::Subscription;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Timing handed to a task body on each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
    /// Frame timestamp in seconds.
    pub at: f64,
    /// Seconds since the task's previous frame. The first frame after a start uses the
    /// scheduler's cadence.
    pub dt: f64,
}

/// What a task wants after running a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    /// Keep receiving frames.
    Continue,
    /// Stop listening until woken.
    Idle,
}

type TaskBody = Box<dyn FnMut(FrameInfo) -> TaskStatus>;

struct TaskShared {
    name: &'static str,
    env: SharedEnvironment,
    frame_dt: f64,
    body: RefCell<TaskBody>,
    listener: RefCell<Option<Subscription>>,
    last_at: Cell<Option<f64>>,
}

/// Creates frame tasks bound to one environment and cadence.
#[derive(Clone)]
pub struct FrameScheduler {
    env: SharedEnvironment,
    cadence: Fps,
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("cadence", &self.cadence)
            .finish_non_exhaustive()
    }
}

impl FrameScheduler {
    /// Scheduler over `env` assuming frames arrive at `cadence`.
    pub fn new(env: SharedEnvironment, cadence: Fps) -> Self {
        Self { env, cadence }
    }

    /// Expected frame cadence.
    pub fn cadence(&self) -> Fps {
        self.cadence
    }

    /// Environment frames are taken from.
    pub fn env(&self) -> &SharedEnvironment {
        &self.env
    }

    /// Create a stopped task running `body` once per frame.
    pub fn schedule(
        &self,
        name: &'static str,
        body: impl FnMut(FrameInfo) -> TaskStatus + 'static,
    ) -> FrameTask {
        FrameTask {
            shared: Rc::new(TaskShared {
                name,
                env: Rc::clone(&self.env),
                frame_dt: self.cadence.frame_duration_secs(),
                body: RefCell::new(Box::new(body)),
                listener: RefCell::new(None),
                last_at: Cell::new(None),
            }),
        }
    }
}

/// Owning handle of a scheduled task. Dropping it cancels the task.
pub struct FrameTask {
    shared: Rc<TaskShared>,
}

impl FrameTask {
    /// Begin receiving frames. No-op when already running.
    pub fn start(&self) {
        start(&self.shared);
    }

    /// Stop receiving frames. No-op when already stopped.
    pub fn stop(&self) {
        stop(&self.shared);
    }

    /// Whether a frame listener is registered.
    pub fn is_running(&self) -> bool {
        self.shared.listener.borrow().is_some()
    }

    /// Non-owning handle that can restart this task from observer callbacks.
    pub fn waker(&self) -> TaskWaker {
        TaskWaker {
            shared: Rc::downgrade(&self.shared),
        }
    }
}

impl Drop for FrameTask {
    fn drop(&mut self) {
        stop(&self.shared);
    }
}

impl fmt::Debug for FrameTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameTask")
            .field("name", &self.shared.name)
            .field("running", &self.is_running())
            .finish()
    }
}

/// Weak restart handle for a [`FrameTask`].
#[derive(Clone)]
pub struct TaskWaker {
    shared: Weak<TaskShared>,
}

impl TaskWaker {
    /// Start the task if it still exists and is not running.
    pub fn wake(&self) {
        if let Some(shared) = self.shared.upgrade() {
            start(&shared);
        }
    }
}

fn start(shared: &Rc<TaskShared>) {
    if shared.listener.borrow().is_some() {
        return;
    }
    shared.last_at.set(None);
    let weak = Rc::downgrade(shared);
    let sub = shared.env.listen(
        EventKind::Frame,
        Box::new(move |ev: &EnvEvent| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            run_frame(&shared, ev.at());
        }),
    );
    tracing::debug!(task = shared.name, "frame task started");
    *shared.listener.borrow_mut() = Some(sub);
}

fn stop(shared: &TaskShared) {
    let sub = shared.listener.borrow_mut().take();
    if sub.is_some() {
        tracing::debug!(task = shared.name, "frame task stopped");
    }
    drop(sub);
}

fn run_frame(shared: &TaskShared, at: f64) {
    let dt = match shared.last_at.get() {
        Some(prev) if at > prev => at - prev,
        Some(_) => 0.0,
        None => shared.frame_dt,
    };
    shared.last_at.set(Some(at));

    let status = match shared.body.try_borrow_mut() {
        Ok(mut body) => (&mut *body)(FrameInfo { at, dt }),
        Err(_) => TaskStatus::Continue,
    };
    if status == TaskStatus::Idle {
        stop(shared);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/frame.rs"]
mod tests;
