//! Environment capability: the host's event stream (scroll, resize, pointer, animation frames).
//!
//! Sources never read ambient globals; they receive an [`EnvironmentEventSource`] and register
//! listeners on it. [`SyntheticEnvironment`] is the in-process implementation used for tests and
//! trace replay.

use crate::foundation::core::{Point, ScrollMetrics};
use crate::signal::value::Subscription;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// One environment event. All timestamps are seconds on the host clock.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvEvent {
    /// Document scrolled to `scroll_y`.
    Scroll {
        /// Timestamp.
        at: f64,
        /// New vertical scroll offset.
        scroll_y: f64,
    },
    /// Viewport or content size changed.
    Resize {
        /// Timestamp.
        at: f64,
        /// New viewport height.
        viewport_height: f64,
        /// New content height.
        content_height: f64,
    },
    /// Pointer moved to viewport coordinates `(x, y)`.
    PointerMove {
        /// Timestamp.
        at: f64,
        /// Viewport x.
        x: f64,
        /// Viewport y.
        y: f64,
    },
    /// Animation-frame tick.
    Frame {
        /// Timestamp.
        at: f64,
    },
}

impl EnvEvent {
    /// Listener category this event is delivered to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Scroll { .. } => EventKind::Scroll,
            Self::Resize { .. } => EventKind::Resize,
            Self::PointerMove { .. } => EventKind::PointerMove,
            Self::Frame { .. } => EventKind::Frame,
        }
    }

    /// Event timestamp.
    pub fn at(&self) -> f64 {
        match *self {
            Self::Scroll { at, .. }
            | Self::Resize { at, .. }
            | Self::PointerMove { at, .. }
            | Self::Frame { at } => at,
        }
    }
}

/// Listener categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Scroll events.
    Scroll,
    /// Resize events.
    Resize,
    /// Pointer-move events.
    PointerMove,
    /// Animation-frame ticks.
    Frame,
}

/// Environment listener callback.
pub type Listener = Box<dyn FnMut(&EnvEvent)>;

/// Injectable event-source capability.
pub trait EnvironmentEventSource {
    /// Register `listener` for events of `kind`. Dropping the returned handle deregisters it.
    fn listen(&self, kind: EventKind, listener: Listener) -> Subscription;

    /// Current scroll metrics, read once at mount.
    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Last known pointer position, if the pointer has moved at all.
    fn pointer_position(&self) -> Option<Point>;

    /// Current host time in seconds.
    fn now(&self) -> f64;
}

/// Shared handle to an environment.
pub type SharedEnvironment = Rc<dyn EnvironmentEventSource>;

type SharedListener = Rc<RefCell<dyn FnMut(&EnvEvent)>>;

#[derive(Default)]
struct EnvState {
    metrics: ScrollMetrics,
    pointer: Option<Point>,
    now: f64,
    next_id: u64,
    listeners: Vec<(u64, EventKind, SharedListener)>,
}

/// Deterministic environment driven by explicit [`dispatch`](Self::dispatch) calls.
#[derive(Clone, Default)]
pub struct SyntheticEnvironment {
    state: Rc<RefCell<EnvState>>,
}

impl SyntheticEnvironment {
    /// New environment with the given initial scroll metrics at time `0`.
    pub fn new(metrics: ScrollMetrics) -> Self {
        Self {
            state: Rc::new(RefCell::new(EnvState {
                metrics,
                ..EnvState::default()
            })),
        }
    }

    /// Shared trait-object handle for sources and schedulers.
    pub fn shared(&self) -> SharedEnvironment {
        Rc::new(self.clone())
    }

    /// Apply the event to the environment state, then deliver it to listeners of its kind in
    /// registration order.
    pub fn dispatch(&self, event: EnvEvent) {
        let snapshot: Vec<(u64, SharedListener)> = {
            let mut st = self.state.borrow_mut();
            st.now = st.now.max(event.at());
            match event {
                EnvEvent::Scroll { scroll_y, .. } => st.metrics.scroll_y = scroll_y,
                EnvEvent::Resize {
                    viewport_height,
                    content_height,
                    ..
                } => {
                    st.metrics.viewport_height = viewport_height;
                    st.metrics.content_height = content_height;
                }
                EnvEvent::PointerMove { x, y, .. } => st.pointer = Some(Point::new(x, y)),
                EnvEvent::Frame { .. } => {}
            }
            let kind = event.kind();
            st.listeners
                .iter()
                .filter(|(_, k, _)| *k == kind)
                .map(|(id, _, l)| (*id, Rc::clone(l)))
                .collect()
        };

        for (id, listener) in snapshot {
            let alive = self.state.borrow().listeners.iter().any(|(i, ..)| *i == id);
            if !alive {
                continue;
            }
            if let Ok(mut f) = listener.try_borrow_mut() {
                (&mut *f)(&event);
            }
        }
    }

    /// Number of live listeners across all kinds.
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Number of live listeners of `kind`.
    pub fn listener_count_of(&self, kind: EventKind) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .count()
    }
}

impl EnvironmentEventSource for SyntheticEnvironment {
    fn listen(&self, kind: EventKind, listener: Listener) -> Subscription {
        let id = {
            let mut st = self.state.borrow_mut();
            let id = st.next_id;
            st.next_id += 1;
            let shared: SharedListener = Rc::new(RefCell::new(listener));
            st.listeners.push((id, kind, shared));
            tracing::debug!(?kind, total = st.listeners.len(), "listener registered");
            id
        };
        let weak: Weak<RefCell<EnvState>> = Rc::downgrade(&self.state);
        Subscription::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let removed = {
                let mut st = state.borrow_mut();
                let pos = st.listeners.iter().position(|(i, ..)| *i == id);
                let removed = pos.map(|p| st.listeners.remove(p));
                tracing::debug!(?kind, total = st.listeners.len(), "listener removed");
                removed
            };
            drop(removed);
        })
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.state.borrow().metrics
    }

    fn pointer_position(&self) -> Option<Point> {
        self.state.borrow().pointer
    }

    fn now(&self) -> f64 {
        self.state.borrow().now
    }
}

#[cfg(test)]
#[path = "../../tests/unit/signal/env.rs"]
mod tests;
