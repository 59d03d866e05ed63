//! Observable scalar values.
//!
//! A [`ScalarSignal`] is owned by exactly one producer. Consumers receive a [`SignalReader`] that
//! can read snapshots and register observers; registration returns a [`Subscription`] that
//! deregisters on drop.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A value together with the environment timestamp (seconds) it was observed at.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample<T> {
    /// Observed value.
    pub value: T,
    /// Timestamp in seconds.
    pub at: f64,
}

type Callback<T> = Rc<RefCell<dyn FnMut(&Sample<T>)>>;

struct Inner<T> {
    current: Sample<T>,
    next_id: u64,
    observers: Vec<(u64, Callback<T>)>,
}

/// Continuously updating value with push notification.
pub struct ScalarSignal<T = f64> {
    inner: Rc<RefCell<Inner<T>>>,
}

/// Read-only view of a [`ScalarSignal`].
pub struct SignalReader<T = f64> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for SignalReader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ScalarSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ScalarSignal")
            .field("current", &inner.current)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for SignalReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SignalReader")
            .field(&self.inner.borrow().current)
            .finish()
    }
}

impl<T> ScalarSignal<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Create a signal holding `value` observed at `at`.
    pub fn new(value: T, at: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                current: Sample { value, at },
                next_id: 0,
                observers: Vec::new(),
            })),
        }
    }

    /// Hand out a read-only view.
    pub fn reader(&self) -> SignalReader<T> {
        SignalReader {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Second write handle for the owning component's own listeners.
    pub(crate) fn share(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.inner.borrow().current.value.clone()
    }

    /// Current value and its timestamp.
    pub fn sample(&self) -> Sample<T> {
        self.inner.borrow().current.clone()
    }

    /// Store a new value. Observers are notified only when the value changed.
    ///
    /// Returns `true` when a notification was delivered.
    pub fn set(&self, value: T, at: f64) -> bool {
        let sample = {
            let mut inner = self.inner.borrow_mut();
            inner.current.at = at;
            if inner.current.value == value {
                return false;
            }
            inner.current.value = value;
            inner.current.clone()
        };
        notify(&self.inner, &sample);
        true
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }
}

impl<T> SignalReader<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Current value.
    pub fn get(&self) -> T {
        self.inner.borrow().current.value.clone()
    }

    /// Current value and its timestamp.
    pub fn sample(&self) -> Sample<T> {
        self.inner.borrow().current.clone()
    }

    /// Register `callback` for every subsequent change.
    pub fn subscribe(&self, callback: impl FnMut(&Sample<T>) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            let cb: Callback<T> = Rc::new(RefCell::new(callback));
            inner.observers.push((id, cb));
            id
        };
        let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                // The callback is dropped after the borrow ends; it may own other handles.
                let removed = {
                    let mut inner = inner.borrow_mut();
                    let pos = inner.observers.iter().position(|(i, _)| *i == id);
                    pos.map(|p| inner.observers.remove(p))
                };
                drop(removed);
            }
        })
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }
}

fn notify<T>(inner: &Rc<RefCell<Inner<T>>>, sample: &Sample<T>) {
    let snapshot: Vec<(u64, Callback<T>)> = inner
        .borrow()
        .observers
        .iter()
        .map(|(id, cb)| (*id, Rc::clone(cb)))
        .collect();
    for (id, cb) in snapshot {
        // Observers removed by an earlier callback in this round are skipped.
        let alive = inner.borrow().observers.iter().any(|(i, _)| *i == id);
        if !alive {
            continue;
        }
        // A callback that re-enters its own signal is not called recursively.
        if let Ok(mut f) = cb.try_borrow_mut() {
            (&mut *f)(sample);
        }
    }
}

/// Registration handle returned by `subscribe`/`listen`.
///
/// Dropping the handle deregisters the callback.
#[must_use = "dropping a Subscription deregisters its callback"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Deregister now.
    pub fn unsubscribe(mut self) {
        self.run_detach();
    }

    /// Whether the callback is still registered through this handle.
    pub fn is_active(&self) -> bool {
        self.detach.is_some()
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/signal/value.rs"]
mod tests;
