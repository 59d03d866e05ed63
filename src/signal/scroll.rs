use crate::foundation::core::{ElementBounds, ScrollMetrics};
use crate::signal::env::{EnvEvent, EventKind, SharedEnvironment};
use crate::signal::value::{ScalarSignal, SignalReader, Subscription};
use std::cell::Cell;
use std::rc::Rc;

/// Which scroll range a [`ScrollSource`] reports progress over.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollRange {
    /// The whole document, top (0) to bottom (1).
    #[default]
    Page,
    /// A tracked element crossing the viewport from its bottom edge to its top edge.
    Element(ElementBounds),
}

impl ScrollRange {
    /// Progress in `[0, 1]` for `metrics`.
    pub fn progress(self, metrics: ScrollMetrics) -> f64 {
        match self {
            Self::Page => metrics.page_progress(),
            Self::Element(bounds) => bounds.traversal_progress(metrics),
        }
    }
}

/// Scroll offset and scroll progress signals.
///
/// Updates synchronously on every scroll and resize event.
pub struct ScrollSource {
    range: ScrollRange,
    offset: ScalarSignal<f64>,
    progress: ScalarSignal<f64>,
    listeners: Vec<Subscription>,
}

impl ScrollSource {
    /// Track the whole document.
    pub fn page(env: &SharedEnvironment) -> Self {
        Self::new(env, ScrollRange::Page)
    }

    /// Track `bounds` crossing the viewport.
    pub fn tracked(env: &SharedEnvironment, bounds: ElementBounds) -> Self {
        Self::new(env, ScrollRange::Element(bounds))
    }

    /// Track an explicit range.
    pub fn new(env: &SharedEnvironment, range: ScrollRange) -> Self {
        let metrics = env.scroll_metrics();
        let now = env.now();
        let offset = ScalarSignal::new(metrics.scroll_y, now);
        let progress = ScalarSignal::new(range.progress(metrics), now);

        // Both listeners fold their event into one local copy of the metrics.
        let latest = Rc::new(Cell::new(metrics));
        let mut listeners = Vec::with_capacity(2);
        for kind in [EventKind::Scroll, EventKind::Resize] {
            let offset_w = offset.share();
            let progress_w = progress.share();
            let latest = Rc::clone(&latest);
            listeners.push(env.listen(
                kind,
                Box::new(move |ev: &EnvEvent| {
                    let mut m = latest.get();
                    match *ev {
                        EnvEvent::Scroll { scroll_y, .. } => m.scroll_y = scroll_y,
                        EnvEvent::Resize {
                            viewport_height,
                            content_height,
                            ..
                        } => {
                            m.viewport_height = viewport_height;
                            m.content_height = content_height;
                        }
                        EnvEvent::PointerMove { .. } | EnvEvent::Frame { .. } => return,
                    }
                    latest.set(m);
                    let at = ev.at();
                    offset_w.set(m.scroll_y, at);
                    progress_w.set(range.progress(m), at);
                }),
            ));
        }

        Self {
            range,
            offset,
            progress,
            listeners,
        }
    }

    /// Absolute vertical scroll offset in pixels.
    pub fn offset(&self) -> SignalReader<f64> {
        self.offset.reader()
    }

    /// Progress in `[0, 1]` over the configured range.
    pub fn progress(&self) -> SignalReader<f64> {
        self.progress.reader()
    }

    /// Configured range.
    pub fn range(&self) -> ScrollRange {
        self.range
    }

    /// Whether environment listeners are still registered.
    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Remove environment listeners. Signals keep their last values.
    pub fn teardown(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/signal/scroll.rs"]
mod tests;
