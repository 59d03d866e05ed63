use crate::animation::range::{MappedSignal, RangeMap};
use crate::animation::spring::{SmoothedSignal, SpringConfig};
use crate::binder::presentation::{SharedTarget, VisualProperty, present};
use crate::schedule::frame::FrameScheduler;
use crate::signal::value::{Sample, SignalReader, Subscription};

/// What a [`ProgressBinder`] writes and how it shapes the progress.
#[derive(Clone, Debug)]
pub struct ProgressBinding {
    /// Element id handed to the presentation target.
    pub element: String,
    /// Property written.
    pub property: VisualProperty,
    /// Progress to property value.
    pub map: RangeMap<f64>,
    /// Optional spring applied to the progress before mapping.
    pub spring: Option<SpringConfig>,
}

/// Drives one visual property from a progress signal.
///
/// Overlay fades (`[0, 0.5, 1] -> [0, 1, 0]` opacity) and scroll lines (spring-smoothed page
/// progress as `ScaleY`) are both instances of this binder.
pub struct ProgressBinder {
    smoothed: Option<SmoothedSignal>,
    mapped: MappedSignal<f64>,
    writer: Option<Subscription>,
}

impl ProgressBinder {
    /// Bind `progress` to `target`. The current value is written immediately.
    pub fn new(
        progress: &SignalReader<f64>,
        binding: ProgressBinding,
        scheduler: &FrameScheduler,
        target: SharedTarget,
    ) -> Self {
        let ProgressBinding {
            element,
            property,
            map,
            spring,
        } = binding;

        let smoothed = spring.map(|cfg| SmoothedSignal::new(progress, cfg, scheduler));
        let mapped = match &smoothed {
            Some(s) => MappedSignal::new(&s.reader(), map),
            None => MappedSignal::new(progress, map),
        };

        present(&target, &element, property, mapped.get());
        let writer = mapped.reader().subscribe(move |s: &Sample<f64>| {
            present(&target, &element, property, s.value);
        });

        Self {
            smoothed,
            mapped,
            writer: Some(writer),
        }
    }

    /// Mapped property value.
    pub fn value(&self) -> f64 {
        self.mapped.get()
    }

    /// Whether the optional spring is still moving.
    pub fn is_animating(&self) -> bool {
        self.smoothed.as_ref().is_some_and(SmoothedSignal::is_animating)
    }

    /// Detach from the progress signal and stop writing.
    pub fn teardown(&mut self) {
        self.writer = None;
        self.mapped.teardown();
        if let Some(s) = self.smoothed.as_mut() {
            s.teardown();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binder/progress.rs"]
mod tests;
