use crate::animation::spring::{SmoothedSignal, SpringConfig};
use crate::binder::presentation::{SharedTarget, VisualProperty, present};
use crate::foundation::error::{MotionError, MotionResult};
use crate::foundation::math::clamp_symmetric;
use crate::schedule::frame::FrameScheduler;
use crate::signal::value::{Sample, ScalarSignal, SignalReader, Subscription};

/// Velocity-to-skew settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SkewConfig {
    /// Spring applied to the raw velocity.
    pub spring: SpringConfig,
    /// Degrees of skew per unit of velocity.
    pub degrees_per_unit: f64,
    /// Hard limit on the skew magnitude, in degrees.
    pub max_degrees: f64,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig {
                stiffness: 400.0,
                damping: 90.0,
                ..SpringConfig::default()
            },
            degrees_per_unit: 5.0 / 1000.0,
            max_degrees: 5.0,
        }
    }
}

impl SkewConfig {
    /// Reject unusable scale or limit values.
    pub fn validate(&self) -> MotionResult<()> {
        self.spring.validate()?;
        if !self.degrees_per_unit.is_finite() {
            return Err(MotionError::config("skew degrees_per_unit must be finite"));
        }
        if !self.max_degrees.is_finite() || self.max_degrees <= 0.0 {
            return Err(MotionError::config(format!(
                "skew max_degrees must be positive, got {}",
                self.max_degrees
            )));
        }
        Ok(())
    }

    /// Skew for a smoothed velocity, hard-clamped to `±max_degrees`.
    pub fn skew_for(&self, velocity: f64) -> f64 {
        clamp_symmetric(velocity * self.degrees_per_unit, self.max_degrees)
    }
}

/// Skews a container by its (smoothed) scroll velocity.
pub struct SkewBinder {
    smoothed: SmoothedSignal,
    angle: ScalarSignal<f64>,
    writer: Option<Subscription>,
}

impl SkewBinder {
    /// Bind `velocity` to the `SkewY` of `element`.
    pub fn new(
        velocity: &SignalReader<f64>,
        element: impl Into<String>,
        config: SkewConfig,
        scheduler: &FrameScheduler,
        target: SharedTarget,
    ) -> MotionResult<Self> {
        config.validate()?;
        let element = element.into();
        let smoothed = SmoothedSignal::new(velocity, config.spring, scheduler);

        let initial = smoothed.reader().sample();
        let angle = ScalarSignal::new(config.skew_for(initial.value), initial.at);
        present(&target, &element, VisualProperty::SkewY, angle.get());

        let angle_w = angle.share();
        let writer = smoothed.reader().subscribe(move |s: &Sample<f64>| {
            let deg = config.skew_for(s.value);
            if angle_w.set(deg, s.at) {
                present(&target, &element, VisualProperty::SkewY, deg);
            }
        });

        Ok(Self {
            smoothed,
            angle,
            writer: Some(writer),
        })
    }

    /// Current skew angle in degrees.
    pub fn angle(&self) -> SignalReader<f64> {
        self.angle.reader()
    }

    /// Whether the velocity spring is moving.
    pub fn is_animating(&self) -> bool {
        self.smoothed.is_animating()
    }

    /// Stop following the velocity. The last angle stays applied.
    pub fn teardown(&mut self) {
        self.writer = None;
        self.smoothed.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binder/skew.rs"]
mod tests;
