use crate::foundation::error::{MotionError, MotionResult};
use crate::foundation::math::safe_ratio;

pub use kurbo::{Point, Rect, Vec2};

/// Frame cadence represented as a rational `num/den` frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> MotionResult<Self> {
        if den == 0 {
            return Err(MotionError::config("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(MotionError::config("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

/// Scroll state of the document as reported by the environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollMetrics {
    /// Current vertical scroll offset in pixels.
    pub scroll_y: f64,
    /// Height of the visible viewport in pixels.
    pub viewport_height: f64,
    /// Total height of the scrolled content in pixels.
    pub content_height: f64,
}

impl ScrollMetrics {
    /// Distance that can actually be scrolled. Never negative.
    pub fn scrollable_height(self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Whole-document progress in `[0, 1]`; `0` when nothing can be scrolled.
    pub fn page_progress(self) -> f64 {
        safe_ratio(self.scroll_y, self.scrollable_height()).clamp(0.0, 1.0)
    }
}

/// Vertical placement of a tracked element in document coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementBounds {
    /// Document offset of the element's top edge.
    pub top: f64,
    /// Element height in pixels.
    pub height: f64,
}

impl ElementBounds {
    /// Progress of the element crossing the viewport.
    ///
    /// `0` when the element's top edge sits on the viewport's bottom edge, `1` when the element's
    /// bottom edge reaches the viewport's top edge. Empty traversal ranges yield `0`.
    pub fn traversal_progress(self, metrics: ScrollMetrics) -> f64 {
        let travelled = metrics.scroll_y + metrics.viewport_height - self.top;
        let range = metrics.viewport_height + self.height.max(0.0);
        safe_ratio(travelled, range).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
