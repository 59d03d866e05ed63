//! Serde boundary model for scene files.

use crate::animation::ease::Ease;
use crate::animation::spring::SpringConfig;
use crate::binder::hover::HoverConfig;
use crate::binder::marquee::MarqueeConfig;
use crate::binder::presentation::VisualProperty;
use crate::binder::skew::SkewConfig;
use crate::binder::spotlight::SpotlightConfig;
use crate::foundation::core::{Fps, Rect, ScrollMetrics};
use crate::signal::scroll::ScrollRange;

/// Top-level scene document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDef {
    /// Expected animation-frame cadence.
    #[serde(default)]
    pub cadence: Fps,
    /// Scroll metrics at mount.
    #[serde(default)]
    pub initial: ScrollMetrics,
    /// Bindings mounted in order.
    pub bindings: Vec<BindingDef>,
}

/// One output binder, tagged by `kind`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingDef {
    /// Scroll progress mapped into a visual property.
    ScrollProgress {
        /// Target element id.
        element: String,
        /// Property written.
        property: VisualProperty,
        /// Page or tracked element range.
        #[serde(default)]
        range: ScrollRange,
        /// Progress breakpoints.
        input: Vec<f64>,
        /// Property values at the breakpoints.
        output: Vec<f64>,
        /// Easing inside each segment.
        #[serde(default)]
        ease: Ease,
        /// Optional spring applied to the progress.
        #[serde(default)]
        spring: Option<SpringConfig>,
    },
    /// Scroll velocity as `SkewY`.
    Skew {
        /// Target element id.
        element: String,
        /// Skew settings.
        #[serde(default)]
        config: SkewConfig,
    },
    /// Velocity-driven marquee as `TranslateX`.
    VelocityMarquee {
        /// Target element id.
        element: String,
        /// Drift settings.
        #[serde(default)]
        config: MarqueeConfig,
    },
    /// Pointer-following highlight as `TranslateX`/`TranslateY`.
    Spotlight {
        /// Target element id.
        element: String,
        /// Element rect in viewport coordinates.
        rect: Rect,
        /// Follow settings.
        #[serde(default)]
        config: SpotlightConfig,
    },
    /// Distortion shader uniforms.
    HoverDistortion {
        /// Target element id.
        element: String,
        /// Element rect in viewport coordinates.
        rect: Rect,
        /// Smoothing settings.
        #[serde(default)]
        config: HoverConfig,
    },
}

impl BindingDef {
    /// Target element id.
    pub fn element(&self) -> &str {
        match self {
            Self::ScrollProgress { element, .. }
            | Self::Skew { element, .. }
            | Self::VelocityMarquee { element, .. }
            | Self::Spotlight { element, .. }
            | Self::HoverDistortion { element, .. } => element,
        }
    }

    /// Short name of the binding kind, as written in scene files.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ScrollProgress { .. } => "scroll_progress",
            Self::Skew { .. } => "skew",
            Self::VelocityMarquee { .. } => "velocity_marquee",
            Self::Spotlight { .. } => "spotlight",
            Self::HoverDistortion { .. } => "hover_distortion",
        }
    }

    /// Visual properties this binding writes. Hover writes uniforms only.
    pub fn properties(&self) -> Vec<VisualProperty> {
        match self {
            Self::ScrollProgress { property, .. } => vec![*property],
            Self::Skew { .. } => vec![VisualProperty::SkewY],
            Self::VelocityMarquee { .. } => vec![VisualProperty::TranslateX],
            Self::Spotlight { .. } => vec![VisualProperty::TranslateX, VisualProperty::TranslateY],
            Self::HoverDistortion { .. } => Vec::new(),
        }
    }

    /// Whether the binding consumes scroll velocity.
    pub fn needs_velocity(&self) -> bool {
        matches!(self, Self::Skew { .. } | Self::VelocityMarquee { .. })
    }
}
