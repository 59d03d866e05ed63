//! scrollmotion is a reactive signal pipeline for scroll- and pointer-driven motion.
//!
//! Environment events (scroll, resize, pointer moves, animation frames) feed signal sources;
//! conditioners derive velocity, smooth with damped springs and remap ranges; output binders
//! write numeric visual properties and shader uniforms to presentation collaborators.
//!
//! - Mount sources and binders against an [`EnvironmentEventSource`]
//! - Load a [`Scene`] and mount every binding at once with [`MotionScene`]
//! - Replay an [`EventTrace`] against a [`SyntheticEnvironment`] with [`replay`]
//!
//! Everything is single-threaded. Every source, conditioner and binder releases its listeners
//! on teardown or drop.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod binder;
pub(crate) mod scene;
pub(crate) mod schedule;
pub(crate) mod signal;

pub use crate::foundation::core::{ElementBounds, Fps, Point, Rect, ScrollMetrics, Vec2};
pub use crate::foundation::error::{MotionError, MotionResult};

pub use crate::signal::env::{
    EnvEvent, EnvironmentEventSource, EventKind, Listener, SharedEnvironment, SyntheticEnvironment,
};
pub use crate::signal::pointer::{PointerSource, offset_from_center, pointer_uv};
pub use crate::signal::scroll::{ScrollRange, ScrollSource};
pub use crate::signal::value::{Sample, ScalarSignal, SignalReader, Subscription};

pub use crate::animation::ease::Ease;
pub use crate::animation::range::{Lerp, MappedSignal, RangeMap};
pub use crate::animation::spring::{SmoothedSignal, SpringConfig, SpringHandle, SpringState};
pub use crate::animation::velocity::{
    DEFAULT_MAX_SAMPLE_AGE, VelocityConditioner, VelocitySignal,
};

pub use crate::schedule::frame::{FrameInfo, FrameScheduler, FrameTask, TaskStatus, TaskWaker};

pub use crate::binder::hover::{ALWAYS_ON_TARGET, HoverBinder, HoverConfig, HoverIntensity};
pub use crate::binder::marquee::{MarqueeBinder, MarqueeConfig};
pub use crate::binder::presentation::{
    InMemoryPresentation, PresentationTarget, ShaderUniforms, SharedTarget, SharedUniforms,
    UniformSink, VisualProperty,
};
pub use crate::binder::progress::{ProgressBinder, ProgressBinding};
pub use crate::binder::skew::{SkewBinder, SkewConfig};
pub use crate::binder::spotlight::{SpotlightBinder, SpotlightConfig};

pub use crate::scene::document::Scene;
pub use crate::scene::model::{BindingDef, SceneDef};
pub use crate::scene::replay::{FrameReport, MotionScene, replay};
pub use crate::scene::trace::EventTrace;
