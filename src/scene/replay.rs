//! Mounting a scene against an environment, and deterministic replay of event traces.

use crate::animation::range::RangeMap;
use crate::animation::velocity::VelocitySignal;
use crate::binder::hover::HoverBinder;
use crate::binder::marquee::MarqueeBinder;
use crate::binder::presentation::{
    InMemoryPresentation, SharedTarget, SharedUniforms, ShaderUniforms, VisualProperty,
};
use crate::binder::progress::{ProgressBinder, ProgressBinding};
use crate::binder::skew::SkewBinder;
use crate::binder::spotlight::SpotlightBinder;
use crate::foundation::error::{MotionError, MotionResult};
use crate::scene::document::Scene;
use crate::scene::model::BindingDef;
use crate::scene::trace::EventTrace;
use crate::schedule::frame::FrameScheduler;
use crate::signal::env::{EnvEvent, SharedEnvironment, SyntheticEnvironment};
use crate::signal::pointer::PointerSource;
use crate::signal::scroll::{ScrollRange, ScrollSource};
use crate::signal::value::SignalReader;
use std::collections::BTreeMap;

/// Presentation state captured after one frame tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameReport {
    /// Frame timestamp in seconds.
    pub at: f64,
    /// Latest value of every written property, per element.
    pub properties: BTreeMap<String, BTreeMap<VisualProperty, f64>>,
    /// Latest shader uniforms, per element.
    pub uniforms: BTreeMap<String, ShaderUniforms>,
}

enum Mounted {
    Progress {
        binder: ProgressBinder,
        // tracked-element ranges own their source
        source: Option<ScrollSource>,
    },
    Skew(SkewBinder),
    Marquee(MarqueeBinder),
    Spotlight(SpotlightBinder),
    Hover(HoverBinder),
}

impl Mounted {
    fn teardown(&mut self) {
        match self {
            Self::Progress { binder, source } => {
                binder.teardown();
                if let Some(s) = source.as_mut() {
                    s.teardown();
                }
            }
            Self::Skew(b) => b.teardown(),
            Self::Marquee(b) => b.teardown(),
            Self::Spotlight(b) => b.teardown(),
            Self::Hover(b) => b.teardown(),
        }
    }
}

/// Every binder of a [`Scene`], mounted against one environment.
///
/// Bindings share one page scroll source, one scroll velocity and one pointer source.
pub struct MotionScene {
    mounted: Vec<Mounted>,
    velocity: Option<VelocitySignal>,
    pointer: PointerSource,
    page: ScrollSource,
}

impl MotionScene {
    /// Validate `scene` and mount its bindings, writing to `target` and `uniforms`.
    #[tracing::instrument(skip_all, fields(bindings = scene.def().bindings.len()))]
    pub fn build(
        env: &SharedEnvironment,
        scene: &Scene,
        target: SharedTarget,
        uniforms: SharedUniforms,
    ) -> MotionResult<Self> {
        scene.validate()?;
        let def = scene.def();
        let scheduler = FrameScheduler::new(env.clone(), def.cadence);
        let page = ScrollSource::page(env);
        let pointer = PointerSource::new(env);
        let velocity = def
            .bindings
            .iter()
            .any(BindingDef::needs_velocity)
            .then(|| VelocitySignal::new(&page.offset(), &scheduler));

        let mut mounted = Vec::with_capacity(def.bindings.len());
        for binding in &def.bindings {
            let m = match binding {
                BindingDef::ScrollProgress {
                    element,
                    property,
                    range,
                    input,
                    output,
                    ease,
                    spring,
                } => {
                    let map = RangeMap::new(input.clone(), output.clone())?.with_ease(*ease);
                    let source = match range {
                        ScrollRange::Page => None,
                        ScrollRange::Element(bounds) => Some(ScrollSource::tracked(env, *bounds)),
                    };
                    let progress = source.as_ref().unwrap_or(&page).progress();
                    let binding = ProgressBinding {
                        element: element.clone(),
                        property: *property,
                        map,
                        spring: *spring,
                    };
                    Mounted::Progress {
                        binder: ProgressBinder::new(&progress, binding, &scheduler, target.clone()),
                        source,
                    }
                }
                BindingDef::Skew { element, config } => Mounted::Skew(SkewBinder::new(
                    &velocity_reader(velocity.as_ref())?,
                    element.as_str(),
                    *config,
                    &scheduler,
                    target.clone(),
                )?),
                BindingDef::VelocityMarquee { element, config } => {
                    Mounted::Marquee(MarqueeBinder::new(
                        &velocity_reader(velocity.as_ref())?,
                        element.as_str(),
                        *config,
                        &scheduler,
                        target.clone(),
                    )?)
                }
                BindingDef::Spotlight {
                    element,
                    rect,
                    config,
                } => Mounted::Spotlight(SpotlightBinder::new(
                    &pointer.point(),
                    *rect,
                    element.as_str(),
                    *config,
                    &scheduler,
                    target.clone(),
                )),
                BindingDef::HoverDistortion {
                    element,
                    rect,
                    config,
                } => Mounted::Hover(HoverBinder::new(
                    &pointer.point(),
                    *rect,
                    element.as_str(),
                    *config,
                    &scheduler,
                    uniforms.clone(),
                )?),
            };
            tracing::debug!(kind = binding.kind(), element = binding.element(), "binding mounted");
            mounted.push(m);
        }

        Ok(Self {
            mounted,
            velocity,
            pointer,
            page,
        })
    }

    /// Number of mounted bindings.
    pub fn binding_count(&self) -> usize {
        self.mounted.len()
    }

    /// Show or hide the frame-driven bindings (marquees and distortion).
    pub fn set_visible(&self, visible: bool) {
        for m in &self.mounted {
            match m {
                Mounted::Marquee(b) => b.set_visible(visible),
                Mounted::Hover(b) => b.set_visible(visible),
                Mounted::Progress { .. } | Mounted::Skew(_) | Mounted::Spotlight(_) => {}
            }
        }
    }

    /// Unmount every binding and release every environment listener.
    pub fn teardown(&mut self) {
        for m in &mut self.mounted {
            m.teardown();
        }
        self.mounted.clear();
        if let Some(v) = self.velocity.as_mut() {
            v.teardown();
        }
        self.pointer.teardown();
        self.page.teardown();
    }
}

impl Drop for MotionScene {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn velocity_reader(velocity: Option<&VelocitySignal>) -> MotionResult<SignalReader<f64>> {
    velocity
        .map(VelocitySignal::reader)
        .ok_or_else(|| MotionError::Other(anyhow::anyhow!("scroll velocity was not mounted")))
}

/// Mount `scene` on a fresh [`SyntheticEnvironment`], dispatch every event of `trace`, and
/// report the presentation state after each frame tick.
///
/// Replay is deterministic: the same scene and trace always yield the same reports.
#[tracing::instrument(skip_all, fields(events = trace.len()))]
pub fn replay(scene: &Scene, trace: &EventTrace) -> MotionResult<Vec<FrameReport>> {
    trace.validate()?;
    let env = SyntheticEnvironment::new(scene.def().initial);
    let presentation = InMemoryPresentation::shared();
    let mut motion = MotionScene::build(
        &env.shared(),
        scene,
        presentation.clone(),
        presentation.clone(),
    )?;

    let mut reports = Vec::with_capacity(trace.frame_count());
    for event in &trace.events {
        env.dispatch(*event);
        if let EnvEvent::Frame { at } = *event {
            let p = presentation.borrow();
            reports.push(FrameReport {
                at,
                properties: p.properties().clone(),
                uniforms: p.all_uniforms().clone(),
            });
        }
    }

    motion.teardown();
    let leaked = env.listener_count();
    if leaked != 0 {
        return Err(MotionError::Other(anyhow::anyhow!(
            "{leaked} environment listeners still registered after teardown"
        )));
    }
    tracing::debug!(frames = reports.len(), "replay finished");
    Ok(reports)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/replay.rs"]
mod tests;
