use crate::animation::range::RangeMap;
use crate::binder::hover::HoverIntensity;
use crate::binder::presentation::VisualProperty;
use crate::foundation::core::{Fps, Rect, ScrollMetrics};
use crate::foundation::error::{MotionError, MotionResult};
use crate::scene::model::{BindingDef, SceneDef};
use crate::signal::scroll::ScrollRange;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Loaded scene: cadence, initial scroll state and the bindings to mount.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    def: SceneDef,
}

impl Scene {
    /// Parse a scene from any reader (JSON).
    pub fn from_reader<R: std::io::Read>(r: R) -> MotionResult<Self> {
        let def: SceneDef = serde_json::from_reader(r)
            .map_err(|e| MotionError::serde(format!("parse scene JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MotionResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MotionError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Wrap an in-memory definition.
    pub fn from_def(def: SceneDef) -> Self {
        Self { def }
    }

    /// Check every binding can be constructed.
    pub fn validate(&self) -> MotionResult<()> {
        validate_scene(&self.def)
            .map_err(|e| MotionError::validation(format!("scene validation failed: {e}")))
    }

    /// Underlying definition.
    pub fn def(&self) -> &SceneDef {
        &self.def
    }
}

fn validate_scene(def: &SceneDef) -> Result<(), String> {
    Fps::new(def.cadence.num, def.cadence.den).map_err(|e| format!("cadence: {e}"))?;
    validate_metrics(def.initial).map_err(|e| format!("initial: {e}"))?;

    let mut written: BTreeSet<(&str, VisualProperty)> = BTreeSet::new();
    let mut shaded: BTreeSet<&str> = BTreeSet::new();
    for (idx, binding) in def.bindings.iter().enumerate() {
        let ctx = format!("binding {idx} ({})", binding.kind());
        validate_binding(binding).map_err(|e| format!("{ctx}: {e}"))?;

        let element = binding.element();
        for property in binding.properties() {
            if !written.insert((element, property)) {
                return Err(format!(
                    "{ctx}: '{element}' {property:?} is already driven by an earlier binding"
                ));
            }
        }
        if matches!(binding, BindingDef::HoverDistortion { .. }) && !shaded.insert(element) {
            return Err(format!("{ctx}: '{element}' already has a distortion binding"));
        }
    }
    Ok(())
}

fn validate_binding(binding: &BindingDef) -> MotionResult<()> {
    if binding.element().trim().is_empty() {
        return Err(MotionError::config("element id must not be empty"));
    }
    match binding {
        BindingDef::ScrollProgress {
            range,
            input,
            output,
            spring,
            ..
        } => {
            RangeMap::new(input.clone(), output.clone())?;
            if output.iter().any(|y| !y.is_finite()) {
                return Err(MotionError::config("output values must be finite"));
            }
            if let ScrollRange::Element(bounds) = range {
                if !(bounds.top.is_finite() && bounds.height.is_finite() && bounds.height >= 0.0)
                {
                    return Err(MotionError::config(
                        "tracked element needs a finite top and non-negative height",
                    ));
                }
            }
            if let Some(spring) = spring {
                spring.validate()?;
            }
        }
        BindingDef::Skew { config, .. } => config.validate()?,
        BindingDef::VelocityMarquee { config, .. } => config.validate()?,
        BindingDef::Spotlight { rect, config, .. } => {
            validate_rect(*rect)?;
            config.spring.validate()?;
        }
        BindingDef::HoverDistortion { rect, config, .. } => {
            validate_rect(*rect)?;
            HoverIntensity::new(config.factor)?;
        }
    }
    Ok(())
}

fn validate_metrics(m: ScrollMetrics) -> MotionResult<()> {
    let finite = m.scroll_y.is_finite() && m.viewport_height.is_finite() && m.content_height.is_finite();
    if !finite || m.viewport_height < 0.0 || m.content_height < 0.0 {
        return Err(MotionError::config(format!(
            "initial scroll metrics must be finite with non-negative sizes, got {m:?}"
        )));
    }
    Ok(())
}

fn validate_rect(rect: Rect) -> MotionResult<()> {
    let finite = [rect.x0, rect.y0, rect.x1, rect.y1]
        .iter()
        .all(|v| v.is_finite());
    if !finite || rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Err(MotionError::config(format!(
            "element rect must be finite with positive area, got {rect:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
