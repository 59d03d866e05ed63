use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Numeric visual property an output binder writes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VisualProperty {
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Horizontal translation (pixels or percent, per binder).
    TranslateX,
    /// Vertical translation in pixels.
    TranslateY,
    /// Vertical skew angle in degrees.
    SkewY,
    /// Uniform scale factor.
    Scale,
    /// Horizontal scale factor.
    ScaleX,
    /// Vertical scale factor.
    ScaleY,
}

/// Per-frame uniform block for the distortion shader.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShaderUniforms {
    /// Effect strength in `[0, 1]`.
    pub hover_intensity: f64,
    /// Pointer position inside the element, `[0, 1]²`, `v` pointing up.
    pub pointer_uv: (f64, f64),
    /// Seconds the effect has been running while visible.
    pub elapsed_time: f64,
}

/// Presentation collaborator receiving visual property writes.
pub trait PresentationTarget {
    /// Set `property` of `element` to `value`.
    fn apply(&mut self, element: &str, property: VisualProperty, value: f64);
}

/// Shader collaborator receiving uniform blocks.
pub trait UniformSink {
    /// Replace the uniforms of `element`.
    fn push_uniforms(&mut self, element: &str, uniforms: ShaderUniforms);
}

/// Shared handle to a presentation target.
pub type SharedTarget = Rc<RefCell<dyn PresentationTarget>>;

/// Shared handle to a uniform sink.
pub type SharedUniforms = Rc<RefCell<dyn UniformSink>>;

/// Write `value` through `target`, replacing non-finite values with `0`.
pub(crate) fn present(target: &SharedTarget, element: &str, property: VisualProperty, value: f64) {
    let value = if value.is_finite() {
        value
    } else {
        tracing::warn!(element, ?property, value, "non-finite visual value replaced with 0");
        0.0
    };
    target.borrow_mut().apply(element, property, value);
}

/// Records the latest value per element and property. Used by replay and tests.
#[derive(Debug, Default)]
pub struct InMemoryPresentation {
    properties: BTreeMap<String, BTreeMap<VisualProperty, f64>>,
    uniforms: BTreeMap<String, ShaderUniforms>,
    writes: u64,
}

impl InMemoryPresentation {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in a shared handle usable as both target and uniform sink.
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Latest value of `property` on `element`.
    pub fn property(&self, element: &str, property: VisualProperty) -> Option<f64> {
        self.properties.get(element)?.get(&property).copied()
    }

    /// Latest uniforms pushed for `element`.
    pub fn uniforms(&self, element: &str) -> Option<ShaderUniforms> {
        self.uniforms.get(element).copied()
    }

    /// Every element's latest properties.
    pub fn properties(&self) -> &BTreeMap<String, BTreeMap<VisualProperty, f64>> {
        &self.properties
    }

    /// Every element's latest uniforms.
    pub fn all_uniforms(&self) -> &BTreeMap<String, ShaderUniforms> {
        &self.uniforms
    }

    /// Total writes received (properties and uniform blocks).
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}

impl PresentationTarget for InMemoryPresentation {
    fn apply(&mut self, element: &str, property: VisualProperty, value: f64) {
        self.writes += 1;
        self.properties
            .entry(element.to_owned())
            .or_default()
            .insert(property, value);
    }
}

impl UniformSink for InMemoryPresentation {
    fn push_uniforms(&mut self, element: &str, uniforms: ShaderUniforms) {
        self.writes += 1;
        self.uniforms.insert(element.to_owned(), uniforms);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binder/presentation.rs"]
mod tests;
