use crate::animation::ease::Ease;
use crate::foundation::core::Vec2;
use crate::foundation::error::{MotionError, MotionResult};
use crate::signal::value::{Sample, ScalarSignal, SignalReader, Subscription};

/// Interpolation contract for mapped output types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Piecewise-linear map from strictly increasing breakpoints to output values.
///
/// Inputs outside `[x0, xn]` clamp to the end values; NaN maps to `y0`.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeMap<T = f64> {
    input: Vec<f64>,
    output: Vec<T>,
    ease: Ease,
}

impl<T> RangeMap<T>
where
    T: Lerp + Clone,
{
    /// Validated map. Breakpoints must be finite, strictly increasing, at least two, and match
    /// `output` in length.
    pub fn new(input: Vec<f64>, output: Vec<T>) -> MotionResult<Self> {
        validate_breakpoints(&input, output.len())?;
        Ok(Self {
            input,
            output,
            ease: Ease::Linear,
        })
    }

    /// Apply `ease` to the progress inside every segment.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Input breakpoints.
    pub fn input(&self) -> &[f64] {
        &self.input
    }

    /// Output values.
    pub fn output(&self) -> &[T] {
        &self.output
    }

    /// Map `x` through the breakpoints.
    pub fn map(&self, x: f64) -> T {
        let last = self.input.len() - 1;
        if x.is_nan() || x <= self.input[0] {
            return self.output[0].clone();
        }
        if x >= self.input[last] {
            return self.output[last].clone();
        }

        let idx = self.input.partition_point(|&b| b <= x);
        let (x0, x1) = (self.input[idx - 1], self.input[idx]);
        let t = self.ease.apply((x - x0) / (x1 - x0));
        T::lerp(&self.output[idx - 1], &self.output[idx], t)
    }
}

impl RangeMap<f64> {
    /// Two-point map `[x0, x1] -> [y0, y1]`.
    pub fn linear(x0: f64, x1: f64, y0: f64, y1: f64) -> MotionResult<Self> {
        Self::new(vec![x0, x1], vec![y0, y1])
    }
}

fn validate_breakpoints(input: &[f64], outputs: usize) -> MotionResult<()> {
    if input.len() < 2 {
        return Err(MotionError::config(
            "RangeMap needs at least two breakpoints",
        ));
    }
    if input.len() != outputs {
        return Err(MotionError::config(format!(
            "RangeMap has {} breakpoints but {} outputs",
            input.len(),
            outputs
        )));
    }
    if input.iter().any(|x| !x.is_finite()) {
        return Err(MotionError::config("RangeMap breakpoints must be finite"));
    }
    if !input.windows(2).all(|w| w[0] < w[1]) {
        return Err(MotionError::config(
            "RangeMap breakpoints must be strictly increasing",
        ));
    }
    Ok(())
}

/// Signal derived from a source through a [`RangeMap`].
pub struct MappedSignal<T = f64> {
    output: ScalarSignal<T>,
    input: Option<Subscription>,
}

impl<T> MappedSignal<T>
where
    T: Lerp + Clone + PartialEq + 'static,
{
    /// Follow `source`, publishing `map(source)` on every change.
    pub fn new(source: &SignalReader<f64>, map: RangeMap<T>) -> Self {
        let initial = source.sample();
        let output = ScalarSignal::new(map.map(initial.value), initial.at);
        let out_w = output.share();
        let input = source.subscribe(move |s: &Sample<f64>| {
            out_w.set(map.map(s.value), s.at);
        });
        Self {
            output,
            input: Some(input),
        }
    }

    /// Mapped output.
    pub fn reader(&self) -> SignalReader<T> {
        self.output.reader()
    }

    /// Current mapped value.
    pub fn get(&self) -> T {
        self.output.get()
    }

    /// Stop following the source; the output keeps its last value.
    pub fn teardown(&mut self) {
        self.input = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/range.rs"]
mod tests;
