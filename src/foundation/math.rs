/// Threshold below which a denominator is treated as zero.
pub(crate) const EPSILON: f64 = 1e-9;

/// `num / den`, or `0` when the division is undefined or non-finite.
pub(crate) fn safe_ratio(num: f64, den: f64) -> f64 {
    if !den.is_finite() || den.abs() < EPSILON {
        return 0.0;
    }
    let v = num / den;
    if v.is_finite() { v } else { 0.0 }
}

/// Replace NaN/inf with `fallback`.
pub(crate) fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

/// Hard clamp into `[-limit, limit]`. Non-finite input clamps to `0`.
pub(crate) fn clamp_symmetric(v: f64, limit: f64) -> f64 {
    let limit = limit.abs();
    finite_or(v, 0.0).clamp(-limit, limit)
}

/// Wrap `v` into the half-open interval spanned by `min` and `max`.
///
/// `min > max` is allowed; the interval is then `(max, min]` mirrored, matching the usual
/// marquee convention `wrap(-20, -45, x)`.
pub(crate) fn wrap(min: f64, max: f64, v: f64) -> f64 {
    let size = max - min;
    if size.abs() < EPSILON || !v.is_finite() {
        return min;
    }
    (((v - min) % size) + size) % size + min
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
