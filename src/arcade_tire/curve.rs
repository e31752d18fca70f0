// ==============================================================================
// curve.rs — PIECEWISE RESPONSE CURVES (GRIP + TORQUE)
// ------------------------------------------------------------------------------
// Immutable sampled functions keyed by a scalar:
// - grip curves: lateral slip velocity (m/s, signed) -> fraction of slip removed
// - torque curve: normalized forward speed (0..1) -> available torque fraction
//
// evaluate(x):
// - x below the first key  -> first output
// - x above the last key   -> last output
// - between keys k0, k1 the rule depends on Interpolation:
//     Step     -> k0.output
//     Linear   -> lerp(k0.output, k1.output, t)
//     Hermite  -> cubic Hermite with m0 = k0.out_tangent * dx, m1 = k1.in_tangent * dx
// - NaN in -> NaN out
//
// Curves are validated once at construction and never mutated afterwards.
// ==============================================================================

use crate::error::ConfigError;

/// Alias used where a curve is keyed by slip velocity.
pub type GripCurve = Curve;
/// Alias used where a curve is keyed by normalized speed.
pub type TorqueCurve = Curve;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Interpolation {
    Step,
    Linear,
    Hermite,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CurveKey {
    pub input: f32,
    pub output: f32,
    pub in_tangent: f32,  // d(output)/d(input) arriving at this key
    pub out_tangent: f32, // d(output)/d(input) leaving this key
}

impl CurveKey {
    pub const fn new(input: f32, output: f32) -> Self {
        Self { input, output, in_tangent: 0.0, out_tangent: 0.0 }
    }

    pub const fn with_tangents(input: f32, output: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self { input, output, in_tangent, out_tangent }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    keys: Vec<CurveKey>,
    interpolation: Interpolation,
}

impl Curve {
    /// Build a curve from control points. Keys are sorted by input; empty,
    /// non-finite or duplicated inputs are rejected.
    pub fn new(
        name: &str,
        mut keys: Vec<CurveKey>,
        interpolation: Interpolation,
    ) -> Result<Self, ConfigError> {
        if keys.is_empty() {
            return Err(ConfigError::EmptyCurve { name: name.to_string() });
        }

        for (index, k) in keys.iter().enumerate() {
            let finite = k.input.is_finite()
                && k.output.is_finite()
                && k.in_tangent.is_finite()
                && k.out_tangent.is_finite();
            if !finite {
                return Err(ConfigError::NonFiniteKey { name: name.to_string(), index });
            }
        }

        keys.sort_by(|a, b| a.input.total_cmp(&b.input));

        if let Some(pair) = keys.windows(2).find(|w| w[0].input == w[1].input) {
            return Err(ConfigError::DuplicateKey {
                name: name.to_string(),
                input: pair[0].input,
            });
        }

        Ok(Self { keys, interpolation })
    }

    /// Piecewise-linear curve through `(input, output)` points.
    pub fn linear(name: &str, points: &[(f32, f32)]) -> Result<Self, ConfigError> {
        let keys = points.iter().map(|&(x, y)| CurveKey::new(x, y)).collect();
        Self::new(name, keys, Interpolation::Linear)
    }

    /// Smooth curve through `(input, output)` points. Interior tangents are the
    /// slope between neighbours, end tangents the slope of the end segment.
    pub fn smooth(name: &str, points: &[(f32, f32)]) -> Result<Self, ConfigError> {
        let mut sorted: Vec<(f32, f32)> = points.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = sorted.len();
        let slope = |a: (f32, f32), b: (f32, f32)| {
            let dx = b.0 - a.0;
            if dx.abs() > f32::EPSILON { (b.1 - a.1) / dx } else { 0.0 }
        };

        let keys = (0..n)
            .map(|i| {
                let (x, y) = sorted[i];
                let tangent = match (i.checked_sub(1), sorted.get(i + 1)) {
                    (Some(prev), Some(&next)) => slope(sorted[prev], next),
                    (None, Some(&next)) => slope((x, y), next),
                    (Some(prev), None) => slope(sorted[prev], (x, y)),
                    (None, None) => 0.0,
                };
                CurveKey::with_tangents(x, y, tangent, tangent)
            })
            .collect();

        Self::new(name, keys, Interpolation::Hermite)
    }

    /// Same output for every input.
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, value)],
            interpolation: Interpolation::Step,
        }
    }

    /// Input range covered by the keys.
    pub fn domain(&self) -> (f32, f32) {
        match (self.keys.first(), self.keys.last()) {
            (Some(a), Some(b)) => (a.input, b.input),
            _ => (f32::NAN, f32::NAN),
        }
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        if x.is_nan() {
            return f32::NAN;
        }

        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return f32::NAN;
        };

        if x <= first.input {
            return first.output;
        }
        if x >= last.input {
            return last.output;
        }

        // first key strictly greater than x; 1..len given the clamps above
        let hi = self.keys.partition_point(|k| k.input <= x);
        let k0 = self.keys[hi - 1];
        let k1 = self.keys[hi];

        let dx = k1.input - k0.input;
        let t = (x - k0.input) / dx;

        match self.interpolation {
            Interpolation::Step => k0.output,
            Interpolation::Linear => k0.output + (k1.output - k0.output) * t,
            Interpolation::Hermite => {
                let t2 = t * t;
                let t3 = t2 * t;

                let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
                let h10 = t3 - 2.0 * t2 + t;
                let h01 = -2.0 * t3 + 3.0 * t2;
                let h11 = t3 - t2;

                let m0 = k0.out_tangent * dx;
                let m1 = k1.in_tangent * dx;

                h00 * k0.output + h10 * m0 + h01 * k1.output + h11 * m1
            }
        }
    }
}
