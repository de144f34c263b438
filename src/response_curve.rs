//! Response curves shaping the output of analog controls.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// Shapes the magnitude of a normalized analog value
///
/// Every response maps a magnitude in `[0, 1]` onto `[0, 1]`;
/// [`apply`](Self::apply) runs it on the absolute value of an axis and restores the sign.
///
/// ```rust
/// use leafwing_touch::response_curve::AxisResponse;
///
/// assert_eq!(AxisResponse::Linear.apply(-0.5), -0.5);
/// assert_eq!(AxisResponse::Exponent(2.0).apply(-0.5), -0.25);
///
/// // Saturates at one
/// assert_eq!(AxisResponse::Sensitivity(3.0).apply(0.5), 1.0);
/// ```
#[must_use]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AxisResponse {
    /// The magnitude is left as is.
    #[default]
    Linear,

    /// Raises the magnitude to the given power, giving finer control near the center for powers above one.
    Exponent(f32),

    /// Magnitudes below the threshold become zero, and the rest is rescaled to start from zero.
    ///
    /// ```rust
    /// use leafwing_touch::response_curve::AxisResponse;
    ///
    /// let deadzone = AxisResponse::DeadZone(0.2);
    /// assert_eq!(deadzone.apply(0.1), 0.0);
    /// assert!((deadzone.apply(0.6) - 0.5).abs() < 1e-6);
    /// assert_eq!(deadzone.apply(-1.0), -1.0);
    /// ```
    DeadZone(f32),

    /// Multiplies the magnitude by the given factor.
    Sensitivity(f32),

    /// A piecewise linear curve through the given `(input, output)` points, sorted by input.
    ///
    /// Inputs before the first point or after the last one take that point's output.
    /// An empty curve behaves like [`AxisResponse::Linear`].
    ///
    /// ```rust
    /// use bevy::math::Vec2;
    /// use leafwing_touch::response_curve::AxisResponse;
    ///
    /// let curve = AxisResponse::Keyframes(vec![Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.2), Vec2::new(1.0, 1.0)]);
    /// assert!((curve.apply(0.25) - 0.1).abs() < 1e-6);
    /// assert!((curve.apply(0.75) - 0.6).abs() < 1e-6);
    /// ```
    Keyframes(Vec<Vec2>),

    /// Runs the magnitude through every response in order.
    ///
    /// Build one with [`AxisResponse::with_response`] or [`FromIterator<AxisResponse>::from_iter`].
    Pipeline(Vec<AxisResponse>),
}

impl AxisResponse {
    /// Maps a magnitude in `[0, 1]` through this response
    #[must_use]
    pub fn evaluate(&self, magnitude: f32) -> f32 {
        let output = match self {
            Self::Linear => magnitude,
            Self::Exponent(exponent) => magnitude.powf(*exponent),
            Self::DeadZone(threshold) => {
                if magnitude <= *threshold {
                    0.0
                } else if *threshold >= 1.0 {
                    1.0
                } else {
                    (magnitude - threshold) / (1.0 - threshold)
                }
            }
            Self::Sensitivity(sensitivity) => magnitude * sensitivity,
            Self::Keyframes(points) => sample_keyframes(points, magnitude),
            Self::Pipeline(sequence) => sequence
                .iter()
                .fold(magnitude, |value, next| next.evaluate(value)),
        };

        output.clamp(0.0, 1.0)
    }

    /// Maps a signed axis value through this response, keeping its sign
    #[must_use]
    pub fn apply(&self, value: f32) -> f32 {
        self.evaluate(value.abs()).copysign(value)
    }

    /// Maps both axes of `value` through this response
    #[must_use]
    pub fn apply_xy(&self, value: Vec2) -> Vec2 {
        Vec2::new(self.apply(value.x), self.apply(value.y))
    }

    /// Appends `next` as the next step
    ///
    /// Linear steps are dropped, and pipelines are merged rather than nested.
    pub fn with_response(self, next: impl Into<AxisResponse>) -> Self {
        match (self, next.into()) {
            (current, Self::Linear) => current,
            (Self::Linear, next) => next,
            (Self::Pipeline(mut sequence), Self::Pipeline(mut next_sequence)) => {
                sequence.append(&mut next_sequence);
                Self::Pipeline(sequence)
            }
            (Self::Pipeline(mut sequence), next) => {
                sequence.push(next);
                Self::Pipeline(sequence)
            }
            (current, Self::Pipeline(mut next_sequence)) => {
                next_sequence.insert(0, current);
                Self::Pipeline(next_sequence)
            }
            (current, next) => Self::Pipeline(vec![current, next]),
        }
    }
}

impl FromIterator<AxisResponse> for AxisResponse {
    fn from_iter<T: IntoIterator<Item = AxisResponse>>(iter: T) -> Self {
        Self::Pipeline(iter.into_iter().collect())
    }
}

fn sample_keyframes(points: &[Vec2], input: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return input;
    };

    if input <= first.x {
        return first.y;
    }
    if input >= last.x {
        return last.y;
    }

    points
        .windows(2)
        .find(|pair| input <= pair[1].x)
        .map_or(last.y, |pair| {
            let (from, to) = (pair[0], pair[1]);
            let span = to.x - from.x;
            if span <= f32::EPSILON {
                to.y
            } else {
                from.y + (to.y - from.y) * (input - from.x) / span
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_stays_in_unit_range() {
        assert_eq!(AxisResponse::Sensitivity(4.0).evaluate(0.5), 1.0);
        assert_eq!(AxisResponse::Sensitivity(-1.0).evaluate(0.5), 0.0);
        assert_eq!(AxisResponse::DeadZone(1.0).evaluate(1.0), 0.0);
    }

    #[test]
    fn keyframes_hold_their_ends() {
        let curve = AxisResponse::Keyframes(vec![Vec2::new(0.2, 0.1), Vec2::new(0.8, 0.9)]);
        assert_eq!(curve.evaluate(0.0), 0.1);
        assert_eq!(curve.evaluate(1.0), 0.9);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-6);

        assert_eq!(AxisResponse::Keyframes(Vec::new()).evaluate(0.3), 0.3);
    }

    #[test]
    fn pipelines_merge() {
        let expected = AxisResponse::Pipeline(vec![
            AxisResponse::DeadZone(0.1),
            AxisResponse::Exponent(2.0),
            AxisResponse::Sensitivity(0.5),
        ]);

        let built = AxisResponse::Linear
            .with_response(AxisResponse::DeadZone(0.1))
            .with_response(AxisResponse::Exponent(2.0))
            .with_response(AxisResponse::Linear)
            .with_response(AxisResponse::Sensitivity(0.5));
        assert_eq!(built, expected);

        let collected = AxisResponse::from_iter([
            AxisResponse::DeadZone(0.1),
            AxisResponse::Exponent(2.0),
            AxisResponse::Sensitivity(0.5),
        ]);
        assert_eq!(collected, expected);

        // (1 - 0.1) / 0.9 = 1, squared, halved
        assert!((expected.apply(-1.0) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_stays_zero() {
        assert_eq!(AxisResponse::Exponent(2.0).apply(0.0), 0.0);
        assert_eq!(
            AxisResponse::Linear.apply_xy(Vec2::new(-0.25, 0.75)),
            Vec2::new(-0.25, 0.75)
        );
    }
}
