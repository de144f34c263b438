//! Quick straight strokes, classified by direction.
//!
//! Four recognizers share the [`SwipeDirection`] vocabulary:
//! - [`SwipeRecognizer`] prunes candidate directions while the touch moves, and succeeds as soon as one of them is met
//! - [`PathSwipeRecognizer`] validates the whole path once the touch lifts
//! - [`AngleSwipeRecognizer`] reports the exact angle of the stroke
//! - [`MultiFingerSwipeRecognizer`] runs the path validation independently for each finger

use std::f32::consts::FRAC_1_SQRT_2;

use bevy::math::Vec2;
use bevy::utils::Duration;
use bitflags::bitflags;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

mod angle;
mod cardinal;
mod multi_finger;
mod path;

pub use angle::AngleSwipeRecognizer;
pub use cardinal::SwipeRecognizer;
pub use multi_finger::{FingerSwipe, MultiFingerSwipeRecognizer};
pub use path::PathSwipeRecognizer;

bitflags! {
    /// A set of swipe directions, in y-up surface space
    ///
    /// Single directions describe a completed swipe, combinations describe which directions to detect.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SwipeDirection: u8 {
        /// Towards negative x
        const LEFT = 1 << 0;
        /// Towards positive x
        const RIGHT = 1 << 1;
        /// Towards positive y
        const UP = 1 << 2;
        /// Towards negative y
        const DOWN = 1 << 3;
        /// Towards negative x and positive y
        const UP_LEFT = 1 << 4;
        /// Towards negative x and negative y
        const DOWN_LEFT = 1 << 5;
        /// Towards positive x and positive y
        const UP_RIGHT = 1 << 6;
        /// Towards positive x and negative y
        const DOWN_RIGHT = 1 << 7;

        /// Left or right
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Up or down
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
        /// The four axis-aligned directions
        const CARDINAL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();

        /// Both diagonals heading up
        const DIAGONAL_UP = Self::UP_LEFT.bits() | Self::UP_RIGHT.bits();
        /// Both diagonals heading down
        const DIAGONAL_DOWN = Self::DOWN_LEFT.bits() | Self::DOWN_RIGHT.bits();
        /// Both diagonals heading left
        const DIAGONAL_LEFT = Self::UP_LEFT.bits() | Self::DOWN_LEFT.bits();
        /// Both diagonals heading right
        const DIAGONAL_RIGHT = Self::UP_RIGHT.bits() | Self::DOWN_RIGHT.bits();
        /// The four diagonal directions
        const DIAGONAL = Self::DIAGONAL_UP.bits() | Self::DIAGONAL_DOWN.bits();

        /// Every direction with a rightwards component
        const RIGHT_SIDE = Self::RIGHT.bits() | Self::DIAGONAL_RIGHT.bits();
        /// Every direction with a leftwards component
        const LEFT_SIDE = Self::LEFT.bits() | Self::DIAGONAL_LEFT.bits();
        /// Every direction with an upwards component
        const TOP_SIDE = Self::UP.bits() | Self::DIAGONAL_UP.bits();
        /// Every direction with a downwards component
        const BOTTOM_SIDE = Self::DOWN.bits() | Self::DIAGONAL_DOWN.bits();

        /// Every direction
        const ALL = Self::CARDINAL.bits() | Self::DIAGONAL.bits();
    }
}

impl Default for SwipeDirection {
    fn default() -> Self {
        SwipeDirection::CARDINAL
    }
}

impl SwipeDirection {
    /// The eight single directions, counter-clockwise from [`SwipeDirection::RIGHT`]
    pub const SINGLE: [SwipeDirection; 8] = [
        SwipeDirection::RIGHT,
        SwipeDirection::UP_RIGHT,
        SwipeDirection::UP,
        SwipeDirection::UP_LEFT,
        SwipeDirection::LEFT,
        SwipeDirection::DOWN_LEFT,
        SwipeDirection::DOWN,
        SwipeDirection::DOWN_RIGHT,
    ];

    /// Classifies `displacement` into one of eight 45° wide buckets
    ///
    /// A zero displacement has no direction and returns an empty set.
    ///
    /// ```rust
    /// use bevy::math::Vec2;
    /// use leafwing_touch::recognizers::swipe::SwipeDirection;
    ///
    /// assert_eq!(SwipeDirection::classify(Vec2::new(100., 2.)), SwipeDirection::RIGHT);
    /// assert_eq!(SwipeDirection::classify(Vec2::new(-30., 30.)), SwipeDirection::UP_LEFT);
    /// assert_eq!(SwipeDirection::classify(Vec2::ZERO), SwipeDirection::empty());
    /// ```
    #[must_use]
    pub fn classify(displacement: Vec2) -> SwipeDirection {
        if displacement == Vec2::ZERO {
            return SwipeDirection::empty();
        }

        let bucket = ((swipe_angle(displacement) + 22.5) / 45.0).floor() as usize % 8;
        SwipeDirection::SINGLE[bucket]
    }

    /// The unit vector pointing towards this direction, if it is a single direction
    #[must_use]
    pub fn unit_vector(self) -> Option<Vec2> {
        const UNITS: [Vec2; 8] = [
            Vec2::X,
            Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            Vec2::Y,
            Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            Vec2::NEG_X,
            Vec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            Vec2::NEG_Y,
            Vec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        ];

        SwipeDirection::SINGLE
            .iter()
            .position(|single| *single == self)
            .map(|index| UNITS[index])
    }
}

/// The angle of `displacement`, counter-clockwise from the positive x axis, in degrees within `[0, 360)`
#[must_use]
pub fn swipe_angle(displacement: Vec2) -> f32 {
    displacement
        .y
        .atan2(displacement.x)
        .to_degrees()
        .rem_euclid(360.0)
}

/// Is the path through `points` at most `1 + tolerance` times as long as the straight line
/// from its first to its last point?
pub(crate) fn path_is_straight(points: &[Vec2], tolerance: f32) -> bool {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return false;
    };

    let ideal = first.distance(*last);
    let travelled: f32 = points
        .iter()
        .tuple_windows()
        .map(|(from, to)| from.distance(*to))
        .sum();

    travelled <= ideal * (1.0 + tolerance)
}

/// Centimetres per second, or zero when no time passed
pub(crate) fn velocity(distance_cm: f32, elapsed: Duration) -> f32 {
    let seconds = elapsed.as_secs_f32();
    if seconds > 0.0 {
        distance_cm / seconds
    } else {
        0.0
    }
}

/// Has more than `limit` passed since `start`? A zero limit never expires.
pub(crate) fn timed_out(start: Duration, now: Duration, limit: Duration) -> bool {
    !limit.is_zero() && now.saturating_sub(start) > limit
}
