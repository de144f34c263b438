//! Twisting gestures, made with two fingers or with one finger around a fixed point.

use bevy::math::Vec2;

use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchPhase, TouchSample};

/// The angle of the line from `from` to `to`, in degrees within `[0, 360)`
///
/// Angles grow counter-clockwise from the positive x axis, in y-up surface space.
/// Coincident points have an angle of zero.
///
/// ```rust
/// use bevy::math::Vec2;
/// use leafwing_touch::recognizers::rotation::angle_between_points;
///
/// assert_eq!(angle_between_points(Vec2::ZERO, Vec2::X), 0.0);
/// assert!((angle_between_points(Vec2::ZERO, Vec2::Y) - 90.0).abs() < 1e-4);
/// assert!((angle_between_points(Vec2::ZERO, Vec2::NEG_Y) - 270.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn angle_between_points(from: Vec2, to: Vec2) -> f32 {
    let line = to - from;
    let length = line.length();
    if length <= f32::EPSILON {
        return 0.0;
    }

    let angle = (line.x / length).clamp(-1.0, 1.0).acos().to_degrees();
    if line.perp_dot(Vec2::X) > 0.0 {
        360.0 - angle
    } else {
        angle
    }
    .rem_euclid(360.0)
}

/// The shortest signed turn from `current` to `target`, in degrees within `(-180, 180]`
#[must_use]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let turn = (target - current).rem_euclid(360.0);
    if turn > 180.0 {
        turn - 360.0
    } else {
        turn
    }
}

/// The rotation bookkeeping shared by both recognizers of this module
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Twist {
    delta_rotation: f32,
    accumulated: f32,
    previous_angle: f32,
}

impl Twist {
    fn start(&mut self, angle: f32) {
        *self = Twist {
            previous_angle: angle,
            ..Default::default()
        };
    }

    /// Advances to `angle`, returning true when a rotation should be reported
    fn advance(&mut self, angle: f32, state: GestureState, min_delta_rotation: f32) -> bool {
        let turn = delta_angle(angle, self.previous_angle);
        self.previous_angle = angle;

        if state == GestureState::Began {
            self.accumulated += turn;
            if self.accumulated.abs() < min_delta_rotation {
                return false;
            }
            self.delta_rotation = self.accumulated;
        } else {
            self.delta_rotation = turn;
        }

        true
    }
}

/// Detects two touches twisting around each other
///
/// [`delta_rotation`](Self::delta_rotation) reports the change in degrees since the previous report,
/// positive for clockwise twists.
/// Nothing is reported until the touches turned by at least
/// [`min_delta_rotation`](Self::min_delta_rotation) degrees.
///
/// Like pinches, lifting one of the two fingers returns the rotation to [`GestureState::Possible`].
#[derive(Debug, Clone, Default)]
pub struct RotationRecognizer {
    core: RecognizerCore,
    /// How many degrees the touches must turn before the rotation is recognized
    pub min_delta_rotation: f32,
    /// Called on every tick the active rotation changes
    pub recognized: Listeners<RotationRecognizer>,
    /// Called when an active rotation ends
    pub completed: Listeners<RotationRecognizer>,
    twist: Twist,
}

impl RotationRecognizer {
    /// Creates a rotation recognizer that waits for `min_delta_rotation` degrees of turn
    #[must_use]
    pub fn new(min_delta_rotation: f32) -> Self {
        Self {
            min_delta_rotation,
            ..Default::default()
        }
    }

    /// The rotation, in degrees, reported by the latest recognition
    #[must_use]
    pub fn delta_rotation(&self) -> f32 {
        self.twist.delta_rotation
    }

    fn current_angle(&self) -> f32 {
        match self.core.tracked() {
            [first, second] => angle_between_points(first.position, second.position),
            _ => self.twist.previous_angle,
        }
    }
}

impl GestureRecognizer for RotationRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn touches_began(&mut self, touches: &[TouchSample], _ctx: &TickContext) -> bool {
        if self.state() != GestureState::Possible {
            return false;
        }

        for touch in touches.iter().filter(|touch| touch.phase == TouchPhase::Began) {
            if self.core.tracked_count() == 2 {
                break;
            }
            self.core.track(touch);
        }

        if self.core.tracked_count() == 2 {
            let angle = self.current_angle();
            self.twist.start(angle);
            self.set_state(GestureState::Began);
        }

        false
    }

    fn touches_moved(&mut self, _touches: &[TouchSample], _ctx: &TickContext) {
        let state = self.state();
        if !matches!(
            state,
            GestureState::Began | GestureState::RecognizedAndStillRecognizing
        ) {
            return;
        }

        let angle = self.current_angle();
        if self.twist.advance(angle, state, self.min_delta_rotation) {
            self.set_state(GestureState::RecognizedAndStillRecognizing);
        }
    }

    fn touches_ended(&mut self, touches: &[TouchSample], _ctx: &TickContext) {
        self.core.untrack_finished(touches);

        if self.state() == GestureState::RecognizedAndStillRecognizing {
            self.completed.notify(self);
        }

        if self.core.tracked_count() == 1 {
            self.twist.delta_rotation = 0.0;
            self.set_state(GestureState::Possible);
        } else {
            self.set_state(GestureState::FailedOrEnded);
        }
    }

    fn fire_recognized(&self) {
        self.recognized.notify(self);
    }

    fn on_reset(&mut self) {
        self.twist = Twist::default();
    }
}

/// Detects a single touch circling around [`target_position`](Self::target_position)
///
/// Typically used for knobs and dials: the target is the centre of the control,
/// and [`delta_rotation`](Self::delta_rotation) reports how far the touch turned around it.
#[derive(Debug, Clone, Default)]
pub struct OneFingerRotationRecognizer {
    core: RecognizerCore,
    /// The point the touch rotates around, in surface space
    pub target_position: Vec2,
    /// How many degrees the touch must turn before the rotation is recognized
    pub min_delta_rotation: f32,
    /// Called on every tick the active rotation changes
    pub recognized: Listeners<OneFingerRotationRecognizer>,
    /// Called when an active rotation ends
    pub completed: Listeners<OneFingerRotationRecognizer>,
    twist: Twist,
}

impl OneFingerRotationRecognizer {
    /// Creates a recognizer for touches turning around `target_position`
    #[must_use]
    pub fn new(target_position: Vec2) -> Self {
        Self {
            target_position,
            ..Default::default()
        }
    }

    /// The rotation, in degrees, reported by the latest recognition
    #[must_use]
    pub fn delta_rotation(&self) -> f32 {
        self.twist.delta_rotation
    }

    fn current_angle(&self) -> f32 {
        match self.core.tracked().first() {
            Some(touch) => angle_between_points(self.target_position, touch.position),
            None => self.twist.previous_angle,
        }
    }
}

impl GestureRecognizer for OneFingerRotationRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn touches_began(&mut self, touches: &[TouchSample], _ctx: &TickContext) -> bool {
        if self.state() != GestureState::Possible {
            return false;
        }

        let Some(first) = touches.iter().find(|touch| touch.phase == TouchPhase::Began) else {
            return false;
        };

        self.core.track(first);
        let angle = self.current_angle();
        self.twist.start(angle);
        self.set_state(GestureState::Began);

        false
    }

    fn touches_moved(&mut self, _touches: &[TouchSample], _ctx: &TickContext) {
        let state = self.state();
        if !matches!(
            state,
            GestureState::Began | GestureState::RecognizedAndStillRecognizing
        ) {
            return;
        }

        let angle = self.current_angle();
        if self.twist.advance(angle, state, self.min_delta_rotation) {
            self.set_state(GestureState::RecognizedAndStillRecognizing);
        }
    }

    fn touches_ended(&mut self, touches: &[TouchSample], _ctx: &TickContext) {
        self.core.untrack_finished(touches);

        if self.state() == GestureState::RecognizedAndStillRecognizing {
            self.completed.notify(self);
        }
        self.set_state(GestureState::FailedOrEnded);
    }

    fn fire_recognized(&self) {
        self.recognized.notify(self);
    }

    fn on_reset(&mut self) {
        self.twist = Twist::default();
    }
}
