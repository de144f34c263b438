use bevy::log::debug;
use bevy::math::Vec2;
use bevy::utils::Duration;

use super::{path_is_straight, timed_out, velocity, SwipeDirection};
use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchId, TouchPhase, TouchSample};

/// The swipe made by one finger
#[derive(Debug, Clone, PartialEq)]
pub struct FingerSwipe {
    /// The touch making this swipe
    pub id: TouchId,
    /// Every recorded position of the touch
    pub points: Vec<Vec2>,
    /// When the touch began
    pub start_time: Duration,
    /// The speed of the swipe, in centimetres per second, once recognized
    pub velocity: f32,
    /// The direction of the swipe, once recognized
    pub direction: SwipeDirection,
    fired: bool,
}

impl FingerSwipe {
    fn new(touch: &TouchSample, start_time: Duration) -> Self {
        Self {
            id: touch.id,
            points: vec![touch.position],
            start_time,
            velocity: 0.0,
            direction: SwipeDirection::empty(),
            fired: false,
        }
    }

    /// The first recorded position
    #[must_use]
    pub fn start_point(&self) -> Vec2 {
        self.points.first().copied().unwrap_or_default()
    }

    /// The last recorded position
    #[must_use]
    pub fn end_point(&self) -> Vec2 {
        self.points.last().copied().unwrap_or_default()
    }

    /// The normalized vector from the start to the end point, or zero if they coincide
    #[must_use]
    pub fn vector_direction(&self) -> Vec2 {
        (self.end_point() - self.start_point()).normalize_or_zero()
    }
}

/// The thresholds a [`FingerSwipe`] must meet
#[derive(Debug, Clone, Copy)]
struct Criteria {
    minimum_distance_cm: f32,
    time_to_swipe: Duration,
    path_tolerance: f32,
}

impl Criteria {
    /// Fills in the velocity and direction of `swipe` if it meets the criteria
    fn check(&self, swipe: &mut FingerSwipe, ctx: &TickContext) -> bool {
        if timed_out(swipe.start_time, ctx.now, self.time_to_swipe) || swipe.points.len() < 2 {
            return false;
        }

        let displacement = swipe.end_point() - swipe.start_point();
        let ideal_cm = ctx.to_cm(displacement.length());
        if ideal_cm < self.minimum_distance_cm {
            return false;
        }

        if !path_is_straight(&swipe.points, self.path_tolerance) {
            debug!("Swipe path of touch {} too irregular", swipe.id);
            return false;
        }

        swipe.velocity = velocity(ideal_cm, ctx.now.saturating_sub(swipe.start_time));
        swipe.direction = SwipeDirection::classify(displacement);
        true
    }
}

/// Detects path-validated swipes independently for every finger
///
/// Each finger is validated like a [`PathSwipeRecognizer`](super::PathSwipeRecognizer) swipe,
/// and the [`recognized`](Self::recognized) listeners receive the [`FingerSwipe`] of each finger
/// that completes, so several swipes may be reported within one tick.
/// With [`trigger_when_criteria_met`](Self::trigger_when_criteria_met), fingers are reported
/// as soon as their swipe qualifies, otherwise only when they lift.
///
/// The recognizer stays active until every finger has lifted.
#[derive(Debug, Clone)]
pub struct MultiFingerSwipeRecognizer {
    core: RecognizerCore,
    /// Swipes slower than this fail, unless it is zero
    pub time_to_swipe: Duration,
    /// Fingers beyond this number are ignored
    pub max_touches: usize,
    /// Report swipes while the finger is still moving
    pub trigger_when_criteria_met: bool,
    /// How long the straight line through each swipe must be
    pub minimum_distance_cm: f32,
    /// How much longer than the straight line each path may be, as a fraction of it
    pub path_tolerance: f32,
    /// Called once for every finger that completes a swipe
    pub recognized: Listeners<FingerSwipe>,
    fingers: Vec<FingerSwipe>,
}

impl Default for MultiFingerSwipeRecognizer {
    fn default() -> Self {
        Self {
            core: RecognizerCore::default(),
            time_to_swipe: Duration::from_millis(500),
            max_touches: 2,
            trigger_when_criteria_met: true,
            minimum_distance_cm: 2.0,
            path_tolerance: 0.1,
            recognized: Listeners::default(),
            fingers: Vec::new(),
        }
    }
}

impl MultiFingerSwipeRecognizer {
    /// Creates a multi-finger swipe recognizer that needs `minimum_distance_cm` of travel per finger
    #[must_use]
    pub fn new(minimum_distance_cm: f32) -> Self {
        Self {
            minimum_distance_cm,
            ..Default::default()
        }
    }

    /// The swipes of the fingers currently down
    #[must_use]
    pub fn fingers(&self) -> &[FingerSwipe] {
        &self.fingers
    }

    fn criteria(&self) -> Criteria {
        Criteria {
            minimum_distance_cm: self.minimum_distance_cm,
            time_to_swipe: self.time_to_swipe,
            path_tolerance: self.path_tolerance,
        }
    }

    /// Records `touch`, then reports its swipe if it completes; returns whether it did
    fn advance(&mut self, touch: &TouchSample, ctx: &TickContext) -> bool {
        let criteria = self.criteria();
        let finished = touch.phase.is_finished();

        let Some(finger) = self.fingers.iter_mut().find(|finger| finger.id == touch.id) else {
            return false;
        };

        finger.points.push(touch.position);
        if finger.fired || !(finished || self.trigger_when_criteria_met) {
            return false;
        }

        if criteria.check(finger, ctx) {
            finger.fired = true;
            self.recognized.notify(finger);
            return true;
        }

        false
    }
}

impl GestureRecognizer for MultiFingerSwipeRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn touches_began(&mut self, touches: &[TouchSample], ctx: &TickContext) -> bool {
        let mut added = false;

        for touch in touches.iter().filter(|touch| touch.phase == TouchPhase::Began) {
            if self.fingers.len() >= self.max_touches {
                break;
            }
            if self.core.is_tracking(touch.id) {
                continue;
            }

            self.core.track(touch);
            self.fingers.push(FingerSwipe::new(touch, ctx.now));
            added = true;
        }

        if added && self.state() == GestureState::Possible {
            self.set_state(GestureState::Began);
        }

        added
    }

    fn touches_moved(&mut self, touches: &[TouchSample], ctx: &TickContext) {
        let mut any_fired = false;
        for touch in touches.iter().filter(|touch| touch.phase == TouchPhase::Moved) {
            any_fired |= self.advance(touch, ctx);
        }

        if any_fired {
            self.set_state(GestureState::RecognizedAndStillRecognizing);
        }
    }

    fn touches_ended(&mut self, touches: &[TouchSample], ctx: &TickContext) {
        for touch in touches.iter().filter(|touch| touch.phase.is_finished()) {
            if self.advance(touch, ctx) {
                self.set_state(GestureState::RecognizedAndStillRecognizing);
            }
            self.fingers.retain(|finger| finger.id != touch.id);
            self.core.untrack(touch.id);
        }

        if self.fingers.is_empty() {
            self.set_state(GestureState::FailedOrEnded);
        }
    }

    fn on_reset(&mut self) {
        self.fingers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::test_utils::ctx_at;
    use std::sync::{Arc, Mutex};

    type SwipeLog = Arc<Mutex<Vec<(TouchId, SwipeDirection)>>>;

    fn recording(swipe: &mut MultiFingerSwipeRecognizer) -> SwipeLog {
        let swipes = Arc::new(Mutex::new(Vec::new()));
        let log = swipes.clone();
        swipe.recognized.add(move |finger: &FingerSwipe| {
            log.lock().unwrap().push((finger.id, finger.direction));
        });
        swipes
    }

    #[test]
    fn each_finger_is_reported_once() {
        let mut swipe = MultiFingerSwipeRecognizer::new(40.);
        let swipes = recording(&mut swipe);
        let (a, b) = (Vec2::new(0., 0.), Vec2::new(0., 100.));

        let mut batch = vec![TouchSample::began(0, a), TouchSample::began(1, b)];
        swipe.recognize_touches(&mut batch, &ctx_at(0));
        assert_eq!(swipe.state(), GestureState::Began);

        let mut batch = vec![
            TouchSample::moved(0, a, Vec2::new(50., 0.)),
            TouchSample::moved(1, b, Vec2::new(-50., 100.)),
        ];
        swipe.recognize_touches(&mut batch, &ctx_at(100));

        // Both fingers qualify within the same tick
        assert_eq!(
            *swipes.lock().unwrap(),
            vec![(0, SwipeDirection::RIGHT), (1, SwipeDirection::LEFT)]
        );
        assert_eq!(swipe.state(), GestureState::RecognizedAndStillRecognizing);

        let mut batch = vec![
            TouchSample::ended(0, a, Vec2::new(60., 0.)),
            TouchSample::ended(1, b, Vec2::new(-60., 100.)),
        ];
        swipe.recognize_touches(&mut batch, &ctx_at(150));

        assert_eq!(swipes.lock().unwrap().len(), 2);
        assert_eq!(swipe.state(), GestureState::Possible);
        assert!(swipe.fingers().is_empty());
    }

    #[test]
    fn waits_for_release_when_not_triggering_early() {
        let mut swipe = MultiFingerSwipeRecognizer {
            trigger_when_criteria_met: false,
            ..MultiFingerSwipeRecognizer::new(40.)
        };
        let swipes = recording(&mut swipe);
        let start = Vec2::new(100., 100.);

        swipe.recognize_touches(&mut vec![TouchSample::began(3, start)], &ctx_at(0));
        swipe.recognize_touches(
            &mut vec![TouchSample::moved(3, start, Vec2::new(100., 40.))],
            &ctx_at(100),
        );
        assert!(swipes.lock().unwrap().is_empty());

        swipe.recognize_touches(
            &mut vec![TouchSample::ended(3, start, Vec2::new(100., 20.))],
            &ctx_at(150),
        );
        assert_eq!(*swipes.lock().unwrap(), vec![(3, SwipeDirection::DOWN)]);
        assert_eq!(swipe.state(), GestureState::Possible);
    }

    #[test]
    fn consumes_the_fingers_it_adds() {
        let mut swipe = MultiFingerSwipeRecognizer::default().with_z_index(1);
        let mut batch = vec![
            TouchSample::began(0, Vec2::ZERO),
            TouchSample::began(1, Vec2::ONE),
            TouchSample::began(2, Vec2::X),
        ];

        swipe.recognize_touches(&mut batch, &ctx_at(0));
        assert_eq!(swipe.fingers().len(), 2);
        assert!(batch.is_empty());
    }
}
