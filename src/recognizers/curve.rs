//! Smoothly curving strokes, such as circles drawn with a finger.

use bevy::log::debug;
use bevy::math::Vec2;

use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchPhase, TouchSample};

/// Detects strokes that keep turning in gentle steps
///
/// The direction of travel is sampled every time the touch centroid moved at least
/// `sqrt(min_segment_length_sq)` pixels. Each turn between two successive directions is accumulated,
/// positive for clockwise turns, and [`delta_rotation`](Self::delta_rotation) is reported
/// every time the accumulation reaches [`report_rotation_step`](Self::report_rotation_step) degrees.
/// A single turn sharper than [`max_sharpness`](Self::max_sharpness) degrees fails the gesture.
#[derive(Debug, Clone)]
pub struct CurveRecognizer {
    core: RecognizerCore,
    /// How many degrees must accumulate before each report
    pub report_rotation_step: f32,
    /// The squared distance the centroid must travel before its direction is sampled again
    pub min_segment_length_sq: f32,
    /// The sharpest turn, in degrees, allowed between two samples
    pub max_sharpness: f32,
    /// The number of touches needed to draw a curve
    pub min_touches: usize,
    /// Touches beyond this number are ignored
    pub max_touches: usize,
    /// Called every time enough rotation accumulated
    pub recognized: Listeners<CurveRecognizer>,
    /// Called when an active curve ends
    pub completed: Listeners<CurveRecognizer>,
    delta_rotation: f32,
    accumulated: f32,
    previous_location: Vec2,
    previous_direction: Vec2,
}

impl Default for CurveRecognizer {
    fn default() -> Self {
        Self {
            core: RecognizerCore::default(),
            report_rotation_step: 20.0,
            min_segment_length_sq: 10.0,
            max_sharpness: 50.0,
            min_touches: 1,
            max_touches: 2,
            recognized: Listeners::default(),
            completed: Listeners::default(),
            delta_rotation: 0.0,
            accumulated: 0.0,
            previous_location: Vec2::ZERO,
            previous_direction: Vec2::ZERO,
        }
    }
}

impl CurveRecognizer {
    /// The rotation, in degrees, reported by the latest recognition
    ///
    /// Positive values are clockwise.
    #[must_use]
    pub fn delta_rotation(&self) -> f32 {
        self.delta_rotation
    }
}

/// The unsigned angle between two directions, in degrees
fn angle_between(a: Vec2, b: Vec2) -> f32 {
    let lengths = a.length() * b.length();
    if lengths <= f32::EPSILON {
        return 0.0;
    }

    (a.dot(b) / lengths).clamp(-1.0, 1.0).acos().to_degrees()
}

impl GestureRecognizer for CurveRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn touches_began(&mut self, touches: &[TouchSample], _ctx: &TickContext) -> bool {
        let state = self.state();
        let can_join = matches!(
            state,
            GestureState::Began | GestureState::RecognizedAndStillRecognizing
        ) && self.core.tracked_count() < self.max_touches;

        if state != GestureState::Possible && !can_join {
            return false;
        }

        for touch in touches.iter().filter(|touch| touch.phase == TouchPhase::Began) {
            if self.core.tracked_count() == self.max_touches {
                break;
            }
            self.core.track(touch);
        }

        if self.core.tracked_count() >= self.min_touches {
            self.previous_location = self.core.touch_location();
            // A direction is needed before turns can be measured, so stay possible for now
            if state != GestureState::RecognizedAndStillRecognizing {
                self.set_state(GestureState::Possible);
                self.accumulated = 0.0;
                self.previous_direction = Vec2::ZERO;
            }
        }

        false
    }

    fn touches_moved(&mut self, _touches: &[TouchSample], _ctx: &TickContext) {
        if self.core.tracked_count() < self.min_touches {
            return;
        }

        let location = self.core.touch_location();
        let direction = location - self.previous_location;

        if self.state() == GestureState::Possible {
            self.previous_location = location;
            self.previous_direction = direction;
            self.set_state(GestureState::Began);
            return;
        }

        if direction.length_squared() < self.min_segment_length_sq {
            return;
        }

        let turn = angle_between(self.previous_direction, direction);
        if turn > self.max_sharpness {
            debug!(
                "Curve too sharp: turned {turn} degrees, at most {} allowed",
                self.max_sharpness
            );
            self.set_state(GestureState::FailedOrEnded);
            return;
        }

        // Counter-clockwise turns have a positive cross product in y-up space
        if self.previous_direction.perp_dot(direction) > 0.0 {
            self.accumulated -= turn;
        } else {
            self.accumulated += turn;
        }

        self.previous_location = location;
        self.previous_direction = direction;

        if self.accumulated.abs() >= self.report_rotation_step {
            self.delta_rotation = self.accumulated;
            self.accumulated = 0.0;
            self.set_state(GestureState::RecognizedAndStillRecognizing);
        }
    }

    fn touches_ended(&mut self, touches: &[TouchSample], _ctx: &TickContext) {
        self.core.untrack_finished(touches);

        if self.core.tracked_count() >= self.min_touches {
            self.previous_location = self.core.touch_location();
            // The curve carries on with the remaining touches, without a turn of its own
            if self.state() == GestureState::RecognizedAndStillRecognizing {
                self.delta_rotation = 0.0;
                self.set_state(GestureState::RecognizedAndStillRecognizing);
            }
            return;
        }

        if self.state() == GestureState::RecognizedAndStillRecognizing {
            self.completed.notify(self);
        }
        self.set_state(GestureState::FailedOrEnded);
    }

    fn fire_recognized(&self) {
        self.recognized.notify(self);
    }

    fn on_reset(&mut self) {
        self.accumulated = 0.0;
        self.delta_rotation = 0.0;
        self.previous_direction = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::test_utils::ctx_at;
    use std::sync::{Arc, Mutex};

    fn stroke(curve: &mut CurveRecognizer, points: &[Vec2]) {
        let start = points[0];
        curve.recognize_touches(&mut vec![TouchSample::began(0, start)], &ctx_at(0));
        for (tick, point) in points.iter().enumerate().skip(1) {
            curve.recognize_touches(
                &mut vec![TouchSample::moved(0, start, *point)],
                &ctx_at(tick as u64 * 16),
            );
        }
    }

    #[test]
    fn clockwise_arcs_report_positive_rotation() {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let mut curve = CurveRecognizer::default();
        let log = reports.clone();
        curve
            .recognized
            .add(move |curve: &CurveRecognizer| log.lock().unwrap().push(curve.delta_rotation()));

        // Heading right, then bending downwards in 30 degree steps
        let points: Vec<Vec2> = [0.0f32, 0.0, 30.0, 60.0]
            .iter()
            .scan(Vec2::ZERO, |position, degrees| {
                let heading = (-degrees).to_radians();
                *position += Vec2::new(heading.cos(), heading.sin()) * 10.0;
                Some(*position)
            })
            .collect();
        let mut all = vec![Vec2::ZERO];
        all.extend(points);

        stroke(&mut curve, &all);

        // One report per 30 degree bend
        let reports = reports.lock().unwrap();
        assert_eq!(reports.len(), 2);
        assert!(
            reports.iter().all(|rotation| (rotation - 30.0).abs() < 0.01),
            "{reports:?}"
        );
        assert_eq!(curve.state(), GestureState::RecognizedAndStillRecognizing);
    }

    #[test]
    fn lifting_an_extra_finger_keeps_the_curve_going() {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let completions = Arc::new(Mutex::new(0));
        let mut curve = CurveRecognizer::default();
        let log = reports.clone();
        curve
            .recognized
            .add(move |curve: &CurveRecognizer| log.lock().unwrap().push(curve.delta_rotation()));
        let done = completions.clone();
        curve.completed.add(move |_| *done.lock().unwrap() += 1);

        let points = [
            Vec2::ZERO,
            Vec2::new(10., 0.),
            Vec2::new(20., 0.),
            Vec2::new(20. + 10. * 30f32.to_radians().cos(), -10. * 30f32.to_radians().sin()),
        ];
        stroke(&mut curve, &points);
        assert_eq!(reports.lock().unwrap().len(), 1);

        let extra = Vec2::new(100., 100.);
        curve.recognize_touches(&mut vec![TouchSample::began(1, extra)], &ctx_at(100));
        curve.recognize_touches(&mut vec![TouchSample::ended(1, extra, extra)], &ctx_at(116));

        assert_eq!(curve.state(), GestureState::RecognizedAndStillRecognizing);
        assert_eq!(curve.core().tracked_count(), 1);
        assert_eq!(*reports.lock().unwrap().last().unwrap(), 0.0);
        assert_eq!(*completions.lock().unwrap(), 0);
    }

    #[test]
    fn sharp_corners_fail() {
        let mut curve = CurveRecognizer::default();
        let points = [
            Vec2::ZERO,
            Vec2::new(10., 0.),
            Vec2::new(20., 0.),
            Vec2::new(20., 10.),
        ];

        stroke(&mut curve, &points);
        assert_eq!(curve.state(), GestureState::Possible);
        assert_eq!(curve.core().tracked_count(), 0);
    }
}
