use std::f32::consts::SQRT_2;

use bevy::log::debug;
use bevy::math::Vec2;
use bevy::utils::Duration;

use super::{timed_out, velocity, SwipeDirection};
use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchId, TouchPhase, TouchSample};

/// The progress of one touch towards a swipe
#[derive(Debug, Clone, Copy, PartialEq)]
struct SwipeTracker {
    id: TouchId,
    start_point: Vec2,
    start_time: Duration,
    candidates: SwipeDirection,
}

/// What a single sample tells about a swipe in progress
#[derive(Debug, Clone, Copy, PartialEq)]
enum Verdict {
    Pending,
    Completed,
    Failed,
}

/// Detects a quick, straight swipe in one of the configured [`directions`](Self::directions)
///
/// Every touch keeps a set of candidate directions, initially `directions`.
/// Each sample removes the candidates its instantaneous motion contradicts,
/// and the candidates whose cross-axis drift exceeds [`allowed_variance_cm`](Self::allowed_variance_cm).
/// The swipe is recognized as soon as a touch travelled [`minimum_distance_cm`](Self::minimum_distance_cm)
/// along one of its remaining candidates, and fails once a touch runs out of candidates
/// or [`time_to_swipe`](Self::time_to_swipe) elapses.
///
/// # Example
/// ```rust
/// use bevy::math::Vec2;
/// use bevy::utils::Duration;
/// use leafwing_touch::prelude::*;
///
/// let mut swipe = SwipeRecognizer::new(40., 35.);
/// let settings = GestureSettings {
///     pixels_per_cm: 1.,
///     ..Default::default()
/// };
///
/// let start = Vec2::ZERO;
/// let mut batch = vec![TouchSample::began(0, start)];
/// swipe.recognize_touches(&mut batch, &TickContext::new(Duration::ZERO, &settings));
///
/// let mut batch = vec![TouchSample::ended(0, start, Vec2::new(100., 2.))];
/// swipe.recognize_touches(&mut batch, &TickContext::new(Duration::from_millis(200), &settings));
///
/// assert_eq!(swipe.completed_direction(), SwipeDirection::RIGHT);
/// ```
#[derive(Debug, Clone)]
pub struct SwipeRecognizer {
    core: RecognizerCore,
    /// The directions to detect
    pub directions: SwipeDirection,
    /// Swipes slower than this fail
    pub time_to_swipe: Duration,
    /// How far the touch must travel along the swipe direction
    pub minimum_distance_cm: f32,
    /// How far the touch may drift across the swipe direction
    pub allowed_variance_cm: f32,
    /// Touches beyond this number are ignored
    pub max_touches: usize,
    /// Called when a swipe is recognized
    pub recognized: Listeners<SwipeRecognizer>,
    trackers: Vec<SwipeTracker>,
    completed_direction: SwipeDirection,
    velocity: f32,
    start_point: Vec2,
    end_point: Vec2,
}

impl Default for SwipeRecognizer {
    fn default() -> Self {
        Self {
            core: RecognizerCore::default(),
            directions: SwipeDirection::CARDINAL,
            time_to_swipe: Duration::from_millis(500),
            minimum_distance_cm: 2.0,
            allowed_variance_cm: 1.5,
            max_touches: 2,
            recognized: Listeners::default(),
            trackers: Vec::new(),
            completed_direction: SwipeDirection::empty(),
            velocity: 0.0,
            start_point: Vec2::ZERO,
            end_point: Vec2::ZERO,
        }
    }
}

impl SwipeRecognizer {
    /// Creates a swipe recognizer with custom distance tolerances
    #[must_use]
    pub fn new(minimum_distance_cm: f32, allowed_variance_cm: f32) -> Self {
        Self {
            minimum_distance_cm,
            allowed_variance_cm,
            ..Default::default()
        }
    }

    /// Restricts detection to `directions`
    #[must_use]
    pub fn with_directions(mut self, directions: SwipeDirection) -> Self {
        self.directions = directions;
        self
    }

    /// The direction of the last recognized swipe
    #[must_use]
    pub fn completed_direction(&self) -> SwipeDirection {
        self.completed_direction
    }

    /// The speed of the last recognized swipe, in centimetres per second
    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Where the last recognized swipe began
    #[must_use]
    pub fn start_point(&self) -> Vec2 {
        self.start_point
    }

    /// Where the last recognized swipe was when it was recognized
    #[must_use]
    pub fn end_point(&self) -> Vec2 {
        self.end_point
    }

    /// Updates the tracker of `touch`, and reports what it now tells about the swipe
    fn evaluate(&mut self, touch: &TouchSample, ctx: &TickContext) -> Verdict {
        let minimum = self.minimum_distance_cm;
        let variance = self.allowed_variance_cm;
        let time_to_swipe = self.time_to_swipe;

        let Some(tracker) = self.trackers.iter_mut().find(|tracker| tracker.id == touch.id) else {
            return Verdict::Pending;
        };

        if timed_out(tracker.start_time, ctx.now, time_to_swipe) {
            debug!("Swipe of touch {} took too long", touch.id);
            return Verdict::Failed;
        }

        // Motion in one direction rules out every direction heading the opposite way
        if touch.delta.x > 0.0 {
            tracker.candidates.remove(SwipeDirection::LEFT_SIDE);
        } else if touch.delta.x < 0.0 {
            tracker.candidates.remove(SwipeDirection::RIGHT_SIDE);
        }
        if touch.delta.y > 0.0 {
            tracker.candidates.remove(SwipeDirection::BOTTOM_SIDE);
        } else if touch.delta.y < 0.0 {
            tracker.candidates.remove(SwipeDirection::TOP_SIDE);
        }

        let displacement = touch.position - tracker.start_point;
        let displacement_cm = Vec2::new(ctx.to_cm(displacement.x), ctx.to_cm(displacement.y));

        let mut completed = None;
        for direction in SwipeDirection::SINGLE {
            if !tracker.candidates.contains(direction) {
                continue;
            }

            let unit = direction.unit_vector().unwrap_or_default();
            let (along, across, needed) = if SwipeDirection::DIAGONAL.contains(direction) {
                // Both axes must advance, and by similar amounts
                let x = displacement_cm.x * unit.x.signum();
                let y = displacement_cm.y * unit.y.signum();
                (x.min(y), (x - y).abs(), minimum / SQRT_2)
            } else {
                (
                    displacement_cm.dot(unit),
                    displacement_cm.perp_dot(unit).abs(),
                    minimum,
                )
            };

            if across >= variance {
                tracker.candidates.remove(direction);
                continue;
            }

            if along > needed && completed.is_none() {
                completed = Some(direction);
            }
        }

        if let Some(direction) = completed {
            let start_time = tracker.start_time;
            self.start_point = tracker.start_point;
            self.completed_direction = direction;
            self.end_point = touch.position;
            self.velocity = velocity(
                ctx.to_cm(displacement.length()),
                ctx.now.saturating_sub(start_time),
            );
            return Verdict::Completed;
        }

        if tracker.candidates.is_empty() {
            debug!("Swipe of touch {} left every candidate direction", touch.id);
            return Verdict::Failed;
        }

        Verdict::Pending
    }

    fn evaluate_all(&mut self, touches: &[TouchSample], ctx: &TickContext) -> Verdict {
        for touch in touches {
            match self.evaluate(touch, ctx) {
                Verdict::Pending => (),
                decisive => return decisive,
            }
        }
        Verdict::Pending
    }
}

impl GestureRecognizer for SwipeRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn touches_began(&mut self, touches: &[TouchSample], ctx: &TickContext) -> bool {
        if !matches!(self.state(), GestureState::Possible | GestureState::Began) {
            return false;
        }

        for touch in touches.iter().filter(|touch| touch.phase == TouchPhase::Began) {
            if self.core.tracked_count() == self.max_touches {
                break;
            }
            self.core.track(touch);
            self.trackers.push(SwipeTracker {
                id: touch.id,
                start_point: touch.position,
                start_time: ctx.now,
                candidates: self.directions,
            });
        }

        if self.state() == GestureState::Possible && self.core.tracked_count() > 0 {
            self.set_state(GestureState::Began);
        }

        false
    }

    fn touches_moved(&mut self, touches: &[TouchSample], ctx: &TickContext) {
        if self.state() != GestureState::Began {
            return;
        }

        match self.evaluate_all(touches, ctx) {
            Verdict::Completed => self.set_state(GestureState::Recognized),
            Verdict::Failed => self.set_state(GestureState::FailedOrEnded),
            Verdict::Pending => (),
        }
    }

    fn touches_ended(&mut self, touches: &[TouchSample], ctx: &TickContext) {
        if self.state() != GestureState::Began {
            self.set_state(GestureState::FailedOrEnded);
            return;
        }

        let finished: Vec<TouchSample> = touches
            .iter()
            .filter(|touch| touch.phase.is_finished())
            .copied()
            .collect();

        match self.evaluate_all(&finished, ctx) {
            Verdict::Completed => {
                self.set_state(GestureState::Recognized);
                return;
            }
            Verdict::Failed => {
                self.set_state(GestureState::FailedOrEnded);
                return;
            }
            Verdict::Pending => (),
        }

        for touch in &finished {
            self.core.untrack(touch.id);
            self.trackers.retain(|tracker| tracker.id != touch.id);
        }

        if self.core.tracked_count() == 0 {
            self.set_state(GestureState::FailedOrEnded);
        }
    }

    fn tick(&mut self, ctx: &TickContext) {
        let expired = self
            .trackers
            .iter()
            .any(|tracker| timed_out(tracker.start_time, ctx.now, self.time_to_swipe));

        if self.state() == GestureState::Began && expired {
            self.set_state(GestureState::FailedOrEnded);
        }
    }

    fn fire_recognized(&self) {
        self.recognized.notify(self);
    }

    fn on_reset(&mut self) {
        self.trackers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::test_utils::ctx_at;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting(swipe: &mut SwipeRecognizer) -> Arc<AtomicU32> {
        let count = Arc::new(AtomicU32::new(0));
        let counter = count.clone();
        swipe.recognized.add(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn straight_right_swipe_is_recognized() {
        let mut swipe = SwipeRecognizer::new(40., 35.);
        let count = counting(&mut swipe);

        swipe.recognize_touches(&mut vec![TouchSample::began(0, Vec2::ZERO)], &ctx_at(0));
        swipe.recognize_touches(
            &mut vec![TouchSample::ended(0, Vec2::ZERO, Vec2::new(100., 2.))],
            &ctx_at(250),
        );

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(swipe.completed_direction(), SwipeDirection::RIGHT);
        assert!((swipe.velocity() - 400.0).abs() < 0.1);
        assert_eq!(swipe.state(), GestureState::Possible);
    }

    #[test]
    fn too_much_cross_axis_drift_fails() {
        let mut swipe = SwipeRecognizer::new(40., 35.);
        let count = counting(&mut swipe);

        swipe.recognize_touches(&mut vec![TouchSample::began(0, Vec2::ZERO)], &ctx_at(0));
        swipe.recognize_touches(
            &mut vec![TouchSample::ended(0, Vec2::ZERO, Vec2::new(100., 50.))],
            &ctx_at(250),
        );

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(swipe.state(), GestureState::Possible);
        assert_eq!(swipe.core().tracked_count(), 0);
    }

    #[test]
    fn recognized_mid_motion() {
        let mut swipe = SwipeRecognizer::new(40., 35.);
        let count = counting(&mut swipe);
        let start = Vec2::new(200., 200.);

        swipe.recognize_touches(&mut vec![TouchSample::began(0, start)], &ctx_at(0));
        let halfway = TouchSample::moved(0, start, Vec2::new(200., 180.));
        swipe.recognize_touches(&mut vec![halfway], &ctx_at(50));
        assert_eq!(swipe.state(), GestureState::Began);

        let further = TouchSample::moved_from(&halfway, Vec2::new(201., 150.));
        swipe.recognize_touches(&mut vec![further], &ctx_at(100));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(swipe.completed_direction(), SwipeDirection::DOWN);
    }

    #[test]
    fn reversing_prunes_the_direction() {
        let mut swipe = SwipeRecognizer::new(40., 35.).with_directions(SwipeDirection::RIGHT);
        let start = Vec2::ZERO;

        swipe.recognize_touches(&mut vec![TouchSample::began(0, start)], &ctx_at(0));
        let forward = TouchSample::moved(0, start, Vec2::new(30., 0.));
        swipe.recognize_touches(&mut vec![forward], &ctx_at(50));
        assert_eq!(swipe.state(), GestureState::Began);

        let back = TouchSample::moved_from(&forward, Vec2::new(20., 0.));
        swipe.recognize_touches(&mut vec![back], &ctx_at(100));
        assert_eq!(swipe.state(), GestureState::Possible);
    }

    #[test]
    fn diagonal_swipes() {
        let mut swipe = SwipeRecognizer::new(40., 10.).with_directions(SwipeDirection::ALL);
        let count = counting(&mut swipe);

        swipe.recognize_touches(&mut vec![TouchSample::began(0, Vec2::ZERO)], &ctx_at(0));
        swipe.recognize_touches(
            &mut vec![TouchSample::moved(0, Vec2::ZERO, Vec2::new(32., 30.))],
            &ctx_at(100),
        );

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(swipe.completed_direction(), SwipeDirection::UP_RIGHT);
    }

    #[test]
    fn slow_swipes_time_out() {
        let mut swipe = SwipeRecognizer::new(40., 35.);
        let count = counting(&mut swipe);

        swipe.recognize_touches(&mut vec![TouchSample::began(0, Vec2::ZERO)], &ctx_at(0));
        swipe.recognize_touches(&mut vec![], &ctx_at(600));
        assert_eq!(swipe.state(), GestureState::Possible);

        swipe.recognize_touches(
            &mut vec![TouchSample::ended(0, Vec2::ZERO, Vec2::new(100., 0.))],
            &ctx_at(650),
        );
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
