use bevy::log::debug;
use bevy::math::Vec2;
use bevy::utils::Duration;

use super::{path_is_straight, swipe_angle, timed_out, velocity, SwipeDirection};
use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchPhase, TouchSample};

/// Detects a swipe by validating the whole path of the touch once it lifts
///
/// Every sample of the first tracked touch is recorded. On release, the swipe is recognized if
/// the straight line from the first to the last point is at least
/// [`minimum_distance_cm`](Self::minimum_distance_cm) long, and the recorded path is at most
/// [`path_tolerance`](Self::path_tolerance) longer than that line.
/// The direction is then classified into one of eight [`SwipeDirection`]s.
#[derive(Debug, Clone)]
pub struct PathSwipeRecognizer {
    core: RecognizerCore,
    /// The number of touches needed to swipe
    pub min_touches: usize,
    /// Swipes made with more touches than this are ignored
    pub max_touches: usize,
    /// How long the straight line through the swipe must be
    pub minimum_distance_cm: f32,
    /// Swipes slower than this fail, unless it is zero
    pub time_to_swipe: Duration,
    /// How much longer than the straight line the path may be, as a fraction of it
    pub path_tolerance: f32,
    /// Called when a swipe is recognized
    pub recognized: Listeners<PathSwipeRecognizer>,
    points: Vec<Vec2>,
    start_time: Duration,
    completed_direction: SwipeDirection,
    velocity: f32,
    angle: f32,
}

impl Default for PathSwipeRecognizer {
    fn default() -> Self {
        Self {
            core: RecognizerCore::default(),
            min_touches: 1,
            max_touches: 2,
            minimum_distance_cm: 2.0,
            time_to_swipe: Duration::from_millis(500),
            path_tolerance: 0.1,
            recognized: Listeners::default(),
            points: Vec::new(),
            start_time: Duration::ZERO,
            completed_direction: SwipeDirection::empty(),
            velocity: 0.0,
            angle: 0.0,
        }
    }
}

impl PathSwipeRecognizer {
    /// Creates a path swipe recognizer that needs `minimum_distance_cm` of travel
    #[must_use]
    pub fn new(minimum_distance_cm: f32) -> Self {
        Self {
            minimum_distance_cm,
            ..Default::default()
        }
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

    /// The angle of the last recognized swipe, counter-clockwise from the positive x axis, in degrees
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// The first recorded point of the current or last swipe
    #[must_use]
    pub fn start_point(&self) -> Vec2 {
        self.points.first().copied().unwrap_or_default()
    }

    /// The last recorded point of the current or last swipe
    #[must_use]
    pub fn end_point(&self) -> Vec2 {
        self.points.last().copied().unwrap_or_default()
    }

    fn check_for_completion(&mut self, ctx: &TickContext) -> bool {
        let (start, end) = (self.start_point(), self.end_point());
        let ideal_cm = ctx.to_cm(start.distance(end));

        if self.points.len() < 2 || ideal_cm < self.minimum_distance_cm {
            return false;
        }

        if !path_is_straight(&self.points, self.path_tolerance) {
            debug!("Swipe path too irregular: {} points", self.points.len());
            return false;
        }

        self.velocity = velocity(ideal_cm, ctx.now.saturating_sub(self.start_time));
        self.angle = swipe_angle(end - start);
        self.completed_direction = SwipeDirection::classify(end - start);
        true
    }
}

impl GestureRecognizer for PathSwipeRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn touches_began(&mut self, touches: &[TouchSample], ctx: &TickContext) -> bool {
        if self.state() != GestureState::Possible {
            return false;
        }

        for touch in touches.iter().filter(|touch| touch.phase == TouchPhase::Began) {
            self.core.track(touch);
        }

        let count = self.core.tracked_count();
        if (self.min_touches..=self.max_touches).contains(&count) {
            if let Some(first) = self.core.tracked().first().map(|touch| touch.position) {
                self.points.clear();
                self.points.push(first);
                self.start_time = ctx.now;
                self.set_state(GestureState::Began);
            }
        }

        false
    }

    fn touches_moved(&mut self, _touches: &[TouchSample], ctx: &TickContext) {
        if self.state() != GestureState::Began {
            return;
        }

        if timed_out(self.start_time, ctx.now, self.time_to_swipe) {
            self.set_state(GestureState::FailedOrEnded);
        } else if let Some(first) = self.core.tracked().first().map(|touch| touch.position) {
            self.points.push(first);
        }
    }

    fn touches_ended(&mut self, _touches: &[TouchSample], ctx: &TickContext) {
        if self.state() == GestureState::Began {
            if let Some(first) = self.core.tracked().first().map(|touch| touch.position) {
                self.points.push(first);
            }

            if !timed_out(self.start_time, ctx.now, self.time_to_swipe)
                && self.check_for_completion(ctx)
            {
                self.set_state(GestureState::Recognized);
                return;
            }
        }

        self.set_state(GestureState::FailedOrEnded);
    }

    fn fire_recognized(&self) {
        self.recognized.notify(self);
    }
}
