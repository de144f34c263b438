use bevy::math::Vec2;
use bevy::utils::Duration;

use super::{swipe_angle, timed_out, velocity};
use crate::listeners::{Listener, ListenerHandle, Listeners};
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchPhase, TouchSample};

/// A listener that only hears about swipes heading close to `direction`
#[derive(Clone)]
struct AngleListener {
    handle: ListenerHandle,
    direction: Vec2,
    variance_degrees: f32,
    callback: Listener<AngleSwipeRecognizer>,
}

impl std::fmt::Debug for AngleListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AngleListener")
            .field("handle", &self.handle)
            .field("direction", &self.direction)
            .field("variance_degrees", &self.variance_degrees)
            .finish_non_exhaustive()
    }
}

/// Detects a swipe in any direction and reports its exact angle
///
/// The swipe is recognized while the touch is still moving, as soon as it travelled
/// [`minimum_distance_cm`](Self::minimum_distance_cm) from where it began
/// within [`time_to_swipe`](Self::time_to_swipe).
/// Lifting the touch first fails the gesture.
///
/// Besides the plain [`recognized`](Self::recognized) listeners, angle listeners
/// registered with [`add_angle_listener`](Self::add_angle_listener) only fire for swipes
/// heading within a given number of degrees of their direction.
#[derive(Debug, Clone)]
pub struct AngleSwipeRecognizer {
    core: RecognizerCore,
    /// Swipes slower than this fail, unless it is zero
    pub time_to_swipe: Duration,
    /// How far the touch must travel
    pub minimum_distance_cm: f32,
    /// Called when a swipe is recognized, whatever its angle
    pub recognized: Listeners<AngleSwipeRecognizer>,
    angle_listeners: Vec<AngleListener>,
    start_point: Vec2,
    end_point: Vec2,
    start_time: Duration,
    velocity: f32,
    angle: f32,
}

impl Default for AngleSwipeRecognizer {
    fn default() -> Self {
        Self {
            core: RecognizerCore::default(),
            time_to_swipe: Duration::from_millis(500),
            minimum_distance_cm: 2.0,
            recognized: Listeners::default(),
            angle_listeners: Vec::new(),
            start_point: Vec2::ZERO,
            end_point: Vec2::ZERO,
            start_time: Duration::ZERO,
            velocity: 0.0,
            angle: 0.0,
        }
    }
}

impl AngleSwipeRecognizer {
    /// Creates an angle swipe recognizer that needs `minimum_distance_cm` of travel
    #[must_use]
    pub fn new(minimum_distance_cm: f32) -> Self {
        Self {
            minimum_distance_cm,
            ..Default::default()
        }
    }

    /// Registers `listener` for swipes heading less than `variance_degrees` away from `direction`
    pub fn add_angle_listener(
        &mut self,
        direction: Vec2,
        variance_degrees: f32,
        listener: impl Fn(&AngleSwipeRecognizer) + Send + Sync + 'static,
    ) -> ListenerHandle {
        let handle = ListenerHandle::next();
        self.angle_listeners.push(AngleListener {
            handle,
            direction,
            variance_degrees,
            callback: std::sync::Arc::new(listener),
        });
        handle
    }

    /// Unregisters the angle listener registered under `handle`
    pub fn remove_angle_listener(&mut self, handle: ListenerHandle) -> bool {
        let before = self.angle_listeners.len();
        self.angle_listeners
            .retain(|listener| listener.handle != handle);
        self.angle_listeners.len() != before
    }

    /// Unregisters every angle listener
    pub fn clear_angle_listeners(&mut self) {
        self.angle_listeners.clear();
    }

    /// The angle of the last swipe, counter-clockwise from the positive x axis, in degrees within `[0, 360)`
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// The vector from the start to the end of the last swipe
    #[must_use]
    pub fn displacement(&self) -> Vec2 {
        self.end_point - self.start_point
    }

    /// The speed of the last swipe, in centimetres per second
    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Where the last swipe began
    #[must_use]
    pub fn start_point(&self) -> Vec2 {
        self.start_point
    }

    /// Where the last swipe was when it was recognized
    #[must_use]
    pub fn end_point(&self) -> Vec2 {
        self.end_point
    }
}

impl GestureRecognizer for AngleSwipeRecognizer {
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

        let Some(first) = touches.iter().find(|touch| touch.phase == TouchPhase::Began) else {
            return false;
        };

        self.core.track(first);
        self.start_point = first.position;
        self.end_point = first.position;
        self.start_time = ctx.now;
        self.set_state(GestureState::Began);

        false
    }

    fn touches_moved(&mut self, touches: &[TouchSample], ctx: &TickContext) {
        if self.state() != GestureState::Began {
            return;
        }

        if timed_out(self.start_time, ctx.now, self.time_to_swipe) {
            self.set_state(GestureState::FailedOrEnded);
            return;
        }

        let Some(touch) = touches.first() else {
            return;
        };

        self.end_point = touch.position;
        let distance_cm = ctx.to_cm(self.displacement().length());
        self.velocity = velocity(distance_cm, ctx.now.saturating_sub(self.start_time));
        self.angle = swipe_angle(self.displacement());

        if distance_cm > self.minimum_distance_cm {
            self.set_state(GestureState::Recognized);
        }
    }

    fn touches_ended(&mut self, _touches: &[TouchSample], _ctx: &TickContext) {
        self.set_state(GestureState::FailedOrEnded);
    }

    fn fire_recognized(&self) {
        self.recognized.notify(self);

        let displacement = self.displacement();
        for listener in &self.angle_listeners {
            let off_by = listener.direction.angle_between(displacement).abs().to_degrees();
            if off_by < listener.variance_degrees {
                (listener.callback)(self);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::test_utils::ctx_at;
    use std::sync::{Arc, Mutex};

    #[test]
    fn recognized_while_moving() {
        let mut swipe = AngleSwipeRecognizer::new(40.);
        let angles = Arc::new(Mutex::new(Vec::new()));
        let log = angles.clone();
        swipe
            .recognized
            .add(move |swipe: &AngleSwipeRecognizer| log.lock().unwrap().push(swipe.angle()));

        swipe.recognize_touches(&mut vec![TouchSample::began(0, Vec2::ZERO)], &ctx_at(0));
        swipe.recognize_touches(
            &mut vec![TouchSample::moved(0, Vec2::ZERO, Vec2::new(20., 20.))],
            &ctx_at(50),
        );
        assert!(angles.lock().unwrap().is_empty());

        swipe.recognize_touches(
            &mut vec![TouchSample::moved(0, Vec2::ZERO, Vec2::new(-30., 40.))],
            &ctx_at(100),
        );
        let angles = angles.lock().unwrap();
        assert_eq!(angles.len(), 1);
        assert!((angles[0] - 126.869_9).abs() < 1e-3);
    }

    #[test]
    fn angle_listeners_filter_by_direction() {
        let mut swipe = AngleSwipeRecognizer::new(40.);
        let heard = Arc::new(Mutex::new(Vec::new()));

        let log = heard.clone();
        swipe.add_angle_listener(Vec2::Y, 30., move |_| log.lock().unwrap().push("up"));
        let log = heard.clone();
        let right = swipe.add_angle_listener(Vec2::X, 75., move |_| {
            log.lock().unwrap().push("right");
        });
        let log = heard.clone();
        swipe.add_angle_listener(Vec2::NEG_X, 30., move |_| log.lock().unwrap().push("left"));

        swipe.recognize_touches(&mut vec![TouchSample::began(0, Vec2::ZERO)], &ctx_at(0));
        swipe.recognize_touches(
            &mut vec![TouchSample::moved(0, Vec2::ZERO, Vec2::new(20., 50.))],
            &ctx_at(50),
        );
        assert_eq!(*heard.lock().unwrap(), vec!["up", "right"]);

        assert!(swipe.remove_angle_listener(right));
        assert!(!swipe.remove_angle_listener(right));
    }

    #[test]
    fn lifting_first_fails() {
        let mut swipe = AngleSwipeRecognizer::new(40.);
        swipe.recognize_touches(&mut vec![TouchSample::began(0, Vec2::ZERO)], &ctx_at(0));
        swipe.recognize_touches(
            &mut vec![TouchSample::ended(0, Vec2::ZERO, Vec2::new(100., 0.))],
            &ctx_at(50),
        );
        assert_eq!(swipe.state(), GestureState::Possible);
        assert_eq!(swipe.velocity(), 0.0);
    }
}
