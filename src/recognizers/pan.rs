//! Dragging one or more fingers across the surface.

use bevy::math::Vec2;

use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchPhase, TouchSample};

/// Detects touches dragged across the surface
///
/// The pan begins once at least [`min_touches`](Self::min_touches) are down,
/// and becomes active after the centroid of the touches travelled
/// [`min_pan_distance_cm`](Self::min_pan_distance_cm) in total.
/// While active it reports [`delta_translation`](Self::delta_translation) on every tick the touches move.
/// Extra fingers may join (up to [`max_touches`](Self::max_touches)) or lift without ending the pan,
/// as long as enough remain.
#[derive(Debug, Clone)]
pub struct PanRecognizer {
    core: RecognizerCore,
    /// The number of touches needed to pan
    pub min_touches: usize,
    /// Touches beyond this number are ignored
    pub max_touches: usize,
    /// How far the touches must travel before the pan is recognized
    pub min_pan_distance_cm: f32,
    /// Called on every tick the active pan moves
    pub recognized: Listeners<PanRecognizer>,
    /// Called when an active pan ends
    pub completed: Listeners<PanRecognizer>,
    delta_translation: Vec2,
    delta_translation_cm: f32,
    total_distance_cm: f32,
    previous_location: Vec2,
}

impl Default for PanRecognizer {
    fn default() -> Self {
        Self {
            core: RecognizerCore::default(),
            min_touches: 1,
            max_touches: 2,
            min_pan_distance_cm: 0.5,
            recognized: Listeners::default(),
            completed: Listeners::default(),
            delta_translation: Vec2::ZERO,
            delta_translation_cm: 0.0,
            total_distance_cm: 0.0,
            previous_location: Vec2::ZERO,
        }
    }
}

impl PanRecognizer {
    /// Creates a pan recognizer that becomes active after `min_pan_distance_cm` of movement
    #[must_use]
    pub fn new(min_pan_distance_cm: f32) -> Self {
        Self {
            min_pan_distance_cm,
            ..Default::default()
        }
    }

    /// Sets the range of touch counts that can pan
    #[must_use]
    pub fn with_touch_range(mut self, min_touches: usize, max_touches: usize) -> Self {
        self.min_touches = min_touches.max(1);
        self.max_touches = max_touches.max(self.min_touches);
        self
    }

    /// How far the centroid moved during the last tick, in surface pixels
    #[must_use]
    pub fn delta_translation(&self) -> Vec2 {
        self.delta_translation
    }

    /// The length of [`delta_translation`](Self::delta_translation), in centimetres
    #[must_use]
    pub fn delta_translation_cm(&self) -> f32 {
        self.delta_translation_cm
    }
}

impl GestureRecognizer for PanRecognizer {
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
            if state == GestureState::Possible {
                self.total_distance_cm = 0.0;
                self.delta_translation = Vec2::ZERO;
                self.set_state(GestureState::Began);
            }
        }

        false
    }

    fn touches_moved(&mut self, _touches: &[TouchSample], ctx: &TickContext) {
        // Still waiting for enough fingers
        if self.state() == GestureState::Possible {
            return;
        }

        let location = self.core.touch_location();
        self.delta_translation = location - self.previous_location;
        self.delta_translation_cm = ctx.to_cm(self.delta_translation.length());
        self.previous_location = location;

        if self.state() == GestureState::Began {
            self.total_distance_cm += self.delta_translation_cm;
            if self.total_distance_cm < self.min_pan_distance_cm {
                return;
            }
        }

        self.set_state(GestureState::RecognizedAndStillRecognizing);
    }

    fn touches_ended(&mut self, touches: &[TouchSample], _ctx: &TickContext) {
        self.core.untrack_finished(touches);

        if self.core.tracked_count() >= self.min_touches {
            self.previous_location = self.core.touch_location();
            self.delta_translation = Vec2::ZERO;
            self.delta_translation_cm = 0.0;
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
        self.total_distance_cm = 0.0;
    }
}
