//! Two fingers moving apart or together.

use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchPhase, TouchSample};

/// Detects two touches changing the distance between them
///
/// [`delta_scale`](Self::delta_scale) reports the change in distance since the previous report,
/// relative to the distance when the pinch began.
/// Nothing is reported until the distance changed by at least
/// [`min_delta_cm`](Self::min_delta_cm) from where it began.
/// Once recognized, every change is reported.
///
/// Lifting one of the two fingers returns the pinch to [`GestureState::Possible`],
/// so that touching down again resumes the gesture.
#[derive(Debug, Clone, Default)]
pub struct PinchRecognizer {
    core: RecognizerCore,
    /// How far the distance between the touches must change before the pinch is recognized
    pub min_delta_cm: f32,
    /// Called on every tick the active pinch changes
    pub recognized: Listeners<PinchRecognizer>,
    /// Called when an active pinch ends
    pub completed: Listeners<PinchRecognizer>,
    delta_scale: f32,
    initial_distance_cm: f32,
    previous_distance_cm: f32,
}

impl PinchRecognizer {
    /// Creates a pinch recognizer that waits for `min_delta_cm` of change
    #[must_use]
    pub fn new(min_delta_cm: f32) -> Self {
        Self {
            min_delta_cm,
            ..Default::default()
        }
    }

    /// The relative change of distance reported by the latest recognition
    ///
    /// Positive when the touches move apart.
    #[must_use]
    pub fn delta_scale(&self) -> f32 {
        self.delta_scale
    }

    fn distance_cm(&self, ctx: &TickContext) -> f32 {
        match self.core.tracked() {
            [first, second] => ctx.to_cm(first.position.distance(second.position)),
            _ => 0.0,
        }
    }
}

impl GestureRecognizer for PinchRecognizer {
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
            if self.core.tracked_count() == 2 {
                break;
            }
            self.core.track(touch);
        }

        if self.core.tracked_count() == 2 {
            self.delta_scale = 0.0;
            self.initial_distance_cm = self.distance_cm(ctx);
            self.previous_distance_cm = self.initial_distance_cm;
            self.set_state(GestureState::Began);
        }

        false
    }

    fn touches_moved(&mut self, _touches: &[TouchSample], ctx: &TickContext) {
        if !matches!(
            self.state(),
            GestureState::Began | GestureState::RecognizedAndStillRecognizing
        ) {
            return;
        }

        let current = self.distance_cm(ctx);
        if self.state() == GestureState::Began
            && (current - self.initial_distance_cm).abs() < self.min_delta_cm
        {
            return;
        }

        self.delta_scale = if self.initial_distance_cm == 0.0 {
            0.0
        } else {
            (current - self.previous_distance_cm) / self.initial_distance_cm
        };
        self.previous_distance_cm = current;
        self.set_state(GestureState::RecognizedAndStillRecognizing);
    }

    fn touches_ended(&mut self, touches: &[TouchSample], _ctx: &TickContext) {
        self.core.untrack_finished(touches);

        if self.state() == GestureState::RecognizedAndStillRecognizing {
            self.completed.notify(self);
        }

        if self.core.tracked_count() == 1 {
            self.delta_scale = 0.0;
            self.set_state(GestureState::Possible);
        } else {
            self.set_state(GestureState::FailedOrEnded);
        }
    }

    fn fire_recognized(&self) {
        self.recognized.notify(self);
    }

    fn on_reset(&mut self) {
        self.delta_scale = 0.0;
        self.initial_distance_cm = 0.0;
        self.previous_distance_cm = 0.0;
    }
}
