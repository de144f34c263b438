//! Quick touches that start and end in place.

use bevy::utils::Duration;

use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchPhase, TouchSample};

/// Detects taps made with one or more fingers
///
/// The required number of touches must begin before any of them ends.
/// Once every tracked touch has ended, the tap is recognized if it lasted at most
/// [`max_duration`](Self::max_duration), no touch strayed further than
/// [`max_movement_cm`](Self::max_movement_cm) from where it began on either axis,
/// and the tap count reported for the touches reached [`number_of_taps_required`](Self::number_of_taps_required).
///
/// Tap recognizers consume their touches when they begin.
#[derive(Debug, Clone)]
pub struct TapRecognizer {
    core: RecognizerCore,
    /// How many fingers must touch down together
    pub number_of_touches_required: usize,
    /// The tap count, as reported by the input collaborator, that completes the gesture
    pub number_of_taps_required: u32,
    /// Taps held longer than this fail
    pub max_duration: Duration,
    /// Taps that move further than this on either axis fail
    pub max_movement_cm: f32,
    /// Called when a tap is recognized
    pub recognized: Listeners<TapRecognizer>,
    began_at: Duration,
    tap_count: u32,
}

impl Default for TapRecognizer {
    fn default() -> Self {
        Self {
            core: RecognizerCore::default(),
            number_of_touches_required: 1,
            number_of_taps_required: 1,
            max_duration: Duration::from_millis(500),
            max_movement_cm: 1.0,
            recognized: Listeners::default(),
            began_at: Duration::ZERO,
            tap_count: 0,
        }
    }
}

impl TapRecognizer {
    /// Creates a tap recognizer with custom duration and movement tolerances
    #[must_use]
    pub fn new(max_duration: Duration, max_movement_cm: f32) -> Self {
        Self {
            max_duration,
            max_movement_cm,
            ..Default::default()
        }
    }

    /// Requires `touches` fingers to tap together
    #[must_use]
    pub fn with_touches(mut self, touches: usize) -> Self {
        self.number_of_touches_required = touches.max(1);
        self
    }

    /// Requires the tap count reported by the collaborator to reach `taps`
    #[must_use]
    pub fn with_taps(mut self, taps: u32) -> Self {
        self.number_of_taps_required = taps.max(1);
        self
    }

    /// The tap count of the last recognized tap
    #[must_use]
    pub fn tap_count(&self) -> u32 {
        self.tap_count
    }

    fn strayed(&self, touches: &[TouchSample], ctx: &TickContext) -> bool {
        touches.iter().any(|touch| {
            let offset = (touch.position - touch.start_position).abs();
            ctx.to_cm(offset.x) > self.max_movement_cm || ctx.to_cm(offset.y) > self.max_movement_cm
        })
    }

    fn expired(&self, ctx: &TickContext) -> bool {
        ctx.now.saturating_sub(self.began_at) > self.max_duration
    }
}

impl GestureRecognizer for TapRecognizer {
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
            if self.core.tracked_count() == self.number_of_touches_required {
                break;
            }
            self.core.track(touch);
        }

        if self.core.tracked_count() == self.number_of_touches_required {
            self.began_at = ctx.now;
            self.tap_count = 0;
            self.set_state(GestureState::Began);
            return true;
        }

        false
    }

    fn touches_moved(&mut self, touches: &[TouchSample], ctx: &TickContext) {
        if self.state() != GestureState::Began {
            return;
        }

        if self.strayed(touches, ctx) {
            self.set_state(GestureState::FailedOrEnded);
        }
    }

    fn touches_ended(&mut self, touches: &[TouchSample], ctx: &TickContext) {
        // A release can be the first sample to report how far a touch went
        if self.state() != GestureState::Began || self.expired(ctx) || self.strayed(touches, ctx)
        {
            self.set_state(GestureState::FailedOrEnded);
            return;
        }

        for touch in touches.iter().filter(|touch| touch.phase.is_finished()) {
            self.tap_count = self.tap_count.max(touch.tap_count);
            self.core.untrack(touch.id);
        }

        // Multi-finger taps are evaluated once the last finger lifts
        if self.core.tracked_count() > 0 {
            return;
        }

        if self.tap_count >= self.number_of_taps_required {
            self.set_state(GestureState::Recognized);
        } else {
            self.set_state(GestureState::FailedOrEnded);
        }
    }

    fn tick(&mut self, ctx: &TickContext) {
        if self.state() == GestureState::Began && self.expired(ctx) {
            self.set_state(GestureState::FailedOrEnded);
        }
    }

    fn fire_recognized(&self) {
        self.recognized.notify(self);
    }
}
