//! Touches held in place for a while.
//!
//! Both recognizers here store a deadline when the touch begins and compare it once per tick,
//! so a pending press is cancelled by any state change without anything to wake up or stop.

use std::ops::{Deref, DerefMut};

use bevy::math::Vec2;
use bevy::utils::Duration;

use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::TouchSample;

/// Detects a touch held for at least [`min_duration`](Self::min_duration)
/// without moving further than [`allowable_movement_cm`](Self::allowable_movement_cm)
///
/// This is a continuous gesture: `recognized` fires when the deadline is reached,
/// and `completed` fires when the press is released or moves too far afterwards.
#[derive(Debug, Clone)]
pub struct LongPressRecognizer {
    core: RecognizerCore,
    /// How long the touch must be held
    pub min_duration: Duration,
    /// How far the touch may wander from where it began
    pub allowable_movement_cm: f32,
    /// The exact number of touches that must begin together, or `None` for any number
    pub required_touches: Option<usize>,
    /// Called once the press has been held long enough
    pub recognized: Listeners<LongPressRecognizer>,
    /// Called when a recognized press ends
    pub completed: Listeners<LongPressRecognizer>,
    begin_location: Vec2,
    deadline: Option<Duration>,
}

impl Default for LongPressRecognizer {
    fn default() -> Self {
        Self {
            core: RecognizerCore::default(),
            min_duration: Duration::from_millis(500),
            allowable_movement_cm: 1.0,
            required_touches: None,
            recognized: Listeners::default(),
            completed: Listeners::default(),
            begin_location: Vec2::ZERO,
            deadline: None,
        }
    }
}

impl LongPressRecognizer {
    /// Creates a long press recognizer with custom tolerances
    #[must_use]
    pub fn new(
        min_duration: Duration,
        allowable_movement_cm: f32,
        required_touches: Option<usize>,
    ) -> Self {
        Self {
            min_duration,
            allowable_movement_cm,
            required_touches,
            ..Default::default()
        }
    }

    /// Where the press began
    #[must_use]
    pub fn begin_location(&self) -> Vec2 {
        self.begin_location
    }

    /// Is a press waiting for its deadline?
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.deadline.is_some()
    }

    fn complete(&mut self) {
        if self.state() == GestureState::RecognizedAndStillRecognizing {
            self.completed.notify(self);
        }
        self.deadline = None;
        self.set_state(GestureState::FailedOrEnded);
    }
}

impl GestureRecognizer for LongPressRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn touches_began(&mut self, touches: &[TouchSample], ctx: &TickContext) -> bool {
        let count_matches = self
            .required_touches
            .map_or(true, |required| touches.len() == required);

        if self.deadline.is_some() || self.state() != GestureState::Possible || !count_matches {
            return false;
        }

        let Some(first) = touches.first() else {
            return false;
        };

        self.begin_location = first.position;
        match self.required_touches {
            Some(_) => touches.iter().for_each(|touch| self.core.track(touch)),
            None => self.core.track(first),
        }
        self.set_state(GestureState::Began);

        if self.min_duration.is_zero() {
            self.set_state(GestureState::RecognizedAndStillRecognizing);
        } else {
            self.deadline = Some(ctx.now + self.min_duration);
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

        let Some(touch) = self.core.tracked().first() else {
            return;
        };

        let moved_cm = ctx.to_cm(touch.position.distance(self.begin_location));
        if moved_cm > self.allowable_movement_cm {
            self.complete();
        }
    }

    fn touches_ended(&mut self, _touches: &[TouchSample], _ctx: &TickContext) {
        self.complete();
    }

    fn tick(&mut self, ctx: &TickContext) {
        let Some(deadline) = self.deadline else {
            return;
        };

        if ctx.now >= deadline {
            self.deadline = None;
            if self.state() == GestureState::Began {
                self.set_state(GestureState::RecognizedAndStillRecognizing);
            }
        }
    }

    fn fire_recognized(&self) {
        self.recognized.notify(self);
    }

    fn on_reset(&mut self) {
        self.deadline = None;
    }
}

/// A [`LongPressRecognizer`] that recognizes as soon as the touch begins by default
///
/// Set [`min_duration`](LongPressRecognizer::min_duration) to require a hold,
/// everything else behaves like a long press.
#[derive(Debug, Clone)]
pub struct PressRecognizer(LongPressRecognizer);

impl Default for PressRecognizer {
    fn default() -> Self {
        PressRecognizer(LongPressRecognizer {
            min_duration: Duration::ZERO,
            ..Default::default()
        })
    }
}

impl PressRecognizer {
    /// Creates a press recognizer that must be held for `min_duration`
    #[must_use]
    pub fn new(min_duration: Duration, allowable_movement_cm: f32) -> Self {
        PressRecognizer(LongPressRecognizer::new(
            min_duration,
            allowable_movement_cm,
            None,
        ))
    }
}

impl Deref for PressRecognizer {
    type Target = LongPressRecognizer;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PressRecognizer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl GestureRecognizer for PressRecognizer {
    fn core(&self) -> &RecognizerCore {
        self.0.core()
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        self.0.core_mut()
    }

    fn touches_began(&mut self, touches: &[TouchSample], ctx: &TickContext) -> bool {
        self.0.touches_began(touches, ctx)
    }

    fn touches_moved(&mut self, touches: &[TouchSample], ctx: &TickContext) {
        self.0.touches_moved(touches, ctx);
    }

    fn touches_ended(&mut self, touches: &[TouchSample], ctx: &TickContext) {
        self.0.touches_ended(touches, ctx);
    }

    fn tick(&mut self, ctx: &TickContext) {
        self.0.tick(ctx);
    }

    fn fire_recognized(&self) {
        self.0.fire_recognized();
    }

    fn on_reset(&mut self) {
        self.0.on_reset();
    }
}
