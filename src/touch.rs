//! The per-tick description of a single tracked contact.

use bevy::math::Vec2;
use bevy::reflect::Reflect;
use bevy::utils::Duration;
use serde::{Deserialize, Serialize};

/// The identifier of one physical contact.
///
/// Stays constant from the [`TouchPhase::Began`] sample of a contact until its
/// [`TouchPhase::Ended`] or [`TouchPhase::Cancelled`] sample.
pub type TouchId = u64;

/// The [`TouchId`] used for touches synthesized from the left mouse button.
pub const MOUSE_TOUCH_ID: TouchId = u64::MAX;

/// Where a contact is in its lifecycle during the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum TouchPhase {
    /// The contact touched the surface this tick
    Began,
    /// The contact moved since the previous tick
    Moved,
    /// The contact is held down but did not move since the previous tick
    Stationary,
    /// The contact left the surface this tick
    Ended,
    /// The platform gave up on tracking the contact
    Cancelled,
}

impl TouchPhase {
    /// Is this contact finished, either by ending or by being cancelled?
    ///
    /// Recognizers treat both the same way.
    #[inline]
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, TouchPhase::Ended | TouchPhase::Cancelled)
    }

    /// Is this contact still on the surface?
    #[inline]
    #[must_use]
    pub fn is_active(self) -> bool {
        !self.is_finished()
    }
}

/// One reported contact point for a single tick.
///
/// Samples are produced once per tick by the input collaborator
/// (see [`TouchStreams`](crate::touch_streams::TouchStreams)) and are read-only to recognizers.
/// Positions use a y-up surface space, with the origin in the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct TouchSample {
    /// The stable identifier of the contact
    pub id: TouchId,
    /// The position of the contact this tick
    pub position: Vec2,
    /// How far the contact moved since the previous sample
    pub delta: Vec2,
    /// How much time passed since the previous sample
    pub delta_time: Duration,
    /// The number of consecutive taps, as counted by the collaborator
    pub tap_count: u32,
    /// Where the contact is in its lifecycle
    pub phase: TouchPhase,
    /// The position of the contact when it began
    pub start_position: Vec2,
}

impl TouchSample {
    /// Creates a sample with the given phase and position, and no motion
    #[must_use]
    pub fn new(id: TouchId, phase: TouchPhase, position: Vec2) -> Self {
        Self {
            id,
            position,
            delta: Vec2::ZERO,
            delta_time: Duration::ZERO,
            tap_count: 1,
            phase,
            start_position: position,
        }
    }

    /// A contact touching down at `position`
    #[must_use]
    pub fn began(id: TouchId, position: Vec2) -> Self {
        Self::new(id, TouchPhase::Began, position)
    }

    /// A contact that started at `start_position` and is now at `position`
    ///
    /// The delta is measured from the start, so pass intermediate samples in order
    /// with [`TouchSample::moved_from`] if the per-tick delta matters.
    #[must_use]
    pub fn moved(id: TouchId, start_position: Vec2, position: Vec2) -> Self {
        Self {
            delta: position - start_position,
            start_position,
            ..Self::new(id, TouchPhase::Moved, position)
        }
    }

    /// The next sample of `previous`, now at `position`
    ///
    /// Produces a [`TouchPhase::Stationary`] sample if the position did not change.
    #[must_use]
    pub fn moved_from(previous: &TouchSample, position: Vec2) -> Self {
        let delta = position - previous.position;
        let phase = if delta == Vec2::ZERO {
            TouchPhase::Stationary
        } else {
            TouchPhase::Moved
        };

        Self {
            id: previous.id,
            position,
            delta,
            delta_time: Duration::ZERO,
            tap_count: previous.tap_count,
            phase,
            start_position: previous.start_position,
        }
    }

    /// A contact that started at `start_position` and lifted off at `position`
    #[must_use]
    pub fn ended(id: TouchId, start_position: Vec2, position: Vec2) -> Self {
        Self {
            delta: position - start_position,
            start_position,
            ..Self::new(id, TouchPhase::Ended, position)
        }
    }

    /// Sets the [`tap_count`](Self::tap_count) of this sample
    #[must_use]
    pub fn with_tap_count(mut self, tap_count: u32) -> Self {
        self.tap_count = tap_count;
        self
    }

    /// Sets the [`delta_time`](Self::delta_time) of this sample
    #[must_use]
    pub fn with_delta_time(mut self, delta_time: Duration) -> Self {
        self.delta_time = delta_time;
        self
    }

    /// The position of the contact in the previous sample
    #[inline]
    #[must_use]
    pub fn previous_position(&self) -> Vec2 {
        self.position - self.delta
    }

    /// A copy of this sample forced into the [`TouchPhase::Ended`] phase, with no motion
    #[must_use]
    pub fn force_ended(&self) -> Self {
        Self {
            delta: Vec2::ZERO,
            phase: TouchPhase::Ended,
            ..*self
        }
    }
}
