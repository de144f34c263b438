//! The finite-state machine shared by every recognizer.

use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

/// The state of a [`GestureRecognizer`](crate::recognizer::GestureRecognizer)
///
/// Recognizers start out [`Possible`](GestureState::Possible).
/// Entering [`Recognized`](GestureState::Recognized) or
/// [`RecognizedAndStillRecognizing`](GestureState::RecognizedAndStillRecognizing) fires the recognizer's
/// "recognized" listeners, and entering [`Recognized`](GestureState::Recognized) or
/// [`FailedOrEnded`](GestureState::FailedOrEnded) resets the recognizer back to
/// [`Possible`](GestureState::Possible).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum GestureState {
    /// Listening for touches, nothing latched yet
    #[default]
    Possible,
    /// At least one touch is latched, but the gesture is not confirmed yet
    Began,
    /// A continuous gesture is active and reports again on every qualifying tick
    RecognizedAndStillRecognizing,
    /// A discrete gesture was recognized once
    Recognized,
    /// The gesture failed to recognize, or finished
    FailedOrEnded,
}

impl GestureState {
    /// Is moving from `self` to `next` allowed?
    ///
    /// This single table is shared by every recognizer kind:
    /// concrete recognizers only differ in when they request a transition.
    ///
    /// # Example
    /// ```rust
    /// use leafwing_touch::state::GestureState;
    ///
    /// assert!(GestureState::Possible.can_transition_to(GestureState::Began));
    /// assert!(GestureState::Began.can_transition_to(GestureState::Recognized));
    /// assert!(!GestureState::Possible.can_transition_to(GestureState::Recognized));
    /// assert!(!GestureState::FailedOrEnded.can_transition_to(GestureState::Began));
    /// ```
    #[must_use]
    pub const fn can_transition_to(self, next: GestureState) -> bool {
        use GestureState::*;

        match self {
            Possible => matches!(
                next,
                Possible | Began | RecognizedAndStillRecognizing | FailedOrEnded
            ),
            Began => true,
            RecognizedAndStillRecognizing => matches!(
                next,
                Possible | Began | RecognizedAndStillRecognizing | FailedOrEnded
            ),
            // Terminal states only ever leave through a reset
            Recognized | FailedOrEnded => matches!(next, Possible),
        }
    }

    /// Does entering this state fire the "recognized" listeners?
    #[inline]
    #[must_use]
    pub const fn fires_recognized(self) -> bool {
        matches!(
            self,
            GestureState::Recognized | GestureState::RecognizedAndStillRecognizing
        )
    }

    /// Does entering this state reset the recognizer?
    #[inline]
    #[must_use]
    pub const fn resets(self) -> bool {
        matches!(self, GestureState::Recognized | GestureState::FailedOrEnded)
    }

    /// Should touches still be dispatched to a recognizer in this state?
    #[inline]
    #[must_use]
    pub const fn accepts_touches(self) -> bool {
        !self.resets()
    }

    /// Is the gesture actively recognizing?
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, GestureState::RecognizedAndStillRecognizing)
    }
}

#[cfg(test)]
mod tests {
    use super::GestureState::{self, *};
    use serde_test::{assert_tokens, Token};

    const ALL: [GestureState; 5] = [
        Possible,
        Began,
        RecognizedAndStillRecognizing,
        Recognized,
        FailedOrEnded,
    ];

    #[test]
    fn every_state_can_reach_possible() {
        for state in ALL {
            assert!(state.can_transition_to(Possible), "{state:?}");
        }
    }

    #[test]
    fn terminal_states_reset_and_stop_dispatch() {
        for state in ALL {
            assert_eq!(state.resets(), !state.accepts_touches());
        }

        assert!(Recognized.resets());
        assert!(FailedOrEnded.resets());
        assert!(!RecognizedAndStillRecognizing.resets());
    }

    #[test]
    fn continuous_gestures_can_refire() {
        assert!(RecognizedAndStillRecognizing.can_transition_to(RecognizedAndStillRecognizing));
        assert!(RecognizedAndStillRecognizing.fires_recognized());
        assert!(!RecognizedAndStillRecognizing.can_transition_to(Recognized));
    }

    #[test]
    fn state_serialization() {
        assert_tokens(
            &RecognizedAndStillRecognizing,
            &[Token::UnitVariant {
                name: "GestureState",
                variant: "RecognizedAndStillRecognizing",
            }],
        );
    }
}
