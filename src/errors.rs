//! Errors that may occur while driving gesture recognizers

use derive_more::{Display, Error};

use crate::dispatcher::RecognizerHandle;
use crate::state::GestureState;

/// A recognizer asked for a state change that is absent from the transition table
///
/// See [`GestureState::can_transition_to`].
/// The state of the recognizer is left unchanged.
#[derive(Debug, Clone, Copy, Error, Display, PartialEq, Eq)]
#[display(fmt = "invalid gesture state transition from {:?} to {:?}", from, to)]
pub struct InvalidTransition {
    /// The state the recognizer was in
    pub from: GestureState,
    /// The state that was requested
    pub to: GestureState,
}

/// The recognizer to remove was never added to the [`GestureDispatcher`](crate::dispatcher::GestureDispatcher),
/// or was already removed
#[derive(Debug, Clone, Copy, Error, Display, PartialEq, Eq)]
#[display(fmt = "no gesture recognizer is registered under {:?}", _0)]
pub struct UnregisteredRecognizer(#[error(not(source))] pub RecognizerHandle);
