#![forbid(missing_docs)]
#![forbid(unsafe_code)]
#![warn(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod boundary;
pub mod dispatcher;
pub mod errors;
mod input_mocking;
pub mod listeners;
pub mod plugin;
pub mod recognizer;
pub mod recognizers;
pub mod response_curve;
pub mod settings;
pub mod state;
pub mod systems;
pub mod touch;
pub mod touch_streams;

// Re-export this at the root level
pub use input_mocking::MockTouches;

/// Everything you need to get started
pub mod prelude {
    pub use crate::boundary::{Anchor, BoundaryRegion};
    pub use crate::dispatcher::{GestureDispatcher, RecognizerHandle};
    pub use crate::listeners::{ListenerHandle, Listeners};
    pub use crate::plugin::{GesturePlugin, GestureSystem};
    pub use crate::recognizer::GestureRecognizer;
    pub use crate::recognizers::{
        AnalogExtent, AnalogOrigin, AnalogRecognizer, AngleSwipeRecognizer, AnyTouchRecognizer,
        ButtonRecognizer, CurveRecognizer, FingerSwipe, LongPressRecognizer,
        MultiFingerSwipeRecognizer, OneFingerRotationRecognizer, PanRecognizer,
        PathSwipeRecognizer, PinchRecognizer, PressRecognizer, RotationRecognizer, SwipeDirection,
        SwipeRecognizer, TapRecognizer, TriggerRecognizer,
    };
    pub use crate::response_curve::AxisResponse;
    pub use crate::settings::{GestureSettings, TickContext};
    pub use crate::state::GestureState;
    pub use crate::touch::{TouchId, TouchPhase, TouchSample};
}
