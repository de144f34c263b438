//! Every concrete [`GestureRecognizer`](crate::recognizer::GestureRecognizer) shipped with this crate.
//!
//! Each recognizer detects one category of gesture, and exposes its events as public
//! [`Listeners`](crate::listeners::Listeners) fields alongside its configuration.

pub mod analog;
pub mod any_touch;
pub mod button;
pub mod curve;
pub mod long_press;
pub mod pan;
pub mod pinch;
pub mod rotation;
pub mod swipe;
pub mod tap;
pub mod trigger;

pub use analog::{AnalogExtent, AnalogOrigin, AnalogRecognizer};
pub use any_touch::AnyTouchRecognizer;
pub use button::ButtonRecognizer;
pub use curve::CurveRecognizer;
pub use long_press::{LongPressRecognizer, PressRecognizer};
pub use pan::PanRecognizer;
pub use pinch::PinchRecognizer;
pub use rotation::{OneFingerRotationRecognizer, RotationRecognizer};
pub use swipe::{
    AngleSwipeRecognizer, FingerSwipe, MultiFingerSwipeRecognizer, PathSwipeRecognizer,
    SwipeDirection, SwipeRecognizer,
};
pub use tap::TapRecognizer;
pub use trigger::TriggerRecognizer;
