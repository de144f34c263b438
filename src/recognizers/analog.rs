//! Invisible analog sticks and touch pads.

use bevy::math::Vec2;

use crate::boundary::BoundaryRegion;
use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::response_curve::AxisResponse;
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchPhase, TouchSample};

/// How far from the center a touch must go to reach full deflection, in pixels
pub const DEFAULT_ANALOG_RADIUS: f32 = 50.0;

/// Where the neutral position of an [`AnalogRecognizer`] lies
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AnalogOrigin {
    /// The center of the boundary region
    RegionCenter,
    /// Wherever the controlling touch began
    #[default]
    FirstTouch,
    /// A fixed point in surface space
    Fixed(Vec2),
}

/// How far from the origin a touch must go to reach full deflection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalogExtent {
    /// The same distance in pixels on both axes
    Radius(f32),
    /// Half the width and half the height of the boundary region
    RegionSize,
}

impl Default for AnalogExtent {
    fn default() -> Self {
        Self::Radius(DEFAULT_ANALOG_RADIUS)
    }
}

/// Maps a touch's offset from a center point onto a value within `[-1, 1]` on both axes
///
/// The value is recomputed every tick the touch moves, passed through the [`response`](Self::response)
/// curve and reported through [`recognized`](Self::recognized).
/// It returns to zero when the touch lifts.
///
/// # Example
/// ```rust
/// use bevy::math::Vec2;
/// use bevy::utils::Duration;
/// use leafwing_touch::prelude::*;
///
/// let mut pad = AnalogRecognizer::touch_pad(BoundaryRegion::new(0., 0., 200., 100.));
/// let ctx = TickContext::new(Duration::ZERO, &GestureSettings::default());
///
/// pad.recognize_touches(&mut vec![TouchSample::began(0, Vec2::new(150., 75.))], &ctx);
/// assert_eq!(pad.value(), Vec2::new(0.5, 0.5));
/// ```
#[derive(Debug, Clone)]
pub struct AnalogRecognizer {
    core: RecognizerCore,
    /// The neutral position
    pub origin: AnalogOrigin,
    /// The distance giving full deflection
    pub extent: AnalogExtent,
    /// Wait for the touch to move before reporting anything
    ///
    /// Useful when a tap recognizer shares the same region.
    pub ignore_initial_touch: bool,
    /// Applied to the magnitude of each axis after clamping
    pub response: AxisResponse,
    /// Called every tick the value is updated
    pub recognized: Listeners<AnalogRecognizer>,
    /// Called when the controlling touch lifts after a value was reported
    pub completed: Listeners<AnalogRecognizer>,
    center: Vec2,
    value: Vec2,
}

impl AnalogRecognizer {
    /// Creates an analog stick centered on the first touch inside `region`
    #[must_use]
    pub fn new(region: BoundaryRegion) -> Self {
        Self {
            core: RecognizerCore::with_boundary(region),
            origin: AnalogOrigin::default(),
            extent: AnalogExtent::default(),
            ignore_initial_touch: false,
            response: AxisResponse::default(),
            recognized: Listeners::default(),
            completed: Listeners::default(),
            center: Vec2::ZERO,
            value: Vec2::ZERO,
        }
    }

    /// Creates a touch pad: the center of `region` is neutral and its edges give full deflection
    #[must_use]
    pub fn touch_pad(region: BoundaryRegion) -> Self {
        Self {
            origin: AnalogOrigin::RegionCenter,
            extent: AnalogExtent::RegionSize,
            ..Self::new(region)
        }
    }

    /// Sets the [`response`](Self::response) curve
    #[must_use]
    pub fn with_response(mut self, response: impl Into<AxisResponse>) -> Self {
        self.response = response.into();
        self
    }

    /// The current value, within `[-1, 1]` on both axes
    #[must_use]
    pub fn value(&self) -> Vec2 {
        self.value
    }

    /// The neutral position currently in use
    #[must_use]
    pub fn center(&self) -> Vec2 {
        match (self.origin, self.core.boundary) {
            (AnalogOrigin::RegionCenter, Some(region)) => region.center(),
            (AnalogOrigin::Fixed(center), _) => center,
            _ => self.center,
        }
    }

    fn extent_xy(&self) -> Vec2 {
        match (self.extent, self.core.boundary) {
            (AnalogExtent::Radius(radius), _) => Vec2::splat(radius),
            (AnalogExtent::RegionSize, Some(region)) => region.size() / 2.0,
            (AnalogExtent::RegionSize, None) => Vec2::splat(DEFAULT_ANALOG_RADIUS),
        }
    }

    fn update_value(&mut self) {
        let offset = self.core.touch_location() - self.center();
        let extent = self.extent_xy();
        let normalize = |offset: f32, extent: f32| {
            if extent > 0.0 {
                (offset / extent).clamp(-1.0, 1.0)
            } else {
                0.0
            }
        };

        let raw = Vec2::new(normalize(offset.x, extent.x), normalize(offset.y, extent.y));
        self.value = self.response.apply_xy(raw);
        self.set_state(GestureState::RecognizedAndStillRecognizing);
    }
}

impl GestureRecognizer for AnalogRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn touches_began(&mut self, touches: &[TouchSample], _ctx: &TickContext) -> bool {
        if self.state() != GestureState::Possible {
            return false;
        }

        for touch in touches.iter().filter(|touch| touch.phase == TouchPhase::Began) {
            self.core.track(touch);
        }

        if self.core.tracked_count() > 0 {
            self.center = self.core.start_touch_location();
            self.set_state(GestureState::Began);

            if !self.ignore_initial_touch {
                self.update_value();
            }
        }

        false
    }

    fn touches_moved(&mut self, _touches: &[TouchSample], _ctx: &TickContext) {
        if matches!(
            self.state(),
            GestureState::Began | GestureState::RecognizedAndStillRecognizing
        ) {
            self.update_value();
        }
    }

    fn touches_ended(&mut self, touches: &[TouchSample], _ctx: &TickContext) {
        self.core.untrack_finished(touches);

        if self.state() == GestureState::RecognizedAndStillRecognizing {
            self.completed.notify(self);
        }

        self.value = Vec2::ZERO;
        self.set_state(GestureState::FailedOrEnded);
    }

    fn fire_recognized(&self) {
        self.recognized.notify(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::test_utils::ctx_at;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter(listeners: &mut Listeners<AnalogRecognizer>) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let count = calls.clone();
        listeners.add(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });
        calls
    }

    #[test]
    fn stick_follows_the_first_touch() {
        let mut stick = AnalogRecognizer::new(BoundaryRegion::new(0., 0., 400., 400.));
        let recognized = counter(&mut stick.recognized);
        let completed = counter(&mut stick.completed);
        let start = Vec2::new(100., 100.);

        stick.recognize_touches(&mut vec![TouchSample::began(0, start)], &ctx_at(0));
        assert_eq!(stick.center(), start);
        assert_eq!(stick.value(), Vec2::ZERO);
        assert_eq!(recognized.load(Ordering::SeqCst), 1);

        let moved = Vec2::new(125., 40.);
        stick.recognize_touches(&mut vec![TouchSample::moved(0, start, moved)], &ctx_at(16));
        assert_eq!(stick.value(), Vec2::new(0.5, -1.0));
        assert_eq!(recognized.load(Ordering::SeqCst), 2);

        stick.recognize_touches(&mut vec![TouchSample::ended(0, start, moved)], &ctx_at(32));
        assert_eq!(stick.value(), Vec2::ZERO);
        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert_eq!(stick.state(), GestureState::Possible);
    }

    #[test]
    fn initial_touch_can_be_ignored() {
        let mut stick = AnalogRecognizer {
            ignore_initial_touch: true,
            origin: AnalogOrigin::Fixed(Vec2::ZERO),
            ..AnalogRecognizer::new(BoundaryRegion::new(-100., -100., 200., 200.))
        };
        let recognized = counter(&mut stick.recognized);
        let completed = counter(&mut stick.completed);
        let start = Vec2::new(-25., 0.);

        stick.recognize_touches(&mut vec![TouchSample::began(0, start)], &ctx_at(0));
        assert_eq!(stick.state(), GestureState::Began);
        assert_eq!(recognized.load(Ordering::SeqCst), 0);

        // Released before moving, like a tap
        stick.recognize_touches(&mut vec![TouchSample::ended(0, start, start)], &ctx_at(16));
        assert_eq!(completed.load(Ordering::SeqCst), 0);

        stick.recognize_touches(&mut vec![TouchSample::began(1, start)], &ctx_at(32));
        stick.recognize_touches(
            &mut vec![TouchSample::moved(1, start, Vec2::new(-50., 0.))],
            &ctx_at(48),
        );
        assert_eq!(stick.value(), Vec2::new(-1.0, 0.0));
        assert_eq!(recognized.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn response_curve_keeps_the_sign() {
        let mut stick = AnalogRecognizer::new(BoundaryRegion::new(0., 0., 400., 400.))
            .with_response(AxisResponse::Exponent(2.0));
        let start = Vec2::new(200., 200.);

        stick.recognize_touches(&mut vec![TouchSample::began(0, start)], &ctx_at(0));
        stick.recognize_touches(
            &mut vec![TouchSample::moved(0, start, Vec2::new(175., 225.))],
            &ctx_at(16),
        );
        assert_eq!(stick.value(), Vec2::new(-0.25, 0.25));
    }

    #[test]
    fn touch_pad_uses_the_region() {
        let mut pad = AnalogRecognizer::touch_pad(BoundaryRegion::new(0., 0., 200., 100.));
        let start = Vec2::new(150., 75.);

        pad.recognize_touches(&mut vec![TouchSample::began(0, start)], &ctx_at(0));
        assert_eq!(pad.center(), Vec2::new(100., 50.));
        assert_eq!(pad.value(), Vec2::new(0.5, 0.5));

        pad.recognize_touches(
            &mut vec![TouchSample::moved(0, start, Vec2::new(0., 0.))],
            &ctx_at(16),
        );
        assert_eq!(pad.value(), Vec2::new(-1.0, -1.0));
    }
}
