//! Regions that react to any touch inside them.

use crate::boundary::BoundaryRegion;
use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchPhase, TouchSample};

/// Reports when touches enter or leave a region
///
/// Unlike most recognizers, touches do not need to begin inside the region:
/// a touch sliding in from outside counts too.
/// [`entered`](Self::entered) fires when the first touch arrives,
/// and [`exited`](Self::exited) when the last one leaves or lifts.
/// Touches are never consumed.
#[derive(Debug, Clone)]
pub struct AnyTouchRecognizer {
    core: RecognizerCore,
    region: BoundaryRegion,
    /// Called when the region goes from zero to one touch
    pub entered: Listeners<AnyTouchRecognizer>,
    /// Called when the region goes from one to zero touches
    pub exited: Listeners<AnyTouchRecognizer>,
}

impl AnyTouchRecognizer {
    /// Creates a recognizer watching `region`
    #[must_use]
    pub fn new(region: BoundaryRegion) -> Self {
        let mut core = RecognizerCore::with_boundary(region);
        core.always_send_moved = true;

        Self {
            core,
            region,
            entered: Listeners::default(),
            exited: Listeners::default(),
        }
    }

    /// The region being watched
    #[must_use]
    pub fn region(&self) -> BoundaryRegion {
        self.region
    }

    fn touch_entered(&mut self, touch: &TouchSample) {
        self.core.track(touch);
        if self.core.tracked_count() == 1 {
            self.entered.notify(self);
        }
    }

    fn touch_exited(&mut self, touch: &TouchSample) {
        if self.core.untrack(touch.id) && self.core.tracked_count() == 0 {
            self.exited.notify(self);
        }
    }
}

impl GestureRecognizer for AnyTouchRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn touches_began(&mut self, touches: &[TouchSample], _ctx: &TickContext) -> bool {
        for touch in touches.iter().filter(|touch| touch.phase == TouchPhase::Began) {
            if !self.core.is_tracking(touch.id) {
                self.touch_entered(touch);
            }
        }

        if self.core.tracked_count() > 0 && self.state() != GestureState::RecognizedAndStillRecognizing {
            self.set_state(GestureState::RecognizedAndStillRecognizing);
        }

        false
    }

    fn touches_moved(&mut self, touches: &[TouchSample], _ctx: &TickContext) {
        for touch in touches.iter().filter(|touch| touch.phase.is_active()) {
            let inside = self.region.contains(touch.position);
            let tracking = self.core.is_tracking(touch.id);

            if inside && !tracking {
                self.touch_entered(touch);
            } else if !inside && tracking {
                self.touch_exited(touch);
            }
        }

        match (self.core.tracked_count(), self.state()) {
            (0, GestureState::RecognizedAndStillRecognizing) => {
                self.set_state(GestureState::Possible);
            }
            (1.., GestureState::Possible) => {
                self.set_state(GestureState::RecognizedAndStillRecognizing);
            }
            _ => (),
        }
    }

    fn touches_ended(&mut self, touches: &[TouchSample], _ctx: &TickContext) {
        for touch in touches.iter().filter(|touch| touch.phase.is_finished()) {
            self.touch_exited(touch);
        }

        if self.core.tracked_count() == 0 {
            self.set_state(GestureState::FailedOrEnded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::test_utils::ctx_at;
    use bevy::math::Vec2;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counters(any: &mut AnyTouchRecognizer) -> (Arc<AtomicU32>, Arc<AtomicU32>) {
        let entered = Arc::new(AtomicU32::new(0));
        let exited = Arc::new(AtomicU32::new(0));

        let counter = entered.clone();
        any.entered.add(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = exited.clone();
        any.exited.add(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        (entered, exited)
    }

    #[test]
    fn sliding_in_and_out() {
        let mut any = AnyTouchRecognizer::new(BoundaryRegion::new(0., 0., 50., 50.));
        let (entered, exited) = counters(&mut any);
        let start = Vec2::new(100., 25.);

        // Begins outside, so the began phase never reaches the recognizer
        any.recognize_touches(&mut vec![TouchSample::began(0, start)], &ctx_at(0));
        assert_eq!(entered.load(Ordering::SeqCst), 0);

        let inside = TouchSample::moved(0, start, Vec2::new(25., 25.));
        any.recognize_touches(&mut vec![inside], &ctx_at(16));
        assert_eq!(entered.load(Ordering::SeqCst), 1);
        assert_eq!(any.state(), GestureState::RecognizedAndStillRecognizing);

        let still_inside = TouchSample::moved_from(&inside, Vec2::new(30., 25.));
        any.recognize_touches(&mut vec![still_inside], &ctx_at(32));

        let outside = TouchSample::moved_from(&still_inside, Vec2::new(80., 25.));
        any.recognize_touches(&mut vec![outside], &ctx_at(48));
        assert_eq!(entered.load(Ordering::SeqCst), 1);
        assert_eq!(exited.load(Ordering::SeqCst), 1);
        assert_eq!(any.state(), GestureState::Possible);
    }

    #[test]
    fn second_touch_does_not_reenter() {
        let mut any = AnyTouchRecognizer::new(BoundaryRegion::new(0., 0., 50., 50.));
        let (entered, exited) = counters(&mut any);
        let (a, b) = (Vec2::new(10., 10.), Vec2::new(20., 20.));

        any.recognize_touches(&mut vec![TouchSample::began(0, a)], &ctx_at(0));
        any.recognize_touches(&mut vec![TouchSample::began(1, b)], &ctx_at(16));
        assert_eq!(entered.load(Ordering::SeqCst), 1);

        any.recognize_touches(&mut vec![TouchSample::ended(0, a, a)], &ctx_at(32));
        assert_eq!(exited.load(Ordering::SeqCst), 0);
        assert_eq!(any.state(), GestureState::RecognizedAndStillRecognizing);

        any.recognize_touches(&mut vec![TouchSample::ended(1, b, b)], &ctx_at(48));
        assert_eq!(exited.load(Ordering::SeqCst), 1);
        assert_eq!(any.state(), GestureState::Possible);
    }

    #[test]
    fn never_consumes() {
        let mut any = AnyTouchRecognizer::new(BoundaryRegion::new(0., 0., 50., 50.)).with_z_index(3);
        let mut batch = vec![TouchSample::began(0, Vec2::new(10., 10.))];

        any.recognize_touches(&mut batch, &ctx_at(0));
        assert_eq!(batch.len(), 1);
    }
}
