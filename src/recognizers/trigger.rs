//! Free-form touches followed from start to end.

use crate::boundary::BoundaryRegion;
use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchPhase, TouchSample};

/// Follows a single touch that begins inside a region until it ends
///
/// Useful for virtual controls that interpret the raw touch themselves.
/// The touch that triggers the recognizer is consumed.
#[derive(Debug, Clone)]
pub struct TriggerRecognizer {
    core: RecognizerCore,
    /// Called with the touch that began inside the region
    pub triggered: Listeners<TouchSample>,
    /// Called with the latest sample every tick the touch moves
    pub moved: Listeners<TouchSample>,
    /// Called with the final sample when the touch ends
    pub ended: Listeners<TouchSample>,
}

impl TriggerRecognizer {
    /// Creates a trigger for touches beginning inside `region`
    #[must_use]
    pub fn new(region: BoundaryRegion) -> Self {
        Self {
            core: RecognizerCore::with_boundary(region),
            triggered: Listeners::default(),
            moved: Listeners::default(),
            ended: Listeners::default(),
        }
    }

    /// The latest sample of the followed touch, if any
    #[must_use]
    pub fn touch(&self) -> Option<TouchSample> {
        self.core.tracked().first().copied()
    }
}

impl GestureRecognizer for TriggerRecognizer {
    fn core(&self) -> &RecognizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RecognizerCore {
        &mut self.core
    }

    fn touches_began(&mut self, touches: &[TouchSample], _ctx: &TickContext) -> bool {
        if self.core.tracked_count() > 0 {
            return false;
        }

        let Some(touch) = touches.iter().find(|touch| touch.phase == TouchPhase::Began) else {
            return false;
        };

        self.core.track(touch);
        self.triggered.notify(touch);
        self.set_state(GestureState::Began);
        true
    }

    fn touches_moved(&mut self, _touches: &[TouchSample], _ctx: &TickContext) {
        if let Some(touch) = self.touch() {
            self.moved.notify(&touch);
            self.set_state(GestureState::RecognizedAndStillRecognizing);
        }
    }

    fn touches_ended(&mut self, touches: &[TouchSample], _ctx: &TickContext) {
        let Some(touch) = touches
            .iter()
            .find(|touch| touch.phase.is_finished() && self.core.is_tracking(touch.id))
        else {
            return;
        };

        self.ended.notify(touch);
        self.set_state(GestureState::FailedOrEnded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::test_utils::ctx_at;
    use bevy::math::Vec2;
    use std::sync::{Arc, Mutex};

    #[test]
    fn follows_one_touch() {
        let mut trigger = TriggerRecognizer::new(BoundaryRegion::new(0., 0., 100., 100.));
        let log = Arc::new(Mutex::new(Vec::new()));

        let events = log.clone();
        trigger
            .triggered
            .add(move |touch: &TouchSample| events.lock().unwrap().push(("triggered", touch.position)));
        let events = log.clone();
        trigger
            .moved
            .add(move |touch: &TouchSample| events.lock().unwrap().push(("moved", touch.position)));
        let events = log.clone();
        trigger
            .ended
            .add(move |touch: &TouchSample| events.lock().unwrap().push(("ended", touch.position)));

        let start = Vec2::new(10., 10.);
        trigger.recognize_touches(
            &mut vec![TouchSample::began(0, start), TouchSample::began(1, start)],
            &ctx_at(0),
        );
        assert_eq!(trigger.touch().map(|touch| touch.id), Some(0));

        let far = Vec2::new(300., 10.);
        trigger.recognize_touches(&mut vec![TouchSample::moved(0, start, far)], &ctx_at(16));
        assert_eq!(trigger.state(), GestureState::RecognizedAndStillRecognizing);

        trigger.recognize_touches(&mut vec![TouchSample::ended(0, start, far)], &ctx_at(32));

        assert_eq!(
            *log.lock().unwrap(),
            vec![("triggered", start), ("moved", far), ("ended", far)]
        );
        assert_eq!(trigger.touch(), None);
        assert_eq!(trigger.state(), GestureState::Possible);
    }
}
