//! Helpful utilities for testing gestures by sending mock touches

use bevy::app::App;
use bevy::ecs::world::World;
use bevy::math::Vec2;

use crate::touch::{TouchId, TouchSample};
use crate::touch_streams::TouchStreams;

/// Send fake touches for testing purposes
///
/// Mocked contacts are picked up by [`collect_touch_samples`](crate::systems::collect_touch_samples)
/// on the next update, and stay down (reported as held) until released.
///
/// # Examples
/// ```rust
/// use bevy::prelude::*;
/// use leafwing_touch::prelude::*;
/// use leafwing_touch::MockTouches;
///
/// let mut app = App::new();
/// app.add_plugins((MinimalPlugins, GesturePlugin));
///
/// let tap = app
///     .world_mut()
///     .resource_mut::<GestureDispatcher>()
///     .add_recognizer(TapRecognizer::default());
///
/// app.press_touch(0, Vec2::new(10., 10.));
/// app.update();
/// assert_eq!(
///     app.world().resource::<GestureDispatcher>().get::<TapRecognizer>(tap).unwrap().state(),
///     GestureState::Began
/// );
///
/// app.release_touch(0);
/// app.update();
/// ```
pub trait MockTouches {
    /// Presses a contact at `position`, in y-up surface space
    fn press_touch(&mut self, id: TouchId, position: Vec2);

    /// Moves a pressed contact to `position`
    fn move_touch(&mut self, id: TouchId, position: Vec2);

    /// Lifts a pressed contact
    fn release_touch(&mut self, id: TouchId);

    /// Sends `sample` as is on the next update, bypassing the conversion of raw contacts
    fn send_touch_sample(&mut self, sample: TouchSample);
}

impl MockTouches for World {
    fn press_touch(&mut self, id: TouchId, position: Vec2) {
        self.get_resource_or_insert_with(TouchStreams::default)
            .press_mock(id, position);
    }

    fn move_touch(&mut self, id: TouchId, position: Vec2) {
        self.get_resource_or_insert_with(TouchStreams::default)
            .move_mock(id, position);
    }

    fn release_touch(&mut self, id: TouchId) {
        self.get_resource_or_insert_with(TouchStreams::default)
            .release_mock(id);
    }

    fn send_touch_sample(&mut self, sample: TouchSample) {
        self.get_resource_or_insert_with(TouchStreams::default)
            .send_sample(sample);
    }
}

impl MockTouches for App {
    fn press_touch(&mut self, id: TouchId, position: Vec2) {
        self.world_mut().press_touch(id, position);
    }

    fn move_touch(&mut self, id: TouchId, position: Vec2) {
        self.world_mut().move_touch(id, position);
    }

    fn release_touch(&mut self, id: TouchId) {
        self.world_mut().release_touch(id);
    }

    fn send_touch_sample(&mut self, sample: TouchSample) {
        self.world_mut().send_touch_sample(sample);
    }
}
