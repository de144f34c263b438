//! The systems that power the [`GesturePlugin`](crate::plugin::GesturePlugin).

use bevy::ecs::prelude::*;
use bevy::input::{mouse::MouseButton, touch::Touches, ButtonInput};
use bevy::math::Vec2;
use bevy::time::{Real, Time};
use bevy::window::{PrimaryWindow, Window};

#[cfg(feature = "ui")]
use bevy::ui::Interaction;
#[cfg(feature = "egui")]
use bevy_egui::EguiContext;

use crate::dispatcher::GestureDispatcher;
use crate::settings::{GestureSettings, TickContext};
use crate::touch::MOUSE_TOUCH_ID;
use crate::touch_streams::{RawContact, TouchStreams};

/// Converts this tick's [`Touches`] and left mouse button into [`TouchSample`](crate::touch::TouchSample)s
///
/// Window positions are flipped into y-up surface space.
/// Contacts that stopped being reported without a release are forgotten.
/// Missing resources are treated as if nothing was touched.
#[allow(clippy::too_many_arguments)]
pub fn collect_touch_samples(
    touches: Option<Res<Touches>>,
    mouse_buttons: Option<Res<ButtonInput<MouseButton>>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    settings: Res<GestureSettings>,
    time: Res<Time<Real>>,
    mut streams: ResMut<TouchStreams>,
    #[cfg(feature = "ui")] interactions: Query<&Interaction>,
    #[cfg(feature = "egui")] mut maybe_egui: Query<&mut EguiContext>,
) {
    let now = time.elapsed();
    let window = windows.get_single().ok();
    let to_surface = |position: Vec2| match window {
        Some(window) => Vec2::new(position.x, window.height() - position.y),
        None => position,
    };

    if let Some(touches) = touches {
        for touch in touches.iter() {
            let contact = if touches.just_pressed(touch.id()) {
                RawContact::Pressed
            } else {
                RawContact::Held
            };
            streams.report(touch.id(), to_surface(touch.position()), contact, now, &settings);
        }
        for touch in touches.iter_just_released() {
            let position = to_surface(touch.position());
            streams.report(touch.id(), position, RawContact::Released, now, &settings);
        }
        for touch in touches.iter_just_canceled() {
            let position = to_surface(touch.position());
            streams.report(touch.id(), position, RawContact::Cancelled, now, &settings);
        }
    }

    if let Some(mouse_buttons) = mouse_buttons.filter(|_| settings.simulate_touches_with_mouse) {
        // Clicks on a button are not touches on the game
        #[cfg(feature = "ui")]
        let blocked = interactions
            .iter()
            .any(|&interaction| interaction != Interaction::None);
        #[cfg(not(feature = "ui"))]
        let blocked = false;

        // `wants_pointer_input` sometimes returns `false` after clicking or holding a button over a widget,
        // so `is_pointer_over_area` is also needed.
        #[cfg(feature = "egui")]
        let blocked = blocked
            || maybe_egui.iter_mut().any(|mut ctx| {
                ctx.get_mut().is_pointer_over_area() || ctx.get_mut().wants_pointer_input()
            });

        let cursor = window
            .and_then(Window::cursor_position)
            .map(to_surface)
            .or_else(|| streams.last_position(MOUSE_TOUCH_ID));

        if let Some(cursor) = cursor {
            let contact = if mouse_buttons.just_pressed(MouseButton::Left) {
                (!blocked).then_some(RawContact::Pressed)
            } else if mouse_buttons.just_released(MouseButton::Left) {
                Some(RawContact::Released)
            } else if mouse_buttons.pressed(MouseButton::Left) {
                streams
                    .last_position(MOUSE_TOUCH_ID)
                    .map(|_| RawContact::Held)
            } else {
                None
            };

            if let Some(contact) = contact {
                streams.report(MOUSE_TOUCH_ID, cursor, contact, now, &settings);
            }
        }
    }

    streams.collect_mocks(now, &settings);
    streams.forget_unreported();
}

/// Runs one recognition pass over the samples collected this tick
pub fn recognize_gestures(
    mut streams: ResMut<TouchStreams>,
    mut dispatcher: ResMut<GestureDispatcher>,
    settings: Res<GestureSettings>,
    time: Res<Time<Real>>,
) {
    let ctx = TickContext::new(time.elapsed(), &settings);
    dispatcher.update(&ctx, streams.drain());
}
