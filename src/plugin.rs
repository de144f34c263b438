//! Contains the main plugin exported by this crate.

use bevy::app::{App, Plugin, PreUpdate};
use bevy::ecs::prelude::*;
use bevy::input::InputSystem;
#[cfg(feature = "ui")]
use bevy::ui::UiSystem;

use crate::dispatcher::GestureDispatcher;
use crate::settings::GestureSettings;
use crate::touch_streams::TouchStreams;

/// A [`Plugin`] that turns Bevy's touch (and optionally mouse) input into gestures
///
/// Register recognizers with the [`GestureDispatcher`] resource; their listeners are called
/// from within [`GestureSystem::Recognize`].
///
/// Insert your own [`GestureSettings`] before adding the plugin to override the defaults.
///
/// ## Systems
///
/// **WARNING:** These systems run during [`PreUpdate`].
/// If you have systems that read recognizer state during this schedule,
/// order them after [`GestureSystem::Recognize`].
///
/// Complete list:
///
/// - [`collect_touch_samples`](crate::systems::collect_touch_samples), which reads [`Touches`](bevy::input::touch::Touches)
///   and the mouse into the [`TouchStreams`]
///     - labeled [`GestureSystem::Collect`]
/// - [`recognize_gestures`](crate::systems::recognize_gestures), which feeds the collected samples to the [`GestureDispatcher`]
///     - labeled [`GestureSystem::Recognize`]
#[derive(Debug, Default)]
pub struct GesturePlugin;

impl Plugin for GesturePlugin {
    fn build(&self, app: &mut App) {
        use crate::systems::*;

        app.configure_sets(
            PreUpdate,
            (GestureSystem::Collect, GestureSystem::Recognize)
                .chain()
                .after(InputSystem),
        );

        #[cfg(feature = "ui")]
        app.configure_sets(PreUpdate, GestureSystem::Collect.after(UiSystem::Focus));

        app.add_systems(
            PreUpdate,
            (
                collect_touch_samples.in_set(GestureSystem::Collect),
                recognize_gestures.in_set(GestureSystem::Recognize),
            ),
        );

        // Resources
        app.init_resource::<GestureSettings>()
            .init_resource::<GestureDispatcher>()
            .init_resource::<TouchStreams>();
    }
}

/// [`SystemSet`]s for the [`crate::systems`] used by this crate
///
/// `Collect` must occur before `Recognize`
#[derive(SystemSet, Clone, Copy, Hash, Debug, PartialEq, Eq)]
pub enum GestureSystem {
    /// Collects touch and mouse input into [`TouchSample`](crate::touch::TouchSample)s
    Collect,
    /// Runs every registered recognizer over the collected samples
    Recognize,
}
