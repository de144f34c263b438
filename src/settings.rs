//! Configuration shared by every recognizer, and the per-tick context derived from it.

use bevy::ecs::system::Resource;
use bevy::math::Vec2;
use bevy::reflect::Reflect;
use bevy::utils::Duration;
use serde::{Deserialize, Serialize};

const INCHES_TO_CENTIMETERS: f32 = 2.54;

/// The dpi assumed when the display does not report one
pub const FALLBACK_DPI: f32 = 72.0;

/// Global configuration for gesture recognition
///
/// Inserted as a resource by [`GesturePlugin`](crate::plugin::GesturePlugin) unless already present,
/// so insert your own copy before adding the plugin to override the defaults.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct GestureSettings {
    /// How many surface pixels make up one centimetre on the physical display.
    ///
    /// Every threshold expressed in centimetres is converted with this value.
    pub pixels_per_cm: f32,
    /// Contacts beyond this many simultaneous touches are ignored by the collaborator
    pub max_touches: usize,
    /// Should the left mouse button be reported as a touch?
    pub simulate_touches_with_mouse: bool,
    /// Taps that start within this long of the previous release increase the tap count
    pub multi_tap_interval: Duration,
    /// Taps that start further than this from the previous release reset the tap count
    pub multi_tap_radius_cm: f32,
    /// The surface size that design-time regions and distances are authored against
    pub design_resolution: Vec2,
    /// When false, [`runtime_scale`](Self::runtime_scale) is always one
    pub auto_scale: bool,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            pixels_per_cm: FALLBACK_DPI / INCHES_TO_CENTIMETERS,
            max_touches: 2,
            simulate_touches_with_mouse: true,
            multi_tap_interval: Duration::from_millis(200),
            multi_tap_radius_cm: 1.0,
            design_resolution: Vec2::new(320.0, 180.0),
            auto_scale: true,
        }
    }
}

impl GestureSettings {
    /// Creates the default settings for a display of the given dpi
    ///
    /// A dpi of zero (unknown) falls back to [`FALLBACK_DPI`].
    #[must_use]
    pub fn from_dpi(dpi: f32) -> Self {
        let dpi = if dpi > 0.0 { dpi } else { FALLBACK_DPI };
        Self {
            pixels_per_cm: dpi / INCHES_TO_CENTIMETERS,
            ..Default::default()
        }
    }

    /// The per-axis factor that maps design-time coordinates onto a surface of `surface_size`
    #[must_use]
    pub fn runtime_scale(&self, surface_size: Vec2) -> Vec2 {
        if !self.auto_scale || self.design_resolution.cmple(Vec2::ZERO).any() {
            return Vec2::ONE;
        }

        surface_size / self.design_resolution
    }

    /// The factor that maps design-time distances onto a surface of `surface_size`
    ///
    /// This is the average of both axes of [`runtime_scale`](Self::runtime_scale).
    #[must_use]
    pub fn distance_scale(&self, surface_size: Vec2) -> f32 {
        let scale = self.runtime_scale(surface_size);
        (scale.x + scale.y) / 2.0
    }
}

/// Everything a recognizer needs to know about the current tick, besides the touches themselves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// The time elapsed since startup at the beginning of this tick
    pub now: Duration,
    /// How many surface pixels make up one centimetre
    pub pixels_per_cm: f32,
}

impl TickContext {
    /// Creates the context for the tick happening at `now`
    #[must_use]
    pub fn new(now: Duration, settings: &GestureSettings) -> Self {
        Self {
            now,
            pixels_per_cm: settings.pixels_per_cm,
        }
    }

    /// Converts a distance in surface pixels into centimetres
    #[inline]
    #[must_use]
    pub fn to_cm(&self, pixels: f32) -> f32 {
        if self.pixels_per_cm > 0.0 {
            pixels / self.pixels_per_cm
        } else {
            pixels
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_dpi_falls_back() {
        assert_eq!(GestureSettings::from_dpi(0.0), GestureSettings::default());
        assert_eq!(GestureSettings::from_dpi(254.0).pixels_per_cm, 100.0);
    }

    #[test]
    fn runtime_scale_follows_design_resolution() {
        let settings = GestureSettings::default();
        assert_eq!(
            settings.runtime_scale(Vec2::new(640., 540.)),
            Vec2::new(2., 3.)
        );
        assert_eq!(settings.distance_scale(Vec2::new(640., 540.)), 2.5);

        let unscaled = GestureSettings {
            auto_scale: false,
            ..Default::default()
        };
        assert_eq!(unscaled.runtime_scale(Vec2::new(640., 540.)), Vec2::ONE);
    }

    #[test]
    fn tick_context_converts_to_centimetres() {
        let settings = GestureSettings::from_dpi(254.0);
        let ctx = TickContext::new(Duration::from_secs(1), &settings);
        assert_eq!(ctx.to_cm(250.0), 2.5);
    }
}
