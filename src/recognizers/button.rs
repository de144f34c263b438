//! On-screen buttons.

use crate::boundary::BoundaryRegion;
use crate::listeners::Listeners;
use crate::recognizer::{GestureRecognizer, RecognizerCore};
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchPhase, TouchSample};

/// How far the highlighted region of a [`ButtonRecognizer`] extends past its default region, in pixels
pub const DEFAULT_HIGHLIGHT_MARGIN: f32 = 40.0;

/// A button pressed by touching its region and released by lifting the touch
///
/// A touch beginning inside the default region selects the button.
/// While selected, the button grows to its highlighted region so the finger can wander a little:
/// leaving the highlighted region deselects the button without releasing the touch,
/// and coming back selects it again.
/// Lifting the touch while selected reports a [`touch_up_inside`](Self::touch_up_inside).
///
/// The state mirrors the highlight: [`GestureState::RecognizedAndStillRecognizing`] while selected,
/// [`GestureState::Began`] while the tracked touch is outside.
#[derive(Debug, Clone)]
pub struct ButtonRecognizer {
    core: RecognizerCore,
    default_region: BoundaryRegion,
    highlighted_region: BoundaryRegion,
    /// Called when a touch begins on the button, or comes back onto it
    pub selected: Listeners<ButtonRecognizer>,
    /// Called when the tracked touch leaves the highlighted region
    pub deselected: Listeners<ButtonRecognizer>,
    /// Called when the tracked touch lifts while the button is selected
    pub touch_up_inside: Listeners<ButtonRecognizer>,
}

impl ButtonRecognizer {
    /// Creates a button whose highlighted region extends [`DEFAULT_HIGHLIGHT_MARGIN`] past `region`
    #[must_use]
    pub fn new(region: BoundaryRegion) -> Self {
        Self::with_expansion(region, DEFAULT_HIGHLIGHT_MARGIN)
    }

    /// Creates a button whose highlighted region extends `margin` pixels past `region`
    #[must_use]
    pub fn with_expansion(region: BoundaryRegion, margin: f32) -> Self {
        Self::with_regions(region, region.expanded(margin))
    }

    /// Creates a button with explicit default and highlighted regions
    #[must_use]
    pub fn with_regions(default_region: BoundaryRegion, highlighted_region: BoundaryRegion) -> Self {
        Self {
            core: RecognizerCore::with_boundary(default_region),
            default_region,
            highlighted_region,
            selected: Listeners::default(),
            deselected: Listeners::default(),
            touch_up_inside: Listeners::default(),
        }
    }

    /// The region touches must begin in
    #[must_use]
    pub fn default_region(&self) -> BoundaryRegion {
        self.default_region
    }

    /// The region a selected touch must stay in
    #[must_use]
    pub fn highlighted_region(&self) -> BoundaryRegion {
        self.highlighted_region
    }

    /// Is a touch currently holding the button down?
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.state() == GestureState::RecognizedAndStillRecognizing
    }

    fn select(&mut self) {
        self.core.boundary = Some(self.highlighted_region);
        self.set_state(GestureState::RecognizedAndStillRecognizing);
        self.selected.notify(self);
    }
}

impl GestureRecognizer for ButtonRecognizer {
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

        let Some(touch) = touches.iter().find(|touch| touch.phase == TouchPhase::Began) else {
            return false;
        };

        self.core.track(touch);
        self.select();
        true
    }

    fn touches_moved(&mut self, _touches: &[TouchSample], _ctx: &TickContext) {
        let Some(touch) = self.core.tracked().first() else {
            return;
        };
        let inside = self.highlighted_region.contains(touch.position);

        match self.state() {
            GestureState::RecognizedAndStillRecognizing if !inside => {
                self.set_state(GestureState::Began);
                self.deselected.notify(self);
            }
            GestureState::Began if inside => self.select(),
            _ => (),
        }
    }

    fn touches_ended(&mut self, _touches: &[TouchSample], _ctx: &TickContext) {
        if self.is_selected() {
            self.touch_up_inside.notify(self);
        }

        self.set_state(GestureState::FailedOrEnded);
    }

    fn on_reset(&mut self) {
        self.core.boundary = Some(self.default_region);
    }
}
