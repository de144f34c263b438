//! The contract shared by every gesture recognizer.
//!
//! A recognizer is a small state machine fed once per tick with the current batch of [`TouchSample`]s.
//! The batch is fanned out to three phase hooks ([`touches_began`](GestureRecognizer::touches_began),
//! [`touches_moved`](GestureRecognizer::touches_moved) and [`touches_ended`](GestureRecognizer::touches_ended)),
//! each of which runs at most once per tick.
//! Concrete recognizers only decide *when* to request a [`GestureState`] transition:
//! the transition table, the notification and the reset logic live here.

use std::any::Any;
use std::fmt::Debug;

use bevy::log::{trace, warn};
use bevy::math::Vec2;

use crate::boundary::BoundaryRegion;
use crate::errors::InvalidTransition;
use crate::settings::TickContext;
use crate::state::GestureState;
use crate::touch::{TouchId, TouchPhase, TouchSample};

/// Allows recognizers stored as trait objects to be downcast back into their concrete type
pub trait AsAny: Any {
    /// Upcasts `self` into [`Any`]
    fn as_any(&self) -> &dyn Any;

    /// Upcasts `self` into a mutable [`Any`]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The bookkeeping shared by every recognizer
///
/// Holds the configuration that the dispatcher reads (enabled flag, boundary, z-index),
/// the current [`GestureState`] and the set of touches this recognizer exclusively tracks.
/// Tracked touches are stored by id, and their latest sample is refreshed from every batch
/// before any hook runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizerCore {
    /// Disabled recognizers receive no touches, but keep their state
    pub enabled: bool,
    /// The region new touches must begin in, or `None` for the whole surface
    pub boundary: Option<BoundaryRegion>,
    /// Higher values see touches first, and values above zero may consume them
    pub z_index: u32,
    /// When true, [`GestureRecognizer::touches_moved`] receives every sample of the batch,
    /// not only the tracked ones
    pub always_send_moved: bool,
    state: GestureState,
    tracked: Vec<TouchSample>,
    scratch: Vec<TouchSample>,
}

impl Default for RecognizerCore {
    fn default() -> Self {
        Self {
            enabled: true,
            boundary: None,
            z_index: 0,
            always_send_moved: false,
            state: GestureState::Possible,
            tracked: Vec::new(),
            scratch: Vec::new(),
        }
    }
}

impl RecognizerCore {
    /// Creates the core of a recognizer restricted to `boundary`
    #[must_use]
    pub fn with_boundary(boundary: BoundaryRegion) -> Self {
        Self {
            boundary: Some(boundary),
            ..Default::default()
        }
    }

    /// The current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Should touches be dispatched to this recognizer at all?
    #[inline]
    #[must_use]
    pub fn should_attempt(&self) -> bool {
        self.enabled && self.state.accepts_touches()
    }

    /// Does the boundary region (if any) accept a touch beginning at `position`?
    #[inline]
    #[must_use]
    pub fn accepts(&self, position: Vec2) -> bool {
        self.boundary
            .map_or(true, |boundary| boundary.contains(position))
    }

    /// Starts tracking `touch`
    ///
    /// Tracking the same id twice only refreshes the stored sample.
    pub fn track(&mut self, touch: &TouchSample) {
        match self.tracked.iter_mut().find(|tracked| tracked.id == touch.id) {
            Some(existing) => *existing = *touch,
            None => self.tracked.push(*touch),
        }
    }

    /// Stops tracking the touch with the given id, returning whether it was tracked
    pub fn untrack(&mut self, id: TouchId) -> bool {
        let before = self.tracked.len();
        self.tracked.retain(|tracked| tracked.id != id);
        self.tracked.len() != before
    }

    /// Stops tracking every touch of `touches` that has ended or was cancelled
    pub fn untrack_finished(&mut self, touches: &[TouchSample]) {
        for touch in touches.iter().filter(|touch| touch.phase.is_finished()) {
            self.untrack(touch.id);
        }
    }

    /// Is the touch with the given id tracked?
    #[inline]
    #[must_use]
    pub fn is_tracking(&self, id: TouchId) -> bool {
        self.tracked.iter().any(|tracked| tracked.id == id)
    }

    /// The latest samples of every tracked touch, in the order they were tracked
    #[inline]
    #[must_use]
    pub fn tracked(&self) -> &[TouchSample] {
        &self.tracked
    }

    /// The number of tracked touches
    #[inline]
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// The centroid of every tracked touch, or zero when nothing is tracked
    #[must_use]
    pub fn touch_location(&self) -> Vec2 {
        centroid(self.tracked.iter().map(|touch| touch.position))
    }

    /// The centroid of the start positions of every tracked touch, or zero when nothing is tracked
    #[must_use]
    pub fn start_touch_location(&self) -> Vec2 {
        centroid(self.tracked.iter().map(|touch| touch.start_position))
    }

    /// Replaces the stored sample of every tracked touch with its sample from `batch`
    pub fn refresh(&mut self, batch: &[TouchSample]) {
        for tracked in self.tracked.iter_mut() {
            if let Some(latest) = batch.iter().find(|touch| touch.id == tracked.id) {
                *tracked = *latest;
            }
        }
    }

    /// Returns to [`GestureState::Possible`] and forgets every tracked touch
    pub fn reset(&mut self) {
        self.state = GestureState::Possible;
        self.tracked.clear();
    }

    /// Fills `subset` with the samples of `batch` that should reach the moved and ended hooks
    fn collect_tracked(&self, batch: &[TouchSample], subset: &mut Vec<TouchSample>) {
        subset.clear();
        subset.extend(
            batch
                .iter()
                .filter(|touch| self.always_send_moved || self.is_tracking(touch.id)),
        );
    }
}

fn centroid(points: impl Iterator<Item = Vec2>) -> Vec2 {
    let (sum, count) = points.fold((Vec2::ZERO, 0usize), |(sum, count), point| {
        (sum + point, count + 1)
    });

    if count == 0 {
        Vec2::ZERO
    } else {
        sum / count as f32
    }
}

/// A state machine that detects one category of gesture from the touch stream
///
/// Implementors provide access to their [`RecognizerCore`] and override the phase hooks they care about.
/// Everything else, including [`recognize_touches`](GestureRecognizer::recognize_touches),
/// the sole entry point used by the [`GestureDispatcher`](crate::dispatcher::GestureDispatcher),
/// is provided.
///
/// # Example
/// ```rust
/// use bevy::math::Vec2;
/// use bevy::utils::Duration;
/// use leafwing_touch::prelude::*;
///
/// let mut tap = TapRecognizer::default();
/// let ctx = TickContext::new(Duration::ZERO, &GestureSettings::default());
///
/// let mut batch = vec![TouchSample::began(0, Vec2::new(10., 10.))];
/// tap.recognize_touches(&mut batch, &ctx);
/// assert_eq!(tap.state(), GestureState::Began);
///
/// tap.reset();
/// assert_eq!(tap.state(), GestureState::Possible);
/// assert_eq!(tap.touch_location(), Vec2::ZERO);
/// ```
pub trait GestureRecognizer: AsAny + Debug + Send + Sync + 'static {
    /// The shared bookkeeping of this recognizer
    fn core(&self) -> &RecognizerCore;

    /// The shared bookkeeping of this recognizer, mutably
    fn core_mut(&mut self) -> &mut RecognizerCore;

    /// Called at most once per tick with every Began-phase sample that lies within the boundary
    ///
    /// Returns `true` if the touches were used: combined with a positive z-index,
    /// this removes them from the batch before lower-priority recognizers see it.
    fn touches_began(&mut self, touches: &[TouchSample], ctx: &TickContext) -> bool;

    /// Called at most once per tick when a tracked touch moved,
    /// with the samples of every tracked touch
    fn touches_moved(&mut self, _touches: &[TouchSample], _ctx: &TickContext) {}

    /// Called at most once per tick when a tracked touch ended or was cancelled,
    /// with the samples of every tracked touch
    fn touches_ended(&mut self, _touches: &[TouchSample], _ctx: &TickContext) {}

    /// Called once per tick before any phase hook, to check stored deadlines
    fn tick(&mut self, _ctx: &TickContext) {}

    /// Notifies the "recognized" listeners
    ///
    /// Called when entering [`GestureState::Recognized`] or [`GestureState::RecognizedAndStillRecognizing`].
    fn fire_recognized(&self) {}

    /// Clears recognizer-specific progress
    ///
    /// Called by [`reset`](GestureRecognizer::reset), after the core has been reset.
    fn on_reset(&mut self) {}

    /// The current state
    #[inline]
    fn state(&self) -> GestureState {
        self.core().state
    }

    /// Requests a transition to `next`
    ///
    /// Invalid transitions are logged and ignored.
    fn set_state(&mut self, next: GestureState) {
        if let Err(error) = self.try_set_state(next) {
            warn!("{error} on {self:?}");
        }
    }

    /// Requests a transition to `next`, reporting invalid transitions
    ///
    /// Entering [`GestureState::Recognized`] or [`GestureState::RecognizedAndStillRecognizing`]
    /// fires the recognized listeners, and entering [`GestureState::Recognized`] or
    /// [`GestureState::FailedOrEnded`] then resets the recognizer.
    fn try_set_state(&mut self, next: GestureState) -> Result<(), InvalidTransition> {
        let current = self.core().state;
        if !current.can_transition_to(next) {
            return Err(InvalidTransition {
                from: current,
                to: next,
            });
        }

        self.core_mut().state = next;

        if next.fires_recognized() {
            self.fire_recognized();
        }

        if next.resets() {
            self.reset();
        }

        Ok(())
    }

    /// Returns to [`GestureState::Possible`] and releases every tracked touch
    fn reset(&mut self) {
        self.core_mut().reset();
        self.on_reset();
    }

    /// Is this recognizer enabled?
    #[inline]
    fn enabled(&self) -> bool {
        self.core().enabled
    }

    /// Enables or disables this recognizer
    ///
    /// Disabling halts dispatch without altering the state.
    fn set_enabled(&mut self, enabled: bool) {
        self.core_mut().enabled = enabled;
    }

    /// The region new touches must begin in
    #[inline]
    fn boundary(&self) -> Option<BoundaryRegion> {
        self.core().boundary
    }

    /// The priority of this recognizer
    #[inline]
    fn z_index(&self) -> u32 {
        self.core().z_index
    }

    /// The centroid of every tracked touch, or zero when nothing is tracked
    #[inline]
    fn touch_location(&self) -> Vec2 {
        self.core().touch_location()
    }

    /// The centroid of the start positions of every tracked touch
    #[inline]
    fn start_touch_location(&self) -> Vec2 {
        self.core().start_touch_location()
    }

    /// Restricts new touches to `boundary`
    #[must_use]
    fn with_boundary(mut self, boundary: BoundaryRegion) -> Self
    where
        Self: Sized,
    {
        self.core_mut().boundary = Some(boundary);
        self
    }

    /// Sets the priority of this recognizer
    #[must_use]
    fn with_z_index(mut self, z_index: u32) -> Self
    where
        Self: Sized,
    {
        self.core_mut().z_index = z_index;
        self
    }

    /// Sets whether this recognizer starts out enabled
    #[must_use]
    fn with_enabled(mut self, enabled: bool) -> Self
    where
        Self: Sized,
    {
        self.core_mut().enabled = enabled;
        self
    }

    /// Feeds this tick's batch to the phase hooks
    ///
    /// The batch is scanned from the back, so that touches consumed during the Began phase
    /// can be removed in place without skipping or revisiting entries.
    /// Each hook runs at most once, even when several samples share a phase.
    fn recognize_touches(&mut self, batch: &mut Vec<TouchSample>, ctx: &TickContext) {
        if !self.core().should_attempt() {
            return;
        }

        self.core_mut().refresh(batch);
        self.tick(ctx);

        let mut subset = std::mem::take(&mut self.core_mut().scratch);
        let (mut sent_began, mut sent_moved, mut sent_ended) = (false, false, false);

        let mut index = batch.len();
        while index > 0 {
            index -= 1;
            let touch = batch[index];

            match touch.phase {
                TouchPhase::Began => {
                    if sent_began || !self.core().accepts(touch.position) {
                        continue;
                    }
                    sent_began = true;

                    subset.clear();
                    subset.extend(batch.iter().filter(|candidate| {
                        candidate.phase == TouchPhase::Began
                            && self.core().accepts(candidate.position)
                    }));

                    trace!("touches began: {subset:?}");
                    let consumed = self.touches_began(&subset, ctx);

                    if consumed && self.core().z_index > 0 {
                        let survivors_below = batch[..index]
                            .iter()
                            .filter(|kept| !subset.iter().any(|used| used.id == kept.id))
                            .count();
                        batch.retain(|kept| !subset.iter().any(|used| used.id == kept.id));
                        index = survivors_below;
                    }
                }
                TouchPhase::Moved => {
                    if sent_moved
                        || !(self.core().always_send_moved || self.core().is_tracking(touch.id))
                    {
                        continue;
                    }
                    sent_moved = true;

                    self.core().collect_tracked(batch, &mut subset);
                    trace!("touches moved: {subset:?}");
                    self.touches_moved(&subset, ctx);
                }
                TouchPhase::Ended | TouchPhase::Cancelled => {
                    if sent_ended || !self.core().is_tracking(touch.id) {
                        continue;
                    }
                    sent_ended = true;

                    self.core().collect_tracked(batch, &mut subset);
                    trace!("touches ended: {subset:?}");
                    self.touches_ended(&subset, ctx);
                }
                TouchPhase::Stationary => (),
            }
        }

        subset.clear();
        self.core_mut().scratch = subset;
    }
}
