//! Routes each tick's touches to the registered recognizers, in priority order.

use std::cmp::Reverse;

use bevy::ecs::system::Resource;
use bevy::log::{error, warn};
use bevy::utils::HashMap;

use crate::errors::UnregisteredRecognizer;
use crate::recognizer::GestureRecognizer;
use crate::settings::TickContext;
use crate::touch::{TouchId, TouchSample};

/// Identifies one recognizer registered with a [`GestureDispatcher`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecognizerHandle(u64);

#[derive(Debug)]
struct Entry {
    handle: RecognizerHandle,
    recognizer: Box<dyn GestureRecognizer>,
}

/// Owns every registered [`GestureRecognizer`] and feeds them the touches of each tick
///
/// Recognizers are kept ordered by descending z-index, ties broken by insertion order,
/// and all of them observe the same batch of samples.
/// A recognizer with a positive z-index that consumes touches in its Began phase
/// removes them from the batch before lower-priority recognizers see it.
///
/// The dispatcher also remembers which contacts are active:
/// a contact that disappears from the batch without ever reporting an end is force-ended
/// and routed once, so that no recognizer keeps tracking it forever.
///
/// # Example
/// ```rust
/// use bevy::math::Vec2;
/// use bevy::utils::Duration;
/// use leafwing_touch::prelude::*;
///
/// let mut dispatcher = GestureDispatcher::default();
/// let handle = dispatcher.add_recognizer(TapRecognizer::default());
/// let settings = GestureSettings::from_dpi(254.);
///
/// let start = Vec2::new(50., 50.);
/// dispatcher.update(
///     &TickContext::new(Duration::from_millis(0), &settings),
///     [TouchSample::began(0, start)],
/// );
/// dispatcher.update(
///     &TickContext::new(Duration::from_millis(100), &settings),
///     [TouchSample::ended(0, start, start)],
/// );
///
/// let tap = dispatcher.get::<TapRecognizer>(handle).unwrap();
/// assert_eq!(tap.state(), GestureState::Possible);
/// ```
#[derive(Resource, Debug, Default)]
pub struct GestureDispatcher {
    entries: Vec<Entry>,
    next_handle: u64,
    active: HashMap<TouchId, TouchSample>,
    batch: Vec<TouchSample>,
}

impl GestureDispatcher {
    /// Registers `recognizer`, returning the handle used to access or remove it later
    pub fn add_recognizer(&mut self, recognizer: impl GestureRecognizer) -> RecognizerHandle {
        self.add_boxed_recognizer(Box::new(recognizer))
    }

    /// Registers an already boxed `recognizer`
    pub fn add_boxed_recognizer(
        &mut self,
        recognizer: Box<dyn GestureRecognizer>,
    ) -> RecognizerHandle {
        let handle = RecognizerHandle(self.next_handle);
        self.next_handle += 1;

        let needs_sort = recognizer.z_index() > 0;
        self.entries.push(Entry { handle, recognizer });

        // Stable, so equal priorities keep their insertion order
        if needs_sort {
            self.entries
                .sort_by_key(|entry| Reverse(entry.recognizer.z_index()));
        }

        handle
    }

    /// Resets and unregisters the recognizer behind `handle`, handing it back
    pub fn remove_recognizer(
        &mut self,
        handle: RecognizerHandle,
    ) -> Result<Box<dyn GestureRecognizer>, UnregisteredRecognizer> {
        let Some(index) = self.entries.iter().position(|entry| entry.handle == handle) else {
            let error = UnregisteredRecognizer(handle);
            error!("{error}");
            return Err(error);
        };

        let mut entry = self.entries.remove(index);
        entry.recognizer.reset();
        Ok(entry.recognizer)
    }

    /// Resets and unregisters every recognizer
    pub fn remove_all_recognizers(&mut self) {
        for mut entry in self.entries.drain(..) {
            entry.recognizer.reset();
        }
    }

    /// Is a recognizer registered under `handle`?
    #[must_use]
    pub fn contains(&self, handle: RecognizerHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }

    /// The recognizer registered under `handle`, if it is of type `R`
    #[must_use]
    pub fn get<R: GestureRecognizer>(&self, handle: RecognizerHandle) -> Option<&R> {
        let entry = self.entries.iter().find(|entry| entry.handle == handle)?;
        let recognizer: &dyn GestureRecognizer = entry.recognizer.as_ref();
        recognizer.as_any().downcast_ref::<R>()
    }

    /// The recognizer registered under `handle`, mutably, if it is of type `R`
    #[must_use]
    pub fn get_mut<R: GestureRecognizer>(&mut self, handle: RecognizerHandle) -> Option<&mut R> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.handle == handle)?;
        let recognizer: &mut dyn GestureRecognizer = entry.recognizer.as_mut();
        recognizer.as_any_mut().downcast_mut::<R>()
    }

    /// Iterates over every registered recognizer in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = (RecognizerHandle, &dyn GestureRecognizer)> {
        self.entries
            .iter()
            .map(|entry| (entry.handle, entry.recognizer.as_ref()))
    }

    /// The number of registered recognizers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Are there no registered recognizers?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The latest sample of every contact that is currently on the surface
    pub fn active_touches(&self) -> impl Iterator<Item = &TouchSample> {
        self.active.values()
    }

    /// Runs one recognition pass over this tick's `samples`
    ///
    /// Contacts that were active on the previous tick but are missing from `samples`
    /// are force-ended before dispatch.
    pub fn update(&mut self, ctx: &TickContext, samples: impl IntoIterator<Item = TouchSample>) {
        self.batch.clear();
        self.batch.extend(samples);

        let mut stale: Vec<TouchSample> = self
            .active
            .values()
            .filter(|active| !self.batch.iter().any(|touch| touch.id == active.id))
            .map(TouchSample::force_ended)
            .collect();
        stale.sort_by_key(|touch| touch.id);

        for touch in stale {
            warn!(
                "Touch {} disappeared without ending: forcing it to end",
                touch.id
            );
            self.batch.push(touch);
        }

        self.dispatch(ctx);
    }

    /// Force-ends every active contact and routes those ends once
    ///
    /// Useful when the platform stops reporting touches altogether, such as on focus loss.
    pub fn sweep_stale_touches(&mut self, ctx: &TickContext) {
        self.batch.clear();
        self.batch
            .extend(self.active.values().map(TouchSample::force_ended));
        self.batch.sort_by_key(|touch| touch.id);

        if !self.batch.is_empty() {
            warn!("Force-ending {} stale touches", self.batch.len());
        }

        self.dispatch(ctx);
    }

    fn dispatch(&mut self, ctx: &TickContext) {
        for touch in &self.batch {
            if touch.phase.is_finished() {
                self.active.remove(&touch.id);
            } else {
                self.active.insert(touch.id, *touch);
            }
        }

        for entry in self.entries.iter_mut() {
            entry.recognizer.recognize_touches(&mut self.batch, ctx);
        }
    }
}
