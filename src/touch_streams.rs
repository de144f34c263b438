//! Turns raw contact reports into the [`TouchSample`]s fed to the dispatcher.
//!
//! The platform only says which contacts are pressed, held or released, and where they are.
//! [`TouchStreams`] fills in everything else a recognizer reads: the phase, the per-tick delta,
//! the start position and the tap count.

use bevy::ecs::system::Resource;
use bevy::log::debug;
use bevy::math::Vec2;
use bevy::utils::{Duration, HashMap, HashSet};
use itertools::Itertools;

use crate::settings::{GestureSettings, TickContext};
use crate::touch::{TouchId, TouchPhase, TouchSample};

/// What the platform reported about one contact this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawContact {
    /// The contact touched down
    Pressed,
    /// The contact is still down, moved or not
    Held,
    /// The contact lifted
    Released,
    /// The platform stopped tracking the contact
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MockContact {
    position: Vec2,
    contact: RawContact,
}

/// Counts consecutive taps landing close to each other
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct TapCounter {
    last_release: Option<(Duration, Vec2)>,
    count: u32,
}

impl TapCounter {
    fn press(&mut self, position: Vec2, now: Duration, settings: &GestureSettings) -> u32 {
        let ctx = TickContext::new(now, settings);
        let continues = self.last_release.is_some_and(|(released_at, released_from)| {
            now.saturating_sub(released_at) <= settings.multi_tap_interval
                && ctx.to_cm(released_from.distance(position)) <= settings.multi_tap_radius_cm
        });

        self.count = if continues { self.count + 1 } else { 1 };
        self.count
    }

    fn release(&mut self, position: Vec2, now: Duration) {
        self.last_release = Some((now, position));
    }
}

/// The input collaborator: collects each tick's samples until the dispatcher drains them
///
/// Filled by [`collect_touch_samples`](crate::systems::collect_touch_samples) from Bevy's touch and mouse input,
/// and by [`MockTouches`](crate::input_mocking::MockTouches) in tests.
/// Contacts pressed while [`GestureSettings::max_touches`] contacts are already down are ignored until they lift.
#[derive(Resource, Debug, Default)]
pub struct TouchStreams {
    batch: Vec<TouchSample>,
    previous: HashMap<TouchId, (TouchSample, Duration)>,
    ignored: HashSet<TouchId>,
    reported: HashSet<TouchId>,
    taps: TapCounter,
    mocks: HashMap<TouchId, MockContact>,
}

impl TouchStreams {
    /// Converts one raw contact report into a sample for this tick
    ///
    /// A held contact that was never reported as pressed is treated as a new press.
    /// Releases of unknown contacts are dropped.
    pub fn report(
        &mut self,
        id: TouchId,
        position: Vec2,
        contact: RawContact,
        now: Duration,
        settings: &GestureSettings,
    ) {
        self.reported.insert(id);
        let previous = self.previous.get(&id).copied();

        match (contact, previous) {
            (RawContact::Pressed, _) | (RawContact::Held, None) => {
                if self.ignored.contains(&id) {
                    return;
                }
                if self.previous.len() >= settings.max_touches {
                    debug!("Ignoring touch {id}: {} touches already down", settings.max_touches);
                    self.ignored.insert(id);
                    return;
                }

                let tap_count = self.taps.press(position, now, settings);
                self.push(TouchSample::began(id, position).with_tap_count(tap_count), now);
            }
            (RawContact::Held, Some((previous, reported_at))) => {
                let sample = TouchSample::moved_from(&previous, position)
                    .with_delta_time(now.saturating_sub(reported_at));
                self.push(sample, now);
            }
            (RawContact::Released | RawContact::Cancelled, previous) => {
                if self.ignored.remove(&id) {
                    return;
                }
                let Some((previous, reported_at)) = previous else {
                    return;
                };

                let phase = if contact == RawContact::Released {
                    self.taps.release(position, now);
                    TouchPhase::Ended
                } else {
                    TouchPhase::Cancelled
                };

                self.previous.remove(&id);
                self.batch.push(TouchSample {
                    position,
                    delta: position - previous.position,
                    delta_time: now.saturating_sub(reported_at),
                    phase,
                    ..previous
                });
            }
        }
    }

    /// Forgets every contact that was not reported since the last call
    ///
    /// Called once per collection. A contact the platform lost without releasing it
    /// stops counting against [`GestureSettings::max_touches`],
    /// and the dispatcher force-ends its last sample.
    pub fn forget_unreported(&mut self) {
        let reported = std::mem::take(&mut self.reported);
        self.previous.retain(|id, _| reported.contains(id));
        self.ignored.retain(|id| reported.contains(id));
    }

    /// Queues a ready-made sample, bypassing every conversion
    pub fn send_sample(&mut self, sample: TouchSample) {
        self.batch.push(sample);
    }

    /// The last known position of a contact that is still down
    #[must_use]
    pub fn last_position(&self, id: TouchId) -> Option<Vec2> {
        self.previous.get(&id).map(|(sample, _)| sample.position)
    }

    /// The samples collected so far this tick
    #[must_use]
    pub fn pending(&self) -> &[TouchSample] {
        &self.batch
    }

    /// Hands over the samples collected this tick
    pub fn drain(&mut self) -> std::vec::Drain<'_, TouchSample> {
        self.batch.drain(..)
    }

    /// Presses a simulated contact, reported on the next collection
    pub fn press_mock(&mut self, id: TouchId, position: Vec2) {
        self.mocks.insert(
            id,
            MockContact {
                position,
                contact: RawContact::Pressed,
            },
        );
    }

    /// Moves a simulated contact that is down
    pub fn move_mock(&mut self, id: TouchId, position: Vec2) {
        if let Some(mock) = self.mocks.get_mut(&id) {
            mock.position = position;
        }
    }

    /// Lifts a simulated contact on the next collection
    ///
    /// A contact pressed and released before any collection is dropped altogether.
    pub fn release_mock(&mut self, id: TouchId) {
        match self.mocks.get(&id).map(|mock| mock.contact) {
            Some(RawContact::Pressed) => {
                self.mocks.remove(&id);
            }
            Some(_) => {
                if let Some(mock) = self.mocks.get_mut(&id) {
                    mock.contact = RawContact::Released;
                }
            }
            None => (),
        }
    }

    /// Reports every simulated contact, in id order
    ///
    /// Simulated contacts stay held across ticks until they are released.
    pub fn collect_mocks(&mut self, now: Duration, settings: &GestureSettings) {
        let mocks = self
            .mocks
            .iter()
            .map(|(id, mock)| (*id, *mock))
            .sorted_by_key(|(id, _)| *id)
            .collect_vec();

        for (id, mock) in mocks {
            self.report(id, mock.position, mock.contact, now, settings);

            match mock.contact {
                RawContact::Pressed => {
                    if let Some(mock) = self.mocks.get_mut(&id) {
                        mock.contact = RawContact::Held;
                    }
                }
                RawContact::Held => (),
                RawContact::Released | RawContact::Cancelled => {
                    self.mocks.remove(&id);
                }
            }
        }
    }

    fn push(&mut self, sample: TouchSample, now: Duration) {
        self.previous.insert(sample.id, (sample, now));
        self.batch.push(sample);
    }
}
