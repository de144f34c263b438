use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bevy::math::Vec2;
use bevy::utils::Duration;
use leafwing_touch::prelude::*;

/// One pixel per centimetre, so distances can be read straight off the positions
fn ctx(millis: u64) -> TickContext {
    let settings = GestureSettings {
        pixels_per_cm: 1.0,
        ..Default::default()
    };
    TickContext::new(Duration::from_millis(millis), &settings)
}

fn count<T: 'static>(listeners: &mut Listeners<T>) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    listeners.add(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    calls
}

#[test]
fn tap_is_recognized_exactly_once() {
    let mut dispatcher = GestureDispatcher::default();
    let mut tap = TapRecognizer::default();
    let taps = count(&mut tap.recognized);
    let handle = dispatcher.add_recognizer(tap);

    let start = Vec2::new(20., 20.);
    dispatcher.update(&ctx(0), [TouchSample::began(0, start)]);
    assert_eq!(
        dispatcher.get::<TapRecognizer>(handle).unwrap().state(),
        GestureState::Began
    );

    dispatcher.update(&ctx(100), [TouchSample::ended(0, start, start)]);
    dispatcher.update(&ctx(200), []);
    assert_eq!(taps.load(Ordering::SeqCst), 1);
    assert_eq!(
        dispatcher.get::<TapRecognizer>(handle).unwrap().state(),
        GestureState::Possible
    );
}

#[test]
fn tap_that_moves_too_far_fails() {
    let mut dispatcher = GestureDispatcher::default();
    let mut tap = TapRecognizer::default();
    let taps = count(&mut tap.recognized);
    dispatcher.add_recognizer(tap);

    let start = Vec2::new(20., 20.);
    let far = Vec2::new(30., 20.);
    dispatcher.update(&ctx(0), [TouchSample::began(0, start)]);
    dispatcher.update(&ctx(50), [TouchSample::moved(0, start, far)]);
    dispatcher.update(&ctx(100), [TouchSample::ended(0, start, far)]);

    assert_eq!(taps.load(Ordering::SeqCst), 0);
}

#[test]
fn tap_released_far_away_fails() {
    let mut dispatcher = GestureDispatcher::default();
    let mut tap = TapRecognizer::default();
    let taps = count(&mut tap.recognized);
    dispatcher.add_recognizer(tap);

    // The displacement only shows up in the release
    dispatcher.update(&ctx(0), [TouchSample::began(0, Vec2::ZERO)]);
    dispatcher.update(
        &ctx(100),
        [TouchSample::ended(0, Vec2::ZERO, Vec2::new(0., 100.))],
    );

    assert_eq!(taps.load(Ordering::SeqCst), 0);
}

#[test]
fn consumed_touches_never_reach_lower_priorities() {
    let mut dispatcher = GestureDispatcher::default();
    let tap = dispatcher.add_recognizer(TapRecognizer::default());
    let button = dispatcher.add_recognizer(
        ButtonRecognizer::new(BoundaryRegion::new(0., 0., 100., 100.)).with_z_index(1),
    );

    let on_button = TouchSample::began(0, Vec2::new(50., 50.));
    dispatcher.update(&ctx(0), [on_button]);

    assert!(dispatcher
        .get::<ButtonRecognizer>(button)
        .unwrap()
        .is_selected());
    assert_eq!(
        dispatcher.get::<TapRecognizer>(tap).unwrap().state(),
        GestureState::Possible
    );

    // Away from the button, the tap gets its turn
    let held = TouchSample::moved_from(&on_button, on_button.position);
    dispatcher.update(
        &ctx(16),
        [held, TouchSample::began(1, Vec2::new(300., 300.))],
    );
    assert_eq!(
        dispatcher.get::<TapRecognizer>(tap).unwrap().state(),
        GestureState::Began
    );
    assert!(dispatcher
        .get::<ButtonRecognizer>(button)
        .unwrap()
        .is_selected());
}

#[test]
fn swipe_right_within_variance() {
    let mut dispatcher = GestureDispatcher::default();
    let mut swipe = SwipeRecognizer::new(40., 35.);
    let directions = Arc::new(Mutex::new(Vec::new()));
    let log = directions.clone();
    swipe.recognized.add(move |swipe: &SwipeRecognizer| {
        log.lock().unwrap().push(swipe.completed_direction());
    });
    dispatcher.add_recognizer(swipe);

    dispatcher.update(&ctx(0), [TouchSample::began(0, Vec2::ZERO)]);
    dispatcher.update(
        &ctx(300),
        [TouchSample::ended(0, Vec2::ZERO, Vec2::new(100., 2.))],
    );

    assert_eq!(*directions.lock().unwrap(), vec![SwipeDirection::RIGHT]);
}

#[test]
fn swipe_drifting_across_fails() {
    let mut dispatcher = GestureDispatcher::default();
    let mut swipe = SwipeRecognizer::new(40., 35.);
    let swipes = count(&mut swipe.recognized);
    let handle = dispatcher.add_recognizer(swipe);

    dispatcher.update(&ctx(0), [TouchSample::began(0, Vec2::ZERO)]);
    dispatcher.update(
        &ctx(300),
        [TouchSample::ended(0, Vec2::ZERO, Vec2::new(100., 50.))],
    );

    assert_eq!(swipes.load(Ordering::SeqCst), 0);
    assert_eq!(
        dispatcher.get::<SwipeRecognizer>(handle).unwrap().state(),
        GestureState::Possible
    );
}

#[test]
fn pinch_scales_against_the_initial_distance() {
    let mut dispatcher = GestureDispatcher::default();
    let handle = dispatcher.add_recognizer(PinchRecognizer::default());

    let left = TouchSample::began(0, Vec2::new(0., 0.));
    let right = TouchSample::began(1, Vec2::new(100., 0.));
    dispatcher.update(&ctx(0), [left, right]);

    let left = TouchSample::moved_from(&left, left.position);
    let right = TouchSample::moved_from(&right, Vec2::new(150., 0.));
    dispatcher.update(&ctx(16), [left, right]);

    let pinch = dispatcher.get::<PinchRecognizer>(handle).unwrap();
    assert!((pinch.delta_scale() - 0.5).abs() < 1e-6);
    assert_eq!(pinch.state(), GestureState::RecognizedAndStillRecognizing);

    // Lifting one finger is not the end of the pinch
    let left = TouchSample::moved_from(&left, left.position);
    dispatcher.update(
        &ctx(32),
        [left, TouchSample::ended(1, right.start_position, right.position)],
    );
    assert_eq!(
        dispatcher.get::<PinchRecognizer>(handle).unwrap().state(),
        GestureState::Possible
    );

    let left = TouchSample::moved_from(&left, left.position);
    dispatcher.update(&ctx(48), [left, TouchSample::began(2, Vec2::new(0., 50.))]);
    assert_eq!(
        dispatcher.get::<PinchRecognizer>(handle).unwrap().state(),
        GestureState::Began
    );
}

#[test]
fn gated_pinch_reports_every_change_once_active() {
    let mut dispatcher = GestureDispatcher::default();
    let mut pinch = PinchRecognizer::new(10.);
    let scales = Arc::new(Mutex::new(Vec::new()));
    let log = scales.clone();
    pinch
        .recognized
        .add(move |pinch: &PinchRecognizer| log.lock().unwrap().push(pinch.delta_scale()));
    dispatcher.add_recognizer(pinch);

    let mut left = TouchSample::began(0, Vec2::ZERO);
    let mut right = TouchSample::began(1, Vec2::new(100., 0.));
    dispatcher.update(&ctx(0), [left, right]);

    for (tick, x) in [120., 105., 100.].into_iter().enumerate() {
        left = TouchSample::moved_from(&left, left.position);
        right = TouchSample::moved_from(&right, Vec2::new(x, 0.));
        dispatcher.update(&ctx(16 * (tick as u64 + 1)), [left, right]);
    }

    let scales = scales.lock().unwrap();
    assert_eq!(scales.len(), 3);
    assert!((scales[0] - 0.2).abs() < 1e-5);
    assert!(scales.iter().sum::<f32>().abs() < 1e-5);
}

#[test]
fn any_touch_reports_entering_and_exiting_once() {
    let mut dispatcher = GestureDispatcher::default();
    let mut region = AnyTouchRecognizer::new(BoundaryRegion::new(0., 0., 100., 100.));
    let entered = count(&mut region.entered);
    let exited = count(&mut region.exited);
    dispatcher.add_recognizer(region);

    let mut touch = TouchSample::began(0, Vec2::new(-50., 50.));
    dispatcher.update(&ctx(0), [touch]);

    for (tick, x) in [10., 30., 50., 70., 90.].into_iter().enumerate() {
        touch = TouchSample::moved_from(&touch, Vec2::new(x, 50.));
        dispatcher.update(&ctx(16 * (tick as u64 + 1)), [touch]);
    }
    assert_eq!(entered.load(Ordering::SeqCst), 1);
    assert_eq!(exited.load(Ordering::SeqCst), 0);

    touch = TouchSample::moved_from(&touch, Vec2::new(150., 50.));
    dispatcher.update(&ctx(112), [touch]);
    touch = TouchSample::moved_from(&touch, Vec2::new(200., 50.));
    dispatcher.update(&ctx(128), [touch]);

    assert_eq!(entered.load(Ordering::SeqCst), 1);
    assert_eq!(exited.load(Ordering::SeqCst), 1);
}

#[test]
fn vanished_touches_release_their_recognizers() {
    let mut dispatcher = GestureDispatcher::default();
    let mut press = LongPressRecognizer::default();
    let presses = count(&mut press.recognized);
    let handle = dispatcher.add_recognizer(press);

    dispatcher.update(&ctx(0), [TouchSample::began(0, Vec2::ONE)]);
    assert!(dispatcher
        .get::<LongPressRecognizer>(handle)
        .unwrap()
        .is_waiting());

    // The platform never reports the end of the touch
    dispatcher.update(&ctx(100), []);
    dispatcher.update(&ctx(1000), []);

    let press = dispatcher.get::<LongPressRecognizer>(handle).unwrap();
    assert!(!press.is_waiting());
    assert_eq!(press.state(), GestureState::Possible);
    assert_eq!(presses.load(Ordering::SeqCst), 0);
}
