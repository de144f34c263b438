use bevy::math::Vec2;
use bevy::utils::Duration;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use leafwing_touch::prelude::*;

fn populated_dispatcher() -> GestureDispatcher {
    let mut dispatcher = GestureDispatcher::default();
    let region = BoundaryRegion::new(0., 0., 200., 200.);

    dispatcher.add_recognizer(TapRecognizer::default());
    dispatcher.add_recognizer(LongPressRecognizer::default());
    dispatcher.add_recognizer(PanRecognizer::default());
    dispatcher.add_recognizer(PinchRecognizer::default());
    dispatcher.add_recognizer(RotationRecognizer::default());
    dispatcher.add_recognizer(SwipeRecognizer::default());
    dispatcher.add_recognizer(PathSwipeRecognizer::default());
    dispatcher.add_recognizer(MultiFingerSwipeRecognizer::default());
    dispatcher.add_recognizer(AnyTouchRecognizer::new(region));
    dispatcher.add_recognizer(AnalogRecognizer::touch_pad(region));
    dispatcher.add_recognizer(ButtonRecognizer::new(region).with_z_index(1));

    dispatcher
}

/// Two fingers touching down, dragging apart for `ticks` frames, then lifting
fn two_finger_drag(dispatcher: &mut GestureDispatcher, ticks: u64) {
    let settings = GestureSettings::default();
    let ctx = |tick: u64| TickContext::new(Duration::from_millis(tick * 16), &settings);

    let mut left = TouchSample::began(0, Vec2::new(300., 300.));
    let mut right = TouchSample::began(1, Vec2::new(400., 300.));
    dispatcher.update(&ctx(0), [left, right]);

    for tick in 1..=ticks {
        let offset = tick as f32 * 4.;
        left = TouchSample::moved_from(&left, Vec2::new(300. - offset, 300.));
        right = TouchSample::moved_from(&right, Vec2::new(400. + offset, 300. + offset));
        dispatcher.update(&ctx(tick), [left, right]);
    }

    dispatcher.update(
        &ctx(ticks + 1),
        [left.force_ended(), right.force_ended()],
    );
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("add_recognizers", |b| b.iter(populated_dispatcher));

    let mut dispatcher = populated_dispatcher();
    c.bench_function("idle_tick", |b| {
        b.iter(|| {
            dispatcher.update(
                &TickContext::new(Duration::ZERO, &GestureSettings::default()),
                black_box([] as [TouchSample; 0]),
            )
        })
    });

    let mut dispatcher = populated_dispatcher();
    c.bench_function("two_finger_drag", |b| {
        b.iter(|| two_finger_drag(&mut dispatcher, black_box(30)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
