mod support;

use std::sync::atomic::Ordering;

use soundaffect::widget::mapper;
use soundaffect::MediaEngine;
use soundaffect::widget::poller::poll_once;

use support::{widget_with_bounds, FakeEngine, TEST_TRACK};

#[test]
fn drag_to_offset_issues_single_seek_and_resumes() {
    let engine = FakeEngine::prepared_with_duration(200_000);
    let (mut widget, _repaints) = widget_with_bounds(engine.clone());

    widget.play();
    assert!(widget.is_polling());

    // grab the indicator at the left bound
    let (x, y) = support::notch_press_at(100);
    widget.on_pointer_down(x, y);
    assert!(widget.is_seeking());
    assert!(!widget.is_polling(), "polling must suspend during a drag");

    // several move events, only the release commits
    widget.on_pointer_move(220.0, 55.0);
    widget.on_pointer_move(380.0, 55.0);
    widget.on_pointer_move(450.0, 55.0);
    assert_eq!(widget.indicator_offset(), 450);
    assert_eq!(engine.seek_calls().len(), 0);

    widget.on_pointer_up(450.0, 55.0);
    assert!(!widget.is_seeking());
    assert_eq!(
        engine.calls(),
        vec!["play", "pause", "seek_to(140000)", "play"]
    );
    assert_eq!(widget.indicator_offset(), 450);
    assert!(widget.is_polling(), "playback resumed, so polling resumes");
}

#[test]
fn drag_while_paused_does_not_resume_playback() {
    let engine = FakeEngine::prepared_with_duration(200_000);
    let (mut widget, _repaints) = widget_with_bounds(engine.clone());

    let (x, y) = support::notch_press_at(100);
    widget.on_pointer_down(x, y);
    widget.on_pointer_move(350.0, 55.0);
    widget.on_pointer_up(350.0, 55.0);

    assert_eq!(engine.calls(), vec!["seek_to(100000)"]);
    assert!(!engine.is_playing());
    assert!(!widget.is_polling());
}

#[test]
fn out_of_bounds_moves_are_ignored_not_clamped() {
    let engine = FakeEngine::prepared_with_duration(200_000);
    let (mut widget, _repaints) = widget_with_bounds(engine.clone());

    let (x, y) = support::notch_press_at(100);
    widget.on_pointer_down(x, y);

    widget.on_pointer_move(50.0, 55.0);
    assert_eq!(widget.indicator_offset(), 100);
    widget.on_pointer_move(650.0, 55.0);
    assert_eq!(widget.indicator_offset(), 100);

    widget.on_pointer_move(300.0, 55.0);
    assert_eq!(widget.indicator_offset(), 300);
    widget.on_pointer_move(650.0, 55.0);
    assert_eq!(
        widget.indicator_offset(),
        300,
        "a stray pointer must not pin the indicator to a bound"
    );

    widget.on_pointer_up(650.0, 55.0);
    assert_eq!(engine.seek_calls(), vec!["seek_to(80000)"]);
}

#[test]
fn moves_without_a_session_are_ignored() {
    let engine = FakeEngine::prepared_with_duration(200_000);
    let (mut widget, repaints) = widget_with_bounds(engine.clone());

    widget.on_pointer_move(300.0, 55.0);
    assert_eq!(widget.indicator_offset(), 100);
    assert_eq!(repaints.load(Ordering::Relaxed), 0);
    widget.on_pointer_up(300.0, 55.0);
    assert!(engine.calls().is_empty());
}

#[test]
fn press_outside_hit_region_does_not_start_a_session() {
    let engine = FakeEngine::prepared_with_duration(200_000);
    let (mut widget, _repaints) = widget_with_bounds(engine.clone());

    // indicator at 100; hit region ends at 100 + 10 + 50
    widget.on_pointer_down(200.0, 55.0);
    assert!(!widget.is_seeking());
    assert!(engine.calls().is_empty());
}

#[test]
fn cancel_resolves_session_like_release() {
    let engine = FakeEngine::prepared_with_duration(200_000);
    let (mut widget, _repaints) = widget_with_bounds(engine.clone());

    widget.play();
    let (x, y) = support::notch_press_at(100);
    widget.on_pointer_down(x, y);
    widget.on_pointer_move(450.0, 55.0);
    widget.on_pointer_cancel();

    assert!(!widget.is_seeking());
    assert_eq!(engine.seek_calls(), vec!["seek_to(140000)"]);
    assert!(widget.is_polling());
}

#[test]
fn ticks_never_move_the_indicator_mid_drag() {
    let engine = FakeEngine::prepared_with_duration(200_000);
    let (mut widget, _repaints) = widget_with_bounds(engine.clone());

    let (x, y) = support::notch_press_at(100);
    widget.on_pointer_down(x, y);
    widget.on_pointer_move(450.0, 55.0);

    engine.set_position_ms(80_000);
    let shared = widget.indicator();
    let (repaint, ticks) = support::counting_repaint();
    for _ in 0..5 {
        poll_once(engine.as_ref(), &shared, &repaint);
    }
    assert_eq!(widget.indicator_offset(), 450);
    assert_eq!(ticks.load(Ordering::Relaxed), 0);
}

#[test]
fn engine_events_stay_pending_during_a_drag() {
    let engine = FakeEngine::new();
    let (mut widget, _repaints) = widget_with_bounds(engine.clone());

    // grab the indicator while the engine is still loading
    let (x, y) = support::notch_press_at(100);
    widget.on_pointer_down(x, y);
    widget.on_pointer_move(450.0, 55.0);

    // the load finishes mid-drag
    {
        let mut st = engine.state.lock().unwrap();
        st.prepared = true;
        st.duration_ms = 200_000;
    }
    engine.fire_prepared();
    widget.process_engine_events();
    assert_eq!(
        widget.indicator_offset(),
        450,
        "a frame mid-drag must not snap the indicator back"
    );

    widget.on_pointer_up(450.0, 55.0);
    assert_eq!(engine.seek_calls(), vec!["seek_to(140000)"]);

    // the pending prepared event applies after the session resolves
    widget.process_engine_events();
    assert_eq!(widget.indicator_offset(), 450);
}

#[test]
fn poll_maps_forty_percent_to_expected_offset() {
    let engine = FakeEngine::prepared_with_duration(200_000);
    engine.set_position_ms(80_000);
    let (widget, _repaints) = widget_with_bounds(engine.clone());

    let shared = widget.indicator();
    let (repaint, _ticks) = support::counting_repaint();
    poll_once(engine.as_ref(), &shared, &repaint);
    assert_eq!(widget.indicator_offset(), 300);
}

#[test]
fn offsets_round_trip_through_milliseconds() {
    for percent in 0..=100 {
        let offset = mapper::percent_to_offset(percent, &TEST_TRACK);
        let ms = mapper::offset_to_position_ms(offset, &TEST_TRACK, 200_000);
        let back = mapper::percent_complete(ms, 200_000);
        assert!((back - percent).abs() <= 1, "{percent}% -> {offset}px -> {back}%");
    }
}
